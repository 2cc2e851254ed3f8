// 谱系构建器
// 输入种群只读，输出按编号索引的谱系标注

use indexmap::IndexMap;
use log::{debug, info, warn};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::chain::ChainBuilder;
use super::graph::EvolutionGraph;
use crate::assets::{NoSprites, SpriteResolver};
use crate::core::error::Result;
use crate::fusion::Population;
use crate::pokemon::{EvolutionLink, LineageEntry};

/// 整个种群的谱系标注，顺序与种群一致。
#[derive(Debug, Clone, Default)]
pub struct Lineage {
    entries: IndexMap<String, LineageEntry>,
    dangling_edges: usize,
}

impl Lineage {
    pub fn get(&self, id: &str) -> Option<&LineageEntry> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &LineageEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // 目标不在种群中的前向边数量
    pub fn dangling_edges(&self) -> usize {
        self.dangling_edges
    }

    // 不同进化链的数量
    pub fn chain_count(&self) -> usize {
        let mut seen = HashSet::new();
        self.entries
            .values()
            .filter(|entry| seen.insert(Arc::as_ptr(&entry.evolution_chain)))
            .count()
    }
}

pub struct LineageBuilder<'a> {
    population: &'a Population,
    sprites: &'a dyn SpriteResolver,
}

impl<'a> LineageBuilder<'a> {
    pub fn new(population: &'a Population) -> Self {
        Self {
            population,
            sprites: &NoSprites,
        }
    }

    pub fn with_sprites(mut self, sprites: &'a dyn SpriteResolver) -> Self {
        self.sprites = sprites;
        self
    }

    pub fn build(&self) -> Result<Lineage> {
        info!("开始构建谱系: {} 个条目", self.population.len());

        let (evolves_to, evolves_from, dangling_edges) = self.materialize_edges();
        if dangling_edges > 0 {
            warn!("{} 条进化边的目标不在种群中", dangling_edges);
        }

        self.ensure_acyclic(&evolves_to)?;

        let mut chains = ChainBuilder {
            population: self.population,
            evolves_to: &evolves_to,
            evolves_from: &evolves_from,
            sprites: self.sprites,
        }
        .build();

        let mut entries = IndexMap::with_capacity(evolves_to.len());
        for (id, links) in &evolves_to {
            let evolution_chain = chains.remove(id.as_str()).unwrap_or_default();
            let entry = LineageEntry {
                evolves_from: evolves_from.get(id).cloned().unwrap_or_default(),
                evolves_to: links.clone(),
                evolution_chain,
            };
            entries.insert(id.clone(), entry);
        }

        let lineage = Lineage { entries, dangling_edges };
        info!("谱系构建完成: {} 条进化链", lineage.chain_count());
        Ok(lineage)
    }

    // 前向边按编写顺序解析；能解析的同时生成目标的反向边
    fn materialize_edges(&self) -> (IndexMap<String, Vec<EvolutionLink>>, HashMap<String, Vec<EvolutionLink>>, usize) {
        let mut evolves_to = IndexMap::with_capacity(self.population.len());
        let mut evolves_from: HashMap<String, Vec<EvolutionLink>> = HashMap::new();
        let mut dangling = 0;

        for record in self.population.iter() {
            let mut links = Vec::with_capacity(record.evolutions.len());
            for evolution in &record.evolutions {
                let param = evolution.param_value();
                let mut link = EvolutionLink {
                    id: evolution.target.clone(),
                    name: None,
                    target: evolution.target.clone(),
                    method: evolution.method.clone(),
                    param: param.clone(),
                    image: None,
                };

                match self.population.get(&evolution.target) {
                    Some(target) => {
                        link.name = Some(target.name.clone());
                        link.image = self.sprites.resolve(&target.id);
                        evolves_from.entry(target.id.clone()).or_default().push(EvolutionLink {
                            id: record.id.clone(),
                            name: Some(record.name.clone()),
                            target: target.id.clone(),
                            method: evolution.method.clone(),
                            param,
                            image: self.sprites.resolve(&record.id),
                        });
                    }
                    None => {
                        debug!("{} 的进化目标 {} 不在种群中", record.id, evolution.target);
                        dangling += 1;
                    }
                }
                links.push(link);
            }
            evolves_to.insert(record.id.clone(), links);
        }

        (evolves_to, evolves_from, dangling)
    }

    fn ensure_acyclic(&self, evolves_to: &IndexMap<String, Vec<EvolutionLink>>) -> Result<()> {
        let mut graph = EvolutionGraph::with_capacity(evolves_to.len());
        for (id, links) in evolves_to {
            graph.add_node(id);
            for link in links.iter().filter(|link| link.name.is_some()) {
                graph.add_edge(id, &link.target);
            }
        }
        graph.ensure_acyclic()
    }
}
