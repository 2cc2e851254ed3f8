// 进化链构建
// 每个连通谱系只计算一次，所有成员共享同一条链

use indexmap::IndexMap;
use log::trace;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::assets::SpriteResolver;
use crate::fusion::Population;
use crate::pokemon::{ChainLink, EvolutionChain, EvolutionLink};

pub(super) struct ChainBuilder<'a> {
    pub population: &'a Population,
    pub evolves_to: &'a IndexMap<String, Vec<EvolutionLink>>,
    pub evolves_from: &'a HashMap<String, Vec<EvolutionLink>>,
    pub sprites: &'a dyn SpriteResolver,
}

impl<'a> ChainBuilder<'a> {
    /// 按种群顺序为每个还没有链的条目找到根并向前展开，
    /// 已经持有链的成员保留原来的链。
    pub fn build(&self) -> HashMap<&'a str, EvolutionChain> {
        let mut chains: HashMap<&'a str, EvolutionChain> = HashMap::with_capacity(self.evolves_to.len());

        for id in self.evolves_to.keys() {
            let id = id.as_str();
            if chains.contains_key(id) {
                continue;
            }

            let root = self.find_root(id);
            let chain: EvolutionChain = Arc::new(self.walk_forward(root));
            trace!("进化链 {} -> {} 个成员", root, chain.len());

            for link in chain.iter() {
                if let Some((key, _)) = self.evolves_to.get_key_value(link.id.as_str()) {
                    chains.entry(key.as_str()).or_insert_with(|| Arc::clone(&chain));
                }
            }
            chains.entry(id).or_insert(chain);
        }

        chains
    }

    // 沿 evolves_from[0] 回溯到没有入边的条目
    fn find_root(&self, id: &'a str) -> &'a str {
        let mut current = id;
        let mut seen: HashSet<&str> = HashSet::from([id]);
        while let Some(link) = self.evolves_from.get(current).and_then(|links| links.first()) {
            if !seen.insert(link.id.as_str()) {
                break;
            }
            current = link.id.as_str();
        }
        current
    }

    // 先序深度优先，分支按边的编写顺序展开
    fn walk_forward(&self, root: &'a str) -> Vec<ChainLink> {
        let mut chain = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<(&'a str, Option<&'a str>)> = vec![(root, None)];

        while let Some((id, parent)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(record) = self.population.get(id) else {
                continue;
            };

            let resolved: Vec<&'a EvolutionLink> = self.resolved_edges(id).collect();
            let first = resolved.first();
            chain.push(ChainLink {
                id: record.id.clone(),
                name: record.name.clone(),
                parent: parent.map(str::to_string),
                target: first.map(|link| link.target.clone()),
                method: first.map(|link| link.method.clone()),
                param: first.and_then(|link| link.param.clone()),
                image: self.sprites.resolve(id),
            });

            for link in resolved.iter().rev().copied() {
                if !visited.contains(link.target.as_str()) {
                    stack.push((link.target.as_str(), Some(id)));
                }
            }
        }

        chain
    }

    fn resolved_edges(&self, id: &str) -> impl Iterator<Item = &'a EvolutionLink> + 'a {
        let population = self.population;
        self.evolves_to
            .get(id)
            .into_iter()
            .flatten()
            .filter(move |link| population.contains(&link.target))
    }
}
