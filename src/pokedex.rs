// 图鉴
// 种群与谱系的只读组合，导出器从这里读取条目

use indexmap::IndexMap;
use serde::Serialize;

use crate::assets::SpriteResolver;
use crate::core::error::Result;
use crate::fusion::Population;
use crate::lineage::{Lineage, LineageBuilder};
use crate::pokemon::{CreatureKind, CreatureRecord, LineageEntry};

#[derive(Debug, Clone)]
pub struct Pokedex {
    population: Population,
    lineage: Lineage,
}

/// 导出用的条目视图：记录字段、组成编号对应的基础名称、谱系标注。
#[derive(Debug, Clone, Serialize)]
pub struct DexEntry<'a> {
    #[serde(flatten)]
    pub record: &'a CreatureRecord,
    pub base_pokemons: IndexMap<&'a str, Option<&'a str>>,
    #[serde(flatten)]
    pub lineage: &'a LineageEntry,
}

impl Pokedex {
    pub fn build(population: Population, sprites: &dyn SpriteResolver) -> Result<Self> {
        let lineage = LineageBuilder::new(&population).with_sprites(sprites).build()?;
        Ok(Self { population, lineage })
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn lineage(&self) -> &Lineage {
        &self.lineage
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    pub fn entry(&self, id: &str) -> Option<DexEntry<'_>> {
        let record = self.population.get(id)?;
        self.view(record)
    }

    pub fn entries(&self) -> impl Iterator<Item = DexEntry<'_>> {
        self.population.iter().filter_map(|record| self.view(record))
    }

    fn view<'a>(&'a self, record: &'a CreatureRecord) -> Option<DexEntry<'a>> {
        let lineage = self.lineage.get(&record.id)?;
        Some(DexEntry {
            record,
            base_pokemons: self.base_pokemons(record),
            lineage,
        })
    }

    // 每个编号分段对应的基础名称，缺失时为 None
    fn base_pokemons<'a>(&'a self, record: &'a CreatureRecord) -> IndexMap<&'a str, Option<&'a str>> {
        record
            .component_ids()
            .map(|segment| {
                let name = self
                    .population
                    .get(segment)
                    .filter(|base| base.kind() == CreatureKind::Base)
                    .map(|base| base.name.as_str());
                (segment, name)
            })
            .collect()
    }
}
