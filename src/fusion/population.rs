// 种群构建
// 基础条目 + 全部有序对融合 + 三体融合，编号在种群内唯一

use indexmap::IndexMap;
use log::{debug, info, warn};
use std::collections::HashMap;

use super::synthesis::FusionEngine;
use crate::core::error::{DexError, Result};
use crate::pokemon::{CreatureKind, CreatureRecord};

// 完整种群，按插入顺序保存（基础、融合、三体）
#[derive(Debug, Clone, Default)]
pub struct Population {
    records: IndexMap<String, CreatureRecord>,
}

impl Population {
    /// 由若干批条目组装种群，编号重复视为输入错误。
    pub fn assemble<I>(batches: I) -> Result<Self>
    where
        I: IntoIterator<Item = Vec<CreatureRecord>>,
    {
        let mut records = IndexMap::new();
        for batch in batches {
            records.reserve(batch.len());
            for record in batch {
                if records.contains_key(&record.id) {
                    return Err(DexError::DuplicateId(record.id));
                }
                records.insert(record.id.clone(), record);
            }
        }
        Ok(Self { records })
    }

    pub fn get(&self, id: &str) -> Option<&CreatureRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CreatureRecord> {
        self.records.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn count_kind(&self, kind: CreatureKind) -> usize {
        self.records.values().filter(|record| record.kind() == kind).count()
    }

    /// 用外部图鉴文本覆盖对应条目，返回被覆盖的条目数。
    pub fn with_pokedex_overrides(mut self, overrides: &HashMap<String, String>) -> (Self, usize) {
        let mut applied = 0;
        for (id, entry) in overrides {
            match self.records.get_mut(id) {
                Some(record) => {
                    record.pokedex_entry = entry.clone();
                    applied += 1;
                }
                None => debug!("图鉴覆盖条目 {} 不在种群中", id),
            }
        }
        (self, applied)
    }
}

// 融合选项
#[derive(Debug, Clone, Copy)]
pub struct FusionOptions {
    pub include_self_fusions: bool,
}

impl Default for FusionOptions {
    fn default() -> Self {
        Self {
            include_self_fusions: true,
        }
    }
}

impl FusionEngine {
    /// 对基础条目的每个有序对 (头, 身体) 合成融合条目，
    /// 顺序为头部外层、身体内层。
    pub fn synthesize_all(&self, base: &[CreatureRecord], options: FusionOptions) -> Result<Vec<CreatureRecord>> {
        info!("开始合成融合: {} 个基础条目", base.len());
        let rows = self.synthesize_rows(base, options)?;
        let fusions: Vec<CreatureRecord> = rows.into_iter().flatten().collect();
        info!("融合合成完成: {} 条", fusions.len());
        Ok(fusions)
    }

    fn synthesize_row(&self, head: &CreatureRecord, base: &[CreatureRecord], options: FusionOptions) -> Result<Vec<CreatureRecord>> {
        base.iter()
            .filter(|body| options.include_self_fusions || body.id != head.id)
            .map(|body| self.synthesize(head, body))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn synthesize_rows(&self, base: &[CreatureRecord], options: FusionOptions) -> Result<Vec<Vec<CreatureRecord>>> {
        base.iter()
            .map(|head| self.synthesize_row(head, base, options))
            .collect()
    }

    #[cfg(feature = "parallel")]
    fn synthesize_rows(&self, base: &[CreatureRecord], options: FusionOptions) -> Result<Vec<Vec<CreatureRecord>>> {
        use rayon::prelude::*;

        debug!("并行合成, 线程数 {}", rayon::current_num_threads());
        base.par_iter()
            .map(|head| self.synthesize_row(head, base, options))
            .collect()
    }
}

/// 从基础条目与三体条目构建完整种群。
pub fn build_population(
    engine: &FusionEngine,
    base: Vec<CreatureRecord>,
    triples: Vec<CreatureRecord>,
    options: FusionOptions,
) -> Result<Population> {
    if base.is_empty() {
        warn!("基础条目为空, 种群只包含三体融合");
    }
    let fusions = engine.synthesize_all(&base, options)?;
    let population = Population::assemble([base, fusions, triples])?;
    info!("种群构建完成: 共 {} 条", population.len());
    Ok(population)
}
