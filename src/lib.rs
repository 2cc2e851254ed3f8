// 融合图鉴数据生成库入口
// 基础宝可梦 -> 全部双体融合 -> 进化谱系 -> JSON / SQLite

pub mod assets;
pub mod core;
pub mod data;
pub mod fusion;
pub mod lineage;
pub mod pokedex;
pub mod pokemon;
pub mod utils;

// 重新导出核心类型
pub use crate::core::{App, DexConfig, DexError, Result, RunSummary};
pub use fusion::{build_population, FusionEngine, FusionOptions, Population, SplitNameTable};
pub use lineage::{Lineage, LineageBuilder};
pub use pokedex::{DexEntry, Pokedex};
pub use pokemon::{CreatureRecord, LineageEntry, PokemonType};

// 版本信息
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = "fusiondex";

pub mod constants {
    // 每个数据库事务写入的条目数
    pub const DEFAULT_CHUNK_SIZE: usize = 10_000;
    pub const DEFAULT_PROGRESS_INTERVAL: usize = 1000;
}

// 性能分析工具
pub struct PerformanceProfiler {
    start_time: std::time::Instant,
    name: String,
}

impl PerformanceProfiler {
    pub fn new(name: &str) -> Self {
        Self {
            start_time: std::time::Instant::now(),
            name: name.to_string(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

impl Drop for PerformanceProfiler {
    fn drop(&mut self) {
        let elapsed = self.elapsed();
        if elapsed.as_millis() > 1 {
            log::debug!("性能: {} 耗时 {:.2}ms", self.name, elapsed.as_secs_f64() * 1000.0);
        }
    }
}

// 便利宏
#[macro_export]
macro_rules! profile {
    ($name:expr, $code:block) => {{
        let _profiler = $crate::PerformanceProfiler::new($name);
        $code
    }};
}
