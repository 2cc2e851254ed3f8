// 融合合成模块
// 名称表 -> 字段规则 -> 单对合成 -> 全部有序对

pub mod names;
pub mod population;
pub mod rules;
pub mod synthesis;

pub use names::{SplitName, SplitNameTable, MAX_NAME_ID};
pub use population::{build_population, FusionOptions, Population};
pub use rules::{calc_ev, calc_stat};
pub use synthesis::FusionEngine;
