// 工具模块 - 通用工具和辅助函数

pub mod logger;
pub mod text;
pub mod unique;

pub use logger::{init_logging, parse_level};
pub use text::{capitalize_first, compare_ids, splice_text};
pub use unique::{unique, unique_hashed};
