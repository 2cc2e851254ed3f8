// 核心模块 - 错误处理、配置与构建流程

pub mod app;
pub mod config;
pub mod error;

// 重新导出核心类型
pub use app::{App, RunSummary};
pub use config::DexConfig;
pub use error::{DexError, ErrorSeverity, Result};
