// 错误处理系统
// 统一的错误类型，所有输入畸形与数据损坏都在这里汇总后中止整批运行

use std::io;
use thiserror::Error;

// 图鉴生成主要错误类型
#[derive(Debug, Error)]
pub enum DexError {
    // 配置错误
    #[error("配置错误: {0}")]
    Config(String),

    // 输入数据错误
    #[error("输入无效: {0}")]
    InvalidInput(String),

    #[error("名称表解析失败: {0}")]
    NameTable(String),

    #[error("名称表中不存在编号: {0}")]
    UnknownNameId(String),

    #[error("重复的宝可梦编号: {0}")]
    DuplicateId(String),

    // 谱系错误
    #[error("进化关系存在环: {0}")]
    EvolutionCycle(String),

    // I/O 与外部格式
    #[error("文件错误: {0}")]
    Io(#[from] io::Error),

    #[error("JSON解析错误: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML解析错误: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML序列化错误: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),
}

// Result类型别名
pub type Result<T> = std::result::Result<T, DexError>;

// 错误创建辅助宏
#[macro_export]
macro_rules! dex_error {
    ($variant:ident, $msg:expr) => {
        $crate::core::error::DexError::$variant($msg.to_string())
    };
    ($variant:ident, $fmt:expr, $($arg:tt)*) => {
        $crate::core::error::DexError::$variant(format!($fmt, $($arg)*))
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    // 外部环境问题，修正路径或权限后重跑即可
    Environment,
    // 源数据损坏，需要修正上游数据
    DataCorruption,
}

impl DexError {
    // 获取错误的严重程度
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            DexError::Config(_) | DexError::Io(_) | DexError::Database(_) | DexError::TomlSer(_) => {
                ErrorSeverity::Environment
            }
            _ => ErrorSeverity::DataCorruption,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = DexError::UnknownNameId("999".to_string());
        assert_eq!(error.to_string(), "名称表中不存在编号: 999");
    }

    #[test]
    fn test_error_severity() {
        let cycle = DexError::EvolutionCycle("1".to_string());
        assert_eq!(cycle.severity(), ErrorSeverity::DataCorruption);

        let io_error: DexError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert_eq!(io_error.severity(), ErrorSeverity::Environment);
    }

    #[test]
    fn test_error_conversion() {
        let json_error = serde_json::from_str::<u32>("oops").unwrap_err();
        let dex_error: DexError = json_error.into();

        match dex_error {
            DexError::Json(_) => {}
            other => panic!("Expected Json, got {other:?}"),
        }
    }

    #[test]
    fn test_dex_error_macro() {
        let error = dex_error!(InvalidInput, "bad field: {}", "base_hp");
        match error {
            DexError::InvalidInput(msg) => assert_eq!(msg, "bad field: base_hp"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
