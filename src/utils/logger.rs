// 日志系统初始化
// 库内部只使用 log 门面，由二进制入口决定输出后端

use log::{LevelFilter, SetLoggerError};

/// 解析配置里的日志级别，无法识别时回退为 info。
pub fn parse_level(level: &str) -> LevelFilter {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// 初始化 env_logger。`RUST_LOG` 存在时优先于配置文件。
/// 全局日志器只能设置一次，重复调用返回错误。
pub fn init_logging(level: &str, verbose: bool) -> Result<(), SetLoggerError> {
    let filter = if verbose { LevelFilter::Debug } else { parse_level(level) };
    let default_filter = format!("{}={}", crate::NAME, filter.as_str().to_ascii_lowercase());

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), LevelFilter::Debug);
        assert_eq!(parse_level(" warn "), LevelFilter::Warn);
        assert_eq!(parse_level("verbose"), LevelFilter::Info);
    }

    #[test]
    fn test_init_logging_twice() {
        let _ = init_logging("info", false);
        assert!(init_logging("trace", true).is_err());
        log::info!("日志系统重复初始化测试");
    }
}
