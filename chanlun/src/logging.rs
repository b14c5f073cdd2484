use std::str::FromStr;

use tracing::Level;

/// 日志级别环境变量，取值同 `tracing::Level`（如 `debug`）。
pub const LOG_LEVEL_ENV: &str = "CHANLUN_LOG";

pub fn init_logging() {
    let level = std::env::var(LOG_LEVEL_ENV)
        .ok()
        .and_then(|x| Level::from_str(x.trim()).ok())
        .unwrap_or(Level::INFO);
    init_logging_with_level(level);
}

pub fn init_logging_with_level(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init();
}
