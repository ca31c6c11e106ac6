//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。
//!
//! # 特性
//!
//! - 结构化日志：每个阶段以键值对记录顶点数、缩放系数等
//! - 灵活输出：支持控制台和文件输出
//! - 日志级别：trace, debug, info, warn, error
//!
//! # 使用示例
//!
//! ```no_run
//! use dist_rig::core::log::{self, LogLevel};
//!
//! log::init_logger(LogLevel::Info, false, None);
//! dist_rig::rig_info!(vertices = 1024, "Mesh normalized");
//! ```

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::path::Path;

pub use super::config::LogLevel;

/// 初始化日志系统
///
/// 必须在程序开始时调用一次。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否输出到文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "distrig.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) {
    let filter = EnvFilter::new(level_directive(level));

    if file_output {
        let log_path = log_file_path.unwrap_or("distrig.log");
        let path = Path::new(log_path);
        let directory = path.parent().unwrap_or(Path::new("."));
        let filename = path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("distrig.log");

        // 每天滚动
        let file_appender = RollingFileAppender::new(
            Rotation::DAILY,
            directory,
            filename
        );

        let console_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(false)  // 文件不需要 ANSI 颜色
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(true);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

fn level_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Trace => "trace",
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        LogLevel::Error => "error",
    }
}

/// 绑定流程日志 - Info 级别
#[macro_export]
macro_rules! rig_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "distrig::pipeline", $($arg)*)
    };
}

/// 绑定流程日志 - Debug 级别
#[macro_export]
macro_rules! rig_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "distrig::pipeline", $($arg)*)
    };
}

/// 绑定流程日志 - Warn 级别
#[macro_export]
macro_rules! rig_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "distrig::pipeline", $($arg)*)
    };
}

/// 应用层日志 - Info 级别
#[macro_export]
macro_rules! app_info {
    ($($arg:tt)*) => {
        tracing::info!(target: "distrig::app", $($arg)*)
    };
}

/// 应用层日志 - Warn 级别
#[macro_export]
macro_rules! app_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "distrig::app", $($arg)*)
    };
}

/// 应用层日志 - Error 级别
#[macro_export]
macro_rules! app_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "distrig::app", $($arg)*)
    };
}

/// 阶段 span 宏
///
/// Info 级别的 span。日志层开启了 `FmtSpan::CLOSE`，span 关闭时输出该阶段的耗时。
///
/// ```no_run
/// let _guard = dist_rig::stage_span!("weights").entered();
/// ```
#[macro_export]
macro_rules! stage_span {
    ($name:expr) => {
        tracing::span!(tracing::Level::INFO, $name)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_directive() {
        assert_eq!(level_directive(LogLevel::Warn), "warn");
        assert_eq!(level_directive(LogLevel::Trace), "trace");
    }

    #[test]
    fn test_stage_span_passes_default_filter() {
        use tracing_subscriber::prelude::*;

        let subscriber = tracing_subscriber::registry()
            .with(EnvFilter::new(level_directive(LogLevel::Info)))
            .with(fmt::layer().with_test_writer().with_span_events(FmtSpan::CLOSE));

        tracing::subscriber::with_default(subscriber, || {
            let span = crate::stage_span!("weights");
            assert!(!span.is_disabled());
        });
    }
}
