//! tracing 初始化
//!
//! 默认写到 stderr；设置 `ZSEARCH_LOG_DIR` 时改写按天滚动的日志文件。
//! 过滤规则依次取 `ZSEARCH_LOG`、`RUST_LOG`，都没有时为 `zsearch=warn`。

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

const FILTER_ENV: &str = "ZSEARCH_LOG";
const LOG_DIR_ENV: &str = "ZSEARCH_LOG_DIR";
const DEFAULT_FILTER: &str = "zsearch=warn";

/// 进程退出前必须保持存活，drop 时刷新尚未写出的日志
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_dir: Option<PathBuf>,
}

impl LoggingGuard {
    pub fn log_dir(&self) -> Option<&Path> {
        self.log_dir.as_deref()
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(FILTER_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

fn log_dir_from_env() -> Option<PathBuf> {
    let dir = PathBuf::from(std::env::var_os(LOG_DIR_ENV)?);
    std::fs::create_dir_all(&dir).ok()?;
    Some(dir)
}

/// 已经装过全局 subscriber 时返回 `None`
pub fn init() -> Option<LoggingGuard> {
    let log_dir = log_dir_from_env();
    let (writer, guard) = match &log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "zsearch.log");
            tracing_appender::non_blocking(appender)
        }
        None => tracing_appender::non_blocking(std::io::stderr()),
    };

    let subscriber = tracing_subscriber::registry().with(env_filter()).with(
        tracing_subscriber::fmt::layer()
            .with_writer(writer)
            .with_ansi(false)
            .with_target(true),
    );

    if subscriber.try_init().is_err() {
        return None;
    }

    std::panic::set_hook(Box::new(|panic_info| {
        tracing::error!(panic = %panic_info, "panic");
    }));

    tracing::debug!(log_dir = ?log_dir, "tracing initialized");

    Some(LoggingGuard {
        _guard: guard,
        log_dir,
    })
}
