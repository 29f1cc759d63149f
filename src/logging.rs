//! # 日志配置模块
//!
//! 基于 `tracing-subscriber` 的 `EnvFilter` 和紧凑格式输出。
//! 日志字段只包含提供商标识和操作人，从不包含密钥、密文或明文凭证。

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// 未设置 `RUST_LOG` 时使用的过滤规则
const DEFAULT_DIRECTIVES: &str = "sqlx::query=off,sea_orm::query=warn,sqlx=warn";

/// 构建过滤器：优先使用 `RUST_LOG`，否则使用给定级别
#[must_use]
pub fn build_filter(log_level: Option<&str>) -> EnvFilter {
    let level = log_level.unwrap_or("info");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{level},oauth_provider_config={level},{DEFAULT_DIRECTIVES}"
        ))
    })
}

/// 初始化日志系统
///
/// 重复调用时静默忽略。
pub fn init_logging(log_level: Option<&str>) {
    let _ = tracing_subscriber::registry()
        .with(build_filter(log_level))
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(false)
                .with_thread_names(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .try_init();
}
