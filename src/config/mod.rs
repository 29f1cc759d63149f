//! # 配置管理模块
//!
//! 处理应用配置加载、环境变量覆盖和验证

mod app_config;
mod database;

pub use app_config::{
    AppConfig, CallbackConfig, DEFAULT_ENCRYPTION_KEY_ENV, SecurityConfig,
};
pub use database::DatabaseConfig;

use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{ProviderConfigError, Result};

/// 指定配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "OAUTH_CONFIG_PATH";

/// 覆盖基础域名白名单的环境变量（逗号分隔）
pub const BASE_DOMAINS_ENV: &str = "OAUTH_CALLBACK_BASE_DOMAINS";

/// 覆盖数据库URL的环境变量
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// 加载配置文件
///
/// 优先使用 `OAUTH_CONFIG_PATH`，否则读取 `config/config.{RUST_ENV}.toml`。
pub fn load_config() -> Result<AppConfig> {
    let config_file = env::var(CONFIG_PATH_ENV).map_or_else(
        |_| {
            let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
            PathBuf::from(format!("config/config.{env}.toml"))
        },
        PathBuf::from,
    );

    load_config_from(&config_file)
}

/// 从指定路径加载配置并应用环境变量覆盖
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Err(ProviderConfigError::config(format!(
            "configuration file not found: {}",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ProviderConfigError::config_with_source(
            format!("failed to read configuration file: {}", path.display()),
            e,
        )
    })?;

    let mut config = parse_config(&content)?;
    apply_env_overrides(&mut config);
    config.validate()?;

    info!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// 解析 TOML 配置内容（不读取环境变量）
pub fn parse_config(content: &str) -> Result<AppConfig> {
    Ok(toml::from_str(content)?)
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(domains) = env::var(BASE_DOMAINS_ENV) {
        let domains = split_domains(&domains);
        if !domains.is_empty() {
            debug!(count = domains.len(), "Base domains overridden from environment");
            config.callback.base_domains = domains;
        }
    }

    if let Ok(url) = env::var(DATABASE_URL_ENV) {
        if !url.trim().is_empty() {
            debug!("Database URL overridden from environment");
            config.database.url = url;
        }
    }
}

fn split_domains(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = r#"
[database]
url = "sqlite::memory:"
max_connections = 2

[callback]
base_domains = ["example.com", "Example.org"]
"#;

    #[test]
    fn test_parse_applies_defaults() {
        let config = parse_config(SAMPLE).unwrap();

        assert_eq!(config.database.max_connections, 2);
        assert_eq!(config.security.encryption_key_env, DEFAULT_ENCRYPTION_KEY_ENV);
        assert!(config.callback.allow_loopback);
        assert!(config.validate().is_ok());

        let policy = config.callback.to_policy().unwrap();
        assert_eq!(policy.base_domains(), ["example.com", "example.org"]);
    }

    #[test]
    fn test_validate_rejects_empty_allowlist() {
        let config = parse_config(
            r#"
[callback]
base_domains = []
"#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("base_domains"));
    }

    #[test]
    fn test_validate_rejects_invalid_domain() {
        let config = parse_config(
            r#"
[callback]
base_domains = ["localhost"]
"#,
        )
        .unwrap();

        assert!(matches!(
            config.validate().unwrap_err(),
            ProviderConfigError::Config { .. }
        ));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = load_config_from(Path::new("/nonexistent/oauth.toml")).unwrap_err();
        assert!(matches!(err, ProviderConfigError::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_config_from(file.path()).unwrap();
        assert!(!config.callback.base_domains.is_empty());
    }

    #[test]
    fn test_split_domains() {
        assert_eq!(
            split_domains(" example.com, ,auth.example.org "),
            vec!["example.com".to_string(), "auth.example.org".to_string()]
        );
    }
}
