//! # 数据库配置

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::error::{ProviderConfigError, Result};

/// 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库URL
    pub url: String,
    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

const fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://./data/oauth.db?mode=rwc".to_string(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 确保数据库路径存在（仅对SQLite文件数据库）
    pub fn ensure_database_path(&self) -> Result<()> {
        if !self.is_sqlite() || self.is_memory_database() {
            return Ok(());
        }

        let path_str = self
            .url
            .strip_prefix("sqlite://")
            .unwrap_or(&self.url)
            .split('?')
            .next()
            .unwrap_or_default();
        let db_path = Path::new(path_str);

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ProviderConfigError::config_with_source(
                        format!("failed to create database directory: {}", parent.display()),
                        e,
                    )
                })?;
                info!(path = %parent.display(), "Created database directory");
            }
        }

        Ok(())
    }

    /// 检查是否为内存数据库
    #[must_use]
    pub fn is_memory_database(&self) -> bool {
        self.url.contains(":memory:")
    }

    /// 检查是否为SQLite数据库
    #[must_use]
    pub fn is_sqlite(&self) -> bool {
        self.url.starts_with("sqlite:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_detection() {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        assert!(config.is_sqlite());
        assert!(config.is_memory_database());
        assert!(config.ensure_database_path().is_ok());
    }

    #[test]
    fn test_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let db_file = dir.path().join("nested").join("oauth.db");
        let config = DatabaseConfig {
            url: format!("sqlite://{}?mode=rwc", db_file.display()),
            max_connections: 1,
        };

        config.ensure_database_path().unwrap();
        assert!(dir.path().join("nested").exists());
    }
}
