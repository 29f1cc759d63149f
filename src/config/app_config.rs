//! # 应用配置结构定义

use serde::{Deserialize, Serialize};

use super::DatabaseConfig;
use crate::callback::CallbackPolicy;
use crate::crypto::EncryptionKey;
use crate::ensure_config;
use crate::error::Result;

/// 默认的加密密钥环境变量
pub const DEFAULT_ENCRYPTION_KEY_ENV: &str = "OAUTH_ENCRYPTION_KEY";

/// 应用主配置结构
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,
    /// 安全配置
    #[serde(default)]
    pub security: SecurityConfig,
    /// 回调地址策略
    pub callback: CallbackConfig,
}

/// 安全配置
///
/// 密钥本身只从环境变量读取，配置文件中只记录变量名。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// 保存加密密钥的环境变量名
    #[serde(default = "default_encryption_key_env")]
    pub encryption_key_env: String,
}

fn default_encryption_key_env() -> String {
    DEFAULT_ENCRYPTION_KEY_ENV.to_string()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            encryption_key_env: default_encryption_key_env(),
        }
    }
}

impl SecurityConfig {
    /// 从环境变量加载加密密钥
    pub fn load_encryption_key(&self) -> Result<EncryptionKey> {
        EncryptionKey::from_env(&self.encryption_key_env)
    }
}

/// 回调地址策略配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackConfig {
    /// 生产环境基础域名白名单
    pub base_domains: Vec<String>,
    /// 是否允许本地回环地址
    #[serde(default = "default_allow_loopback")]
    pub allow_loopback: bool,
}

const fn default_allow_loopback() -> bool {
    true
}

impl CallbackConfig {
    /// 构建校验策略
    pub fn to_policy(&self) -> Result<CallbackPolicy> {
        Ok(CallbackPolicy::new(&self.base_domains)?.with_loopback(self.allow_loopback))
    }
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        ensure_config!(!self.database.url.is_empty(), "database URL cannot be empty");
        ensure_config!(
            self.database.max_connections > 0,
            "database max_connections must be greater than 0"
        );
        ensure_config!(
            !self.security.encryption_key_env.trim().is_empty(),
            "security.encryption_key_env cannot be empty"
        );
        ensure_config!(
            !self.callback.base_domains.is_empty(),
            "callback.base_domains must list at least one domain"
        );

        self.callback.to_policy()?;
        Ok(())
    }
}
