//! # 错误类型定义

use axum::http::StatusCode;
use thiserror::Error;

use super::ErrorCategory;
use crate::callback::CallbackRejection;
use crate::crypto::CipherError;
use crate::providers::OAuthProvider;

/// 提供商配置子系统的主要错误类型
///
/// 任何变体的 `Display` 输出都不包含密钥、密文或明文凭证。
#[derive(Debug, Error)]
pub enum ProviderConfigError {
    /// 回调地址未通过校验策略
    #[error("invalid callback URL: {reason}")]
    InvalidCallbackUrl { reason: CallbackRejection },

    /// 试图禁用受保护的提供商
    #[error("provider `{provider}` is protected and cannot be disabled")]
    ProtectedProvider { provider: OAuthProvider },

    /// 存储的客户端密钥无法通过完整性校验
    #[error("stored client secret for `{provider}` could not be decrypted")]
    DecryptionFailed {
        provider: OAuthProvider,
        #[source]
        source: CipherError,
    },

    /// 提供商尚未配置客户端凭证
    #[error("provider `{provider}` has no client credentials configured")]
    NotConfigured { provider: OAuthProvider },

    /// 未知的提供商标识
    #[error("unknown OAuth provider: {value}")]
    UnknownProvider { value: String },

    /// 加密失败
    #[error("failed to encrypt client secret")]
    Encryption {
        #[source]
        source: CipherError,
    },

    /// 配置相关错误
    #[error("configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 数据库相关错误
    #[error("database error: {message}")]
    Database {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 系统内部错误
    #[error("internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 附加上下文的错误
    #[error("{context}")]
    Context {
        context: String,
        #[source]
        source: Box<ProviderConfigError>,
    },
}

impl ProviderConfigError {
    /// 将错误转换为HTTP状态码和错误代码
    #[must_use]
    pub fn to_http_response_parts(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidCallbackUrl { .. } => (StatusCode::BAD_REQUEST, "INVALID_CALLBACK_URL"),
            Self::ProtectedProvider { .. } => (StatusCode::FORBIDDEN, "PROTECTED_PROVIDER"),
            Self::DecryptionFailed { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, "DECRYPTION_FAILED")
            }
            Self::NotConfigured { .. } => (StatusCode::NOT_FOUND, "NOT_CONFIGURED"),
            Self::UnknownProvider { .. } => (StatusCode::BAD_REQUEST, "UNKNOWN_PROVIDER"),
            Self::Encryption { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "ENCRYPTION_ERROR"),
            Self::Config { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            Self::Database { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
            Self::Internal { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            Self::Context { source, .. } => source.to_http_response_parts(),
        }
    }

    /// 错误分类
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidCallbackUrl { .. }
            | Self::ProtectedProvider { .. }
            | Self::NotConfigured { .. }
            | Self::UnknownProvider { .. } => ErrorCategory::Client,
            Self::Context { source, .. } => source.category(),
            Self::DecryptionFailed { .. }
            | Self::Encryption { .. }
            | Self::Config { .. }
            | Self::Database { .. }
            | Self::Internal { .. } => ErrorCategory::Server,
        }
    }

    /// 去除上下文包装后的根错误
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Context { source, .. } => source.root(),
            other => other,
        }
    }

    /// 创建回调地址错误
    #[must_use]
    pub const fn invalid_callback_url(reason: CallbackRejection) -> Self {
        Self::InvalidCallbackUrl { reason }
    }

    /// 创建未知提供商错误
    pub fn unknown_provider<T: Into<String>>(value: T) -> Self {
        Self::UnknownProvider {
            value: value.into(),
        }
    }

    /// 创建配置错误
    pub fn config<T: Into<String>>(message: T) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的配置错误
    pub fn config_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的数据库错误
    pub fn database_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Database {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 创建内部错误
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的内部错误
    pub fn internal_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Internal {
            message: message.into(),
            source: Some(source.into()),
        }
    }
}

// 自动转换常见错误类型
impl From<CallbackRejection> for ProviderConfigError {
    fn from(reason: CallbackRejection) -> Self {
        Self::InvalidCallbackUrl { reason }
    }
}

impl From<toml::de::Error> for ProviderConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("failed to parse TOML configuration", err)
    }
}

impl From<sea_orm::error::DbErr> for ProviderConfigError {
    fn from(err: sea_orm::error::DbErr) -> Self {
        Self::database_with_source("database operation failed", err)
    }
}

impl From<serde_json::Error> for ProviderConfigError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal_with_source("JSON serialization failed", err)
    }
}
