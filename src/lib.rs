//! # OAuth Provider Configuration
//!
//! 第三方身份提供商（Google、Kakao、Naver、Apple）凭证的加密存储、
//! 回调地址白名单校验以及启用状态管理

pub mod callback;
pub mod config;
pub mod crypto;
pub mod database;
pub mod error;
pub mod logging;
pub mod providers;
pub mod testing;

// Re-export commonly used types
pub use callback::{CallbackPolicy, CallbackRejection, CallbackValidator};
pub use config::AppConfig;
pub use crypto::{CredentialCipher, EncryptionKey};
pub use error::{ProviderConfigError, Result};
pub use providers::{OAuthProvider, ProviderConfigManager};
