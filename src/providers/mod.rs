//! # 身份提供商配置模块
//!
//! 提供商凭证的加密存储、启用状态和回调地址管理

pub mod database_store;
pub mod manager;
pub mod masking;
pub mod memory_store;
pub mod models;
pub mod traits;
pub mod types;

pub use database_store::DatabaseProviderStore;
pub use manager::ProviderConfigManager;
pub use masking::mask_secret;
pub use memory_store::MemoryProviderStore;
pub use models::{
    AuditStamp, CallbackAuditFinding, CredentialsUpdate, DecryptedCredentials,
    MaskedProviderView, ProviderConfig, ProviderConfigPatch, ProviderDetailsUpdate,
};
pub use traits::ProviderConfigStore;
pub use types::OAuthProvider;
