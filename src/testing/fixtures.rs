//! # 测试 Fixtures
//!
//! 预设的密钥、策略和管理器

use std::sync::Arc;

use super::helpers::create_test_db;
use crate::callback::{CallbackPolicy, CallbackValidator};
use crate::crypto::{CredentialCipher, EncryptionKey, KEY_LEN};
use crate::providers::{DatabaseProviderStore, MemoryProviderStore, ProviderConfigManager};

/// 测试使用的生产基础域名
pub const TEST_BASE_DOMAIN: &str = "example.com";

/// 由单一字节填充的确定性密钥
#[must_use]
pub const fn test_key(fill: u8) -> EncryptionKey {
    EncryptionKey::from_bytes([fill; KEY_LEN])
}

/// 测试加密器
#[must_use]
pub fn test_cipher() -> Arc<CredentialCipher> {
    Arc::new(CredentialCipher::new(&test_key(0x5A)))
}

/// 只允许 `example.com` 及回环地址的校验器
#[must_use]
pub fn test_validator() -> CallbackValidator {
    match CallbackPolicy::new([TEST_BASE_DOMAIN]) {
        Ok(policy) => CallbackValidator::new(policy),
        Err(err) => panic!("test policy must be valid: {err}"),
    }
}

/// 基于内存存储的管理器
#[must_use]
pub fn memory_manager() -> (ProviderConfigManager, Arc<MemoryProviderStore>) {
    let store = Arc::new(MemoryProviderStore::new());
    let manager = ProviderConfigManager::new(store.clone(), test_cipher(), test_validator());
    (manager, store)
}

/// 基于内存 SQLite 的管理器
pub async fn database_manager() -> ProviderConfigManager {
    let db = match create_test_db().await {
        Ok(db) => Arc::new(db),
        Err(err) => panic!("failed to create test database: {err}"),
    };
    let store = Arc::new(DatabaseProviderStore::new(db));
    ProviderConfigManager::new(store, test_cipher(), test_validator())
}
