//! # 加密密钥
//!
//! 进程启动时注入一次，构造后只读

use aes_gcm::aead::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::error::{ProviderConfigError, Result};

/// AES-256 密钥长度（字节）
pub const KEY_LEN: usize = 32;

/// 密钥材料的最小长度（字节）
pub const MIN_KEY_MATERIAL_LEN: usize = 32;

/// 256 位对称加密密钥
///
/// 不实现 `Serialize`，`Debug` 输出不包含密钥内容。
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_LEN]);

impl EncryptionKey {
    /// 从原始字节创建密钥
    #[must_use]
    pub const fn from_bytes(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// 从密钥材料创建密钥
    ///
    /// 64 个十六进制字符按原始 32 字节解码；其余长度不少于 32 字节的材料
    /// 经 SHA-256 归约为 32 字节。
    pub fn from_material(material: &str) -> Result<Self> {
        let material = material.trim();
        if material.len() < MIN_KEY_MATERIAL_LEN {
            return Err(ProviderConfigError::config(format!(
                "encryption key material must be at least {MIN_KEY_MATERIAL_LEN} bytes"
            )));
        }

        if material.len() == KEY_LEN * 2 && material.bytes().all(|b| b.is_ascii_hexdigit()) {
            let mut key = [0u8; KEY_LEN];
            hex::decode_to_slice(material, &mut key).map_err(|e| {
                ProviderConfigError::config_with_source("encryption key is not valid hex", e)
            })?;
            return Ok(Self(key));
        }

        Ok(Self(Sha256::digest(material.as_bytes()).into()))
    }

    /// 从环境变量读取密钥材料
    pub fn from_env(var: &str) -> Result<Self> {
        let material = std::env::var(var).map_err(|e| {
            ProviderConfigError::config_with_source(
                format!("environment variable {var} must hold the encryption key"),
                e,
            )
        })?;
        Self::from_material(&material)
    }

    /// 生成新的随机密钥（十六进制）
    #[must_use]
    pub fn generate() -> String {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        hex::encode(key)
    }

    pub(crate) const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(<redacted>)")
    }
}
