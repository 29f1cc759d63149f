//! # 凭证加密模块
//!
//! 使用服务端持有的单一密钥对第三方 OAuth 客户端密钥进行认证加密（AES-256-GCM）

mod cipher;
mod key;

pub use cipher::{CipherError, CredentialCipher, IV_LEN, TAG_LEN};
pub use key::{EncryptionKey, KEY_LEN, MIN_KEY_MATERIAL_LEN};
