//! # 对称凭证加密器
//!
//! 令牌格式：`hex(iv):hex(tag):hex(ciphertext)`，三段均可独立解析

use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, AeadCore, KeyInit, OsRng},
};
use std::fmt;
use thiserror::Error;

use super::EncryptionKey;

/// GCM 随机数长度（字节）
pub const IV_LEN: usize = 12;

/// GCM 认证标签长度（字节）
pub const TAG_LEN: usize = 16;

const SEPARATOR: char = ':';

/// 加解密错误
///
/// 错误信息中从不包含令牌、明文或密钥。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CipherError {
    /// 令牌结构不合法
    #[error("malformed ciphertext token: {0}")]
    MalformedToken(&'static str),

    /// 认证标签校验失败（篡改或密钥错误）
    #[error("ciphertext authentication failed")]
    AuthenticationFailed,

    /// 解密结果不是有效的 UTF-8
    #[error("decrypted secret is not valid UTF-8")]
    InvalidUtf8,

    /// 加密失败
    #[error("AES-GCM encryption failed")]
    EncryptionFailed,
}

/// 凭证加密器
///
/// 无内部可变状态，可通过 `Arc` 在任意数量的调用方之间共享。
pub struct CredentialCipher {
    cipher: Aes256Gcm,
}

impl CredentialCipher {
    /// 使用注入的密钥创建加密器
    #[must_use]
    pub fn new(key: &EncryptionKey) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key.as_bytes());
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// 加密字符串，每次调用使用新的随机 IV
    pub fn encrypt(&self, plaintext: &str) -> Result<String, CipherError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        // aes-gcm 输出为 ciphertext || tag
        let mut ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CipherError::EncryptionFailed)?;
        let tag = ciphertext.split_off(ciphertext.len() - TAG_LEN);

        Ok(format!(
            "{}{SEPARATOR}{}{SEPARATOR}{}",
            hex::encode(nonce),
            hex::encode(tag),
            hex::encode(ciphertext)
        ))
    }

    /// 解密令牌
    pub fn decrypt(&self, token: &str) -> Result<String, CipherError> {
        let parts: Vec<&str> = token.split(SEPARATOR).collect();
        let [iv, tag, ciphertext] = parts.as_slice() else {
            return Err(CipherError::MalformedToken("expected iv:tag:ciphertext"));
        };

        let iv = decode_part(iv, "iv is not hexadecimal")?;
        if iv.len() != IV_LEN {
            return Err(CipherError::MalformedToken("iv has the wrong length"));
        }

        let tag = decode_part(tag, "tag is not hexadecimal")?;
        if tag.len() != TAG_LEN {
            return Err(CipherError::MalformedToken("tag has the wrong length"));
        }

        let mut sealed = decode_part(ciphertext, "ciphertext is not hexadecimal")?;
        sealed.extend_from_slice(&tag);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(&iv), sealed.as_ref())
            .map_err(|_| CipherError::AuthenticationFailed)?;

        String::from_utf8(plaintext).map_err(|_| CipherError::InvalidUtf8)
    }
}

impl fmt::Debug for CredentialCipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialCipher").finish_non_exhaustive()
    }
}

fn decode_part(part: &str, problem: &'static str) -> Result<Vec<u8>, CipherError> {
    hex::decode(part).map_err(|_| CipherError::MalformedToken(problem))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::KEY_LEN;
    use rstest::rstest;

    fn cipher_with(byte: u8) -> CredentialCipher {
        CredentialCipher::new(&EncryptionKey::from_bytes([byte; KEY_LEN]))
    }

    /// 翻转某一段中的一个字节
    fn flip_byte(token: &str, segment: usize, index: usize) -> String {
        let mut parts: Vec<String> = token.split(':').map(str::to_string).collect();
        let mut bytes = hex::decode(&parts[segment]).unwrap();
        bytes[index] ^= 0x01;
        parts[segment] = hex::encode(bytes);
        parts.join(":")
    }

    #[test]
    fn test_encrypt_decrypt_round_trip() {
        let cipher = cipher_with(0);

        let plaintext = "sensitive_client_secret_12345";
        let token = cipher.encrypt(plaintext).unwrap();

        assert_ne!(token, plaintext);
        assert!(!token.contains(plaintext));
        assert_eq!(cipher.decrypt(&token).unwrap(), plaintext);
    }

    #[test]
    fn test_token_has_three_hex_parts() {
        let token = cipher_with(1).encrypt("abc").unwrap();
        let parts: Vec<&str> = token.split(':').collect();

        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0].len(), IV_LEN * 2);
        assert_eq!(parts[1].len(), TAG_LEN * 2);
        assert_eq!(parts[2].len(), 3 * 2);
    }

    #[test]
    fn test_same_plaintext_yields_different_tokens() {
        let cipher = cipher_with(2);

        let first = cipher.encrypt("same-secret").unwrap();
        let second = cipher.encrypt("same-secret").unwrap();

        assert_ne!(first, second);
        assert_eq!(cipher.decrypt(&first).unwrap(), "same-secret");
        assert_eq!(cipher.decrypt(&second).unwrap(), "same-secret");
    }

    #[test]
    fn test_empty_and_unicode_plaintext() {
        let cipher = cipher_with(3);

        let empty = cipher.encrypt("").unwrap();
        assert_eq!(cipher.decrypt(&empty).unwrap(), "");

        let unicode = cipher.encrypt("비밀-密钥-🔑").unwrap();
        assert_eq!(cipher.decrypt(&unicode).unwrap(), "비밀-密钥-🔑");
    }

    #[test]
    fn test_tampered_ciphertext_is_rejected() {
        let cipher = cipher_with(4);
        let token = cipher.encrypt("my-long-secret-1234").unwrap();

        for index in 0.."my-long-secret-1234".len() {
            let tampered = flip_byte(&token, 2, index);
            assert_eq!(
                cipher.decrypt(&tampered),
                Err(CipherError::AuthenticationFailed)
            );
        }
    }

    #[test]
    fn test_tampered_tag_and_iv_are_rejected() {
        let cipher = cipher_with(5);
        let token = cipher.encrypt("secret").unwrap();

        for index in 0..TAG_LEN {
            assert_eq!(
                cipher.decrypt(&flip_byte(&token, 1, index)),
                Err(CipherError::AuthenticationFailed)
            );
        }
        assert_eq!(
            cipher.decrypt(&flip_byte(&token, 0, 0)),
            Err(CipherError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_wrong_key_is_rejected() {
        let token = cipher_with(6).encrypt("secret").unwrap();
        assert_eq!(
            cipher_with(7).decrypt(&token),
            Err(CipherError::AuthenticationFailed)
        );
    }

    #[rstest]
    #[case("")]
    #[case("not-a-token")]
    #[case("aa:bb")]
    #[case("aa:bb:cc:dd")]
    #[case("zz:zz:zz")]
    #[case("000000000000000000000000:00:00")]
    #[case("00:00000000000000000000000000000000:00")]
    fn test_malformed_tokens(#[case] token: &str) {
        let result = cipher_with(8).decrypt(token);
        assert!(matches!(result, Err(CipherError::MalformedToken(_))));
    }

    #[test]
    fn test_truncated_ciphertext_is_rejected() {
        let cipher = cipher_with(9);
        let token = cipher.encrypt("secret").unwrap();
        let truncated = &token[..token.len() - 2];

        assert_eq!(
            cipher.decrypt(truncated),
            Err(CipherError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_debug_does_not_expose_key() {
        let cipher = cipher_with(0xAB);
        assert_eq!(format!("{cipher:?}"), "CredentialCipher { .. }");
    }
}
