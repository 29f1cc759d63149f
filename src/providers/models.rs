//! # 提供商配置数据模型
//!
//! 存储记录、部分更新补丁以及返回给调用方的脱敏视图

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use super::types::OAuthProvider;
use crate::callback::CallbackRejection;

const REDACTED: &str = "<redacted>";

/// 每个身份提供商一条的配置记录
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: OAuthProvider,
    pub enabled: bool,
    pub display_name: String,
    pub description: String,
    pub client_id: Option<String>,
    /// `iv:tag:ciphertext` 令牌，只在管理器内部解密
    pub client_secret_ciphertext: Option<String>,
    pub callback_url: Option<String>,
    pub updated_by: String,
    pub updated_at: DateTime<Utc>,
}

impl ProviderConfig {
    /// 首次写入时创建的默认记录（默认启用）
    #[must_use]
    pub fn new_default(provider: OAuthProvider, stamp: &AuditStamp) -> Self {
        Self {
            provider,
            enabled: true,
            display_name: provider.default_display_name().to_string(),
            description: provider.default_description().to_string(),
            client_id: None,
            client_secret_ciphertext: None,
            callback_url: None,
            updated_by: stamp.actor.clone(),
            updated_at: stamp.at,
        }
    }

    /// 应用补丁：只覆盖补丁中出现的字段，并重新盖审计戳
    pub fn apply(&mut self, patch: &ProviderConfigPatch, stamp: &AuditStamp) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(display_name) = &patch.display_name {
            self.display_name.clone_from(display_name);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(client_id) = &patch.client_id {
            self.client_id = Some(client_id.clone());
        }
        if let Some(ciphertext) = &patch.client_secret_ciphertext {
            self.client_secret_ciphertext = Some(ciphertext.clone());
        }
        if let Some(callback_url) = &patch.callback_url {
            self.callback_url = Some(callback_url.clone());
        }
        self.updated_by.clone_from(&stamp.actor);
        self.updated_at = stamp.at;
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("enabled", &self.enabled)
            .field("display_name", &self.display_name)
            .field("client_id", &self.client_id)
            .field(
                "client_secret_ciphertext",
                &self.client_secret_ciphertext.as_ref().map(|_| REDACTED),
            )
            .field("callback_url", &self.callback_url)
            .field("updated_by", &self.updated_by)
            .field("updated_at", &self.updated_at)
            .finish_non_exhaustive()
    }
}

/// 部分更新补丁，由存储层在原子 upsert 中应用
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ProviderConfigPatch {
    pub enabled: Option<bool>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub client_id: Option<String>,
    pub client_secret_ciphertext: Option<String>,
    pub callback_url: Option<String>,
}

impl ProviderConfigPatch {
    /// 只修改启用状态的补丁
    #[must_use]
    pub fn enabled(enabled: bool) -> Self {
        Self {
            enabled: Some(enabled),
            ..Self::default()
        }
    }
}

impl fmt::Debug for ProviderConfigPatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfigPatch")
            .field("enabled", &self.enabled)
            .field("display_name", &self.display_name)
            .field("description", &self.description)
            .field("client_id", &self.client_id)
            .field(
                "client_secret_ciphertext",
                &self.client_secret_ciphertext.as_ref().map(|_| REDACTED),
            )
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// 审计戳：最后修改人和修改时间
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditStamp {
    pub actor: String,
    pub at: DateTime<Utc>,
}

impl AuditStamp {
    /// 以当前时间创建审计戳
    pub fn now(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            at: Utc::now(),
        }
    }
}

/// 凭证更新请求，空字符串视为未提供
#[derive(Clone, Default)]
pub struct CredentialsUpdate {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub callback_url: Option<String>,
}

impl fmt::Debug for CredentialsUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsUpdate")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| REDACTED))
            .field("callback_url", &self.callback_url)
            .finish()
    }
}

/// 展示信息更新请求，空字符串视为未提供
#[derive(Debug, Clone, Default)]
pub struct ProviderDetailsUpdate {
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub callback_url: Option<String>,
}

/// 返回给管理端的脱敏视图，从不包含明文或密文
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaskedProviderView {
    pub provider: OAuthProvider,
    pub enabled: bool,
    pub display_name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// 未配置密钥时省略该字段
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret_masked: Option<String>,
    /// 已存储的密钥无法解密
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub client_secret_unreadable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
    /// 是否存在持久化记录
    pub persisted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl MaskedProviderView {
    /// 没有持久化记录时的默认视图
    #[must_use]
    pub fn unpersisted(provider: OAuthProvider) -> Self {
        Self {
            provider,
            enabled: true,
            display_name: provider.default_display_name().to_string(),
            description: provider.default_description().to_string(),
            client_id: None,
            client_secret_masked: None,
            client_secret_unreadable: false,
            callback_url: None,
            persisted: false,
            updated_by: None,
            updated_at: None,
        }
    }
}

/// OAuth 握手使用的解密凭证，仅供内部调用
#[derive(Clone, PartialEq, Eq)]
pub struct DecryptedCredentials {
    pub client_id: Option<String>,
    pub client_secret: String,
}

impl fmt::Debug for DecryptedCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecryptedCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &REDACTED)
            .finish()
    }
}

/// 回调地址复核发现的问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackAuditFinding {
    pub provider: OAuthProvider,
    pub callback_url: String,
    pub reason: CallbackRejection,
}
