//! # 提供商配置管理器
//!
//! 唯一允许读写 `ProviderConfig` 记录的组件，负责所有跨字段约束：
//! 回调地址校验、密钥加密、受保护提供商、默认启用语义以及审计戳。

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::masking::mask_secret;
use super::models::{
    AuditStamp, CallbackAuditFinding, CredentialsUpdate, DecryptedCredentials,
    MaskedProviderView, ProviderConfig, ProviderConfigPatch, ProviderDetailsUpdate,
};
use super::traits::ProviderConfigStore;
use super::types::OAuthProvider;
use crate::callback::CallbackValidator;
use crate::crypto::CredentialCipher;
use crate::error::{ProviderConfigError, Result};

/// 提供商配置管理器
pub struct ProviderConfigManager {
    store: Arc<dyn ProviderConfigStore>,
    cipher: Arc<CredentialCipher>,
    validator: CallbackValidator,
}

impl ProviderConfigManager {
    /// 创建管理器
    pub fn new(
        store: Arc<dyn ProviderConfigStore>,
        cipher: Arc<CredentialCipher>,
        validator: CallbackValidator,
    ) -> Self {
        Self {
            store,
            cipher,
            validator,
        }
    }

    /// 回调地址校验器
    #[must_use]
    pub const fn validator(&self) -> &CallbackValidator {
        &self.validator
    }

    /// 更新客户端凭证
    ///
    /// 回调地址校验失败时整个操作被拒绝，不产生任何写入。
    pub async fn update_credentials(
        &self,
        provider: OAuthProvider,
        update: CredentialsUpdate,
        actor: &str,
    ) -> Result<MaskedProviderView> {
        let callback_url = non_blank(update.callback_url);
        if let Some(url) = &callback_url {
            self.check_callback(provider, url)?;
        }

        let client_secret_ciphertext = match non_blank(update.client_secret) {
            Some(secret) => Some(
                self.cipher
                    .encrypt(&secret)
                    .map_err(|source| ProviderConfigError::Encryption { source })?,
            ),
            None => None,
        };
        let secret_rotated = client_secret_ciphertext.is_some();

        let patch = ProviderConfigPatch {
            client_id: non_blank(update.client_id),
            client_secret_ciphertext,
            callback_url,
            ..ProviderConfigPatch::default()
        };

        let saved = self
            .store
            .upsert(provider, patch, AuditStamp::now(actor))
            .await?;

        info!(
            provider = %provider,
            actor = %actor,
            secret_rotated,
            "OAuth provider credentials updated"
        );

        Ok(self.masked_view(&saved))
    }

    /// 启用或禁用提供商
    pub async fn toggle_provider(
        &self,
        provider: OAuthProvider,
        enabled: bool,
        actor: &str,
    ) -> Result<MaskedProviderView> {
        if provider.is_protected() && !enabled {
            warn!(provider = %provider, actor = %actor, "Refused to disable protected provider");
            return Err(ProviderConfigError::ProtectedProvider { provider });
        }

        let saved = self
            .store
            .upsert(
                provider,
                ProviderConfigPatch::enabled(enabled),
                AuditStamp::now(actor),
            )
            .await?;

        info!(provider = %provider, actor = %actor, enabled, "OAuth provider toggled");

        Ok(self.masked_view(&saved))
    }

    /// 提供商是否启用
    ///
    /// 从不失败：没有记录或存储出错时视为启用，`local` 永远启用。
    pub async fn is_provider_enabled(&self, provider: OAuthProvider) -> bool {
        if provider.is_protected() {
            return true;
        }

        match self.store.find(provider).await {
            Ok(Some(config)) => config.enabled,
            Ok(None) => true,
            Err(err) => {
                error!(
                    provider = %provider,
                    store = self.store.name(),
                    error = %err,
                    "Failed to load provider state, treating as enabled"
                );
                true
            }
        }
    }

    /// 当前启用的可选登录方式（不含 `local`），按提供商排序
    pub async fn get_enabled_providers(&self) -> Vec<MaskedProviderView> {
        let records = match self.records_by_provider().await {
            Ok(records) => records,
            Err(err) => {
                error!(
                    store = self.store.name(),
                    error = %err,
                    "Failed to list provider states, treating all as enabled"
                );
                HashMap::new()
            }
        };

        OAuthProvider::ALL
            .into_iter()
            .filter(|provider| !provider.is_protected())
            .map(|provider| self.view_or_default(provider, records.get(&provider)))
            .filter(|view| view.enabled)
            .collect()
    }

    /// 解密凭证，仅供 OAuth 握手流程内部使用
    pub async fn get_decrypted_credentials(
        &self,
        provider: OAuthProvider,
    ) -> Result<DecryptedCredentials> {
        let Some(config) = self.store.find(provider).await? else {
            debug!(provider = %provider, "No configuration stored for provider");
            return Err(ProviderConfigError::NotConfigured { provider });
        };

        let Some(token) = config.client_secret_ciphertext.as_deref() else {
            debug!(provider = %provider, "Provider has no client secret configured");
            return Err(ProviderConfigError::NotConfigured { provider });
        };

        let client_secret = self.cipher.decrypt(token).map_err(|source| {
            error!(
                provider = %provider,
                error = %source,
                "Stored client secret failed integrity check"
            );
            ProviderConfigError::DecryptionFailed { provider, source }
        })?;

        Ok(DecryptedCredentials {
            client_id: config.client_id,
            client_secret,
        })
    }

    /// 所有提供商的脱敏视图，没有记录的使用默认值
    pub async fn get_all_providers(&self) -> Result<Vec<MaskedProviderView>> {
        let records = self.records_by_provider().await?;

        Ok(OAuthProvider::ALL
            .into_iter()
            .map(|provider| self.view_or_default(provider, records.get(&provider)))
            .collect())
    }

    /// 单个提供商的脱敏视图
    pub async fn get_provider(&self, provider: OAuthProvider) -> Result<MaskedProviderView> {
        let record = self.store.find(provider).await?;
        Ok(self.view_or_default(provider, record.as_ref()))
    }

    /// 更新显示名称、描述和回调地址
    pub async fn update_provider_details(
        &self,
        provider: OAuthProvider,
        update: ProviderDetailsUpdate,
        actor: &str,
    ) -> Result<MaskedProviderView> {
        let callback_url = non_blank(update.callback_url);
        if let Some(url) = &callback_url {
            self.check_callback(provider, url)?;
        }

        let patch = ProviderConfigPatch {
            display_name: non_blank(update.display_name),
            description: non_blank(update.description),
            callback_url,
            ..ProviderConfigPatch::default()
        };

        let saved = self
            .store
            .upsert(provider, patch, AuditStamp::now(actor))
            .await?;

        info!(provider = %provider, actor = %actor, "OAuth provider details updated");

        Ok(self.masked_view(&saved))
    }

    /// 用当前策略复核所有已持久化的回调地址
    pub async fn audit_callback_urls(&self) -> Result<Vec<CallbackAuditFinding>> {
        let findings: Vec<CallbackAuditFinding> = self
            .store
            .list()
            .await?
            .into_iter()
            .filter_map(|config| {
                let url = config.callback_url?;
                let reason = self.validator.validate(&url).err()?;
                Some(CallbackAuditFinding {
                    provider: config.provider,
                    callback_url: url,
                    reason,
                })
            })
            .collect();

        if !findings.is_empty() {
            warn!(
                count = findings.len(),
                "Stored callback URLs no longer satisfy the callback policy"
            );
        }

        Ok(findings)
    }

    fn check_callback(&self, provider: OAuthProvider, url: &str) -> Result<()> {
        self.validator.validate(url).map_err(|reason| {
            warn!(provider = %provider, reason = %reason, "Rejected callback URL");
            ProviderConfigError::invalid_callback_url(reason)
        })
    }

    async fn records_by_provider(&self) -> Result<HashMap<OAuthProvider, ProviderConfig>> {
        Ok(self
            .store
            .list()
            .await?
            .into_iter()
            .map(|config| (config.provider, config))
            .collect())
    }

    fn view_or_default(
        &self,
        provider: OAuthProvider,
        record: Option<&ProviderConfig>,
    ) -> MaskedProviderView {
        record.map_or_else(
            || MaskedProviderView::unpersisted(provider),
            |config| self.masked_view(config),
        )
    }

    fn masked_view(&self, config: &ProviderConfig) -> MaskedProviderView {
        let (client_secret_masked, client_secret_unreadable) =
            match config.client_secret_ciphertext.as_deref() {
                None => (None, false),
                Some(token) => match self.cipher.decrypt(token) {
                    Ok(secret) => (Some(mask_secret(&secret)), false),
                    Err(err) => {
                        warn!(
                            provider = %config.provider,
                            error = %err,
                            "Stored client secret cannot be decrypted, omitting mask"
                        );
                        (None, true)
                    }
                },
            };

        MaskedProviderView {
            provider: config.provider,
            enabled: config.enabled || config.provider.is_protected(),
            display_name: config.display_name.clone(),
            description: config.description.clone(),
            client_id: config.client_id.clone(),
            client_secret_masked,
            client_secret_unreadable,
            callback_url: config.callback_url.clone(),
            persisted: true,
            updated_by: Some(config.updated_by.clone()),
            updated_at: Some(config.updated_at),
        }
    }
}

impl std::fmt::Debug for ProviderConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfigManager")
            .field("store", &self.store.name())
            .field("validator", &self.validator)
            .finish_non_exhaustive()
    }
}

/// 空字符串或纯空白视为未提供
fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
