//! # 数据库配置存储
//!
//! 基于 Sea-ORM 的实现。同一提供商的 upsert 先获取进程内互斥锁，
//! 再在事务中完成读取-修改-写入。

use async_trait::async_trait;
use dashmap::DashMap;
use entity::{OAuthProviderConfigs, oauth_provider_configs};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set, TransactionTrait,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::warn;

use super::models::{AuditStamp, ProviderConfig, ProviderConfigPatch};
use super::traits::ProviderConfigStore;
use super::types::OAuthProvider;
use crate::error::{Context, Result};

/// 数据库存储
pub struct DatabaseProviderStore {
    db: Arc<DatabaseConnection>,
    write_locks: DashMap<OAuthProvider, Arc<Mutex<()>>>,
}

impl DatabaseProviderStore {
    /// 创建数据库存储
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            write_locks: DashMap::new(),
        }
    }

    fn write_lock(&self, provider: OAuthProvider) -> Arc<Mutex<()>> {
        Arc::clone(self.write_locks.entry(provider).or_default().value())
    }
}

impl std::fmt::Debug for DatabaseProviderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseProviderStore").finish_non_exhaustive()
    }
}

/// 数据库行转换为领域记录，未知提供商标识返回 `None`
fn from_model(model: oauth_provider_configs::Model) -> Option<ProviderConfig> {
    let Ok(provider) = model.provider.parse::<OAuthProvider>() else {
        warn!(provider = %model.provider, "Ignoring stored row for unknown OAuth provider");
        return None;
    };

    Some(ProviderConfig {
        provider,
        enabled: model.enabled,
        display_name: model.display_name,
        description: model.description,
        client_id: model.client_id,
        client_secret_ciphertext: model.client_secret_ciphertext,
        callback_url: model.callback_url,
        updated_by: model.updated_by,
        updated_at: model.updated_at,
    })
}

fn to_active_model(config: &ProviderConfig) -> oauth_provider_configs::ActiveModel {
    oauth_provider_configs::ActiveModel {
        provider: Set(config.provider.as_str().to_string()),
        enabled: Set(config.enabled),
        display_name: Set(config.display_name.clone()),
        description: Set(config.description.clone()),
        client_id: Set(config.client_id.clone()),
        client_secret_ciphertext: Set(config.client_secret_ciphertext.clone()),
        callback_url: Set(config.callback_url.clone()),
        updated_by: Set(config.updated_by.clone()),
        updated_at: Set(config.updated_at),
    }
}

#[async_trait]
impl ProviderConfigStore for DatabaseProviderStore {
    async fn find(&self, provider: OAuthProvider) -> Result<Option<ProviderConfig>> {
        let model = OAuthProviderConfigs::find_by_id(provider.as_str())
            .one(self.db.as_ref())
            .await
            .with_context(|| format!("loading configuration for provider `{provider}`"))?;

        Ok(model.and_then(from_model))
    }

    async fn list(&self) -> Result<Vec<ProviderConfig>> {
        let models = OAuthProviderConfigs::find()
            .order_by_asc(oauth_provider_configs::Column::Provider)
            .all(self.db.as_ref())
            .await
            .context("listing provider configurations")?;

        let mut records: Vec<ProviderConfig> = models.into_iter().filter_map(from_model).collect();
        records.sort_by_key(|record| record.provider);
        Ok(records)
    }

    async fn upsert(
        &self,
        provider: OAuthProvider,
        patch: ProviderConfigPatch,
        stamp: AuditStamp,
    ) -> Result<ProviderConfig> {
        let lock = self.write_lock(provider);
        let _guard = lock.lock().await;

        let txn = self
            .db
            .begin()
            .await
            .context("starting provider configuration transaction")?;

        let existing = OAuthProviderConfigs::find_by_id(provider.as_str())
            .one(&txn)
            .await?
            .and_then(from_model);

        let config = match existing {
            Some(mut config) => {
                config.apply(&patch, &stamp);
                to_active_model(&config).update(&txn).await?;
                config
            }
            None => {
                let mut config = ProviderConfig::new_default(provider, &stamp);
                config.apply(&patch, &stamp);
                to_active_model(&config).insert(&txn).await?;
                config
            }
        };

        txn.commit()
            .await
            .with_context(|| format!("saving configuration for provider `{provider}`"))?;

        Ok(config)
    }

    fn name(&self) -> &'static str {
        "database"
    }
}
