//! # 内存配置存储
//!
//! 基于 `DashMap` 的实现，用于测试和无数据库部署

use async_trait::async_trait;
use dashmap::DashMap;

use super::models::{AuditStamp, ProviderConfig, ProviderConfigPatch};
use super::traits::ProviderConfigStore;
use super::types::OAuthProvider;
use crate::error::Result;

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryProviderStore {
    records: DashMap<OAuthProvider, ProviderConfig>,
}

impl MemoryProviderStore {
    /// 创建空存储
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// 直接写入一条记录，覆盖已有值
    pub fn insert(&self, config: ProviderConfig) {
        self.records.insert(config.provider, config);
    }
}

#[async_trait]
impl ProviderConfigStore for MemoryProviderStore {
    async fn find(&self, provider: OAuthProvider) -> Result<Option<ProviderConfig>> {
        Ok(self.records.get(&provider).map(|entry| entry.value().clone()))
    }

    async fn list(&self) -> Result<Vec<ProviderConfig>> {
        let mut records: Vec<ProviderConfig> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by_key(|record| record.provider);
        Ok(records)
    }

    async fn upsert(
        &self,
        provider: OAuthProvider,
        patch: ProviderConfigPatch,
        stamp: AuditStamp,
    ) -> Result<ProviderConfig> {
        // entry 持有分片写锁，读取-修改-写入在锁内完成
        let mut entry = self
            .records
            .entry(provider)
            .or_insert_with(|| ProviderConfig::new_default(provider, &stamp));
        entry.apply(&patch, &stamp);
        Ok(entry.value().clone())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_upsert_creates_default_record() {
        let store = MemoryProviderStore::new();
        assert!(store.find(OAuthProvider::Google).await.unwrap().is_none());

        let saved = store
            .upsert(
                OAuthProvider::Google,
                ProviderConfigPatch {
                    client_id: Some("google-client".to_string()),
                    ..ProviderConfigPatch::default()
                },
                AuditStamp::now("admin"),
            )
            .await
            .unwrap();

        assert!(saved.enabled);
        assert_eq!(saved.client_id.as_deref(), Some("google-client"));
        assert_eq!(
            store.find(OAuthProvider::Google).await.unwrap(),
            Some(saved)
        );
    }

    #[tokio::test]
    async fn test_list_is_ordered() {
        let store = MemoryProviderStore::new();
        for provider in [OAuthProvider::Apple, OAuthProvider::Kakao, OAuthProvider::Google] {
            store
                .upsert(provider, ProviderConfigPatch::enabled(false), AuditStamp::now("admin"))
                .await
                .unwrap();
        }

        let providers: Vec<_> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|record| record.provider)
            .collect();
        assert_eq!(
            providers,
            vec![OAuthProvider::Google, OAuthProvider::Kakao, OAuthProvider::Apple]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_patches_do_not_clobber() {
        let store = Arc::new(MemoryProviderStore::new());

        let mut handles = Vec::new();
        for i in 0..32 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let patch = if i % 2 == 0 {
                    ProviderConfigPatch::enabled(false)
                } else {
                    ProviderConfigPatch {
                        client_id: Some("naver-client".to_string()),
                        ..ProviderConfigPatch::default()
                    }
                };
                store
                    .upsert(OAuthProvider::Naver, patch, AuditStamp::now(format!("admin-{i}")))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let record = store.find(OAuthProvider::Naver).await.unwrap().unwrap();
        assert!(!record.enabled);
        assert_eq!(record.client_id.as_deref(), Some("naver-client"));
    }
}
