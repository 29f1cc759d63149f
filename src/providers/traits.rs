//! # 配置存储特征定义
//!
//! 管理器只依赖该特征，内存实现与数据库实现可互换

use async_trait::async_trait;

use super::models::{AuditStamp, ProviderConfig, ProviderConfigPatch};
use super::types::OAuthProvider;
use crate::error::Result;

/// 提供商配置存储
///
/// 实现必须保证同一提供商的 `upsert` 原子执行：并发调用不会互相覆盖
/// 对方修改的字段。
#[async_trait]
pub trait ProviderConfigStore: Send + Sync {
    /// 查询单个提供商的记录
    async fn find(&self, provider: OAuthProvider) -> Result<Option<ProviderConfig>>;

    /// 列出所有已持久化的记录
    async fn list(&self) -> Result<Vec<ProviderConfig>>;

    /// 读取-修改-写入：记录不存在时从默认值创建，然后应用补丁
    async fn upsert(
        &self,
        provider: OAuthProvider,
        patch: ProviderConfigPatch,
        stamp: AuditStamp,
    ) -> Result<ProviderConfig>;

    /// 存储实现名称
    fn name(&self) -> &'static str;
}
