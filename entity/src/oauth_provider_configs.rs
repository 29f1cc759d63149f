//! # OAuth 身份提供商配置实体定义
//!
//! 每个身份提供商一行，`provider` 为主键

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// OAuth 身份提供商配置实体
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "oauth_provider_configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub provider: String, // local, google, kakao, naver, apple
    pub enabled: bool,
    pub display_name: String,
    pub description: String,
    pub client_id: Option<String>,
    /// `iv:tag:ciphertext` 十六进制令牌，不存储明文
    pub client_secret_ciphertext: Option<String>,
    pub callback_url: Option<String>,
    pub updated_by: String,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
