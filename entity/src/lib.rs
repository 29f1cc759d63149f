//! # Entity 模块
//!
//! 包含所有 Sea-ORM 实体定义

pub mod oauth_provider_configs;

pub use oauth_provider_configs::Entity as OAuthProviderConfigs;

#[cfg(test)]
mod tests;
