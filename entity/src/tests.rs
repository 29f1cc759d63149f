//! # 实体定义测试

#[cfg(test)]
mod tests {
    use crate::oauth_provider_configs;
    use sea_orm::{EntityName, Set};

    #[tokio::test]
    async fn test_oauth_provider_config_creation() {
        let config = oauth_provider_configs::ActiveModel {
            provider: Set("google".to_string()),
            enabled: Set(false),
            display_name: Set("Google".to_string()),
            client_id: Set(Some("client-123".to_string())),
            ..Default::default()
        };

        assert_eq!(config.provider.as_ref(), "google");
        assert_eq!(config.enabled.as_ref(), &false);
        assert_eq!(
            config.client_id.as_ref(),
            &Some("client-123".to_string())
        );
    }

    #[test]
    fn test_table_name() {
        assert_eq!(
            oauth_provider_configs::Entity.table_name(),
            "oauth_provider_configs"
        );
    }
}
