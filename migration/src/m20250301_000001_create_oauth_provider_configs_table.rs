use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OAuthProviderConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OAuthProviderConfigs::Provider)
                            .string_len(20)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OAuthProviderConfigs::Enabled)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(OAuthProviderConfigs::DisplayName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuthProviderConfigs::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(OAuthProviderConfigs::ClientId).string_len(255))
                    // iv(24) + tag(32) + 密文，长度不固定
                    .col(ColumnDef::new(OAuthProviderConfigs::ClientSecretCiphertext).text())
                    .col(ColumnDef::new(OAuthProviderConfigs::CallbackUrl).string_len(500))
                    .col(
                        ColumnDef::new(OAuthProviderConfigs::UpdatedBy)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OAuthProviderConfigs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_oauth_provider_configs_enabled")
                    .table(OAuthProviderConfigs::Table)
                    .col(OAuthProviderConfigs::Enabled)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OAuthProviderConfigs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum OAuthProviderConfigs {
    #[sea_orm(iden = "oauth_provider_configs")]
    Table,
    Provider,
    Enabled,
    DisplayName,
    Description,
    ClientId,
    ClientSecretCiphertext,
    CallbackUrl,
    UpdatedBy,
    UpdatedAt,
}
