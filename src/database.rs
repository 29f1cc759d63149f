//! # 数据库模块
//!
//! 数据库连接和迁移管理

use sea_orm::{ConnectOptions, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::error::{Context, Result};

/// 初始化数据库连接
pub async fn init_database(config: &DatabaseConfig) -> Result<DatabaseConnection> {
    config.ensure_database_path()?;

    info!(
        backend = if config.is_sqlite() { "sqlite" } else { "other" },
        max_connections = config.max_connections,
        "Connecting to database"
    );

    let mut options = ConnectOptions::new(config.url.clone());
    options
        .max_connections(config.max_connections)
        .sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .context("failed to connect to database")?;

    info!("Database connection established");
    Ok(db)
}

/// 运行数据库迁移
pub async fn run_migrations(db: &DatabaseConnection) -> std::result::Result<(), DbErr> {
    info!("Running database migrations");

    match ::migration::Migrator::up(db, None).await {
        Ok(()) => {
            info!("Database migrations complete");
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "Database migration failed");
            Err(e)
        }
    }
}

/// 检查是否存在未应用的迁移
pub async fn check_database_status(db: &DatabaseConnection) -> std::result::Result<usize, DbErr> {
    let pending = ::migration::Migrator::get_pending_migrations(db).await?;

    if pending.is_empty() {
        info!("All migrations applied");
    } else {
        warn!(pending = pending.len(), "Pending database migrations");
    }

    Ok(pending.len())
}
