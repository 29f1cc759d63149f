//! # OAuth 提供商配置运维工具
//!
//! 生成加密密钥、检查回调地址、运行迁移和复核已存储的回调地址

use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use oauth_provider_config::{
    callback::{CallbackPolicy, CallbackValidator},
    config::{self, AppConfig},
    crypto::{CredentialCipher, EncryptionKey},
    database, logging,
    providers::{DatabaseProviderStore, ProviderConfigManager},
};

/// OAuth provider configuration tool.
#[derive(Parser, Debug)]
#[command(name = "oauth-provider-config", version, about)]
struct Cli {
    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a new random 256-bit key as 64 hex characters.
    GenerateKey,

    /// Validate a callback URL against the configured policy.
    CheckUrl {
        /// Candidate callback URL.
        url: String,
        /// Base domain to allow instead of the configured allowlist (repeatable).
        #[arg(long = "base-domain")]
        base_domains: Vec<String>,
        /// Reject loopback callback URLs.
        #[arg(long)]
        no_loopback: bool,
    },

    /// Apply pending database migrations.
    Migrate,

    /// Re-validate every stored callback URL against the current policy.
    Audit,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::GenerateKey => {
            println!("{}", EncryptionKey::generate());
        }
        Commands::CheckUrl {
            url,
            base_domains,
            no_loopback,
        } => {
            let policy = if base_domains.is_empty() {
                config::load_config()?.callback.to_policy()?
            } else {
                CallbackPolicy::new(&base_domains)?
            };
            let policy = if no_loopback {
                policy.with_loopback(false)
            } else {
                policy
            };
            let validator = CallbackValidator::new(policy);

            match validator.validate(&url) {
                Ok(()) => println!("accepted"),
                Err(reason) => {
                    println!("{}", serde_json::to_string_pretty(&reason)?);
                    std::process::exit(1);
                }
            }
        }
        Commands::Migrate => {
            let config = config::load_config()?;
            let db = database::init_database(&config.database).await?;
            database::run_migrations(&db).await?;
        }
        Commands::Audit => {
            let config = config::load_config()?;
            let manager = build_manager(&config).await?;

            let findings = manager.audit_callback_urls().await?;
            println!("{}", serde_json::to_string_pretty(&findings)?);
            if !findings.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

async fn build_manager(config: &AppConfig) -> anyhow::Result<ProviderConfigManager> {
    let key = config.security.load_encryption_key()?;
    let validator = CallbackValidator::new(config.callback.to_policy()?);

    let db = database::init_database(&config.database).await?;
    database::run_migrations(&db).await?;

    let store = Arc::new(DatabaseProviderStore::new(Arc::new(db)));
    info!(store = "database", "Provider configuration manager ready");

    Ok(ProviderConfigManager::new(
        store,
        Arc::new(CredentialCipher::new(&key)),
        validator,
    ))
}
