//! Deletes expired, consumed and attempt-exhausted phone login codes.
//!
//! Runs once by default; `--interval-secs N` keeps it running as a daemon.

use std::time::Duration;

use clap::Parser;
use sea_orm::Database;
use serde::Deserialize;

use carehub_auth::infra::db::DbLoginCodeRepository;
use carehub_auth::usecase::purge::PurgeLoginCodesUseCase;
use carehub_core::config::Config;
use carehub_core::tracing::init_tracing;

#[derive(Debug, Parser)]
#[command(name = "login-code-janitor", about = "Purge stale phone login codes")]
struct Args {
    /// Repeat the purge every N seconds instead of exiting after one pass.
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    interval_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct JanitorConfig {
    database_url: String,
}

impl Config for JanitorConfig {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = JanitorConfig::try_from_env()?;

    let db = Database::connect(&config.database_url).await?;
    let purge = PurgeLoginCodesUseCase {
        login_codes: DbLoginCodeRepository { db },
    };

    match args.interval_secs {
        Some(secs) => purge.run_periodic(Duration::from_secs(secs)).await,
        None => {
            purge.execute().await?;
        }
    }
    Ok(())
}
