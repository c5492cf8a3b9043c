use sea_orm_migration::prelude::*;

use carehub_auth_migration::Migrator;

#[tokio::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
