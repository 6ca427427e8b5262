//! Schema migrations for the society ledger.
//!
//! Reads `DATABASE_URL` (or `-u <url>`), then:
//!   migrator up      - apply pending migrations, including the RLS policies
//!   migrator down    - roll back the last migration
//!   migrator status  - list applied and pending migrations
//!   migrator fresh   - drop everything and re-apply

use sea_orm_migration::prelude::*;
use society_db::migration::Migrator;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}
