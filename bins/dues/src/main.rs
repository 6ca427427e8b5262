//! Monthly dues generation, meant to run from cron on the first of the month.
//!
//! Every run is idempotent: units already billed for the month are skipped,
//! so a retried or overlapping run creates nothing new.
//!
//! Usage:
//!   generate-dues                       - bill the current month for every society
//!   generate-dues --month 2024-03-01    - bill a specific month
//!   generate-dues --society <id>        - limit the run to one society
//!   generate-dues --dry-run             - list what would be billed, write nothing

use anyhow::Context;
use chrono::Utc;
use chrono_tz::Tz;
use clap::Parser;
use society_core::period::MonthYear;
use society_db::{DuesRepository, SocietyRepository, connect_with_pool};
use society_shared::AppConfig;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Month to bill (`YYYY-MM-01`); defaults to the current month in the
    /// configured timezone.
    #[arg(short, long)]
    month: Option<MonthYear>,

    /// Only bill this society.
    #[arg(short, long)]
    society: Option<Uuid>,

    /// Report the units that would be billed without writing.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "society=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    let month = match args.month {
        Some(month) => month,
        None => {
            let tz: Tz = config.dues.timezone.parse().map_err(|e| {
                anyhow::anyhow!("Invalid dues timezone {}: {e}", config.dues.timezone)
            })?;
            MonthYear::current_in(tz, Utc::now())
        }
    };

    let db = connect_with_pool(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    let dues = DuesRepository::new(db.clone());

    if args.dry_run {
        let societies = match args.society {
            Some(id) => vec![id],
            None => SocietyRepository::new(db).list_ids().await?,
        };
        let mut pending = 0_usize;
        for society_id in societies {
            let drafts = dues.units_needing_due(society_id, month).await?;
            for draft in &drafts {
                println!(
                    "{society_id}\t{:?}\t{}\t{}",
                    draft.unit, draft.month, draft.maintenance_amount
                );
            }
            pending += drafts.len();
        }
        info!(month = %month, due_count = pending, "Dry run complete");
        return Ok(());
    }

    let summary = dues
        .generate_for_month(args.society, month)
        .await
        .context("Dues generation failed")?;

    info!(
        month = %month,
        flats = summary.flats_created,
        housing_units = summary.housing_units_created,
        due_count = summary.total(),
        "Dues generation complete"
    );
    Ok(())
}
