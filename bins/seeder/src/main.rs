//! Demo data for local development.
//!
//! Seeds one admin, one resident and a society whose dashboard ends at the
//! textbook balance: 100000 opening - 20000 expenses + 10000 maintenance +
//! 1500 penalties = 91500.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::Utc;
use rust_decimal_macros::dec;
use society_core::auth::hash_password;
use society_core::dues::UnitRef;
use society_core::ledger::{LedgerEntryDraft, LedgerKind};
use society_core::period::MonthYear;
use society_db::entities::sea_orm_active_enums::SocietyType;
use society_db::repositories::{
    AssignMemberInput, CreateBuildingInput, CreateFlatInput, CreatePenaltyInput,
    CreateSocietyInput, CreateUserInput,
};
use society_db::{
    DuesRepository, LedgerRepository, MemberRepository, PenaltyRepository, SocietyRepository,
    UnitRepository, UserRepository,
};
use society_shared::types::{BuildingId, FlatId};

const ADMIN_EMAIL: &str = "admin@society.dev";
const RESIDENT_EMAIL: &str = "resident@society.dev";
const DEMO_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("DATABASE_URL")
        .or_else(|_| std::env::var("SOCIETY__DATABASE__URL"))
        .context("DATABASE_URL must be set in environment")?;

    println!("Connecting to database...");
    let db = society_db::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let users = UserRepository::new(db.clone());
    if users.find_by_email(ADMIN_EMAIL).await?.is_some() {
        println!("Demo data already present, skipping.");
        return Ok(());
    }

    println!("Seeding users...");
    let password_hash = hash_password(DEMO_PASSWORD)?;
    let admin = users
        .create(CreateUserInput {
            email: ADMIN_EMAIL.to_string(),
            password_hash: password_hash.clone(),
            full_name: "Society Admin".to_string(),
            phone: None,
        })
        .await?;
    let resident = users
        .create(CreateUserInput {
            email: RESIDENT_EMAIL.to_string(),
            password_hash,
            full_name: "Flat A-101 Resident".to_string(),
            phone: Some("9800000000".to_string()),
        })
        .await?;

    println!("Seeding society...");
    let society = SocietyRepository::new(db.clone())
        .create_with_super_admin(
            CreateSocietyInput {
                name: "Green Meadows".to_string(),
                society_type: SocietyType::Residential,
                address_line: "12 Ring Road".to_string(),
                city: "Pune".to_string(),
                state: "Maharashtra".to_string(),
                pincode: "411045".to_string(),
                opening_balance: dec!(100000),
            },
            admin.id,
        )
        .await?;

    println!("Seeding building and flat...");
    let units = UnitRepository::new(db.clone());
    let building = units
        .create_building(
            society.id,
            CreateBuildingInput {
                name: "Tower A".to_string(),
                total_floors: 12,
            },
        )
        .await?;
    let flat = units
        .create_flat(
            society.id,
            CreateFlatInput {
                building_id: building.id,
                flat_number: "A-101".to_string(),
                floor_number: 1,
                square_foot: 1050,
                current_maintenance: dec!(10000),
            },
        )
        .await?;
    let unit = UnitRef::Flat {
        building_id: BuildingId::from_uuid(building.id),
        flat_id: FlatId::from_uuid(flat.id),
    };

    MemberRepository::new(db.clone())
        .assign(
            society.id,
            AssignMemberInput {
                user_id: resident.id,
                unit,
                move_in_date: Utc::now().date_naive(),
            },
        )
        .await?;

    println!("Generating dues...");
    let month = MonthYear::from_date(Utc::now().date_naive());
    let summary = DuesRepository::new(db.clone())
        .generate_for_month(Some(society.id), month)
        .await?;
    println!("  Created {} due(s) for {month}", summary.total());

    println!("Seeding expense and penalty...");
    LedgerRepository::new(db.clone())
        .create(
            society.id,
            LedgerEntryDraft::new(
                LedgerKind::Expense,
                "electricity",
                Some("Common area lighting"),
                dec!(20000),
                month.month(),
                month.year(),
            )?,
            admin.id,
        )
        .await?;
    PenaltyRepository::new(db.clone())
        .create(
            society.id,
            CreatePenaltyInput {
                unit,
                amount: dec!(1500),
                reason: "Late parking permit renewal".to_string(),
                action_by: admin.id,
            },
        )
        .await?;

    println!("Seeding complete!");
    println!("  Admin:    {ADMIN_EMAIL} / {DEMO_PASSWORD}");
    println!("  Resident: {RESIDENT_EMAIL} / {DEMO_PASSWORD}");
    println!("  Society:  {}", society.id);
    Ok(())
}
