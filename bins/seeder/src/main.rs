//! Database seeder for Invoicer development and testing.
//!
//! Seeds demo customers and invoices, then prints a development access
//! token whose `name` claim is recorded as the actor of status changes.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use chrono::NaiveDate;
use invoicer_db::entities::{customers, invoices, sea_orm_active_enums::InvoiceStatus};
use invoicer_shared::{AppConfig, JwtConfig, JwtService};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

/// Development user id carried in the printed token.
const DEV_USER_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Name carried in the printed token.
const DEV_USER_NAME: &str = "Dev Admin";

const CUSTOMERS: [(&str, &str, &str, &str); 6] = [
    (
        "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa",
        "Evil Rabbit",
        "evil@rabbit.com",
        "/customers/evil-rabbit.png",
    ),
    (
        "3958dc9e-712f-4377-85e9-fec4b6a6442a",
        "Delba de Oliveira",
        "delba@oliveira.com",
        "/customers/delba-de-oliveira.png",
    ),
    (
        "3958dc9e-742f-4377-85e9-fec4b6a6442a",
        "Lee Robinson",
        "lee@robinson.com",
        "/customers/lee-robinson.png",
    ),
    (
        "76d65c26-f784-44a2-ac19-586678f7c2f2",
        "Michael Novotny",
        "michael@novotny.com",
        "/customers/michael-novotny.png",
    ),
    (
        "cc27c14a-0acf-4f4a-a6c9-d45682c144b9",
        "Amy Burns",
        "amy@burns.com",
        "/customers/amy-burns.png",
    ),
    (
        "13d07535-c59e-4157-a011-f8d2ef4e0cbb",
        "Balazs Orban",
        "balazs@orban.com",
        "/customers/balazs-orban.png",
    ),
];

/// (invoice id, customer index, amount in cents, status, date)
const INVOICES: [(&str, usize, i64, InvoiceStatus, &str); 8] = [
    ("5f2b1c5e-0001-4c3a-9a1e-000000000001", 0, 15795, InvoiceStatus::Pending, "2022-12-06"),
    ("5f2b1c5e-0001-4c3a-9a1e-000000000002", 1, 20348, InvoiceStatus::Pending, "2022-11-14"),
    ("5f2b1c5e-0001-4c3a-9a1e-000000000003", 4, 3040, InvoiceStatus::Paid, "2022-10-29"),
    ("5f2b1c5e-0001-4c3a-9a1e-000000000004", 3, 44800, InvoiceStatus::Paid, "2023-09-10"),
    ("5f2b1c5e-0001-4c3a-9a1e-000000000005", 5, 34577, InvoiceStatus::Pending, "2023-08-05"),
    ("5f2b1c5e-0001-4c3a-9a1e-000000000006", 2, 54246, InvoiceStatus::Pending, "2023-07-16"),
    ("5f2b1c5e-0001-4c3a-9a1e-000000000007", 0, 666, InvoiceStatus::Overdue, "2023-06-27"),
    ("5f2b1c5e-0001-4c3a-9a1e-000000000008", 3, 32545, InvoiceStatus::Canceled, "2023-06-09"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;

    println!("Connecting to database...");
    let db = invoicer_db::connect(&config.database.url)
        .await
        .context("failed to connect to database")?;

    println!("Seeding customers...");
    seed_customers(&db).await?;

    println!("Seeding invoices...");
    seed_invoices(&db).await?;

    println!("Seeding complete!");

    let jwt = JwtService::new(JwtConfig {
        secret: config.jwt.secret.clone(),
        access_token_expires_minutes: i64::try_from(config.jwt.access_token_expiry_secs / 60)
            .unwrap_or(i64::MAX),
    });
    let token = jwt
        .generate_access_token(Uuid::parse_str(DEV_USER_ID)?, Some(DEV_USER_NAME))
        .context("failed to sign development token")?;
    println!("Development token for {DEV_USER_NAME}:\n{token}");

    Ok(())
}

/// Seeds the demo customers, skipping ones that already exist.
async fn seed_customers(db: &DatabaseConnection) -> anyhow::Result<()> {
    let mut inserted = 0;

    for (id, name, email, image_url) in CUSTOMERS {
        let id = Uuid::parse_str(id)?;
        if customers::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }

        let customer = customers::ActiveModel {
            id: Set(id),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            image_url: Set(image_url.to_string()),
        };

        if let Err(e) = customer.insert(db).await {
            eprintln!("Failed to insert customer {name}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} customers");
    Ok(())
}

/// Seeds the demo invoices, skipping ones that already exist.
async fn seed_invoices(db: &DatabaseConnection) -> anyhow::Result<()> {
    let mut inserted = 0;

    for (id, customer, amount, status, date) in INVOICES {
        let id = Uuid::parse_str(id)?;
        if invoices::Entity::find_by_id(id).one(db).await?.is_some() {
            continue;
        }

        let invoice = invoices::ActiveModel {
            id: Set(id),
            customer_id: Set(Uuid::parse_str(CUSTOMERS[customer].0)?),
            amount: Set(amount),
            status: Set(status),
            date: Set(NaiveDate::parse_from_str(date, "%Y-%m-%d")?),
        };

        if let Err(e) = invoice.insert(db).await {
            eprintln!("Failed to insert invoice {id}: {e}");
        } else {
            inserted += 1;
        }
    }

    println!("  Inserted {inserted} invoices");
    Ok(())
}
