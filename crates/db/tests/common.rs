//! Shared helpers for database integration tests.
//!
//! Tests run only when `DATABASE_URL` (or `INVOICER__DATABASE__URL`) is set.

#![allow(dead_code)]

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use std::env;
use tokio::sync::OnceCell;
use uuid::Uuid;

use invoicer_db::entities::{customers, invoices, sea_orm_active_enums::InvoiceStatus};
use invoicer_db::migration::Migrator;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn get_database_url() -> Option<String> {
    env::var("DATABASE_URL")
        .or_else(|_| env::var("INVOICER__DATABASE__URL"))
        .ok()
}

/// Connects and migrates, or returns `None` when no database is configured.
pub async fn connect() -> Option<DatabaseConnection> {
    let url = get_database_url()?;
    let db = invoicer_db::connect(&url)
        .await
        .expect("Failed to connect to database");
    MIGRATED
        .get_or_init(|| async {
            Migrator::up(&db, None).await.expect("Failed to migrate");
        })
        .await;
    Some(db)
}

/// Inserts a customer with a unique e-mail.
pub async fn create_customer(db: &DatabaseConnection, name: &str) -> customers::Model {
    let id = Uuid::new_v4();
    customers::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        email: Set(format!("{id}@example.com")),
        image_url: Set("/customers/test.png".to_string()),
    }
    .insert(db)
    .await
    .expect("Failed to create customer")
}

/// Inserts an invoice in the given status.
pub async fn create_invoice(
    db: &DatabaseConnection,
    customer_id: Uuid,
    status: InvoiceStatus,
) -> invoices::Model {
    invoices::ActiveModel {
        id: Set(Uuid::new_v4()),
        customer_id: Set(customer_id),
        amount: Set(15795),
        status: Set(status),
        date: Set(Utc::now().date_naive()),
    }
    .insert(db)
    .await
    .expect("Failed to create invoice")
}
