//! Invoicing schema: customers, invoices and the status-change ledger.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(CUSTOMERS_SQL).await?;
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(STATUS_CHANGES_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            r"
DROP TABLE IF EXISTS status_changes CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
DROP TABLE IF EXISTS customers CASCADE;
",
        )
        .await?;
        Ok(())
    }
}

const CUSTOMERS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS customers (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    image_url VARCHAR(255) NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_customers_name ON customers(name);
";

const INVOICES_SQL: &str = r"
CREATE TABLE IF NOT EXISTS invoices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    customer_id UUID NOT NULL REFERENCES customers(id),
    -- Minor currency units (cents)
    amount BIGINT NOT NULL,
    status VARCHAR(20) NOT NULL,
    date DATE NOT NULL,
    CONSTRAINT chk_invoices_status CHECK (status IN ('pending', 'paid', 'canceled', 'overdue'))
);

CREATE INDEX IF NOT EXISTS idx_invoices_customer ON invoices(customer_id);
CREATE INDEX IF NOT EXISTS idx_invoices_date ON invoices(date DESC);
";

const STATUS_CHANGES_SQL: &str = r"
-- Append-only ledger of invoice status transitions
CREATE TABLE IF NOT EXISTS status_changes (
    id SERIAL PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    previous_status VARCHAR(20),
    new_status VARCHAR(20),
    changed_by VARCHAR(255),
    changed_at TIMESTAMP NOT NULL DEFAULT NOW(),
    restored BOOLEAN NOT NULL DEFAULT FALSE
);

CREATE INDEX IF NOT EXISTS idx_status_changes_invoice
    ON status_changes(invoice_id, id DESC);
";
