//! Invoice repository: create, read, edit and search invoices.

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult,
    Set, Statement, TransactionTrait,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use invoicer_core::invoice::{FormErrors, FormPurpose, InvoiceError, InvoiceForm};
use invoicer_core::listing::StatusFilter;
use invoicer_core::status::{StatusChangeRequest, StatusService};
use invoicer_shared::types::{InvoiceId, PageRequest, PageResponse};

use crate::entities::{customers, invoices};

use super::status::{append_ledger, lock_invoice};
use super::{core_status_to_db, db_status_to_core};

/// One row of the invoice list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct InvoiceListRow {
    /// Invoice id.
    pub id: Uuid,
    /// Customer id.
    pub customer_id: Uuid,
    /// Customer name.
    pub name: String,
    /// Customer e-mail.
    pub email: String,
    /// Customer avatar.
    pub image_url: String,
    /// Amount in cents.
    pub amount: i64,
    /// Issue date.
    pub date: NaiveDate,
    /// Status.
    pub status: String,
}

/// A page of the invoice list.
pub type InvoicePage = PageResponse<InvoiceListRow>;

/// An invoice with its customer's contact details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceDetail {
    /// The invoice.
    #[serde(flatten)]
    pub invoice: invoices::Model,
    /// Customer name.
    pub customer_name: String,
    /// Customer e-mail.
    pub customer_email: String,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

const SEARCH_FILTER: &str = r"
FROM invoices
JOIN customers ON invoices.customer_id = customers.id
WHERE (
    customers.name ILIKE $1
    OR customers.email ILIKE $1
    OR invoices.amount::text ILIKE $1
    OR invoices.date::text ILIKE $1
    OR invoices.status ILIKE $1
)
AND ($2::varchar IS NULL OR invoices.status = $2)
";

fn db_err(e: DbErr) -> InvoiceError {
    InvoiceError::Database(e.to_string())
}

/// Checks that a customer exists.
async fn customer_exists<C: ConnectionTrait>(conn: &C, customer_id: Uuid) -> Result<bool, DbErr> {
    Ok(customers::Entity::find_by_id(customer_id)
        .one(conn)
        .await?
        .is_some())
}

/// Invoice repository for CRUD and search.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DatabaseConnection,
}

impl InvoiceRepository {
    /// Creates a new invoice repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an invoice dated today (UTC).
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::InvalidForm` if the form is invalid or the
    /// customer does not exist, `InvoiceError::Database` on store failure.
    pub async fn create(&self, form: &InvoiceForm) -> Result<invoices::Model, InvoiceError> {
        let input = form.validate_for(FormPurpose::Create)?;
        let customer_id = input.customer_id.into_inner();

        if !customer_exists(&self.db, customer_id).await.map_err(db_err)? {
            return Err(FormErrors::unknown_customer(FormPurpose::Create).into());
        }

        let invoice = invoices::ActiveModel {
            id: Set(InvoiceId::new().into_inner()),
            customer_id: Set(customer_id),
            amount: Set(input.amount.value()),
            status: Set(core_status_to_db(input.status)),
            date: Set(Utc::now().date_naive()),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        info!(invoice_id = %invoice.id, %customer_id, amount = invoice.amount, "invoice created");
        Ok(invoice)
    }

    /// Finds an invoice with its customer.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::NotFound` if the invoice does not exist.
    pub async fn find_by_id(&self, invoice_id: Uuid) -> Result<InvoiceDetail, InvoiceError> {
        let (invoice, customer) = invoices::Entity::find_by_id(invoice_id)
            .find_also_related(customers::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(InvoiceError::NotFound(invoice_id))?;

        let (customer_name, customer_email) =
            customer.map(|c| (c.name, c.email)).unwrap_or_default();

        Ok(InvoiceDetail {
            invoice,
            customer_name,
            customer_email,
        })
    }

    /// Updates customer, amount and status together.
    ///
    /// A status change is written to the ledger in the same transaction,
    /// following the same rules as a direct status change.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The form is invalid or the customer does not exist (`InvalidForm`)
    /// - The actor is missing (`Unauthenticated`)
    /// - The invoice does not exist (`NotFound`)
    /// - A database operation fails (`Database`)
    pub async fn update(
        &self,
        invoice_id: Uuid,
        form: &InvoiceForm,
        actor: Option<&str>,
    ) -> Result<invoices::Model, InvoiceError> {
        let input = form.validate_for(FormPurpose::Update)?;
        let request = StatusChangeRequest::change(
            InvoiceId::from_uuid(invoice_id),
            input.status.as_str(),
            actor,
        )
        .map_err(|_| InvoiceError::Unauthenticated)?;

        let txn = self.db.begin().await.map_err(db_err)?;

        let invoice = lock_invoice(&txn, invoice_id)
            .await
            .map_err(db_err)?
            .ok_or(InvoiceError::NotFound(invoice_id))?;

        let customer_id = input.customer_id.into_inner();
        if !customer_exists(&txn, customer_id).await.map_err(db_err)? {
            return Err(FormErrors::unknown_customer(FormPurpose::Update).into());
        }

        let transition = StatusService::plan(&request, db_status_to_core(invoice.status));

        let mut active: invoices::ActiveModel = invoice.into();
        active.customer_id = Set(customer_id);
        active.amount = Set(input.amount.value());
        active.status = Set(core_status_to_db(transition.target));
        let updated = active.update(&txn).await.map_err(db_err)?;

        if let Some(record) = &transition.ledger {
            append_ledger(&txn, record).await.map_err(db_err)?;
        }

        txn.commit().await.map_err(db_err)?;

        info!(
            %invoice_id,
            actor = %request.actor,
            from = %transition.previous,
            to = %transition.target,
            "invoice updated"
        );
        Ok(updated)
    }

    /// Searches invoices, newest first.
    ///
    /// `query` matches case-insensitively against customer name and e-mail,
    /// amount, date and status.
    ///
    /// # Errors
    ///
    /// Returns `InvoiceError::Database` if a query fails.
    pub async fn list(
        &self,
        query: &str,
        filter: StatusFilter,
        page: PageRequest,
    ) -> Result<InvoicePage, InvoiceError> {
        let backend = self.db.get_database_backend();
        let pattern = format!("%{}%", query.trim());
        let status = filter.status().map(|s| s.as_str().to_string());

        let count = CountRow::find_by_statement(Statement::from_sql_and_values(
            backend,
            format!("SELECT COUNT(*) AS count {SEARCH_FILTER}"),
            [pattern.clone().into(), status.clone().into()],
        ))
        .one(&self.db)
        .await
        .map_err(db_err)?
        .map_or(0, |row| row.count);

        let limit = i64::try_from(page.limit()).unwrap_or(i64::MAX);
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let rows = InvoiceListRow::find_by_statement(Statement::from_sql_and_values(
            backend,
            format!(
                "SELECT invoices.id, invoices.customer_id, customers.name, customers.email, \
                 customers.image_url, invoices.amount, invoices.date, invoices.status \
                 {SEARCH_FILTER} ORDER BY invoices.date DESC, invoices.id DESC LIMIT $3 OFFSET $4"
            ),
            [pattern.into(), status.into(), limit.into(), offset.into()],
        ))
        .all(&self.db)
        .await
        .map_err(db_err)?;

        let total = u64::try_from(count).unwrap_or(0);
        Ok(PageResponse::new(rows, page.page, page.per_page, total))
    }
}
