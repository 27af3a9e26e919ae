//! Status repository: invoice status changes, restores and the ledger.
//!
//! Every mutation runs in one transaction: the invoice row is read with
//! `SELECT ... FOR UPDATE`, updated, and the ledger entry appended before
//! commit. A failed ledger insert rolls the status change back.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    NotSet, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use invoicer_core::invoice::InvoiceStatus;
use invoicer_core::status::{
    ChangeLogEntry, LedgerRecord, StatusChangeRequest, StatusError, StatusService,
};
use invoicer_shared::types::InvoiceId;

use crate::entities::{invoices, status_changes};

use super::{core_status_to_db, db_status_to_core};

/// Message returned with a successful restore.
pub const RESTORED_MESSAGE: &str = "Invoice status restored";

/// Result of a restore.
#[derive(Debug, Clone, Serialize)]
pub struct RestoreResult {
    /// Invoice after the restore.
    pub invoice: invoices::Model,
    /// Confirmation message.
    pub message: &'static str,
}

impl From<status_changes::Model> for ChangeLogEntry {
    fn from(model: status_changes::Model) -> Self {
        Self {
            id: model.id,
            invoice_id: model.invoice_id,
            previous_status: model.previous_status,
            new_status: model.new_status,
            changed_by: model.changed_by,
            changed_at: model.changed_at,
            restored: model.restored,
        }
    }
}

fn db_err(e: DbErr) -> StatusError {
    StatusError::Database(e.to_string())
}

/// Reads an invoice and locks its row until the transaction ends.
pub(crate) async fn lock_invoice<C: ConnectionTrait>(
    conn: &C,
    invoice_id: Uuid,
) -> Result<Option<invoices::Model>, DbErr> {
    invoices::Entity::find_by_id(invoice_id)
        .lock_exclusive()
        .one(conn)
        .await
}

/// Appends one ledger entry. `changed_at` takes the database default.
pub(crate) async fn append_ledger<C: ConnectionTrait>(
    conn: &C,
    record: &LedgerRecord,
) -> Result<status_changes::Model, DbErr> {
    status_changes::ActiveModel {
        id: NotSet,
        invoice_id: Set(record.invoice_id.into_inner()),
        previous_status: Set(Some(record.previous_status.as_str().to_string())),
        new_status: Set(Some(record.new_status.as_str().to_string())),
        changed_by: Set(Some(record.changed_by.clone())),
        changed_at: NotSet,
        restored: Set(record.restored),
    }
    .insert(conn)
    .await
}

/// Status repository for invoice status mutations and the change log.
#[derive(Debug, Clone)]
pub struct StatusRepository {
    db: DatabaseConnection,
}

impl StatusRepository {
    /// Creates a new status repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Sets an invoice's status.
    ///
    /// Writes a ledger entry only when the status actually changes; the
    /// update itself always runs.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is missing (`Unauthenticated`)
    /// - The status is outside the set (`InvalidStatus`)
    /// - The invoice does not exist (`InvoiceNotFound`)
    /// - A database operation fails (`Database`)
    pub async fn change_status(
        &self,
        invoice_id: Uuid,
        new_status: &str,
        actor: Option<&str>,
    ) -> Result<invoices::Model, StatusError> {
        let request =
            StatusChangeRequest::change(InvoiceId::from_uuid(invoice_id), new_status, actor)?;
        self.apply(&request).await
    }

    /// Cancels an invoice. Same contract as [`StatusRepository::change_status`].
    ///
    /// # Errors
    ///
    /// See [`StatusRepository::change_status`].
    pub async fn cancel(
        &self,
        invoice_id: Uuid,
        actor: Option<&str>,
    ) -> Result<invoices::Model, StatusError> {
        self.change_status(invoice_id, InvoiceStatus::Canceled.as_str(), actor)
            .await
    }

    /// Restores a status onto an invoice.
    ///
    /// Always appends a ledger entry flagged `restored`, recording the
    /// status the restore overwrote. Existing entries are never touched.
    ///
    /// # Errors
    ///
    /// Same conditions as [`StatusRepository::change_status`].
    pub async fn restore_status(
        &self,
        invoice_id: Uuid,
        previous_status: &str,
        actor: Option<&str>,
    ) -> Result<RestoreResult, StatusError> {
        let request =
            StatusChangeRequest::restore(InvoiceId::from_uuid(invoice_id), previous_status, actor)?;
        let invoice = self.apply(&request).await?;

        Ok(RestoreResult {
            invoice,
            message: RESTORED_MESSAGE,
        })
    }

    /// Restores the previous status recorded by a ledger entry.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is missing (`Unauthenticated`)
    /// - The entry does not exist for this invoice (`EntryNotFound`)
    /// - The entry has no restorable previous status (`InvalidStatus`)
    /// - A database operation fails (`Database`)
    pub async fn restore_from_entry(
        &self,
        invoice_id: Uuid,
        entry_id: i32,
        actor: Option<&str>,
    ) -> Result<RestoreResult, StatusError> {
        let actor = StatusChangeRequest::require_actor(actor)?;

        let entry = status_changes::Entity::find_by_id(entry_id)
            .filter(status_changes::Column::InvoiceId.eq(invoice_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(StatusError::EntryNotFound {
                invoice_id,
                entry_id,
            })?;

        let target = StatusService::restore_target(entry.previous_status.as_deref())?;
        self.restore_status(invoice_id, target.as_str(), Some(actor))
            .await
    }

    /// Appends a ledger entry on its own, outside a status mutation.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is missing (`Unauthenticated`)
    /// - A given status is outside the set (`InvalidStatus`)
    /// - The invoice does not exist (`InvoiceNotFound`)
    /// - A database operation fails (`Database`)
    pub async fn log_change(
        &self,
        invoice_id: Uuid,
        previous_status: Option<&str>,
        new_status: Option<&str>,
        actor: Option<&str>,
    ) -> Result<ChangeLogEntry, StatusError> {
        let actor = StatusChangeRequest::require_actor(actor)?;
        for status in [previous_status, new_status].into_iter().flatten() {
            if InvoiceStatus::parse(status).is_none() {
                return Err(StatusError::InvalidStatus(status.to_string()));
            }
        }

        invoices::Entity::find_by_id(invoice_id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or(StatusError::InvoiceNotFound(invoice_id))?;

        let entry = status_changes::ActiveModel {
            id: NotSet,
            invoice_id: Set(invoice_id),
            previous_status: Set(previous_status.map(str::to_string)),
            new_status: Set(new_status.map(str::to_string)),
            changed_by: Set(Some(actor.to_string())),
            changed_at: NotSet,
            restored: Set(false),
        }
        .insert(&self.db)
        .await
        .map_err(db_err)?;

        Ok(entry.into())
    }

    /// Lists an invoice's ledger entries, newest first.
    ///
    /// Ordered by sequence id, which follows the order writes took the row
    /// lock. `changed_at` is the transaction start time and can disagree.
    ///
    /// # Errors
    ///
    /// Returns `StatusError::Database` if the query fails.
    pub async fn list_change_log(
        &self,
        invoice_id: Uuid,
    ) -> Result<Vec<ChangeLogEntry>, StatusError> {
        let entries = status_changes::Entity::find()
            .filter(status_changes::Column::InvoiceId.eq(invoice_id))
            .order_by_desc(status_changes::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(entries.into_iter().map(ChangeLogEntry::from).collect())
    }

    /// Runs a validated request: lock, update, append, commit.
    async fn apply(&self, request: &StatusChangeRequest) -> Result<invoices::Model, StatusError> {
        let invoice_id = request.invoice_id.into_inner();
        let txn = self.db.begin().await.map_err(db_err)?;

        let Some(invoice) = lock_invoice(&txn, invoice_id).await.map_err(db_err)? else {
            warn!(%invoice_id, "status change for unknown invoice");
            return Err(StatusError::InvoiceNotFound(invoice_id));
        };

        let transition = StatusService::plan(request, db_status_to_core(invoice.status));

        let mut active: invoices::ActiveModel = invoice.into();
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
            kind = ?request.kind,
            logged = transition.ledger.is_some(),
            "invoice status updated"
        );

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::entities::sea_orm_active_enums::InvoiceStatus as DbInvoiceStatus;

    fn invoice(id: Uuid, status: DbInvoiceStatus) -> invoices::Model {
        invoices::Model {
            id,
            customer_id: Uuid::nil(),
            amount: 15795,
            status,
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        }
    }

    fn entry(
        id: i32,
        invoice_id: Uuid,
        previous: Option<&str>,
        new: &str,
        restored: bool,
    ) -> status_changes::Model {
        status_changes::Model {
            id,
            invoice_id,
            previous_status: previous.map(str::to_string),
            new_status: Some(new.to_string()),
            changed_by: Some("alice".to_string()),
            changed_at: NaiveDate::from_ymd_opt(2024, 6, 2)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            restored,
        }
    }

    fn log_text(db: DatabaseConnection) -> String {
        format!("{:?}", db.into_transaction_log())
    }

    #[tokio::test]
    async fn test_invalid_status_touches_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = StatusRepository::new(db.clone());

        let result = repo
            .change_status(Uuid::new_v4(), "archived", Some("alice"))
            .await;

        assert!(matches!(result, Err(StatusError::InvalidStatus(_))));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_missing_actor_touches_nothing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = StatusRepository::new(db.clone());

        let result = repo.change_status(Uuid::new_v4(), "paid", None).await;

        assert!(matches!(result, Err(StatusError::Unauthenticated)));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_change_status_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<invoices::Model>::new()])
            .into_connection();
        let repo = StatusRepository::new(db);
        let id = Uuid::new_v4();

        match repo.change_status(id, "paid", Some("alice")).await {
            Err(StatusError::InvoiceNotFound(missing)) => assert_eq!(missing, id),
            other => panic!("Expected InvoiceNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_change_status_logs_transition() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Pending)]])
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Paid)]])
            .append_query_results([vec![entry(1, id, Some("pending"), "paid", false)]])
            .into_connection();
        let repo = StatusRepository::new(db.clone());

        let updated = repo.change_status(id, "paid", Some("alice")).await.unwrap();
        assert_eq!(updated.status, DbInvoiceStatus::Paid);

        let log = log_text(db);
        assert!(log.contains("FOR UPDATE"));
        assert!(log.contains("status_changes"));
    }

    #[tokio::test]
    async fn test_change_to_same_status_skips_ledger() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Paid)]])
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Paid)]])
            .into_connection();
        let repo = StatusRepository::new(db.clone());

        let updated = repo.change_status(id, "paid", Some("alice")).await.unwrap();
        assert_eq!(updated.status, DbInvoiceStatus::Paid);
        assert!(!log_text(db).contains("status_changes"));
    }

    #[tokio::test]
    async fn test_cancel_sets_canceled() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Pending)]])
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Canceled)]])
            .append_query_results([vec![entry(2, id, Some("pending"), "canceled", false)]])
            .into_connection();
        let repo = StatusRepository::new(db);

        let updated = repo.cancel(id, Some("alice")).await.unwrap();
        assert_eq!(updated.status, DbInvoiceStatus::Canceled);
    }

    #[tokio::test]
    async fn test_restore_status_appends_even_when_unchanged() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Pending)]])
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Pending)]])
            .append_query_results([vec![entry(3, id, Some("pending"), "pending", true)]])
            .into_connection();
        let repo = StatusRepository::new(db.clone());

        let result = repo
            .restore_status(id, "pending", Some("alice"))
            .await
            .unwrap();

        assert_eq!(result.message, "Invoice status restored");
        assert_eq!(result.invoice.status, DbInvoiceStatus::Pending);
        assert!(log_text(db).contains("status_changes"));
    }

    #[tokio::test]
    async fn test_restore_from_entry_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<status_changes::Model>::new()])
            .into_connection();
        let repo = StatusRepository::new(db);

        let result = repo
            .restore_from_entry(Uuid::new_v4(), 42, Some("alice"))
            .await;
        assert!(matches!(
            result,
            Err(StatusError::EntryNotFound { entry_id: 42, .. })
        ));
    }

    #[tokio::test]
    async fn test_restore_from_entry_without_previous_status() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![entry(4, id, None, "paid", false)]])
            .into_connection();
        let repo = StatusRepository::new(db);

        let result = repo.restore_from_entry(id, 4, Some("alice")).await;
        assert!(matches!(result, Err(StatusError::InvalidStatus(_))));
    }

    #[tokio::test]
    async fn test_restore_from_entry_applies_previous_status() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![entry(5, id, Some("pending"), "paid", false)]])
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Paid)]])
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Pending)]])
            .append_query_results([vec![entry(6, id, Some("paid"), "pending", true)]])
            .into_connection();
        let repo = StatusRepository::new(db);

        let result = repo.restore_from_entry(id, 5, Some("bob")).await.unwrap();
        assert_eq!(result.invoice.status, DbInvoiceStatus::Pending);
    }

    #[tokio::test]
    async fn test_restore_from_entry_requires_actor_first() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = StatusRepository::new(db.clone());

        let result = repo.restore_from_entry(Uuid::new_v4(), 1, Some("  ")).await;
        assert!(matches!(result, Err(StatusError::Unauthenticated)));
        assert!(db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_log_change_validates_statuses() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let repo = StatusRepository::new(db);

        let result = repo
            .log_change(Uuid::new_v4(), Some("pending"), Some("archived"), Some("alice"))
            .await;
        assert!(matches!(result, Err(StatusError::InvalidStatus(s)) if s == "archived"));
    }

    #[tokio::test]
    async fn test_log_change_inserts_entry() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![invoice(id, DbInvoiceStatus::Paid)]])
            .append_query_results([vec![entry(7, id, Some("pending"), "paid", false)]])
            .into_connection();
        let repo = StatusRepository::new(db);

        let logged = repo
            .log_change(id, Some("pending"), Some("paid"), Some("alice"))
            .await
            .unwrap();
        assert_eq!(logged.id, 7);
        assert_eq!(logged.previous_status.as_deref(), Some("pending"));
        assert!(!logged.restored);
    }

    #[tokio::test]
    async fn test_list_change_log_orders_newest_first() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                entry(9, id, Some("paid"), "pending", true),
                entry(8, id, Some("pending"), "paid", false),
            ]])
            .into_connection();
        let repo = StatusRepository::new(db.clone());

        let entries = repo.list_change_log(id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, 9);
        assert!(entries[0].restored);

        let log = log_text(db);
        assert!(log.contains(r#"ORDER BY \"status_changes\".\"id\" DESC"#));
        assert!(!log.contains("changed_at\\\" DESC"));
    }

    #[tokio::test]
    async fn test_list_change_log_empty() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<status_changes::Model>::new()])
            .into_connection();
        let repo = StatusRepository::new(db);

        assert!(repo.list_change_log(Uuid::new_v4()).await.unwrap().is_empty());
    }
}
