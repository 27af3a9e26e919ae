//! Customer repository for the customer picker.

use sea_orm::{DatabaseConnection, DbErr, EntityTrait, QueryOrder, QuerySelect};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::customers;

/// Customer id and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sea_orm::FromQueryResult)]
pub struct CustomerSummary {
    /// Customer id.
    pub id: Uuid,
    /// Customer name.
    pub name: String,
}

/// Customer repository.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    db: DatabaseConnection,
}

impl CustomerRepository {
    /// Creates a new customer repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Lists all customers ordered by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<CustomerSummary>, DbErr> {
        customers::Entity::find()
            .select_only()
            .column(customers::Column::Id)
            .column(customers::Column::Name)
            .order_by_asc(customers::Column::Name)
            .into_model::<CustomerSummary>()
            .all(&self.db)
            .await
    }
}
