//! Property repository implementation.
//!
//! The booking engine only needs the pricing-and-rules slice; full
//! property CRUD belongs to the catalog service.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use nusastay_core::error::{AppError, ErrorKind};
use nusastay_core::result::AppResult;
use nusastay_entity::property::{Property, PropertySnapshot};

use super::PropertyStore;

/// sqlx-backed [`PropertyStore`].
#[derive(Debug, Clone)]
pub struct PgPropertyRepository {
    pool: PgPool,
}

impl PgPropertyRepository {
    /// Create a new property repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStore for PgPropertyRepository {
    async fn pricing_and_rules(&self, property_id: Uuid) -> AppResult<Option<PropertySnapshot>> {
        let property = sqlx::query_as::<_, Property>("SELECT * FROM properties WHERE id = $1")
            .bind(property_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find property", e)
            })?;

        Ok(property.map(|p| p.snapshot()))
    }
}
