//! Entitlement request repository implementation.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use notabene_core::{
    CreateEntitlementRequest, EntitlementRepository, EntitlementRequest, Error, OwnerIdentity,
    Result,
};

/// PostgreSQL implementation of EntitlementRepository.
#[derive(Clone)]
pub struct PgEntitlementRepository {
    pool: Pool<Postgres>,
}

impl PgEntitlementRepository {
    /// Create a new PgEntitlementRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

const REQUEST_COLUMNS: &str =
    "id, amount, payment_status, pro_user, owner_id, username, owner_email, created_at_utc";

/// Map a database row to an EntitlementRequest.
fn map_row_to_request(row: PgRow) -> EntitlementRequest {
    EntitlementRequest {
        id: row.get("id"),
        amount: row.get("amount"),
        payment_status: row.get("payment_status"),
        pro_user: row.get("pro_user"),
        owner_id: row.get("owner_id"),
        username: row.get("username"),
        owner_email: row.get("owner_email"),
        created_at_utc: row.get("created_at_utc"),
    }
}

#[async_trait]
impl EntitlementRepository for PgEntitlementRepository {
    async fn insert(
        &self,
        owner: &OwnerIdentity,
        req: CreateEntitlementRequest,
    ) -> Result<EntitlementRequest> {
        let id = Uuid::now_v7();

        // pro_user always starts false; only the elevate operation flips it.
        let row = sqlx::query(&format!(
            "INSERT INTO entitlement_request \
                 (id, amount, payment_status, pro_user, owner_id, username, \
                  owner_email, created_at_utc) \
             VALUES ($1, $2, $3, false, $4, $5, $6, now()) \
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(id)
        .bind(&req.amount)
        .bind(req.payment_status)
        .bind(&owner.subject)
        .bind(owner.username.as_deref().unwrap_or_default())
        .bind(&owner.email)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            op = "insert_entitlement",
            entitlement_id = %id,
            owner_id = %owner.subject,
            "Entitlement request created"
        );
        Ok(map_row_to_request(row))
    }

    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<EntitlementRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {REQUEST_COLUMNS} FROM entitlement_request \
             WHERE owner_id = $1 ORDER BY created_at_utc DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_request).collect())
    }

    async fn list_pending(&self) -> Result<Vec<EntitlementRequest>> {
        let rows = sqlx::query(&format!(
            "SELECT {REQUEST_COLUMNS} FROM entitlement_request \
             WHERE pro_user = false ORDER BY created_at_utc DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.into_iter().map(map_row_to_request).collect())
    }

    async fn elevate(&self, id: Uuid) -> Result<EntitlementRequest> {
        let row = sqlx::query(&format!(
            "UPDATE entitlement_request SET pro_user = true \
             WHERE id = $1 \
             RETURNING {REQUEST_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.map(map_row_to_request).ok_or(Error::RequestNotFound(id))
    }

    async fn has_pro(&self, owner_id: &str) -> Result<bool> {
        let row = sqlx::query(
            "SELECT EXISTS( \
                 SELECT 1 FROM entitlement_request \
                 WHERE owner_id = $1 AND pro_user = true \
             ) AS entitled",
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.get("entitled"))
    }
}
