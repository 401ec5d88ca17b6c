use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::api::models::{CreateLogRequest, PageQuery};
use crate::error::{Result, ServiceError};
use crate::models::log::LogRow;
use crate::models::LogEntry;

const COLUMNS: &str =
    "id, lot_id, lot_data, crew_id, crew_data, quantity, is_deleted, created_at";

pub struct LogRepository {
    pool: PgPool,
}

impl LogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, req: CreateLogRequest) -> Result<LogEntry> {
        let (lot_id, lot_data) = req.lot.to_columns()?;
        let (crew_id, crew_data) = req.crew.to_columns()?;

        let row = sqlx::query_as::<_, LogRow>(&format!(
            "INSERT INTO usage_logs (lot_id, lot_data, crew_id, crew_data, quantity) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(lot_id)
        .bind(lot_data)
        .bind(crew_id)
        .bind(crew_data)
        .bind(req.quantity)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &PageQuery) -> Result<Vec<LogEntry>> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(format!(
            "SELECT {COLUMNS} FROM usage_logs WHERE is_deleted = FALSE"
        ));

        qb.push(" ORDER BY id ASC LIMIT ");
        qb.push_bind(query.page_size());
        qb.push(" OFFSET ");
        qb.push_bind(query.offset());

        let rows = qb.build_query_as::<LogRow>().fetch_all(&self.pool).await?;

        rows.into_iter().map(LogEntry::try_from).collect()
    }

    #[tracing::instrument(skip(self))]
    pub async fn count(&self) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM usage_logs WHERE is_deleted = FALSE")
                .fetch_one(&self.pool)
                .await?;

        Ok(count.0)
    }

    /// Flips the tombstone flag. Idempotent.
    #[tracing::instrument(skip(self))]
    pub async fn soft_delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE usage_logs SET is_deleted = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("log entry", id.to_string()));
        }

        Ok(())
    }
}
