use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::api::models::{CreateLotRequest, PageQuery, UpdateLotRequest};
use crate::error::{Result, ServiceError};
use crate::models::inventory::LotRow;
use crate::models::{CategorizedLots, InventoryLot, LotBucket, StockLevel};

const COLUMNS: &str =
    "id, supply_id, supply_data, quantity, expiry_date, owner_id, created_at";

/// The three mutually exclusive partitions of the lots table. Ownership
/// short-circuits expiry: an owned lot is personal no matter its date, and
/// a lot without an expiry date counts as unexpired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LotPartition {
    Current,
    Personal,
    Expired,
}

fn push_partition_filter(
    qb: &mut QueryBuilder<'_, Postgres>,
    partition: LotPartition,
    now: DateTime<Utc>,
) {
    match partition {
        LotPartition::Current => {
            qb.push("owner_id IS NULL AND (expiry_date IS NULL OR expiry_date >= ");
            qb.push_bind(now);
            qb.push(")");
        }
        LotPartition::Personal => {
            qb.push("owner_id IS NOT NULL");
        }
        LotPartition::Expired => {
            qb.push("owner_id IS NULL AND expiry_date < ");
            qb.push_bind(now);
        }
    }
}

pub struct InventoryRepository {
    pool: PgPool,
}

impl InventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, req: CreateLotRequest) -> Result<InventoryLot> {
        let (supply_id, supply_data) = req.supply.to_columns()?;

        let row = sqlx::query_as::<_, LotRow>(&format!(
            "INSERT INTO inventory_lots \
             (supply_id, supply_data, quantity, expiry_date, owner_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        ))
        .bind(supply_id)
        .bind(supply_data)
        .bind(req.quantity)
        .bind(req.expiry_date)
        .bind(&req.owner_id)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<InventoryLot> {
        let row = sqlx::query_as::<_, LotRow>(&format!(
            "SELECT {COLUMNS} FROM inventory_lots WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("inventory lot", id.to_string()))?;

        row.try_into()
    }

    /// Merge update: absent fields keep their current values.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: i64, req: UpdateLotRequest) -> Result<InventoryLot> {
        let current = self.get_by_id(id).await?;

        let quantity = req.quantity.unwrap_or(current.quantity);
        let expiry_date = req.expiry_date.or(current.expiry_date);

        let row = sqlx::query_as::<_, LotRow>(&format!(
            "UPDATE inventory_lots SET quantity = $2, expiry_date = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(quantity)
        .bind(expiry_date)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Stamps the owner, moving the lot from the shared pool into the
    /// caller's personal bucket on the next categorized read.
    #[tracing::instrument(skip(self))]
    pub async fn claim(&self, id: i64, crew_id: &str) -> Result<InventoryLot> {
        let row = sqlx::query_as::<_, LotRow>(&format!(
            "UPDATE inventory_lots SET owner_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(crew_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("inventory lot", id.to_string()))?;

        row.try_into()
    }

    /// Partitions the table into current/personal/expired buckets.
    ///
    /// `now` is captured once and shared by all three predicates, so the
    /// partitions stay exclusive and exhaustive even when the sub-fetches
    /// run concurrently. Any sub-fetch failure fails the whole call.
    #[tracing::instrument(skip(self))]
    pub async fn list_categorized(&self, query: &PageQuery) -> Result<CategorizedLots> {
        let now = Utc::now();

        let (current, personal, expired) = tokio::try_join!(
            self.fetch_bucket(LotPartition::Current, now, query),
            self.fetch_bucket(LotPartition::Personal, now, query),
            self.fetch_bucket(LotPartition::Expired, now, query),
        )?;

        Ok(CategorizedLots {
            current,
            personal,
            expired,
        })
    }

    async fn fetch_bucket(
        &self,
        partition: LotPartition,
        now: DateTime<Utc>,
        query: &PageQuery,
    ) -> Result<LotBucket> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM inventory_lots WHERE "));
        push_partition_filter(&mut qb, partition, now);
        qb.push(" ORDER BY id ASC LIMIT ");
        qb.push_bind(query.page_size());
        qb.push(" OFFSET ");
        qb.push_bind(query.offset());

        let rows = qb.build_query_as::<LotRow>().fetch_all(&self.pool).await?;

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM inventory_lots WHERE ");
        push_partition_filter(&mut count_qb, partition, now);

        let count: (i64,) = count_qb.build_query_as().fetch_one(&self.pool).await?;

        let data = rows
            .into_iter()
            .map(InventoryLot::try_from)
            .collect::<Result<Vec<_>>>()?;

        Ok(LotBucket {
            data,
            count: count.0,
        })
    }

    /// Aggregate on-hand quantity and lot count for one supply.
    #[tracing::instrument(skip(self))]
    pub async fn stock_level(&self, supply_id: i64) -> Result<StockLevel> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT, COUNT(*) \
             FROM inventory_lots WHERE supply_id = $1",
        )
        .bind(supply_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(StockLevel {
            quantity: row.0,
            lots: row.1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_inventory_repository_creation() {
        let pool = PgPool::connect_lazy("postgres://localhost/test").unwrap();
        let repo = InventoryRepository::new(pool);
        assert!(std::mem::size_of_val(&repo) > 0);
    }

    #[test]
    fn test_partition_filters_are_exclusive() {
        // An owned lot must never match the current or expired predicates.
        let now = Utc::now();
        let mut current: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_partition_filter(&mut current, LotPartition::Current, now);
        assert!(current.sql().contains("owner_id IS NULL"));

        let mut expired: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_partition_filter(&mut expired, LotPartition::Expired, now);
        assert!(expired.sql().contains("owner_id IS NULL"));

        let mut personal: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_partition_filter(&mut personal, LotPartition::Personal, now);
        assert!(personal.sql().contains("owner_id IS NOT NULL"));
    }

    #[test]
    fn test_null_expiry_counts_as_current() {
        let now = Utc::now();
        let mut current: QueryBuilder<Postgres> = QueryBuilder::new("");
        push_partition_filter(&mut current, LotPartition::Current, now);
        assert!(current.sql().contains("expiry_date IS NULL OR"));
    }
}
