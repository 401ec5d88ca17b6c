use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::api::models::{CreateSupplyRequest, PageQuery, UpdateSupplyRequest};
use crate::error::{Result, ServiceError};
use crate::models::{Supply, SupplyCandidate};

const COLUMNS: &str = "id, supply_type, name, strength, route, quantity_per_package, \
                       side_effects, location, is_deleted, created_at";

pub struct SupplyRepository {
    pool: PgPool,
}

impl SupplyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, req: CreateSupplyRequest) -> Result<Supply> {
        let supply = sqlx::query_as::<_, Supply>(&format!(
            "INSERT INTO supplies \
             (supply_type, name, strength, route, quantity_per_package, side_effects, location) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        ))
        .bind(&req.supply_type)
        .bind(&req.name)
        .bind(&req.strength)
        .bind(&req.route)
        .bind(req.quantity_per_package)
        .bind(&req.side_effects)
        .bind(&req.location)
        .fetch_one(&self.pool)
        .await?;

        Ok(supply)
    }

    /// Fetches one non-deleted supply. Tombstoned rows read as absent.
    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: i64) -> Result<Supply> {
        let supply = sqlx::query_as::<_, Supply>(&format!(
            "SELECT {COLUMNS} FROM supplies WHERE id = $1 AND is_deleted = FALSE"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("supply", id.to_string()))?;

        Ok(supply)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &PageQuery) -> Result<Vec<Supply>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM supplies WHERE is_deleted = FALSE"));

        if let Some(ref keywords) = query.keywords {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{keywords}%"));
        }

        qb.push(" ORDER BY id ASC LIMIT ");
        qb.push_bind(query.page_size());
        qb.push(" OFFSET ");
        qb.push_bind(query.offset());

        let supplies = qb.build_query_as::<Supply>().fetch_all(&self.pool).await?;

        Ok(supplies)
    }

    /// Exact total of rows matching the list filters, before pagination.
    #[tracing::instrument(skip(self))]
    pub async fn count(&self, query: &PageQuery) -> Result<i64> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM supplies WHERE is_deleted = FALSE");

        if let Some(ref keywords) = query.keywords {
            qb.push(" AND name ILIKE ");
            qb.push_bind(format!("%{keywords}%"));
        }

        let count: (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;

        Ok(count.0)
    }

    /// Point lookup by id set. Tombstoned rows are filtered out; an empty
    /// result means no matching rows, a query failure is an `Err`.
    #[tracing::instrument(skip(self))]
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Supply>> {
        let supplies = sqlx::query_as::<_, Supply>(&format!(
            "SELECT {COLUMNS} FROM supplies \
             WHERE id = ANY($1) AND is_deleted = FALSE ORDER BY id ASC"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(supplies)
    }

    /// Bounded id+name projection for the assistant's resolution stage.
    #[tracing::instrument(skip(self))]
    pub async fn candidates(&self, limit: i64) -> Result<Vec<SupplyCandidate>> {
        let candidates = sqlx::query_as::<_, SupplyCandidate>(
            "SELECT id, name FROM supplies WHERE is_deleted = FALSE ORDER BY id ASC LIMIT $1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(candidates)
    }

    /// Merge update: fields absent in the request keep their current values.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: i64, req: UpdateSupplyRequest) -> Result<Supply> {
        let current = self.get_by_id(id).await?;

        let supply_type = req.supply_type.unwrap_or(current.supply_type);
        let name = req.name.unwrap_or(current.name);
        let strength = req.strength.or(current.strength);
        let route = req.route.or(current.route);
        let quantity_per_package = req.quantity_per_package.or(current.quantity_per_package);
        let side_effects = req.side_effects.or(current.side_effects);
        let location = req.location.or(current.location);

        let updated = sqlx::query_as::<_, Supply>(&format!(
            "UPDATE supplies SET \
             supply_type = $2, name = $3, strength = $4, route = $5, \
             quantity_per_package = $6, side_effects = $7, location = $8 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(supply_type)
        .bind(name)
        .bind(strength)
        .bind(route)
        .bind(quantity_per_package)
        .bind(side_effects)
        .bind(location)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }

    /// Flips the tombstone flag. Idempotent: re-deleting an already-deleted
    /// row leaves the same final state.
    #[tracing::instrument(skip(self))]
    pub async fn soft_delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE supplies SET is_deleted = TRUE WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("supply", id.to_string()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_supply_repository_creation() {
        let pool = PgPool::connect_lazy("postgres://localhost/test").unwrap();
        let repo = SupplyRepository::new(pool);
        assert!(std::mem::size_of_val(&repo) > 0);
    }
}
