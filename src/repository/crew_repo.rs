use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::api::models::{CreateCrewRequest, PageQuery, UpdateCrewRequest};
use crate::error::{Result, ServiceError};
use crate::models::CrewMember;

const COLUMNS: &str = "id, first_name, last_name, created_at";

pub struct CrewRepository {
    pool: PgPool,
}

impl CrewRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[tracing::instrument(skip(self))]
    pub async fn create(&self, req: CreateCrewRequest) -> Result<CrewMember> {
        let member = sqlx::query_as::<_, CrewMember>(&format!(
            "INSERT INTO crew_members (id, first_name, last_name) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        ))
        .bind(&req.id)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return ServiceError::conflict("crew member with this id already exists");
                }
            }
            e.into()
        })?;

        Ok(member)
    }

    #[tracing::instrument(skip(self))]
    pub async fn get_by_id(&self, id: &str) -> Result<CrewMember> {
        let member = sqlx::query_as::<_, CrewMember>(&format!(
            "SELECT {COLUMNS} FROM crew_members WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ServiceError::not_found("crew member", id))?;

        Ok(member)
    }

    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &PageQuery) -> Result<Vec<CrewMember>> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM crew_members"));

        if let Some(ref keywords) = query.keywords {
            qb.push(" WHERE first_name ILIKE ");
            qb.push_bind(format!("%{keywords}%"));
            qb.push(" OR last_name ILIKE ");
            qb.push_bind(format!("%{keywords}%"));
        }

        qb.push(" ORDER BY id ASC LIMIT ");
        qb.push_bind(query.page_size());
        qb.push(" OFFSET ");
        qb.push_bind(query.offset());

        let members = qb
            .build_query_as::<CrewMember>()
            .fetch_all(&self.pool)
            .await?;

        Ok(members)
    }

    #[tracing::instrument(skip(self))]
    pub async fn count(&self, query: &PageQuery) -> Result<i64> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM crew_members");

        if let Some(ref keywords) = query.keywords {
            qb.push(" WHERE first_name ILIKE ");
            qb.push_bind(format!("%{keywords}%"));
            qb.push(" OR last_name ILIKE ");
            qb.push_bind(format!("%{keywords}%"));
        }

        let count: (i64,) = qb.build_query_as().fetch_one(&self.pool).await?;

        Ok(count.0)
    }

    /// Merge update: absent fields keep their current values.
    #[tracing::instrument(skip(self))]
    pub async fn update(&self, id: &str, req: UpdateCrewRequest) -> Result<CrewMember> {
        let current = self.get_by_id(id).await?;

        let first_name = req.first_name.unwrap_or(current.first_name);
        let last_name = req.last_name.unwrap_or(current.last_name);

        let updated = sqlx::query_as::<_, CrewMember>(&format!(
            "UPDATE crew_members SET first_name = $2, last_name = $3 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_crew_repository_creation() {
        let pool = PgPool::connect_lazy("postgres://localhost/test").unwrap();
        let repo = CrewRepository::new(pool);
        assert!(std::mem::size_of_val(&repo) > 0);
    }
}
