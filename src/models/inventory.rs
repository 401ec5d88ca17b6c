use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::supply::SupplySnapshot;
use crate::error::{Result, ServiceError};

/// A lot's link to the catalog: either a supply id or an embedded partial
/// supply, never both and never neither.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SupplyRef {
    ById(i64),
    Embedded(SupplySnapshot),
}

impl SupplyRef {
    /// Splits the reference into the `(supply_id, supply_data)` column pair.
    pub fn to_columns(&self) -> Result<(Option<i64>, Option<serde_json::Value>)> {
        match self {
            SupplyRef::ById(id) => Ok((Some(*id), None)),
            SupplyRef::Embedded(snapshot) => Ok((None, Some(serde_json::to_value(snapshot)?))),
        }
    }

    fn from_columns(
        supply_id: Option<i64>,
        supply_data: Option<serde_json::Value>,
    ) -> Result<Self> {
        match (supply_id, supply_data) {
            (Some(id), None) => Ok(SupplyRef::ById(id)),
            // The data came from our own table; failing to decode it is a
            // corrupt row, not a client error.
            (None, Some(data)) => serde_json::from_value(data)
                .map(SupplyRef::Embedded)
                .map_err(|e| {
                    ServiceError::internal(format!("corrupt embedded supply data: {e}"))
                }),
            (Some(_), Some(_)) => Err(ServiceError::internal(
                "lot row carries both a supply reference and embedded supply data",
            )),
            (None, None) => Err(ServiceError::internal(
                "lot row carries neither a supply reference nor embedded supply data",
            )),
        }
    }
}

/// A stock lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventoryLot {
    pub id: i64,
    pub supply: SupplyRef,
    pub quantity: i32,
    pub expiry_date: Option<DateTime<Utc>>,
    /// Set by `claim`; a non-null owner puts the lot in the personal bucket.
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Raw row shape for `inventory_lots`. Converted into [`InventoryLot`] so the
/// reference-vs-embedded invariant is checked at the row boundary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LotRow {
    pub id: i64,
    pub supply_id: Option<i64>,
    pub supply_data: Option<serde_json::Value>,
    pub quantity: i32,
    pub expiry_date: Option<DateTime<Utc>>,
    pub owner_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LotRow> for InventoryLot {
    type Error = ServiceError;

    fn try_from(row: LotRow) -> Result<Self> {
        Ok(InventoryLot {
            id: row.id,
            supply: SupplyRef::from_columns(row.supply_id, row.supply_data)?,
            quantity: row.quantity,
            expiry_date: row.expiry_date,
            owner_id: row.owner_id,
            created_at: row.created_at,
        })
    }
}

/// One partition of a categorized read. `count` is the total matching rows
/// for the partition before pagination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LotBucket {
    pub data: Vec<InventoryLot>,
    pub count: i64,
}

/// The three-way partition of the lots table: unowned and unexpired,
/// owned (any expiry), and unowned but expired.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategorizedLots {
    pub current: LotBucket,
    pub personal: LotBucket,
    pub expired: LotBucket,
}

/// Aggregate on-hand quantity for one supply across its lots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StockLevel {
    pub quantity: i64,
    pub lots: i64,
}
