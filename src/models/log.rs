use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::crew::CrewSnapshot;
use crate::error::{Result, ServiceError};

/// A log's link to a stock lot: id reference or embedded partial snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LotRef {
    ById(i64),
    Embedded(LotSnapshot),
}

/// A log's link to a crew member: id reference or embedded partial snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CrewRef {
    ById(String),
    Embedded(CrewSnapshot),
}

/// A partial lot embedded in a log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LotSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supply_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
}

/// An audit record of supply usage. Soft-deleted, never removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct LogEntry {
    pub id: i64,
    pub lot: LotRef,
    pub crew: CrewRef,
    pub quantity: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl LotRef {
    pub fn to_columns(&self) -> Result<(Option<i64>, Option<serde_json::Value>)> {
        match self {
            LotRef::ById(id) => Ok((Some(*id), None)),
            LotRef::Embedded(snapshot) => Ok((None, Some(serde_json::to_value(snapshot)?))),
        }
    }

    fn from_columns(lot_id: Option<i64>, lot_data: Option<serde_json::Value>) -> Result<Self> {
        match (lot_id, lot_data) {
            (Some(id), None) => Ok(LotRef::ById(id)),
            // Stored by us; a decode failure is a corrupt row, not a 400.
            (None, Some(data)) => serde_json::from_value(data)
                .map(LotRef::Embedded)
                .map_err(|e| ServiceError::internal(format!("corrupt embedded lot data: {e}"))),
            _ => Err(ServiceError::internal(
                "log row must carry exactly one of a lot reference or embedded lot data",
            )),
        }
    }
}

impl CrewRef {
    pub fn to_columns(&self) -> Result<(Option<String>, Option<serde_json::Value>)> {
        match self {
            CrewRef::ById(id) => Ok((Some(id.clone()), None)),
            CrewRef::Embedded(snapshot) => Ok((None, Some(serde_json::to_value(snapshot)?))),
        }
    }

    fn from_columns(
        crew_id: Option<String>,
        crew_data: Option<serde_json::Value>,
    ) -> Result<Self> {
        match (crew_id, crew_data) {
            (Some(id), None) => Ok(CrewRef::ById(id)),
            (None, Some(data)) => serde_json::from_value(data)
                .map(CrewRef::Embedded)
                .map_err(|e| {
                    ServiceError::internal(format!("corrupt embedded crew data: {e}"))
                }),
            _ => Err(ServiceError::internal(
                "log row must carry exactly one of a crew reference or embedded crew data",
            )),
        }
    }
}

/// Raw row shape for `usage_logs`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LogRow {
    pub id: i64,
    pub lot_id: Option<i64>,
    pub lot_data: Option<serde_json::Value>,
    pub crew_id: Option<String>,
    pub crew_data: Option<serde_json::Value>,
    pub quantity: i32,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<LogRow> for LogEntry {
    type Error = ServiceError;

    fn try_from(row: LogRow) -> Result<Self> {
        Ok(LogEntry {
            id: row.id,
            lot: LotRef::from_columns(row.lot_id, row.lot_data)?,
            crew: CrewRef::from_columns(row.crew_id, row.crew_data)?,
            quantity: row.quantity,
            is_deleted: row.is_deleted,
            created_at: row.created_at,
        })
    }
}
