use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog entry. Never physically removed; `is_deleted` marks tombstones.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct Supply {
    pub id: i64,
    pub supply_type: String,
    pub name: String,
    pub strength: Option<String>,
    pub route: Option<String>,
    pub quantity_per_package: Option<i32>,
    pub side_effects: Option<String>,
    pub location: Option<String>,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
}

/// Id + name projection offered to the assistant's resolution stage.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct SupplyCandidate {
    pub id: i64,
    pub name: String,
}

/// A partial supply embedded directly in a lot instead of referenced by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SupplySnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_per_package: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supply_serialization() {
        let supply = Supply {
            id: 2,
            supply_type: "medication".to_string(),
            name: "Diphenhydramine (Benadryl)".to_string(),
            strength: Some("25 mg".to_string()),
            route: Some("oral".to_string()),
            quantity_per_package: Some(30),
            side_effects: Some("drowsiness".to_string()),
            location: Some("med bay cabinet 3".to_string()),
            is_deleted: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&supply).unwrap();
        let deserialized: Supply = serde_json::from_str(&json).unwrap();

        assert_eq!(supply, deserialized);
    }

    #[test]
    fn test_snapshot_omits_absent_fields() {
        let snapshot = SupplySnapshot {
            name: "Ibuprofen".to_string(),
            strength: None,
            route: None,
            quantity_per_package: None,
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"name":"Ibuprofen"}"#);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let snapshot = SupplySnapshot {
            name: "Epinephrine".to_string(),
            strength: Some("1 mg/mL".to_string()),
            route: Some("intramuscular".to_string()),
            quantity_per_package: Some(1),
        };

        let json = serde_json::to_value(&snapshot).unwrap();
        let back: SupplySnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(snapshot, back);
    }
}
