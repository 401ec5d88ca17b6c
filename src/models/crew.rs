use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A person record. The id may be issued by an external identity provider,
/// so it is an opaque string rather than a generated integer.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow, Serialize, Deserialize, ToSchema)]
pub struct CrewMember {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
}

/// A partial crew member embedded in a log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CrewSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crew_member_serialization() {
        let member = CrewMember {
            id: "auth0|c-117".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Okafor".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&member).unwrap();
        let back: CrewMember = serde_json::from_str(&json).unwrap();
        assert_eq!(member, back);
    }
}
