//! Request and response shapes for the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::{CrewMember, CrewRef, LogEntry, LotRef, Supply, SupplyRef};

const DEFAULT_PAGE_SIZE: i64 = 20;

/// Pagination and keyword options shared by list endpoints.
///
/// `page` and `page_size` are 1-based; violations are rejected with 400
/// before any query is issued.
#[derive(Debug, Default, Deserialize, Validate, IntoParams)]
pub struct PageQuery {
    #[validate(range(min = 1))]
    pub page: Option<i64>,
    #[validate(range(min = 1, max = 200))]
    pub page_size: Option<i64>,
    pub keywords: Option<String>,
}

impl PageQuery {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1)
    }

    pub fn page_size(&self) -> i64 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    /// Saturates instead of overflowing; a page number beyond the table is
    /// an empty result, not a panic.
    pub fn offset(&self) -> i64 {
        self.page_size().saturating_mul(self.page().saturating_sub(1))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
    pub total_items: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(page: i64, page_size: i64, total_items: i64) -> Self {
        let total_pages = if total_items == 0 {
            0
        } else {
            (total_items + page_size - 1) / page_size
        };

        Self {
            page,
            page_size,
            total_items,
            total_pages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListSuppliesResponse {
    pub data: Vec<Supply>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListCrewResponse {
    pub data: Vec<CrewMember>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ListLogsResponse {
    pub data: Vec<LogEntry>,
    pub pagination: Pagination,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSupplyRequest {
    #[validate(length(min = 1))]
    pub supply_type: String,
    #[validate(length(min = 1))]
    pub name: String,
    pub strength: Option<String>,
    pub route: Option<String>,
    #[validate(range(min = 1))]
    pub quantity_per_package: Option<i32>,
    pub side_effects: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSupplyRequest {
    #[validate(length(min = 1))]
    pub supply_type: Option<String>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    pub strength: Option<String>,
    pub route: Option<String>,
    #[validate(range(min = 1))]
    pub quantity_per_package: Option<i32>,
    pub side_effects: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLotRequest {
    pub supply: SupplyRef,
    #[validate(range(min = 1))]
    pub quantity: i32,
    pub expiry_date: Option<DateTime<Utc>>,
    pub owner_id: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateLotRequest {
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    pub expiry_date: Option<DateTime<Utc>>,
}

/// Claim identity travels with each request; nothing is cached per process.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ClaimLotRequest {
    #[validate(length(min = 1))]
    pub crew_id: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCrewRequest {
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCrewRequest {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateLogRequest {
    pub lot: LotRef,
    pub crew: CrewRef,
    #[validate(range(min = 1))]
    pub quantity: i32,
}

/// `question` is optional in the shape so its absence maps to a 400 with a
/// message, not a deserialization rejection.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AskRequest {
    pub question: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AskResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_query_defaults() {
        let query = PageQuery::default();
        assert_eq!(query.page(), 1);
        assert_eq!(query.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_page_query_offset() {
        let query = PageQuery {
            page: Some(3),
            page_size: Some(10),
            keywords: None,
        };
        assert_eq!(query.offset(), 20);
    }

    #[test]
    fn test_page_query_offset_saturates_on_huge_page() {
        let query = PageQuery {
            page: Some(i64::MAX),
            page_size: Some(200),
            keywords: None,
        };
        assert!(query.validate().is_ok());
        assert_eq!(query.offset(), i64::MAX);
    }

    #[test]
    fn test_page_query_rejects_zero_page() {
        let query = PageQuery {
            page: Some(0),
            page_size: Some(10),
            keywords: None,
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_page_query_rejects_zero_page_size() {
        let query = PageQuery {
            page: Some(1),
            page_size: Some(0),
            keywords: None,
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn test_pagination_rounds_up() {
        let pagination = Pagination::new(1, 10, 25);
        assert_eq!(pagination.total_pages, 3);

        let empty = Pagination::new(1, 10, 0);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn test_create_supply_request_validation() {
        let req = CreateSupplyRequest {
            supply_type: "medication".to_string(),
            name: "Diphenhydramine (Benadryl)".to_string(),
            strength: Some("25 mg".to_string()),
            route: Some("oral".to_string()),
            quantity_per_package: Some(30),
            side_effects: None,
            location: None,
        };
        assert!(req.validate().is_ok());

        let bad = CreateSupplyRequest {
            supply_type: "medication".to_string(),
            name: String::new(),
            strength: None,
            route: None,
            quantity_per_package: None,
            side_effects: None,
            location: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_create_lot_request_validation() {
        let req = CreateLotRequest {
            supply: SupplyRef::ById(2),
            quantity: 9,
            expiry_date: None,
            owner_id: None,
        };
        assert!(req.validate().is_ok());

        let bad = CreateLotRequest {
            supply: SupplyRef::ById(2),
            quantity: 0,
            expiry_date: None,
            owner_id: None,
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_ask_request_accepts_missing_question() {
        let req: AskRequest = serde_json::from_str("{}").unwrap();
        assert!(req.question.is_none());
    }
}
