//! Vacation models and listing payloads

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vacation row
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Vacation {
    pub id: i64,
    pub destination: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
    pub image_name: String,
}

/// Vacation enriched with follower data for one viewer
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct VacationListing {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub vacation: Vacation,
    pub followers_count: i64,
    pub is_followed: bool,
}

/// Validated fields for a create or update
#[derive(Debug, Clone, PartialEq)]
pub struct NewVacation {
    pub destination: String,
    pub description: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub price: f64,
    pub image_name: String,
}

/// Raw create/update body. Every field is optional so that missing input
/// surfaces as a validation error rather than a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VacationPayload {
    pub destination: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "startDate")]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    pub end_date: Option<String>,
    /// Number or numeric string
    pub price: Option<serde_json::Value>,
    #[serde(alias = "imageName")]
    pub image_name: Option<String>,
}

/// Query parameters for `GET /vacations`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub page: Option<String>,
    pub filter: Option<String>,
}

impl ListParams {
    /// Pick `page` and `filter` out of raw query pairs. A repeated key keeps
    /// its first value; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = ListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "filter" => &mut params.filter,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

/// One page of the vacation listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VacationPage {
    pub vacations: Vec<VacationListing>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
}
