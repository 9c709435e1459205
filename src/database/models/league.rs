use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct League {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub country: String,
    pub logo_url: String,
    pub popularity: i32,
    pub founded_date: Option<DateTime<Utc>>,
    pub headquarters: Option<String>,
    pub commissioner: Option<String>,
    pub divisions: Option<Vec<String>>,
    pub num_teams: i32,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
