use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subscriber {
    pub id: i32,
    pub email: String,
    pub name: String,
    /// monthly or yearly
    pub subscription_type: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// active, expired or cancelled
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
