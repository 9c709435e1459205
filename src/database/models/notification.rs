use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: i32,
    pub title: String,
    pub message: String,
    pub destination_url: String,
    pub image_url: Option<String>,
    pub icon_url: Option<String>,
    /// "all" broadcasts; "user" targets target_user_id
    pub target_type: String,
    pub target_user_id: Option<i32>,
    pub sent: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
