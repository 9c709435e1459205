use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// End-user account of the consumer app
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub uuid: String,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub role: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub registration_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
    pub status: String,
    pub favorite_sports: Vec<String>,
    pub favorite_teams: Vec<i32>,
    pub favorite_players: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
