use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub id: i32,
    pub name: String,
    pub team_id: i32,
    pub league_id: i32,
    pub position: String,
    pub jersey_number: String,
    pub profile_image: String,
    pub dob: Option<DateTime<Utc>>,
    pub college: Option<String>,
    pub height_weight: Option<String>,
    pub bat_throw: Option<String>,
    pub experience: Option<String>,
    pub birthplace: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
