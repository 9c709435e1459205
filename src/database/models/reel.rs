use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Short highlight video attached to a player
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reel {
    pub id: i32,
    pub player_id: i32,
    pub title: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub duration: f64,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
