use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Faq {
    pub id: i32,
    pub question: String,
    pub answer: String,
    /// Display position on the FAQ page
    pub order: i32,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Single-instance page such as the privacy policy or terms & conditions.
/// At most one page exists per page_type.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentPage {
    pub id: i32,
    pub page_type: String,
    pub title: String,
    pub content: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
