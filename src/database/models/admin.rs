use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::Role;

/// Admin-console account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AdminAccount {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// API shape for an admin: the account plus its assigned roles
#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    #[serde(flatten)]
    pub account: AdminAccount,
    pub roles: Vec<Role>,
}
