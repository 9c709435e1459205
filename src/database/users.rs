use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::User;

const USER_COLUMNS: &str = "id, uuid, email, username, full_name, profile_image, bio, role, \
     password_hash, registration_date, last_login, status, favorite_sports, favorite_teams, \
     favorite_players, created_at, updated_at";

pub struct NewUser<'a> {
    pub uuid: &'a str,
    pub email: &'a str,
    pub username: &'a str,
    pub full_name: &'a str,
    pub profile_image: &'a str,
    pub bio: &'a str,
    pub role: &'a str,
    pub password_hash: Option<&'a str>,
    pub status: &'a str,
}

#[derive(Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub profile_image: Option<String>,
    pub bio: Option<String>,
    pub status: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserStats {
    pub total_users: i64,
    pub active_users: i64,
    pub inactive_users: i64,
    pub suspended_users: i64,
    pub recent_registrations: i64,
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_uuid(pool: &PgPool, uuid: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE uuid = $1"))
        .bind(uuid)
        .fetch_optional(pool)
        .await
}

/// Username-or-email lookup used by the login flow
pub async fn find_by_identity(pool: &PgPool, identity: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = $1 OR email = $1"
    ))
    .bind(identity)
    .fetch_optional(pool)
    .await
}

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn list(pool: &PgPool, status: Option<&str>) -> Result<Vec<User>, sqlx::Error> {
    let mut query =
        QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));

    if let Some(status) = status {
        query.push(" WHERE status = ").push_bind(status);
    }
    query.push(" ORDER BY id");

    query.build_query_as::<User>().fetch_all(pool).await
}

pub async fn create(pool: &PgPool, new: NewUser<'_>) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users \
         (uuid, email, username, full_name, profile_image, bio, role, password_hash, \
          registration_date, last_login, status, favorite_sports, favorite_teams, favorite_players) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), now(), $9, '{{}}', '{{}}', '{{}}') \
         RETURNING {USER_COLUMNS}"
    ))
    .bind(new.uuid)
    .bind(new.email)
    .bind(new.username)
    .bind(new.full_name)
    .bind(new.profile_image)
    .bind(new.bio)
    .bind(new.role)
    .bind(new.password_hash)
    .bind(new.status)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i32, changes: UserChanges) -> Result<User, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");

    if let Some(email) = &changes.email {
        query.push(", email = ").push_bind(email);
    }
    if let Some(username) = &changes.username {
        query.push(", username = ").push_bind(username);
    }
    if let Some(full_name) = &changes.full_name {
        query.push(", full_name = ").push_bind(full_name);
    }
    if let Some(profile_image) = &changes.profile_image {
        query.push(", profile_image = ").push_bind(profile_image);
    }
    if let Some(bio) = &changes.bio {
        query.push(", bio = ").push_bind(bio);
    }
    if let Some(status) = &changes.status {
        query.push(", status = ").push_bind(status);
    }
    if let Some(role) = &changes.role {
        query.push(", role = ").push_bind(role);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(format!(" RETURNING {USER_COLUMNS}"));

    query.build_query_as::<User>().fetch_one(pool).await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn touch_last_login(pool: &PgPool, id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET last_login = now() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_password(
    pool: &PgPool,
    id: i32,
    password_hash: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET password_hash = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

/// Replace the stored favorite sets wholesale; repeating the same payload
/// leaves the row unchanged
pub async fn update_favorites(
    pool: &PgPool,
    id: i32,
    sports: &[String],
    teams: &[i32],
    players: &[i32],
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET favorite_sports = $2, favorite_teams = $3, favorite_players = $4, \
         updated_at = now() WHERE id = $1 RETURNING {USER_COLUMNS}"
    ))
    .bind(id)
    .bind(sports)
    .bind(teams)
    .bind(players)
    .fetch_one(pool)
    .await
}

pub async fn stats(pool: &PgPool) -> Result<UserStats, sqlx::Error> {
    let (total, active, inactive, suspended, recent) = sqlx::query_as::<_, (i64, i64, i64, i64, i64)>(
        "SELECT COUNT(*), \
                COUNT(*) FILTER (WHERE status = 'active'), \
                COUNT(*) FILTER (WHERE status = 'inactive'), \
                COUNT(*) FILTER (WHERE status = 'suspended'), \
                COUNT(*) FILTER (WHERE registration_date >= now() - interval '30 days') \
         FROM users",
    )
    .fetch_one(pool)
    .await?;

    Ok(UserStats {
        total_users: total,
        active_users: active,
        inactive_users: inactive,
        suspended_users: suspended,
        recent_registrations: recent,
    })
}
