use serde::Serialize;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::database::models::Reel;

const REEL_COLUMNS: &str = "id, player_id, title, thumbnail_url, video_url, duration, \
     view_count, created_at, updated_at";

/// One row of the manage-reels digest: player joined with team and league
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReelManageRow {
    pub player_id: i32,
    pub player_name: String,
    pub player_image: String,
    pub team_name: String,
    pub team_logo: String,
    pub league_name: String,
    pub league_logo: String,
}

pub async fn list(
    pool: &PgPool,
    player_id: Option<i32>,
    limit: i64,
) -> Result<Vec<Reel>, sqlx::Error> {
    let mut query =
        QueryBuilder::<Postgres>::new(format!("SELECT {REEL_COLUMNS} FROM reels"));

    if let Some(player_id) = player_id {
        query.push(" WHERE player_id = ").push_bind(player_id);
    }
    query.push(" ORDER BY id LIMIT ").push_bind(limit);

    query.build_query_as::<Reel>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Reel>, sqlx::Error> {
    sqlx::query_as::<_, Reel>(&format!("SELECT {REEL_COLUMNS} FROM reels WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn for_player(pool: &PgPool, player_id: i32) -> Result<Vec<Reel>, sqlx::Error> {
    sqlx::query_as::<_, Reel>(&format!(
        "SELECT {REEL_COLUMNS} FROM reels WHERE player_id = $1 ORDER BY id"
    ))
    .bind(player_id)
    .fetch_all(pool)
    .await
}

pub async fn popular(pool: &PgPool, limit: i64) -> Result<Vec<Reel>, sqlx::Error> {
    sqlx::query_as::<_, Reel>(&format!(
        "SELECT {REEL_COLUMNS} FROM reels ORDER BY view_count DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}

/// Digest for the manage-reels page: one row per player with team and
/// league branding
pub async fn manage_digest(pool: &PgPool) -> Result<Vec<ReelManageRow>, sqlx::Error> {
    sqlx::query_as::<_, ReelManageRow>(
        "SELECT p.id AS player_id, p.name AS player_name, p.profile_image AS player_image, \
                t.name AS team_name, t.logo_url AS team_logo, \
                l.name AS league_name, l.logo_url AS league_logo \
         FROM players p \
         JOIN teams t ON t.id = p.team_id \
         JOIN leagues l ON l.id = p.league_id \
         ORDER BY p.id",
    )
    .fetch_all(pool)
    .await
}
