use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::Player;

const PLAYER_COLUMNS: &str = "id, name, team_id, league_id, position, jersey_number, \
     profile_image, dob, college, height_weight, bat_throw, experience, birthplace, status, \
     created_at, updated_at";

pub async fn list(
    pool: &PgPool,
    league_id: Option<i32>,
    team_id: Option<i32>,
    status: Option<&str>,
) -> Result<Vec<Player>, sqlx::Error> {
    let mut query =
        QueryBuilder::<Postgres>::new(format!("SELECT {PLAYER_COLUMNS} FROM players WHERE 1 = 1"));

    if let Some(league_id) = league_id {
        query.push(" AND league_id = ").push_bind(league_id);
    }
    if let Some(team_id) = team_id {
        query.push(" AND team_id = ").push_bind(team_id);
    }
    if let Some(status) = status {
        query.push(" AND lower(status) = lower(").push_bind(status).push(")");
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Player>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn popular(pool: &PgPool, limit: i64) -> Result<Vec<Player>, sqlx::Error> {
    sqlx::query_as::<_, Player>(&format!(
        "SELECT {PLAYER_COLUMNS} FROM players ORDER BY id DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}
