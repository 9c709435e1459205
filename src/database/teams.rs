use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::Team;

const TEAM_COLUMNS: &str = "id, name, league_id, logo_url, popularity, created_at, updated_at";

pub struct NewTeam<'a> {
    pub name: &'a str,
    pub league_id: i32,
    pub logo_url: &'a str,
    pub popularity: i32,
}

#[derive(Default)]
pub struct TeamChanges {
    pub name: Option<String>,
    pub league_id: Option<i32>,
    pub logo_url: Option<String>,
    pub popularity: Option<i32>,
}

pub async fn list(pool: &PgPool, league_id: Option<i32>) -> Result<Vec<Team>, sqlx::Error> {
    let mut query =
        QueryBuilder::<Postgres>::new(format!("SELECT {TEAM_COLUMNS} FROM teams"));

    if let Some(league_id) = league_id {
        query.push(" WHERE league_id = ").push_bind(league_id);
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Team>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, new: NewTeam<'_>) -> Result<Team, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!(
        "INSERT INTO teams (name, league_id, logo_url, popularity) \
         VALUES ($1, $2, $3, $4) RETURNING {TEAM_COLUMNS}"
    ))
    .bind(new.name)
    .bind(new.league_id)
    .bind(new.logo_url)
    .bind(new.popularity)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i32, changes: TeamChanges) -> Result<Team, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE teams SET updated_at = now()");

    if let Some(name) = &changes.name {
        query.push(", name = ").push_bind(name);
    }
    if let Some(league_id) = changes.league_id {
        query.push(", league_id = ").push_bind(league_id);
    }
    if let Some(logo_url) = &changes.logo_url {
        query.push(", logo_url = ").push_bind(logo_url);
    }
    if let Some(popularity) = changes.popularity {
        query.push(", popularity = ").push_bind(popularity);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(format!(" RETURNING {TEAM_COLUMNS}"));

    query.build_query_as::<Team>().fetch_one(pool).await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM teams WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn popular(pool: &PgPool, limit: i64) -> Result<Vec<Team>, sqlx::Error> {
    sqlx::query_as::<_, Team>(&format!(
        "SELECT {TEAM_COLUMNS} FROM teams ORDER BY popularity DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}
