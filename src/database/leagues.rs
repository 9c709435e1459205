use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::League;

const LEAGUE_COLUMNS: &str = "id, name, category, country, logo_url, popularity, founded_date, \
     headquarters, commissioner, divisions, num_teams, enabled, created_at, updated_at";

pub struct NewLeague<'a> {
    pub name: &'a str,
    pub category: &'a str,
    pub country: &'a str,
    pub logo_url: &'a str,
    pub popularity: i32,
}

#[derive(Default)]
pub struct LeagueChanges {
    pub name: Option<String>,
    pub category: Option<String>,
    pub country: Option<String>,
    pub logo_url: Option<String>,
    pub popularity: Option<i32>,
    pub headquarters: Option<String>,
    pub commissioner: Option<String>,
    pub divisions: Option<Vec<String>>,
    pub num_teams: Option<i32>,
    pub enabled: Option<bool>,
}

pub async fn list(
    pool: &PgPool,
    category: Option<&str>,
    country: Option<&str>,
) -> Result<Vec<League>, sqlx::Error> {
    let mut query =
        QueryBuilder::<Postgres>::new(format!("SELECT {LEAGUE_COLUMNS} FROM leagues WHERE 1 = 1"));

    if let Some(category) = category {
        query.push(" AND category = ").push_bind(category);
    }
    if let Some(country) = country {
        query.push(" AND country = ").push_bind(country);
    }
    query.push(" ORDER BY id");

    query.build_query_as::<League>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<League>, sqlx::Error> {
    sqlx::query_as::<_, League>(&format!(
        "SELECT {LEAGUE_COLUMNS} FROM leagues WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, new: NewLeague<'_>) -> Result<League, sqlx::Error> {
    sqlx::query_as::<_, League>(&format!(
        "INSERT INTO leagues (name, category, country, logo_url, popularity) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {LEAGUE_COLUMNS}"
    ))
    .bind(new.name)
    .bind(new.category)
    .bind(new.country)
    .bind(new.logo_url)
    .bind(new.popularity)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i32, changes: LeagueChanges) -> Result<League, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE leagues SET updated_at = now()");

    if let Some(name) = &changes.name {
        query.push(", name = ").push_bind(name);
    }
    if let Some(category) = &changes.category {
        query.push(", category = ").push_bind(category);
    }
    if let Some(country) = &changes.country {
        query.push(", country = ").push_bind(country);
    }
    if let Some(logo_url) = &changes.logo_url {
        query.push(", logo_url = ").push_bind(logo_url);
    }
    if let Some(popularity) = changes.popularity {
        query.push(", popularity = ").push_bind(popularity);
    }
    if let Some(headquarters) = &changes.headquarters {
        query.push(", headquarters = ").push_bind(headquarters);
    }
    if let Some(commissioner) = &changes.commissioner {
        query.push(", commissioner = ").push_bind(commissioner);
    }
    if let Some(divisions) = &changes.divisions {
        query.push(", divisions = ").push_bind(divisions);
    }
    if let Some(num_teams) = changes.num_teams {
        query.push(", num_teams = ").push_bind(num_teams);
    }
    if let Some(enabled) = changes.enabled {
        query.push(", enabled = ").push_bind(enabled);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(format!(" RETURNING {LEAGUE_COLUMNS}"));

    query.build_query_as::<League>().fetch_one(pool).await
}

pub async fn toggle_enabled(pool: &PgPool, id: i32) -> Result<Option<League>, sqlx::Error> {
    sqlx::query_as::<_, League>(&format!(
        "UPDATE leagues SET enabled = NOT enabled, updated_at = now() \
         WHERE id = $1 RETURNING {LEAGUE_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM leagues WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn popular(pool: &PgPool, limit: i64) -> Result<Vec<League>, sqlx::Error> {
    sqlx::query_as::<_, League>(&format!(
        "SELECT {LEAGUE_COLUMNS} FROM leagues ORDER BY popularity DESC LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await
}
