use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::Role;

const ROLE_COLUMNS: &str = "id, name, description, permissions, created_at, updated_at";

#[derive(Default)]
pub struct RoleChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(&format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn name_exists(
    pool: &PgPool,
    name: &str,
    exclude_id: Option<i32>,
) -> Result<bool, sqlx::Error> {
    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM roles WHERE name = $1")
        .bind(name)
        .fetch_optional(pool)
        .await?;
    Ok(matches!(existing, Some(id) if Some(id) != exclude_id))
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles")
        .fetch_one(pool)
        .await
}

pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(&format!(
        "SELECT {ROLE_COLUMNS} FROM roles ORDER BY name LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    name: &str,
    description: &str,
    permissions: &[String],
) -> Result<Role, sqlx::Error> {
    sqlx::query_as::<_, Role>(&format!(
        "INSERT INTO roles (name, description, permissions) \
         VALUES ($1, $2, $3) RETURNING {ROLE_COLUMNS}"
    ))
    .bind(name)
    .bind(description)
    .bind(permissions)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: i32, changes: RoleChanges) -> Result<Role, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE roles SET updated_at = now()");

    if let Some(name) = &changes.name {
        query.push(", name = ").push_bind(name);
    }
    if let Some(description) = &changes.description {
        query.push(", description = ").push_bind(description);
    }
    if let Some(permissions) = &changes.permissions {
        query.push(", permissions = ").push_bind(permissions);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(format!(" RETURNING {ROLE_COLUMNS}"));

    query.build_query_as::<Role>().fetch_one(pool).await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM roles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// How many admins currently hold this role; deletion is refused while > 0
pub async fn assigned_admin_count(pool: &PgPool, role_id: i32) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin_roles WHERE role_id = $1")
        .bind(role_id)
        .fetch_one(pool)
        .await
}
