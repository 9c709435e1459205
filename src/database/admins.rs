use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::{AdminAccount, AdminView, Role};

const ADMIN_COLUMNS: &str =
    "id, username, email, name, password_hash, is_active, last_login, created_at, updated_at";

const ROLE_COLUMNS: &str = "id, name, description, permissions, created_at, updated_at";

pub struct NewAdmin<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
}

/// Field-level changes for an admin update; `None` leaves the column alone
#[derive(Default)]
pub struct AdminChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<AdminAccount>, sqlx::Error> {
    sqlx::query_as::<_, AdminAccount>(&format!(
        "SELECT {ADMIN_COLUMNS} FROM admins WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Look up by username or email in one pass; login accepts either
pub async fn find_by_identity(
    pool: &PgPool,
    identity: &str,
) -> Result<Option<AdminAccount>, sqlx::Error> {
    sqlx::query_as::<_, AdminAccount>(&format!(
        "SELECT {ADMIN_COLUMNS} FROM admins WHERE username = $1 OR email = $1"
    ))
    .bind(identity)
    .fetch_optional(pool)
    .await
}

pub async fn roles_for(pool: &PgPool, admin_id: i32) -> Result<Vec<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(&format!(
        "SELECT r.{} FROM roles r \
         JOIN admin_roles ar ON ar.role_id = r.id \
         WHERE ar.admin_id = $1 ORDER BY r.name",
        ROLE_COLUMNS.replace(", ", ", r.")
    ))
    .bind(admin_id)
    .fetch_all(pool)
    .await
}

/// Account plus assigned roles, the unit the auth gate works with
pub async fn find_with_roles(
    pool: &PgPool,
    id: i32,
) -> Result<Option<(AdminAccount, Vec<Role>)>, sqlx::Error> {
    let Some(account) = find_by_id(pool, id).await? else {
        return Ok(None);
    };
    let roles = roles_for(pool, account.id).await?;
    Ok(Some((account, roles)))
}

pub async fn view(pool: &PgPool, account: AdminAccount) -> Result<AdminView, sqlx::Error> {
    let roles = roles_for(pool, account.id).await?;
    Ok(AdminView { account, roles })
}

pub async fn touch_last_login(pool: &PgPool, id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE admins SET last_login = now() WHERE id = $1")
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
    sqlx::query("UPDATE admins SET password_hash = $2, updated_at = now() WHERE id = $1")
        .bind(id)
        .bind(password_hash)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await
}

pub async fn list(
    pool: &PgPool,
    limit: i64,
    offset: i64,
) -> Result<Vec<AdminAccount>, sqlx::Error> {
    sqlx::query_as::<_, AdminAccount>(&format!(
        "SELECT {ADMIN_COLUMNS} FROM admins ORDER BY name LIMIT $1 OFFSET $2"
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn username_exists(
    pool: &PgPool,
    username: &str,
    exclude_id: Option<i32>,
) -> Result<bool, sqlx::Error> {
    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM admins WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(matches!(existing, Some(id) if Some(id) != exclude_id))
}

pub async fn email_exists(
    pool: &PgPool,
    email: &str,
    exclude_id: Option<i32>,
) -> Result<bool, sqlx::Error> {
    let existing = sqlx::query_scalar::<_, i32>("SELECT id FROM admins WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(matches!(existing, Some(id) if Some(id) != exclude_id))
}

pub async fn create(pool: &PgPool, new: NewAdmin<'_>) -> Result<AdminAccount, sqlx::Error> {
    sqlx::query_as::<_, AdminAccount>(&format!(
        "INSERT INTO admins (username, email, name, password_hash, is_active) \
         VALUES ($1, $2, $3, $4, $5) RETURNING {ADMIN_COLUMNS}"
    ))
    .bind(new.username)
    .bind(new.email)
    .bind(new.name)
    .bind(new.password_hash)
    .bind(new.is_active)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: AdminChanges,
) -> Result<AdminAccount, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE admins SET updated_at = now()");

    if let Some(username) = &changes.username {
        query.push(", username = ").push_bind(username);
    }
    if let Some(email) = &changes.email {
        query.push(", email = ").push_bind(email);
    }
    if let Some(name) = &changes.name {
        query.push(", name = ").push_bind(name);
    }
    if let Some(password_hash) = &changes.password_hash {
        query.push(", password_hash = ").push_bind(password_hash);
    }
    if let Some(is_active) = changes.is_active {
        query.push(", is_active = ").push_bind(is_active);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(format!(" RETURNING {ADMIN_COLUMNS}"));

    query.build_query_as::<AdminAccount>().fetch_one(pool).await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    // Role assignments go first so the foreign key never dangles
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM admin_roles WHERE admin_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM admins WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

pub async fn toggle_status(pool: &PgPool, id: i32) -> Result<Option<AdminAccount>, sqlx::Error> {
    sqlx::query_as::<_, AdminAccount>(&format!(
        "UPDATE admins SET is_active = NOT is_active, updated_at = now() \
         WHERE id = $1 RETURNING {ADMIN_COLUMNS}"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Replace the admin's role assignments wholesale
pub async fn set_roles(pool: &PgPool, admin_id: i32, role_ids: &[i32]) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM admin_roles WHERE admin_id = $1")
        .bind(admin_id)
        .execute(&mut *tx)
        .await?;

    for role_id in role_ids {
        // Silently skip role ids that don't exist, matching create semantics
        sqlx::query(
            "INSERT INTO admin_roles (admin_id, role_id) \
             SELECT $1, id FROM roles WHERE id = $2",
        )
        .bind(admin_id)
        .bind(role_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn has_role(pool: &PgPool, admin_id: i32, role_id: i32) -> Result<bool, sqlx::Error> {
    let count = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM admin_roles WHERE admin_id = $1 AND role_id = $2",
    )
    .bind(admin_id)
    .bind(role_id)
    .fetch_one(pool)
    .await?;
    Ok(count > 0)
}

pub async fn assign_role(pool: &PgPool, admin_id: i32, role_id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO admin_roles (admin_id, role_id) VALUES ($1, $2)")
        .bind(admin_id)
        .bind(role_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn unassign_role(pool: &PgPool, admin_id: i32, role_id: i32) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM admin_roles WHERE admin_id = $1 AND role_id = $2")
        .bind(admin_id)
        .bind(role_id)
        .execute(pool)
        .await?;
    Ok(())
}
