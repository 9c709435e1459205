use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::auth::permission::Permission;
use crate::database::models::Role;
use crate::database::{admins, roles};
use crate::error::ApiError;
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

use super::{PageParams, Pagination};

#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentRequest {
    pub admin_id: Option<i32>,
    pub role_id: Option<i32>,
}

/// The permission tag set is closed; reject anything outside it
fn validate_tags(tags: &[String]) -> Result<(), ApiError> {
    let invalid: Vec<&str> = tags
        .iter()
        .filter(|tag| Permission::from_tag(tag).is_none())
        .map(String::as_str)
        .collect();

    if invalid.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(
            "Unknown permission tags",
            json!({ "invalid_tags": invalid }),
        ))
    }
}

async fn role_or_404(pool: &sqlx::PgPool, role_id: i32) -> Result<Role, ApiError> {
    roles::find_by_id(pool, role_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Role with ID {} not found", role_id)))
}

/// GET /api/roles - paginated role listing
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;

    let total = roles::count(&pool).await?;
    let roles = roles::list(&pool, params.limit(), params.offset()).await?;

    Ok(ApiResponse::success(json!({
        "roles": roles,
        "pagination": Pagination::new(total, params),
    })))
}

/// GET /api/roles/:id
pub async fn get(State(state): State<AppState>, Path(role_id): Path<i32>) -> ApiResult<Role> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(role_or_404(&pool, role_id).await?))
}

/// POST /api/roles
pub async fn create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateRoleRequest>,
) -> ApiResult<Role> {
    let name = match &payload.name {
        Some(name) if !name.is_empty() => name,
        _ => return Err(ApiError::bad_request("Role name is required")),
    };

    let permissions = payload.permissions.unwrap_or_default();
    validate_tags(&permissions)?;

    let pool = state.pool().await?;

    if roles::name_exists(&pool, name, None).await? {
        return Err(ApiError::bad_request(format!(
            "Role with name '{}' already exists",
            name
        )));
    }

    let role = roles::create(
        &pool,
        name,
        payload.description.as_deref().unwrap_or_default(),
        &permissions,
    )
    .await?;

    tracing::info!("Created role {}", role.name);
    Ok(ApiResponse::success(role))
}

/// PUT /api/roles/:id
pub async fn update(
    State(state): State<AppState>,
    Path(role_id): Path<i32>,
    AppJson(payload): AppJson<UpdateRoleRequest>,
) -> ApiResult<Role> {
    let pool = state.pool().await?;
    role_or_404(&pool, role_id).await?;

    if let Some(name) = &payload.name {
        if roles::name_exists(&pool, name, Some(role_id)).await? {
            return Err(ApiError::bad_request(format!(
                "Role with name '{}' already exists",
                name
            )));
        }
    }
    if let Some(permissions) = &payload.permissions {
        validate_tags(permissions)?;
    }

    let role = roles::update(
        &pool,
        role_id,
        roles::RoleChanges {
            name: payload.name,
            description: payload.description,
            permissions: payload.permissions,
        },
    )
    .await?;

    Ok(ApiResponse::success(role))
}

/// DELETE /api/roles/:id - refused while any admin still holds the role
pub async fn delete(
    State(state): State<AppState>,
    Path(role_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;
    let role = role_or_404(&pool, role_id).await?;

    if roles::assigned_admin_count(&pool, role_id).await? > 0 {
        return Err(ApiError::bad_request(
            "Cannot delete role that is assigned to administrators",
        ));
    }

    roles::delete(&pool, role_id).await?;

    Ok(ApiResponse::success(json!({
        "message": format!("Role '{}' deleted successfully", role.name)
    })))
}

/// GET /api/roles/permissions - the closed permission catalog
pub async fn permissions() -> ApiResult<serde_json::Value> {
    let catalog: Vec<_> = Permission::CATALOG
        .iter()
        .map(|(tag, name)| json!({ "id": tag, "name": name }))
        .collect();

    Ok(ApiResponse::success(json!(catalog)))
}

/// GET /api/roles/admin-assignments - admins with their assigned roles
pub async fn admin_assignments(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;

    let total = admins::count(&pool).await?;
    let accounts = admins::list(&pool, params.limit(), params.offset()).await?;

    let mut assignments = Vec::with_capacity(accounts.len());
    for account in accounts {
        assignments.push(admins::view(&pool, account).await?);
    }

    Ok(ApiResponse::success(json!({
        "assignments": assignments,
        "pagination": Pagination::new(total, params),
    })))
}

/// POST /api/roles/assign
pub async fn assign(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignmentRequest>,
) -> ApiResult<serde_json::Value> {
    let (admin_id, role_id) = match (payload.admin_id, payload.role_id) {
        (Some(a), Some(r)) => (a, r),
        _ => return Err(ApiError::bad_request("Admin ID and role ID are required")),
    };

    let pool = state.pool().await?;

    let account = admins::find_by_id(&pool, admin_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Admin with ID {} not found", admin_id)))?;
    let role = role_or_404(&pool, role_id).await?;

    if admins::has_role(&pool, admin_id, role_id).await? {
        return Err(ApiError::bad_request(format!(
            "Admin already has the role '{}'",
            role.name
        )));
    }

    admins::assign_role(&pool, admin_id, role_id).await?;
    let message = format!(
        "Role '{}' assigned to admin '{}' successfully",
        role.name, account.name
    );
    let view = admins::view(&pool, account).await?;

    Ok(ApiResponse::success(json!({
        "message": message,
        "admin": view,
    })))
}

/// POST /api/roles/unassign
pub async fn unassign(
    State(state): State<AppState>,
    AppJson(payload): AppJson<AssignmentRequest>,
) -> ApiResult<serde_json::Value> {
    let (admin_id, role_id) = match (payload.admin_id, payload.role_id) {
        (Some(a), Some(r)) => (a, r),
        _ => return Err(ApiError::bad_request("Admin ID and role ID are required")),
    };

    let pool = state.pool().await?;

    let account = admins::find_by_id(&pool, admin_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Admin with ID {} not found", admin_id)))?;
    let role = role_or_404(&pool, role_id).await?;

    if !admins::has_role(&pool, admin_id, role_id).await? {
        return Err(ApiError::bad_request(format!(
            "Admin does not have the role '{}'",
            role.name
        )));
    }

    admins::unassign_role(&pool, admin_id, role_id).await?;
    let message = format!(
        "Role '{}' removed from admin '{}' successfully",
        role.name, account.name
    );
    let view = admins::view(&pool, account).await?;

    Ok(ApiResponse::success(json!({
        "message": message,
        "admin": view,
    })))
}
