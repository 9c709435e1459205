use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::json;

use crate::database::content;
use crate::database::models::{ContentPage, Faq};
use crate::error::ApiError;
use crate::middleware::json::AppJson;
use crate::middleware::response::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FaqListParams {
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PageListParams {
    pub page_type: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub order: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFaqRequest {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub order: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePageRequest {
    pub page_type: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePageRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

async fn faq_or_404(pool: &sqlx::PgPool, faq_id: i32) -> Result<Faq, ApiError> {
    content::faq_find(pool, faq_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("FAQ with ID {} not found", faq_id)))
}

async fn page_or_404(pool: &sqlx::PgPool, page_id: i32) -> Result<ContentPage, ApiError> {
    content::page_find(pool, page_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Content page with ID {} not found", page_id)))
}

/// GET /api/content/faqs - ordered by display position
pub async fn faq_list(
    State(state): State<AppState>,
    Query(params): Query<FaqListParams>,
) -> ApiResult<Vec<Faq>> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(
        content::faq_list(&pool, params.is_published).await?,
    ))
}

/// GET /api/content/faqs/:id
pub async fn faq_get(State(state): State<AppState>, Path(faq_id): Path<i32>) -> ApiResult<Faq> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(faq_or_404(&pool, faq_id).await?))
}

/// POST /api/content/faqs
pub async fn faq_create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateFaqRequest>,
) -> ApiResult<Faq> {
    let question = match &payload.question {
        Some(q) if !q.is_empty() => q,
        _ => return Err(ApiError::missing_field("question")),
    };
    let answer = match &payload.answer {
        Some(a) if !a.is_empty() => a,
        _ => return Err(ApiError::missing_field("answer")),
    };

    let pool = state.pool().await?;
    let faq = content::faq_create(
        &pool,
        question,
        answer,
        payload.order.unwrap_or(0),
        payload.is_published.unwrap_or(true),
    )
    .await?;

    Ok(ApiResponse::created(faq))
}

/// PUT and PATCH /api/content/faqs/:id share the same partial semantics
pub async fn faq_update(
    State(state): State<AppState>,
    Path(faq_id): Path<i32>,
    AppJson(payload): AppJson<UpdateFaqRequest>,
) -> ApiResult<Faq> {
    let pool = state.pool().await?;
    faq_or_404(&pool, faq_id).await?;

    let faq = content::faq_update(
        &pool,
        faq_id,
        content::FaqChanges {
            question: payload.question,
            answer: payload.answer,
            order: payload.order,
            is_published: payload.is_published,
        },
    )
    .await?;

    Ok(ApiResponse::success(faq))
}

/// DELETE /api/content/faqs/:id
pub async fn faq_delete(
    State(state): State<AppState>,
    Path(faq_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;
    faq_or_404(&pool, faq_id).await?;

    content::faq_delete(&pool, faq_id).await?;

    Ok(ApiResponse::success(json!({
        "message": format!("FAQ with ID {} deleted successfully", faq_id)
    })))
}

/// GET /api/content/pages
pub async fn page_list(
    State(state): State<AppState>,
    Query(params): Query<PageListParams>,
) -> ApiResult<Vec<ContentPage>> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(
        content::page_list(&pool, params.page_type.as_deref()).await?,
    ))
}

/// GET /api/content/pages/:id
pub async fn page_get(
    State(state): State<AppState>,
    Path(page_id): Path<i32>,
) -> ApiResult<ContentPage> {
    let pool = state.pool().await?;
    Ok(ApiResponse::success(page_or_404(&pool, page_id).await?))
}

/// GET /api/content/pages/type/:page_type - public lookup of a published
/// page for the consumer app
pub async fn page_get_by_type(
    State(state): State<AppState>,
    Path(page_type): Path<String>,
) -> ApiResult<ContentPage> {
    let pool = state.pool().await?;
    let page = content::page_find_published_by_type(&pool, &page_type)
        .await?
        .ok_or_else(|| {
            ApiError::not_found(format!("Content page with type {} not found", page_type))
        })?;
    Ok(ApiResponse::success(page))
}

/// POST /api/content/pages - at most one page per type
pub async fn page_create(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreatePageRequest>,
) -> ApiResult<ContentPage> {
    for (field, value) in [
        ("page_type", &payload.page_type),
        ("title", &payload.title),
        ("content", &payload.content),
    ] {
        if value.as_deref().map_or(true, str::is_empty) {
            return Err(ApiError::missing_field(field));
        }
    }

    let page_type = payload.page_type.as_deref().unwrap_or_default();
    let pool = state.pool().await?;

    if content::page_type_exists(&pool, page_type).await? {
        return Err(ApiError::bad_request(format!(
            "A content page with type {} already exists",
            page_type
        )));
    }

    let page = content::page_create(
        &pool,
        page_type,
        payload.title.as_deref().unwrap_or_default(),
        payload.content.as_deref().unwrap_or_default(),
        payload.is_published.unwrap_or(true),
    )
    .await?;

    Ok(ApiResponse::created(page))
}

/// PUT and PATCH /api/content/pages/:id
pub async fn page_update(
    State(state): State<AppState>,
    Path(page_id): Path<i32>,
    AppJson(payload): AppJson<UpdatePageRequest>,
) -> ApiResult<ContentPage> {
    let pool = state.pool().await?;
    page_or_404(&pool, page_id).await?;

    let page = content::page_update(
        &pool,
        page_id,
        content::PageChanges {
            title: payload.title,
            content: payload.content,
            is_published: payload.is_published,
        },
    )
    .await?;

    Ok(ApiResponse::success(page))
}

/// DELETE /api/content/pages/:id
pub async fn page_delete(
    State(state): State<AppState>,
    Path(page_id): Path<i32>,
) -> ApiResult<serde_json::Value> {
    let pool = state.pool().await?;
    page_or_404(&pool, page_id).await?;

    content::page_delete(&pool, page_id).await?;

    Ok(ApiResponse::success(json!({
        "message": format!("Content page with ID {} deleted successfully", page_id)
    })))
}
