use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::{ContentPage, Faq};

// "order" is reserved in SQL, so it stays quoted throughout
const FAQ_COLUMNS: &str = r#"id, question, answer, "order", is_published, created_at, updated_at"#;

const PAGE_COLUMNS: &str = "id, page_type, title, content, is_published, created_at, updated_at";

#[derive(Default)]
pub struct FaqChanges {
    pub question: Option<String>,
    pub answer: Option<String>,
    pub order: Option<i32>,
    pub is_published: Option<bool>,
}

#[derive(Default)]
pub struct PageChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_published: Option<bool>,
}

pub async fn faq_list(
    pool: &PgPool,
    is_published: Option<bool>,
) -> Result<Vec<Faq>, sqlx::Error> {
    let mut query =
        QueryBuilder::<Postgres>::new(format!("SELECT {FAQ_COLUMNS} FROM faqs"));

    if let Some(is_published) = is_published {
        query.push(" WHERE is_published = ").push_bind(is_published);
    }
    query.push(r#" ORDER BY "order""#);

    query.build_query_as::<Faq>().fetch_all(pool).await
}

pub async fn faq_find(pool: &PgPool, id: i32) -> Result<Option<Faq>, sqlx::Error> {
    sqlx::query_as::<_, Faq>(&format!("SELECT {FAQ_COLUMNS} FROM faqs WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn faq_create(
    pool: &PgPool,
    question: &str,
    answer: &str,
    order: i32,
    is_published: bool,
) -> Result<Faq, sqlx::Error> {
    sqlx::query_as::<_, Faq>(&format!(
        r#"INSERT INTO faqs (question, answer, "order", is_published) VALUES ($1, $2, $3, $4) RETURNING {FAQ_COLUMNS}"#
    ))
    .bind(question)
    .bind(answer)
    .bind(order)
    .bind(is_published)
    .fetch_one(pool)
    .await
}

pub async fn faq_update(pool: &PgPool, id: i32, changes: FaqChanges) -> Result<Faq, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE faqs SET updated_at = now()");

    if let Some(question) = &changes.question {
        query.push(", question = ").push_bind(question);
    }
    if let Some(answer) = &changes.answer {
        query.push(", answer = ").push_bind(answer);
    }
    if let Some(order) = changes.order {
        query.push(r#", "order" = "#).push_bind(order);
    }
    if let Some(is_published) = changes.is_published {
        query.push(", is_published = ").push_bind(is_published);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(format!(" RETURNING {FAQ_COLUMNS}"));

    query.build_query_as::<Faq>().fetch_one(pool).await
}

pub async fn faq_delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM faqs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn page_list(
    pool: &PgPool,
    page_type: Option<&str>,
) -> Result<Vec<ContentPage>, sqlx::Error> {
    let mut query =
        QueryBuilder::<Postgres>::new(format!("SELECT {PAGE_COLUMNS} FROM content_pages"));

    if let Some(page_type) = page_type {
        query.push(" WHERE page_type = ").push_bind(page_type);
    }
    query.push(" ORDER BY id");

    query.build_query_as::<ContentPage>().fetch_all(pool).await
}

pub async fn page_find(pool: &PgPool, id: i32) -> Result<Option<ContentPage>, sqlx::Error> {
    sqlx::query_as::<_, ContentPage>(&format!(
        "SELECT {PAGE_COLUMNS} FROM content_pages WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Published page lookup used by the consumer app
pub async fn page_find_published_by_type(
    pool: &PgPool,
    page_type: &str,
) -> Result<Option<ContentPage>, sqlx::Error> {
    sqlx::query_as::<_, ContentPage>(&format!(
        "SELECT {PAGE_COLUMNS} FROM content_pages WHERE page_type = $1 AND is_published = true"
    ))
    .bind(page_type)
    .fetch_optional(pool)
    .await
}

pub async fn page_type_exists(pool: &PgPool, page_type: &str) -> Result<bool, sqlx::Error> {
    let count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM content_pages WHERE page_type = $1")
            .bind(page_type)
            .fetch_one(pool)
            .await?;
    Ok(count > 0)
}

pub async fn page_create(
    pool: &PgPool,
    page_type: &str,
    title: &str,
    content: &str,
    is_published: bool,
) -> Result<ContentPage, sqlx::Error> {
    sqlx::query_as::<_, ContentPage>(&format!(
        "INSERT INTO content_pages (page_type, title, content, is_published) \
         VALUES ($1, $2, $3, $4) RETURNING {PAGE_COLUMNS}"
    ))
    .bind(page_type)
    .bind(title)
    .bind(content)
    .bind(is_published)
    .fetch_one(pool)
    .await
}

pub async fn page_update(
    pool: &PgPool,
    id: i32,
    changes: PageChanges,
) -> Result<ContentPage, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE content_pages SET updated_at = now()");

    if let Some(title) = &changes.title {
        query.push(", title = ").push_bind(title);
    }
    if let Some(content) = &changes.content {
        query.push(", content = ").push_bind(content);
    }
    if let Some(is_published) = changes.is_published {
        query.push(", is_published = ").push_bind(is_published);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(format!(" RETURNING {PAGE_COLUMNS}"));

    query.build_query_as::<ContentPage>().fetch_one(pool).await
}

pub async fn page_delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM content_pages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
