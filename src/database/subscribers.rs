use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::Subscriber;

const SUBSCRIBER_COLUMNS: &str =
    "id, email, name, subscription_type, start_date, end_date, status, created_at, updated_at";

pub struct NewSubscriber<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub subscription_type: &'a str,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: &'a str,
}

#[derive(Default)]
pub struct SubscriberChanges {
    pub email: Option<String>,
    pub name: Option<String>,
    pub subscription_type: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscriberStats {
    pub total: i64,
    pub monthly: i64,
    pub yearly: i64,
}

fn push_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    subscription_type: Option<&str>,
    status: Option<&str>,
) {
    if let Some(subscription_type) = subscription_type {
        query
            .push(" AND subscription_type = ")
            .push_bind(subscription_type.to_string());
    }
    if let Some(status) = status {
        query.push(" AND status = ").push_bind(status.to_string());
    }
}

pub async fn count(
    pool: &PgPool,
    subscription_type: Option<&str>,
    status: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let mut query =
        QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM subscribers WHERE 1 = 1");
    push_filters(&mut query, subscription_type, status);

    query
        .build_query_scalar::<i64>()
        .fetch_one(pool)
        .await
}

pub async fn list(
    pool: &PgPool,
    subscription_type: Option<&str>,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<Subscriber>, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE 1 = 1"
    ));
    push_filters(&mut query, subscription_type, status);
    query.push(" ORDER BY id LIMIT ").push_bind(limit);
    query.push(" OFFSET ").push_bind(offset);

    query.build_query_as::<Subscriber>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Subscriber>, sqlx::Error> {
    sqlx::query_as::<_, Subscriber>(&format!(
        "SELECT {SUBSCRIBER_COLUMNS} FROM subscribers WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(pool: &PgPool, new: NewSubscriber<'_>) -> Result<Subscriber, sqlx::Error> {
    sqlx::query_as::<_, Subscriber>(&format!(
        "INSERT INTO subscribers (email, name, subscription_type, start_date, end_date, status) \
         VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SUBSCRIBER_COLUMNS}"
    ))
    .bind(new.email)
    .bind(new.name)
    .bind(new.subscription_type)
    .bind(new.start_date)
    .bind(new.end_date)
    .bind(new.status)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: SubscriberChanges,
) -> Result<Subscriber, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE subscribers SET updated_at = now()");

    if let Some(email) = &changes.email {
        query.push(", email = ").push_bind(email);
    }
    if let Some(name) = &changes.name {
        query.push(", name = ").push_bind(name);
    }
    if let Some(subscription_type) = &changes.subscription_type {
        query.push(", subscription_type = ").push_bind(subscription_type);
    }
    if let Some(start_date) = changes.start_date {
        query.push(", start_date = ").push_bind(start_date);
    }
    if let Some(end_date) = changes.end_date {
        query.push(", end_date = ").push_bind(end_date);
    }
    if let Some(status) = &changes.status {
        query.push(", status = ").push_bind(status);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(format!(" RETURNING {SUBSCRIBER_COLUMNS}"));

    query.build_query_as::<Subscriber>().fetch_one(pool).await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM subscribers WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn stats(pool: &PgPool) -> Result<SubscriberStats, sqlx::Error> {
    let (total, monthly, yearly) = sqlx::query_as::<_, (i64, i64, i64)>(
        "SELECT COUNT(*), \
                COUNT(*) FILTER (WHERE subscription_type = 'monthly' AND status = 'active'), \
                COUNT(*) FILTER (WHERE subscription_type = 'yearly' AND status = 'active') \
         FROM subscribers",
    )
    .fetch_one(pool)
    .await?;

    Ok(SubscriberStats {
        total,
        monthly,
        yearly,
    })
}
