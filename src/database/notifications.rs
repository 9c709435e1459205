use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::database::models::Notification;

const NOTIFICATION_COLUMNS: &str = "id, title, message, destination_url, image_url, icon_url, \
     target_type, target_user_id, sent, created_at, updated_at";

pub struct NewNotification<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub destination_url: &'a str,
    pub image_url: &'a str,
    pub icon_url: &'a str,
    pub target_type: &'a str,
    pub target_user_id: Option<i32>,
    pub sent: bool,
}

#[derive(Default)]
pub struct NotificationChanges {
    pub title: Option<String>,
    pub message: Option<String>,
    pub destination_url: Option<String>,
    pub image_url: Option<String>,
    pub icon_url: Option<String>,
    pub target_type: Option<String>,
    /// Outer None leaves the column alone; Some(None) clears the target
    pub target_user_id: Option<Option<i32>>,
    pub sent: Option<bool>,
}

pub async fn list(
    pool: &PgPool,
    target_type: Option<&str>,
    target_user_id: Option<i32>,
    sent: Option<bool>,
) -> Result<Vec<Notification>, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new(format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE 1 = 1"
    ));

    if let Some(target_type) = target_type {
        query.push(" AND target_type = ").push_bind(target_type.to_string());
    }
    if let Some(target_user_id) = target_user_id {
        query.push(" AND target_user_id = ").push_bind(target_user_id);
    }
    if let Some(sent) = sent {
        query.push(" AND sent = ").push_bind(sent);
    }
    query.push(" ORDER BY id");

    query.build_query_as::<Notification>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Notification>, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create(
    pool: &PgPool,
    new: NewNotification<'_>,
) -> Result<Notification, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        "INSERT INTO notifications \
         (title, message, destination_url, image_url, icon_url, target_type, target_user_id, sent) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {NOTIFICATION_COLUMNS}"
    ))
    .bind(new.title)
    .bind(new.message)
    .bind(new.destination_url)
    .bind(new.image_url)
    .bind(new.icon_url)
    .bind(new.target_type)
    .bind(new.target_user_id)
    .bind(new.sent)
    .fetch_one(pool)
    .await
}

pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: NotificationChanges,
) -> Result<Notification, sqlx::Error> {
    let mut query = QueryBuilder::<Postgres>::new("UPDATE notifications SET updated_at = now()");

    if let Some(title) = &changes.title {
        query.push(", title = ").push_bind(title);
    }
    if let Some(message) = &changes.message {
        query.push(", message = ").push_bind(message);
    }
    if let Some(destination_url) = &changes.destination_url {
        query.push(", destination_url = ").push_bind(destination_url);
    }
    if let Some(image_url) = &changes.image_url {
        query.push(", image_url = ").push_bind(image_url);
    }
    if let Some(icon_url) = &changes.icon_url {
        query.push(", icon_url = ").push_bind(icon_url);
    }
    if let Some(target_type) = &changes.target_type {
        query.push(", target_type = ").push_bind(target_type);
    }
    if let Some(target_user_id) = changes.target_user_id {
        query.push(", target_user_id = ").push_bind(target_user_id);
    }
    if let Some(sent) = changes.sent {
        query.push(", sent = ").push_bind(sent);
    }

    query.push(" WHERE id = ").push_bind(id);
    query.push(format!(" RETURNING {NOTIFICATION_COLUMNS}"));

    query.build_query_as::<Notification>().fetch_one(pool).await
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notifications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn mark_sent(pool: &PgPool, id: i32) -> Result<Notification, sqlx::Error> {
    sqlx::query_as::<_, Notification>(&format!(
        "UPDATE notifications SET sent = true, updated_at = now() \
         WHERE id = $1 RETURNING {NOTIFICATION_COLUMNS}"
    ))
    .bind(id)
    .fetch_one(pool)
    .await
}
