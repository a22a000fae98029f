//! Database operations for feedback messages
//!
//! Anonymous messages carry no sender information, only the recipient and
//! the text. Every query is scoped by `recipient_id`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Stored anonymous message
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub recipient_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(recipient_id: Uuid, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_id,
            content: content.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Store a new message for a recipient
pub async fn insert_message(
    pool: &PgPool,
    recipient_id: Uuid,
    content: &str,
) -> Result<Message, sqlx::Error> {
    let message = Message::new(recipient_id, content);

    sqlx::query(
        r#"
        INSERT INTO messages (id, recipient_id, content, created_at)
        VALUES ($1, $2, $3, $4)
        "#
    )
    .bind(message.id)
    .bind(message.recipient_id)
    .bind(&message.content)
    .bind(message.created_at)
    .execute(pool)
    .await?;

    Ok(message)
}

/// Get all messages for a recipient, newest first
pub async fn get_messages_for_recipient(
    pool: &PgPool,
    recipient_id: Uuid,
) -> Result<Vec<Message>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, recipient_id, content, created_at
        FROM messages
        WHERE recipient_id = $1
        ORDER BY created_at DESC
        "#
    )
    .bind(recipient_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| Message {
            id: row.get("id"),
            recipient_id: row.get("recipient_id"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        })
        .collect())
}

/// Count messages for a recipient
pub async fn count_messages_for_recipient(
    pool: &PgPool,
    recipient_id: Uuid,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) AS count FROM messages WHERE recipient_id = $1")
        .bind(recipient_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get("count"))
}

/// Delete a message if it belongs to the recipient
pub async fn delete_message_for_recipient(
    pool: &PgPool,
    recipient_id: Uuid,
    message_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM messages WHERE id = $1 AND recipient_id = $2")
        .bind(message_id)
        .bind(recipient_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}
