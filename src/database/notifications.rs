use sqlx::{any::AnyRow, Row};

use crate::{
    api::error::ApiResult,
    database::Database,
    models::{Channel, Notification, NotificationStatus},
};

fn notification_from_row(row: &AnyRow) -> ApiResult<Notification> {
    let content: String = row.try_get("content")?;

    Ok(Notification {
        id: row.try_get("id")?,
        alert_id: row.try_get("alert_id")?,
        user_id: row.try_get("user_id")?,
        channel: Channel::from(row.try_get::<String, _>("channel")?),
        content: serde_json::from_str(&content).unwrap_or(serde_json::Value::Null),
        response_url: row.try_get("response_url")?,
        status: NotificationStatus::from(row.try_get::<String, _>("status")?),
        sent_at: row.try_get("sent_at")?,
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn create_notification(&self, notification: &Notification) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO notifications (id, alert_id, user_id, channel, content, response_url,
                                        status, sent_at, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&notification.id)
        .bind(&notification.alert_id)
        .bind(&notification.user_id)
        .bind(notification.channel.as_str())
        .bind(notification.content.to_string())
        .bind(&notification.response_url)
        .bind(notification.status.as_str())
        .bind(&notification.sent_at)
        .bind(&notification.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn list_notifications_for_alert(&self, alert_id: &str) -> ApiResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, alert_id, user_id, channel, content, response_url, status, sent_at, created_at
             FROM notifications
             WHERE alert_id = ?",
        )
        .bind(alert_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(notification_from_row).collect()
    }

    /// In-app inbox read path: a user's notifications, newest first.
    pub async fn list_notifications_for_user(
        &self,
        user_id: &str,
        limit: i64,
        offset: i64,
    ) -> ApiResult<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT id, alert_id, user_id, channel, content, response_url, status, sent_at, created_at
             FROM notifications
             WHERE user_id = ?
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?",
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(notification_from_row).collect()
    }

    /// Flips every PENDING notification for an alert to SENT. Returns the
    /// number of rows transitioned.
    pub async fn mark_alert_notifications_sent(
        &self,
        alert_id: &str,
        sent_at: &str,
    ) -> ApiResult<i64> {
        let result = sqlx::query(
            "UPDATE notifications
             SET status = 'SENT', sent_at = ?
             WHERE alert_id = ? AND status = 'PENDING'",
        )
        .bind(sent_at)
        .bind(alert_id)
        .execute(self.pool())
        .await?;

        Ok(result.rows_affected() as i64)
    }
}
