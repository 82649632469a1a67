use sqlx::{any::AnyRow, Row};

use crate::{
    api::error::ApiResult,
    database::Database,
    models::{Alert, AlertCategory, AlertType, Severity},
};

fn alert_from_row(row: &AnyRow) -> ApiResult<Alert> {
    let details: String = row.try_get("details")?;
    let trigger_condition: String = row.try_get("trigger_condition")?;

    Ok(Alert {
        id: row.try_get("id")?,
        alert_type: AlertType::from(row.try_get::<String, _>("alert_type")?),
        category: AlertCategory::from(row.try_get::<String, _>("category")?),
        severity: Severity::from(row.try_get::<String, _>("severity")?),
        title: row.try_get("title")?,
        message: row.try_get("message")?,
        summary: row.try_get("summary")?,
        action_required: row.try_get("action_required")?,
        deadline: row.try_get("deadline")?,
        source_type: row.try_get("source_type")?,
        source_id: row.try_get("source_id")?,
        org_unit_id: row.try_get("org_unit_id")?,
        details: serde_json::from_str(&details).unwrap_or(serde_json::Value::Null),
        trigger_condition: serde_json::from_str(&trigger_condition)
            .unwrap_or(serde_json::Value::Null),
        created_at: row.try_get("created_at")?,
    })
}

impl Database {
    pub async fn create_alert(&self, alert: &Alert) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO alerts (id, alert_type, category, severity, title, message, summary,
                                 action_required, deadline, source_type, source_id, org_unit_id,
                                 details, trigger_condition, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&alert.id)
        .bind(alert.alert_type.as_str())
        .bind(alert.category.as_str())
        .bind(alert.severity.as_str())
        .bind(&alert.title)
        .bind(&alert.message)
        .bind(&alert.summary)
        .bind(&alert.action_required)
        .bind(&alert.deadline)
        .bind(&alert.source_type)
        .bind(&alert.source_id)
        .bind(&alert.org_unit_id)
        .bind(alert.details.to_string())
        .bind(alert.trigger_condition.to_string())
        .bind(&alert.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn get_alert_by_id(&self, id: &str) -> ApiResult<Option<Alert>> {
        let row = sqlx::query(
            "SELECT id, alert_type, category, severity, title, message, summary,
                    action_required, deadline, source_type, source_id, org_unit_id,
                    details, trigger_condition, created_at
             FROM alerts
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await?;

        match row {
            Some(row) => Ok(Some(alert_from_row(&row)?)),
            None => Ok(None),
        }
    }

    /// Recent alerts, newest first.
    pub async fn list_alerts(&self, limit: i64, offset: i64) -> ApiResult<Vec<Alert>> {
        let rows = sqlx::query(
            "SELECT id, alert_type, category, severity, title, message, summary,
                    action_required, deadline, source_type, source_id, org_unit_id,
                    details, trigger_condition, created_at
             FROM alerts
             ORDER BY created_at DESC
             LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool())
        .await?;

        rows.iter().map(alert_from_row).collect()
    }
}
