use sqlx::Row;

use crate::{api::error::ApiResult, database::Database, models::AuditEntry};

impl Database {
    pub async fn append_audit_entry(&self, entry: &AuditEntry) -> ApiResult<()> {
        sqlx::query(
            "INSERT INTO audit_log (id, action, resource_type, resource_id, new_values, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&entry.id)
        .bind(&entry.action)
        .bind(&entry.resource_type)
        .bind(&entry.resource_id)
        .bind(entry.new_values.to_string())
        .bind(&entry.created_at)
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn list_audit_entries_for_resource(
        &self,
        resource_type: &str,
        resource_id: &str,
    ) -> ApiResult<Vec<AuditEntry>> {
        let rows = sqlx::query(
            "SELECT id, action, resource_type, resource_id, new_values, created_at
             FROM audit_log
             WHERE resource_type = ? AND resource_id = ?
             ORDER BY created_at ASC",
        )
        .bind(resource_type)
        .bind(resource_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|row| {
                let new_values: String = row.try_get("new_values")?;
                Ok(AuditEntry {
                    id: row.try_get("id")?,
                    action: row.try_get("action")?,
                    resource_type: row.try_get("resource_type")?,
                    resource_id: row.try_get("resource_id")?,
                    new_values: serde_json::from_str(&new_values)
                        .unwrap_or(serde_json::Value::Null),
                    created_at: row.try_get("created_at")?,
                })
            })
            .collect()
    }
}
