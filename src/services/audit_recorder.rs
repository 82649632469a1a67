use serde_json::json;

use crate::{
    api::error::ApiResult,
    database::Database,
    models::{Alert, AuditEntry, ACTION_TRIGGER_ALERT, RESOURCE_ALERT},
};

/// Appends immutable audit records for triggered alerts.
#[derive(Clone)]
pub struct AuditRecorder {
    db: Database,
}

impl AuditRecorder {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn record_alert_triggered(
        &self,
        alert: &Alert,
        recipients_notified: usize,
    ) -> ApiResult<()> {
        let entry = AuditEntry::new(
            ACTION_TRIGGER_ALERT.to_string(),
            RESOURCE_ALERT.to_string(),
            alert.id.clone(),
            json!({
                "alertType": alert.alert_type,
                "severity": alert.severity,
                "category": alert.category,
                "sourceType": alert.source_type,
                "sourceId": alert.source_id,
                "orgUnitId": alert.org_unit_id,
                "deadline": alert.deadline,
                "recipientsNotified": recipients_notified,
            }),
        );

        self.db.append_audit_entry(&entry).await
    }
}
