use serde_json::{json, Map, Value};
use time::OffsetDateTime;

use crate::{
    api::error::{ApiError, ApiResult},
    database::Database,
    models::{Alert, TriggerKind},
    services::{
        alert_catalog::AlertCatalog, audit_recorder::AuditRecorder,
        notification_dispatcher::NotificationDispatcher, recipient_resolver::RecipientResolver,
    },
};

/// One incoming domain event. Not persisted itself; it produces an Alert.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub kind: TriggerKind,
    pub source_type: String,
    pub source_id: String,
    pub org_unit_id: Option<String>,
    pub data: Option<Map<String, Value>>,
}

/// Result of one trigger operation.
#[derive(Debug, Clone)]
pub struct TriggerOutcome {
    pub alert: Alert,
    pub recipients_notified: usize,
    pub notifications_created: usize,
    pub notifications_failed: usize,
}

/// Orchestrates one trigger: classify, persist the alert, resolve
/// recipients, fan out notifications, record the audit trail.
#[derive(Clone)]
pub struct AlertTriggerService {
    db: Database,
    catalog: AlertCatalog,
    resolver: RecipientResolver,
    dispatcher: NotificationDispatcher,
    recorder: AuditRecorder,
}

impl AlertTriggerService {
    pub fn new(db: Database, base_url: String) -> Self {
        Self {
            catalog: AlertCatalog::standard(),
            resolver: RecipientResolver::new(db.clone()),
            dispatcher: NotificationDispatcher::new(db.clone(), base_url),
            recorder: AuditRecorder::new(db.clone()),
            db,
        }
    }

    /// Runs one trigger to completion. The alert row is the durable
    /// commitment point: a failure after step 3 never rolls it back, and
    /// notification fanout is best-effort with failures surfaced in the
    /// outcome counts.
    pub async fn trigger(&self, event: TriggerEvent) -> ApiResult<TriggerOutcome> {
        // 1. Validate event shape before any side effect
        validate(&event)?;

        // 2. Classify the event
        let resolved = self
            .catalog
            .resolve(event.kind, event.data.as_ref(), OffsetDateTime::now_utc());

        // 3. Persist the alert
        let alert = Alert::new(
            resolved.alert_type,
            resolved.category,
            resolved.severity,
            resolved.title,
            resolved.message,
            resolved.summary,
            resolved.action_required,
            resolved.deadline,
            event.source_type.clone(),
            event.source_id.clone(),
            event.org_unit_id.clone(),
            event.data.clone().map(Value::Object).unwrap_or(Value::Null),
            json!({
                "triggerType": event.kind,
                "sourceType": event.source_type,
                "sourceId": event.source_id,
            }),
        );
        self.db.create_alert(&alert).await?;

        tracing::info!(
            alert_id = %alert.id,
            alert_type = %alert.alert_type,
            severity = %alert.severity,
            "alert created"
        );

        // 4. Resolve recipients
        let recipients = self
            .resolver
            .resolve(alert.alert_type, alert.severity, event.org_unit_id.as_deref())
            .await?;

        // 5. Fan out notifications, escalating if critical
        let dispatch = self.dispatcher.dispatch(&alert, &recipients).await?;

        if dispatch.notifications_failed > 0 {
            tracing::warn!(
                alert_id = %alert.id,
                failed = dispatch.notifications_failed,
                created = dispatch.notifications_created,
                "partial notification fanout"
            );
        }

        // 6. Audit trail
        self.recorder
            .record_alert_triggered(&alert, dispatch.recipients_notified)
            .await?;

        Ok(TriggerOutcome {
            alert,
            recipients_notified: dispatch.recipients_notified,
            notifications_created: dispatch.notifications_created,
            notifications_failed: dispatch.notifications_failed,
        })
    }
}

fn validate(event: &TriggerEvent) -> ApiResult<()> {
    let mut details = Vec::new();

    if event.source_type.trim().is_empty() {
        details.push("sourceType must not be empty".to_string());
    }
    if event.source_id.trim().is_empty() {
        details.push("sourceId must not be empty".to_string());
    }
    if let Some(org_unit_id) = &event.org_unit_id {
        if org_unit_id.trim().is_empty() {
            details.push("orgUnitId must not be empty when provided".to_string());
        }
    }

    if details.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation {
            message: "Invalid trigger event".to_string(),
            details,
        })
    }
}
