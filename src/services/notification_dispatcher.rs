use futures::future::join_all;
use serde_json::json;
use std::collections::HashSet;
use time::OffsetDateTime;

use crate::{
    api::error::ApiResult,
    database::Database,
    models::{format_rfc3339, Alert, Notification, Recipient, Severity},
    services::channel_selector::channels_for,
};

/// Outcome of one fanout: how many notifications were created, how many
/// creations failed, and how many distinct recipients got at least one.
#[derive(Debug, Clone, Default)]
pub struct DispatchOutcome {
    pub notifications_created: usize,
    pub notifications_failed: usize,
    pub recipients_notified: usize,
    pub escalated: i64,
}

/// Fans an alert out to one notification per (recipient, channel) and
/// escalates CRITICAL alerts to immediate SENT status.
#[derive(Clone)]
pub struct NotificationDispatcher {
    db: Database,
    base_url: String,
}

impl NotificationDispatcher {
    pub fn new(db: Database, base_url: String) -> Self {
        Self { db, base_url }
    }

    pub async fn dispatch(&self, alert: &Alert, recipients: &[Recipient]) -> ApiResult<DispatchOutcome> {
        let mut notifications = Vec::new();

        for recipient in recipients {
            let url = response_url(&self.base_url, &alert.source_type, &alert.source_id, &alert.id);

            for channel in channels_for(alert.severity, recipient.role) {
                let content = json!({
                    "title": alert.title,
                    "message": alert.message,
                    "severity": alert.severity,
                    "actionRequired": alert.action_required,
                    "deadline": alert.deadline,
                    "responseUrl": url,
                });

                notifications.push(Notification::new(
                    alert.id.clone(),
                    recipient.id.clone(),
                    channel,
                    content,
                    url.clone(),
                ));
            }
        }

        // Creations are independent peers: issue them all and settle every
        // one, so a single failure never aborts its siblings.
        let results = join_all(notifications.iter().map(|notification| async move {
            let result = self.db.create_notification(notification).await;
            (notification, result)
        }))
        .await;

        let mut outcome = DispatchOutcome::default();
        let mut notified: HashSet<&str> = HashSet::new();

        for (notification, result) in results {
            match result {
                Ok(()) => {
                    outcome.notifications_created += 1;
                    notified.insert(notification.user_id.as_str());
                }
                Err(err) => {
                    outcome.notifications_failed += 1;
                    tracing::warn!(
                        alert_id = %alert.id,
                        user_id = %notification.user_id,
                        channel = %notification.channel,
                        "notification creation failed: {}",
                        err
                    );
                }
            }
        }
        outcome.recipients_notified = notified.len();

        // Stand-in for a real delivery pipeline: critical alerts are marked
        // delivered synchronously within the trigger operation.
        if alert.severity == Severity::Critical && outcome.notifications_created > 0 {
            let sent_at = format_rfc3339(OffsetDateTime::now_utc());
            outcome.escalated = self
                .db
                .mark_alert_notifications_sent(&alert.id, &sent_at)
                .await?;
            tracing::info!(
                alert_id = %alert.id,
                count = outcome.escalated,
                "escalated critical alert notifications to SENT"
            );
        }

        Ok(outcome)
    }
}

/// Deep link back to the entity that caused the alert. Total over every
/// source type: unrecognized types land on the alert detail page.
pub fn response_url(base_url: &str, source_type: &str, source_id: &str, alert_id: &str) -> String {
    let base = base_url.trim_end_matches('/');
    match source_type {
        "QC_TEST" | "BATCH_LOG" => format!("{base}/batches/{source_id}"),
        "COMPLIANCE_AUDIT" => format!("{base}/audits/{source_id}"),
        "MAINTENANCE" => format!("{base}/equipment/{source_id}"),
        "PROCUREMENT" => format!("{base}/rfps/{source_id}"),
        "TRAINING" => format!("{base}/courses/{source_id}"),
        _ => format!("{base}/alerts/{alert_id}"),
    }
}
