// Integration tests for the alert trigger flow: classification, persistence,
// recipient resolution, notification fanout, escalation and audit trail.
use fortalert::models::{
    AlertType, Channel, NotificationStatus, Role, Severity, TriggerKind,
};
use fortalert::services::{AlertTriggerService, TriggerEvent};
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

mod helpers;
use helpers::*;

const BASE_URL: &str = "http://localhost:3000";

fn trigger_service(db: &fortalert::database::Database) -> AlertTriggerService {
    AlertTriggerService::new(db.clone(), BASE_URL.to_string())
}

fn parse_ts(ts: &str) -> OffsetDateTime {
    OffsetDateTime::parse(ts, &Rfc3339).expect("timestamp must be RFC 3339")
}

#[tokio::test]
async fn test_qc_failure_full_fanout_and_escalation() {
    let db = setup_test_db().await;
    let service = trigger_service(&db);

    // One operator and one manager at the mill, two global inspectors
    create_test_org_unit(&db, "MILL-1", "Mill One").await;
    let operator =
        create_test_user(&db, "Operator", "op@mill.example", Role::Operator, Some("MILL-1")).await;
    let manager =
        create_test_user(&db, "Manager", "mgr@mill.example", Role::Manager, Some("MILL-1")).await;
    let inspector_a =
        create_test_user(&db, "Inspector A", "ia@agency.example", Role::Inspector, None).await;
    let inspector_b =
        create_test_user(&db, "Inspector B", "ib@agency.example", Role::Inspector, None).await;

    let before = OffsetDateTime::now_utc();
    let data = json!({"batchId": "B-42"}).as_object().unwrap().clone();

    let outcome = service
        .trigger(TriggerEvent {
            kind: TriggerKind::QcFailure,
            source_type: "QC_TEST".to_string(),
            source_id: "QC-1".to_string(),
            org_unit_id: Some("MILL-1".to_string()),
            data: Some(data),
        })
        .await
        .expect("trigger must succeed");

    // Classification
    assert_eq!(outcome.alert.alert_type, AlertType::QcFailure);
    assert_eq!(outcome.alert.severity, Severity::Critical);
    assert_eq!(outcome.alert.title, "QC Test Failure - Batch B-42");

    // Deadline is roughly now + 24h
    let deadline = parse_ts(&outcome.alert.deadline);
    let expected = before + Duration::hours(24);
    assert!((deadline - expected).abs() < Duration::minutes(1));

    // Four distinct recipients, each across all four channels
    assert_eq!(outcome.recipients_notified, 4);
    assert_eq!(outcome.notifications_created, 16);
    assert_eq!(outcome.notifications_failed, 0);

    let notifications = db
        .list_notifications_for_alert(&outcome.alert.id)
        .await
        .expect("list notifications");
    assert_eq!(notifications.len(), 16);

    for user in [&operator, &manager, &inspector_a, &inspector_b] {
        let channels: Vec<Channel> = notifications
            .iter()
            .filter(|n| n.user_id == user.id)
            .map(|n| n.channel)
            .collect();
        assert_eq!(channels.len(), 4, "each recipient gets all four channels");
        for channel in [Channel::InSystem, Channel::Push, Channel::Sms, Channel::Email] {
            assert!(channels.contains(&channel));
        }
    }

    // Critical severity escalates every notification to SENT
    for notification in &notifications {
        assert_eq!(notification.status, NotificationStatus::Sent);
        assert!(notification.sent_at.is_some());
    }

    // The alert row is persisted and retrievable
    let stored = db
        .get_alert_by_id(&outcome.alert.id)
        .await
        .expect("get alert")
        .expect("alert must exist");
    assert_eq!(stored.severity, Severity::Critical);
    assert_eq!(stored.source_id, "QC-1");

    // Audit trail
    let audit = db
        .list_audit_entries_for_resource("ALERT", &outcome.alert.id)
        .await
        .expect("list audit entries");
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].action, "TRIGGER_ALERT");
    assert_eq!(audit[0].new_values["recipientsNotified"], json!(4));
}

#[tokio::test]
async fn test_training_overdue_resolves_no_recipients() {
    let db = setup_test_db().await;
    let service = trigger_service(&db);

    // Even with global oversight users present, training alerts route nowhere
    create_test_user(&db, "Inspector", "i@agency.example", Role::Inspector, None).await;

    let outcome = service
        .trigger(TriggerEvent {
            kind: TriggerKind::TrainingOverdue,
            source_type: "TRAINING".to_string(),
            source_id: "C-1".to_string(),
            org_unit_id: None,
            data: None,
        })
        .await
        .expect("trigger must succeed with zero recipients");

    assert_eq!(outcome.alert.severity, Severity::Low);
    assert_eq!(outcome.recipients_notified, 0);
    assert_eq!(outcome.notifications_created, 0);

    let notifications = db
        .list_notifications_for_alert(&outcome.alert.id)
        .await
        .expect("list notifications");
    assert!(notifications.is_empty());

    // The alert itself is still durable
    assert!(db
        .get_alert_by_id(&outcome.alert.id)
        .await
        .expect("get alert")
        .is_some());
}

#[tokio::test]
async fn test_missing_org_unit_degrades_to_global_rules() {
    let db = setup_test_db().await;
    let service = trigger_service(&db);

    // Maintenance family has no global roles, so a missing unit means no one
    let outcome = service
        .trigger(TriggerEvent {
            kind: TriggerKind::CalibrationDue,
            source_type: "MAINTENANCE".to_string(),
            source_id: "EQ-7".to_string(),
            org_unit_id: Some("NO-SUCH-UNIT".to_string()),
            data: json!({"equipmentName": "Doser 3"}).as_object().cloned(),
        })
        .await
        .expect("trigger must not propagate the lookup failure");

    assert_eq!(outcome.alert.alert_type, AlertType::CalibrationDue);
    assert_eq!(outcome.recipients_notified, 0);

    let stored = db
        .get_alert_by_id(&outcome.alert.id)
        .await
        .expect("get alert")
        .expect("alert must exist despite failed lookup");
    assert_eq!(stored.title, "Calibration Due - Doser 3");
}

#[tokio::test]
async fn test_non_critical_notifications_stay_pending() {
    let db = setup_test_db().await;
    let service = trigger_service(&db);

    create_test_user(&db, "PM", "pm@agency.example", Role::ProgramManager, None).await;

    let outcome = service
        .trigger(TriggerEvent {
            kind: TriggerKind::ComplianceFailure,
            source_type: "COMPLIANCE_AUDIT".to_string(),
            source_id: "AUD-3".to_string(),
            org_unit_id: None,
            data: json!({"standard": "KS 05-1790", "batchId": "B-9"})
                .as_object()
                .cloned(),
        })
        .await
        .expect("trigger must succeed");

    assert_eq!(outcome.alert.severity, Severity::High);
    assert_eq!(outcome.recipients_notified, 1);
    // HIGH severity: IN_SYSTEM, PUSH, EMAIL
    assert_eq!(outcome.notifications_created, 3);

    let notifications = db
        .list_notifications_for_alert(&outcome.alert.id)
        .await
        .expect("list notifications");
    for notification in &notifications {
        assert_eq!(notification.status, NotificationStatus::Pending);
        assert!(notification.sent_at.is_none());
    }
}

#[tokio::test]
async fn test_blank_source_fields_rejected_before_side_effects() {
    let db = setup_test_db().await;
    let service = trigger_service(&db);

    let result = service
        .trigger(TriggerEvent {
            kind: TriggerKind::QcFailure,
            source_type: String::new(),
            source_id: "  ".to_string(),
            org_unit_id: None,
            data: None,
        })
        .await;

    assert!(result.is_err());

    // No alert was created
    let alerts = db.list_alerts(10, 0).await.expect("list alerts");
    assert!(alerts.is_empty());
}

#[tokio::test]
async fn test_missing_interpolation_data_degrades_to_unknown() {
    let db = setup_test_db().await;
    let service = trigger_service(&db);

    let outcome = service
        .trigger(TriggerEvent {
            kind: TriggerKind::QcFailure,
            source_type: "QC_TEST".to_string(),
            source_id: "QC-2".to_string(),
            org_unit_id: None,
            data: None,
        })
        .await
        .expect("trigger must succeed without data");

    assert_eq!(outcome.alert.title, "QC Test Failure - Batch Unknown");
}
