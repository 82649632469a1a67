// Integration tests for role-based recipient resolution.
use std::collections::HashMap;

use fortalert::models::{AlertType, Role, Severity};
use fortalert::services::{standard_rules, RecipientResolver, RoutingRule};

mod helpers;
use helpers::*;

#[tokio::test]
async fn test_quality_family_includes_unit_staff_and_global_oversight() {
    let db = setup_test_db().await;
    create_test_org_unit(&db, "MILL-1", "Mill One").await;
    let operator =
        create_test_user(&db, "Operator", "op@mill.example", Role::Operator, Some("MILL-1")).await;
    let manager =
        create_test_user(&db, "Manager", "mgr@mill.example", Role::Manager, Some("MILL-1")).await;
    let inspector =
        create_test_user(&db, "Inspector", "i@agency.example", Role::Inspector, None).await;
    // Admin at the unit is not part of the quality rule
    create_test_user(&db, "Admin", "admin@mill.example", Role::Admin, Some("MILL-1")).await;

    let resolver = RecipientResolver::new(db.clone());
    let recipients = resolver
        .resolve(AlertType::QcFailure, Severity::Critical, Some("MILL-1"))
        .await
        .expect("resolution must succeed");

    let mut ids: Vec<&str> = recipients.iter().map(|r| r.id.as_str()).collect();
    ids.sort();
    let mut expected = vec![operator.id.as_str(), manager.id.as_str(), inspector.id.as_str()];
    expected.sort();
    assert_eq!(ids, expected);
}

#[tokio::test]
async fn test_no_rule_resolves_to_empty_set() {
    let db = setup_test_db().await;
    create_test_user(&db, "Inspector", "i@agency.example", Role::Inspector, None).await;

    let resolver = RecipientResolver::new(db.clone());

    for alert_type in [AlertType::TrainingOverdue, AlertType::SystemAlert] {
        let recipients = resolver
            .resolve(alert_type, Severity::Low, None)
            .await
            .expect("resolution must succeed");
        assert!(recipients.is_empty(), "{alert_type} must route to no one");
    }
}

#[tokio::test]
async fn test_org_scoped_rules_contribute_nothing_without_scope() {
    let db = setup_test_db().await;
    create_test_org_unit(&db, "MILL-1", "Mill One").await;
    create_test_user(&db, "Operator", "op@mill.example", Role::Operator, Some("MILL-1")).await;
    let inspector =
        create_test_user(&db, "Inspector", "i@agency.example", Role::Inspector, None).await;

    let resolver = RecipientResolver::new(db.clone());
    let recipients = resolver
        .resolve(AlertType::QcFailure, Severity::Critical, None)
        .await
        .expect("resolution must succeed");

    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0].id, inspector.id);
}

#[tokio::test]
async fn test_inactive_users_are_never_recipients() {
    let db = setup_test_db().await;
    create_test_org_unit(&db, "MILL-1", "Mill One").await;
    create_inactive_user(&db, "Gone", "gone@mill.example", Role::Manager, Some("MILL-1")).await;
    create_inactive_user(&db, "Retired", "ret@agency.example", Role::Inspector, None).await;
    let manager =
        create_test_user(&db, "Manager", "mgr@mill.example", Role::Manager, Some("MILL-1")).await;

    let resolver = RecipientResolver::new(db.clone());
    let recipients = resolver
        .resolve(AlertType::QcFailure, Severity::Critical, Some("MILL-1"))
        .await
        .expect("resolution must succeed");

    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0].id, manager.id);
}

#[tokio::test]
async fn test_recipient_appearing_in_both_rule_arms_is_deduplicated() {
    let db = setup_test_db().await;
    create_test_org_unit(&db, "MILL-1", "Mill One").await;
    // An inspector stationed at the mill: matched by both the org-scoped and
    // the global arm of this rule.
    let inspector = create_test_user(
        &db,
        "Resident Inspector",
        "ri@mill.example",
        Role::Inspector,
        Some("MILL-1"),
    )
    .await;

    let mut rules: HashMap<AlertType, RoutingRule> = HashMap::new();
    rules.insert(
        AlertType::QcFailure,
        RoutingRule {
            org_roles: vec![Role::Inspector],
            global_roles: vec![Role::Inspector],
        },
    );

    let resolver = RecipientResolver::with_rules(db.clone(), rules);
    let recipients = resolver
        .resolve(AlertType::QcFailure, Severity::Critical, Some("MILL-1"))
        .await
        .expect("resolution must succeed");

    assert_eq!(recipients.len(), 1);
    assert_eq!(recipients[0].id, inspector.id);
}

#[tokio::test]
async fn test_maintenance_family_is_unit_local() {
    let db = setup_test_db().await;
    create_test_org_unit(&db, "MILL-1", "Mill One").await;
    let operator =
        create_test_user(&db, "Operator", "op@mill.example", Role::Operator, Some("MILL-1")).await;
    // Global inspectors are not in the maintenance rule
    create_test_user(&db, "Inspector", "i@agency.example", Role::Inspector, None).await;

    let resolver = RecipientResolver::new(db.clone());

    for alert_type in [
        AlertType::CalibrationDue,
        AlertType::CalibrationOverdue,
        AlertType::EquipmentDrift,
    ] {
        let recipients = resolver
            .resolve(alert_type, Severity::Medium, Some("MILL-1"))
            .await
            .expect("resolution must succeed");
        assert_eq!(recipients.len(), 1, "{alert_type} routes to unit staff only");
        assert_eq!(recipients[0].id, operator.id);
    }
}

#[test]
fn test_standard_rules_cover_expected_alert_types() {
    let rules = standard_rules();

    for alert_type in [
        AlertType::QcFailure,
        AlertType::ContaminationRisk,
        AlertType::ComplianceFailure,
        AlertType::CalibrationDue,
        AlertType::CalibrationOverdue,
        AlertType::EquipmentDrift,
        AlertType::LowInventory,
        AlertType::PremixExpiry,
        AlertType::PremixUsageAnomaly,
        AlertType::ProductionMiss,
    ] {
        assert!(rules.contains_key(&alert_type), "missing rule for {alert_type}");
    }

    assert!(!rules.contains_key(&AlertType::TrainingOverdue));
    assert!(!rules.contains_key(&AlertType::SystemAlert));
}
