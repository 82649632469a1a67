use std::collections::HashMap;

use serde_json::{Map, Value};
use time::{Duration, OffsetDateTime};

use crate::models::{AlertCategory, AlertType, Severity, TriggerKind};

/// Static alert definition for one trigger kind. Templates carry `{field}`
/// placeholders interpolated from the event data.
#[derive(Debug, Clone)]
pub struct AlertDefinition {
    pub alert_type: AlertType,
    pub category: AlertCategory,
    pub severity: Severity,
    pub title_template: &'static str,
    pub message_template: &'static str,
    pub summary: &'static str,
    pub action_required: &'static str,
    pub deadline_offset: Duration,
}

/// A definition resolved against concrete event data and a point in time.
#[derive(Debug, Clone)]
pub struct ResolvedAlert {
    pub alert_type: AlertType,
    pub category: AlertCategory,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub summary: String,
    pub action_required: String,
    pub deadline: OffsetDateTime,
}

/// Immutable lookup from trigger kind to alert definition, built once and
/// injected into the trigger service. Kinds without an entry resolve to the
/// generic fallback definition; that is policy, not an error.
#[derive(Debug, Clone)]
pub struct AlertCatalog {
    definitions: HashMap<TriggerKind, AlertDefinition>,
    fallback: AlertDefinition,
}

impl AlertCatalog {
    /// The production catalog. Deadline offsets are domain constants, from
    /// 4 hours (contamination) to 7 days (training).
    pub fn standard() -> Self {
        let mut definitions = HashMap::new();

        definitions.insert(
            TriggerKind::QcFailure,
            AlertDefinition {
                alert_type: AlertType::QcFailure,
                category: AlertCategory::QualitySafety,
                severity: Severity::Critical,
                title_template: "QC Test Failure - Batch {batchId}",
                message_template: "Batch {batchId} failed quality control testing. \
                                   Immediate investigation required.",
                summary: "A production batch failed QC testing",
                action_required: "Quarantine the batch and re-test fortificant levels",
                deadline_offset: Duration::hours(24),
            },
        );

        definitions.insert(
            TriggerKind::ContaminationRisk,
            AlertDefinition {
                alert_type: AlertType::ContaminationRisk,
                category: AlertCategory::QualitySafety,
                severity: Severity::Critical,
                title_template: "Contamination Risk - Batch {batchId}",
                message_template: "Possible contamination detected for batch {batchId}. \
                                   Halt distribution of affected stock immediately.",
                summary: "Possible contamination in a production batch",
                action_required: "Halt distribution and isolate affected stock",
                deadline_offset: Duration::hours(4),
            },
        );

        definitions.insert(
            TriggerKind::PremixExpiry,
            AlertDefinition {
                alert_type: AlertType::PremixExpiry,
                category: AlertCategory::Inventory,
                severity: Severity::High,
                title_template: "Premix Expiring - Lot {lotId}",
                message_template: "Premix lot {lotId} expires on {expiryDate}. \
                                   Plan stock rotation before expiry.",
                summary: "A premix lot is approaching expiry",
                action_required: "Rotate stock and schedule replacement procurement",
                deadline_offset: Duration::hours(48),
            },
        );

        definitions.insert(
            TriggerKind::ComplianceFailure,
            AlertDefinition {
                alert_type: AlertType::ComplianceFailure,
                category: AlertCategory::Compliance,
                severity: Severity::High,
                title_template: "Compliance Failure - {standard}",
                message_template: "Fortification levels for batch {batchId} are out of \
                                   compliance with {standard}.",
                summary: "Fortification out of compliance with the applicable standard",
                action_required: "Review fortificant dosing and file a corrective action",
                deadline_offset: Duration::hours(48),
            },
        );

        definitions.insert(
            TriggerKind::CalibrationDue,
            AlertDefinition {
                alert_type: AlertType::CalibrationDue,
                category: AlertCategory::Maintenance,
                severity: Severity::Medium,
                title_template: "Calibration Due - {equipmentName}",
                message_template: "Equipment {equipmentName} is due for calibration.",
                summary: "Equipment calibration is due",
                action_required: "Schedule calibration with the maintenance team",
                deadline_offset: Duration::hours(72),
            },
        );

        definitions.insert(
            TriggerKind::EquipmentDrift,
            AlertDefinition {
                alert_type: AlertType::EquipmentDrift,
                category: AlertCategory::Maintenance,
                severity: Severity::High,
                title_template: "Equipment Drift - {equipmentName}",
                message_template: "Dosing drift detected on {equipmentName}. Readings \
                                   deviate from the expected range.",
                summary: "Dosing equipment is drifting out of range",
                action_required: "Take the equipment offline and recalibrate",
                deadline_offset: Duration::hours(24),
            },
        );

        definitions.insert(
            TriggerKind::PremixUsageAnomaly,
            AlertDefinition {
                alert_type: AlertType::PremixUsageAnomaly,
                category: AlertCategory::Production,
                severity: Severity::Medium,
                title_template: "Premix Usage Anomaly",
                message_template: "Premix consumption for batch {batchId} deviates from \
                                   expected usage.",
                summary: "Premix consumption deviates from expected usage",
                action_required: "Reconcile premix inventory against production logs",
                deadline_offset: Duration::hours(48),
            },
        );

        definitions.insert(
            TriggerKind::LowInventory,
            AlertDefinition {
                alert_type: AlertType::LowInventory,
                category: AlertCategory::Inventory,
                severity: Severity::Medium,
                title_template: "Low Inventory - {itemName}",
                message_template: "Inventory for {itemName} is below the reorder threshold.",
                summary: "Premix inventory is below the reorder threshold",
                action_required: "Raise a procurement request",
                deadline_offset: Duration::hours(72),
            },
        );

        definitions.insert(
            TriggerKind::ProductionMiss,
            AlertDefinition {
                alert_type: AlertType::ProductionMiss,
                category: AlertCategory::Production,
                severity: Severity::Medium,
                title_template: "Production Target Missed",
                message_template: "Production volume fell short of target for {period}.",
                summary: "Production volume fell short of target",
                action_required: "Review the production schedule and capacity",
                deadline_offset: Duration::hours(48),
            },
        );

        definitions.insert(
            TriggerKind::TrainingOverdue,
            AlertDefinition {
                alert_type: AlertType::TrainingOverdue,
                category: AlertCategory::TrainingCompliance,
                severity: Severity::Low,
                title_template: "Training Overdue - {courseName}",
                message_template: "Mandatory training {courseName} is overdue.",
                summary: "Mandatory training is overdue",
                action_required: "Complete the assigned training course",
                deadline_offset: Duration::days(7),
            },
        );

        Self::with_definitions(definitions)
    }

    /// Builds a catalog from an explicit definition table. Used by tests and
    /// a seam for loading the table from configuration later.
    pub fn with_definitions(definitions: HashMap<TriggerKind, AlertDefinition>) -> Self {
        Self {
            definitions,
            fallback: AlertDefinition {
                alert_type: AlertType::SystemAlert,
                category: AlertCategory::General,
                severity: Severity::Medium,
                title_template: "System Alert",
                message_template: "A system event requires attention.",
                summary: "Unclassified system event",
                action_required: "Review the alert details",
                deadline_offset: Duration::hours(24),
            },
        }
    }

    /// Resolves a trigger kind into concrete alert content. Pure: no I/O, and
    /// the deadline is computed from the caller-supplied `now`. Kinds missing
    /// from the table resolve to the generic fallback.
    pub fn resolve(
        &self,
        kind: TriggerKind,
        data: Option<&Map<String, Value>>,
        now: OffsetDateTime,
    ) -> ResolvedAlert {
        let definition = self.definitions.get(&kind).unwrap_or(&self.fallback);

        ResolvedAlert {
            alert_type: definition.alert_type,
            category: definition.category,
            severity: definition.severity,
            title: interpolate(definition.title_template, data),
            message: interpolate(definition.message_template, data),
            summary: definition.summary.to_string(),
            action_required: definition.action_required.to_string(),
            deadline: now + definition.deadline_offset,
        }
    }
}

impl Default for AlertCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Replaces `{field}` placeholders with values from the event data map.
/// Missing fields render as the literal "Unknown"; interpolation never fails.
fn interpolate(template: &str, data: Option<&Map<String, Value>>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        match rest[start..].find('}') {
            Some(end) => {
                let field = &rest[start + 1..start + end];
                out.push_str(&lookup(field, data));
                rest = &rest[start + end + 1..];
            }
            None => {
                // Unclosed brace, emit verbatim
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn lookup(field: &str, data: Option<&Map<String, Value>>) -> String {
    match data.and_then(|map| map.get(field)) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "Unknown".to_string(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn data(value: Value) -> Map<String, Value> {
        value.as_object().expect("test data must be an object").clone()
    }

    #[test]
    fn test_catalog_total_over_all_kinds() {
        let catalog = AlertCatalog::standard();
        let now = OffsetDateTime::now_utc();

        for kind in TriggerKind::ALL {
            let resolved = catalog.resolve(kind, None, now);
            assert!(resolved.deadline > now, "deadline must be after now for {kind}");
            assert!(!resolved.title.is_empty());
            assert!(!resolved.action_required.is_empty());
        }
    }

    #[test]
    fn test_missing_table_entry_falls_back_to_system_alert() {
        // A catalog with an empty table exercises the fallback path that a
        // future externalized table could hit.
        let catalog = AlertCatalog::with_definitions(HashMap::new());
        let now = OffsetDateTime::now_utc();

        let resolved = catalog.resolve(TriggerKind::QcFailure, None, now);
        assert_eq!(resolved.alert_type, AlertType::SystemAlert);
        assert_eq!(resolved.severity, Severity::Medium);
        assert_eq!(resolved.category, AlertCategory::General);
        assert_eq!(resolved.deadline, now + Duration::hours(24));
    }

    #[test]
    fn test_qc_failure_definition() {
        let catalog = AlertCatalog::standard();
        let now = OffsetDateTime::now_utc();
        let d = data(json!({"batchId": "B-42"}));

        let resolved = catalog.resolve(TriggerKind::QcFailure, Some(&d), now);
        assert_eq!(resolved.severity, Severity::Critical);
        assert_eq!(resolved.category, AlertCategory::QualitySafety);
        assert_eq!(resolved.title, "QC Test Failure - Batch B-42");
        assert_eq!(resolved.deadline, now + Duration::hours(24));
    }

    #[test]
    fn test_contamination_has_four_hour_deadline() {
        let catalog = AlertCatalog::standard();
        let now = OffsetDateTime::now_utc();

        let resolved = catalog.resolve(TriggerKind::ContaminationRisk, None, now);
        assert_eq!(resolved.deadline, now + Duration::hours(4));
        assert_eq!(resolved.severity, Severity::Critical);
    }

    #[test]
    fn test_training_overdue_is_low_severity_seven_days() {
        let catalog = AlertCatalog::standard();
        let now = OffsetDateTime::now_utc();

        let resolved = catalog.resolve(TriggerKind::TrainingOverdue, None, now);
        assert_eq!(resolved.severity, Severity::Low);
        assert_eq!(resolved.deadline, now + Duration::days(7));
    }

    #[test]
    fn test_missing_interpolation_field_renders_unknown() {
        let catalog = AlertCatalog::standard();
        let now = OffsetDateTime::now_utc();

        let resolved = catalog.resolve(TriggerKind::QcFailure, None, now);
        assert_eq!(resolved.title, "QC Test Failure - Batch Unknown");

        let empty = data(json!({}));
        let resolved = catalog.resolve(TriggerKind::CalibrationDue, Some(&empty), now);
        assert_eq!(resolved.title, "Calibration Due - Unknown");
    }

    #[test]
    fn test_non_string_fields_interpolate() {
        let catalog = AlertCatalog::standard();
        let now = OffsetDateTime::now_utc();
        let d = data(json!({"batchId": 42}));

        let resolved = catalog.resolve(TriggerKind::QcFailure, Some(&d), now);
        assert_eq!(resolved.title, "QC Test Failure - Batch 42");
    }

    #[test]
    fn test_resolution_is_deterministic_given_now() {
        let catalog = AlertCatalog::standard();
        let d = data(json!({"batchId": "B-7"}));

        let t1 = OffsetDateTime::now_utc();
        let t2 = t1 + Duration::minutes(90);

        let first = catalog.resolve(TriggerKind::QcFailure, Some(&d), t1);
        let second = catalog.resolve(TriggerKind::QcFailure, Some(&d), t2);

        assert_eq!(first.title, second.title);
        assert_eq!(first.message, second.message);
        assert_eq!(second.deadline - first.deadline, Duration::minutes(90));
    }
}
