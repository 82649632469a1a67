use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::format_rfc3339;

/// Trigger kind: the fixed category of domain event that can produce an alert.
/// The ten wire values are part of the API contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerKind {
    QcFailure,
    ContaminationRisk,
    PremixExpiry,
    ComplianceFailure,
    CalibrationDue,
    EquipmentDrift,
    PremixUsageAnomaly,
    LowInventory,
    ProductionMiss,
    TrainingOverdue,
}

impl TriggerKind {
    pub const ALL: [TriggerKind; 10] = [
        TriggerKind::QcFailure,
        TriggerKind::ContaminationRisk,
        TriggerKind::PremixExpiry,
        TriggerKind::ComplianceFailure,
        TriggerKind::CalibrationDue,
        TriggerKind::EquipmentDrift,
        TriggerKind::PremixUsageAnomaly,
        TriggerKind::LowInventory,
        TriggerKind::ProductionMiss,
        TriggerKind::TrainingOverdue,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::QcFailure => "QC_FAILURE",
            TriggerKind::ContaminationRisk => "CONTAMINATION_RISK",
            TriggerKind::PremixExpiry => "PREMIX_EXPIRY",
            TriggerKind::ComplianceFailure => "COMPLIANCE_FAILURE",
            TriggerKind::CalibrationDue => "CALIBRATION_DUE",
            TriggerKind::EquipmentDrift => "EQUIPMENT_DRIFT",
            TriggerKind::PremixUsageAnomaly => "PREMIX_USAGE_ANOMALY",
            TriggerKind::LowInventory => "LOW_INVENTORY",
            TriggerKind::ProductionMiss => "PRODUCTION_MISS",
            TriggerKind::TrainingOverdue => "TRAINING_OVERDUE",
        }
    }

    /// Strict parse used at the API boundary. Unknown strings are a
    /// validation error there, distinct from the catalog fallback which only
    /// applies to kinds that passed validation but lack a bespoke definition.
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.as_str() == s)
    }
}

impl std::fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Alert severity, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Severity {
    fn from(s: String) -> Self {
        match s.as_str() {
            "LOW" => Severity::Low,
            "HIGH" => Severity::High,
            "CRITICAL" => Severity::Critical,
            _ => Severity::Medium, // Default fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertCategory {
    QualitySafety,
    Compliance,
    Maintenance,
    Production,
    Inventory,
    TrainingCompliance,
    General,
}

impl AlertCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertCategory::QualitySafety => "QUALITY_SAFETY",
            AlertCategory::Compliance => "COMPLIANCE",
            AlertCategory::Maintenance => "MAINTENANCE",
            AlertCategory::Production => "PRODUCTION",
            AlertCategory::Inventory => "INVENTORY",
            AlertCategory::TrainingCompliance => "TRAINING_COMPLIANCE",
            AlertCategory::General => "GENERAL",
        }
    }
}

impl From<String> for AlertCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "QUALITY_SAFETY" => AlertCategory::QualitySafety,
            "COMPLIANCE" => AlertCategory::Compliance,
            "MAINTENANCE" => AlertCategory::Maintenance,
            "PRODUCTION" => AlertCategory::Production,
            "INVENTORY" => AlertCategory::Inventory,
            "TRAINING_COMPLIANCE" => AlertCategory::TrainingCompliance,
            _ => AlertCategory::General, // Default fallback
        }
    }
}

/// Alert type: the trigger kinds plus routing-only types that are never
/// produced directly by a trigger (CALIBRATION_OVERDUE comes from out-of-band
/// escalation, SYSTEM_ALERT is the catalog fallback).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    QcFailure,
    ContaminationRisk,
    PremixExpiry,
    ComplianceFailure,
    CalibrationDue,
    CalibrationOverdue,
    EquipmentDrift,
    PremixUsageAnomaly,
    LowInventory,
    ProductionMiss,
    TrainingOverdue,
    SystemAlert,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::QcFailure => "QC_FAILURE",
            AlertType::ContaminationRisk => "CONTAMINATION_RISK",
            AlertType::PremixExpiry => "PREMIX_EXPIRY",
            AlertType::ComplianceFailure => "COMPLIANCE_FAILURE",
            AlertType::CalibrationDue => "CALIBRATION_DUE",
            AlertType::CalibrationOverdue => "CALIBRATION_OVERDUE",
            AlertType::EquipmentDrift => "EQUIPMENT_DRIFT",
            AlertType::PremixUsageAnomaly => "PREMIX_USAGE_ANOMALY",
            AlertType::LowInventory => "LOW_INVENTORY",
            AlertType::ProductionMiss => "PRODUCTION_MISS",
            AlertType::TrainingOverdue => "TRAINING_OVERDUE",
            AlertType::SystemAlert => "SYSTEM_ALERT",
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for AlertType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "QC_FAILURE" => AlertType::QcFailure,
            "CONTAMINATION_RISK" => AlertType::ContaminationRisk,
            "PREMIX_EXPIRY" => AlertType::PremixExpiry,
            "COMPLIANCE_FAILURE" => AlertType::ComplianceFailure,
            "CALIBRATION_DUE" => AlertType::CalibrationDue,
            "CALIBRATION_OVERDUE" => AlertType::CalibrationOverdue,
            "EQUIPMENT_DRIFT" => AlertType::EquipmentDrift,
            "PREMIX_USAGE_ANOMALY" => AlertType::PremixUsageAnomaly,
            "LOW_INVENTORY" => AlertType::LowInventory,
            "PRODUCTION_MISS" => AlertType::ProductionMiss,
            "TRAINING_OVERDUE" => AlertType::TrainingOverdue,
            _ => AlertType::SystemAlert, // Default fallback
        }
    }
}

/// Alert entity: one row per trigger kind firing. Immutable after creation;
/// the status/resolution lifecycle lives outside this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub alert_type: AlertType,
    pub category: AlertCategory,
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub summary: String,
    pub action_required: String,
    pub deadline: String, // ISO 8601 timestamp
    pub source_type: String,
    pub source_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org_unit_id: Option<String>,
    pub details: Value,
    pub trigger_condition: Value,
    pub created_at: String, // ISO 8601 timestamp
}

impl Alert {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        alert_type: AlertType,
        category: AlertCategory,
        severity: Severity,
        title: String,
        message: String,
        summary: String,
        action_required: String,
        deadline: OffsetDateTime,
        source_type: String,
        source_id: String,
        org_unit_id: Option<String>,
        details: Value,
        trigger_condition: Value,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            alert_type,
            category,
            severity,
            title,
            message,
            summary,
            action_required,
            deadline: format_rfc3339(deadline),
            source_type,
            source_id,
            org_unit_id,
            details,
            trigger_condition,
            created_at: format_rfc3339(OffsetDateTime::now_utc()),
        }
    }
}
