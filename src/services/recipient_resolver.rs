use std::collections::{HashMap, HashSet};

use crate::{
    api::error::ApiResult,
    database::Database,
    models::{AlertType, Recipient, Role, Severity},
};

/// One routing rule: which roles to notify within the event's org unit, and
/// which roles to notify globally regardless of scope.
#[derive(Debug, Clone)]
pub struct RoutingRule {
    pub org_roles: Vec<Role>,
    pub global_roles: Vec<Role>,
}

/// The production routing table, keyed by alert type. Alert types without an
/// entry resolve to no recipients; those are handled by out-of-band
/// assignment (TRAINING_OVERDUE) or are the catalog fallback (SYSTEM_ALERT).
pub fn standard_rules() -> HashMap<AlertType, RoutingRule> {
    let mut rules = HashMap::new();

    // Quality/safety family: the unit's floor staff plus every active
    // inspector and program manager.
    for alert_type in [AlertType::QcFailure, AlertType::ContaminationRisk] {
        rules.insert(
            alert_type,
            RoutingRule {
                org_roles: vec![Role::Operator, Role::Manager],
                global_roles: vec![Role::Inspector, Role::ProgramManager],
            },
        );
    }

    // Compliance family: unit management plus the same global oversight roles.
    rules.insert(
        AlertType::ComplianceFailure,
        RoutingRule {
            org_roles: vec![Role::Manager],
            global_roles: vec![Role::Inspector, Role::ProgramManager],
        },
    );

    // Maintenance family: purely unit-local.
    for alert_type in [
        AlertType::CalibrationDue,
        AlertType::CalibrationOverdue,
        AlertType::EquipmentDrift,
    ] {
        rules.insert(
            alert_type,
            RoutingRule {
                org_roles: vec![Role::Operator, Role::Manager],
                global_roles: vec![],
            },
        );
    }

    // Inventory family.
    for alert_type in [AlertType::LowInventory, AlertType::PremixExpiry] {
        rules.insert(
            alert_type,
            RoutingRule {
                org_roles: vec![Role::Manager],
                global_roles: vec![],
            },
        );
    }

    // Production family.
    for alert_type in [AlertType::PremixUsageAnomaly, AlertType::ProductionMiss] {
        rules.insert(
            alert_type,
            RoutingRule {
                org_roles: vec![Role::Manager],
                global_roles: vec![],
            },
        );
    }

    rules
}

/// Resolves the set of users to notify for an alert by evaluating the
/// routing table against org-unit membership and global role holders.
#[derive(Clone)]
pub struct RecipientResolver {
    db: Database,
    rules: HashMap<AlertType, RoutingRule>,
}

impl RecipientResolver {
    pub fn new(db: Database) -> Self {
        Self::with_rules(db, standard_rules())
    }

    pub fn with_rules(db: Database, rules: HashMap<AlertType, RoutingRule>) -> Self {
        Self { db, rules }
    }

    /// Returns the deduplicated recipients for one alert. Severity is part of
    /// the contract for future severity-sensitive routing; the current table
    /// keys on alert type only.
    ///
    /// Failure boundary: a missing or unreadable org unit degrades to
    /// global-role resolution instead of aborting the trigger. A store error
    /// while fetching members of a unit that does exist, or while fetching
    /// global role holders, is fatal and propagates to the caller.
    pub async fn resolve(
        &self,
        alert_type: AlertType,
        _severity: Severity,
        org_unit_id: Option<&str>,
    ) -> ApiResult<Vec<Recipient>> {
        let Some(rule) = self.rules.get(&alert_type) else {
            return Ok(Vec::new());
        };

        let mut recipients = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        if let Some(unit_id) = org_unit_id {
            if !rule.org_roles.is_empty() {
                match self.db.get_org_unit_by_id(unit_id).await {
                    Ok(Some(_)) => {
                        let members = self.db.get_active_org_unit_members(unit_id).await?;
                        for member in members.iter().filter(|m| rule.org_roles.contains(&m.role)) {
                            if seen.insert(member.id.clone()) {
                                recipients.push(Recipient::from(member));
                            }
                        }
                    }
                    Ok(None) => {
                        tracing::warn!(
                            org_unit_id = unit_id,
                            alert_type = %alert_type,
                            "org unit not found, falling back to global roles"
                        );
                    }
                    Err(err) => {
                        tracing::warn!(
                            org_unit_id = unit_id,
                            alert_type = %alert_type,
                            "org unit lookup failed, falling back to global roles: {}",
                            err
                        );
                    }
                }
            }
        }

        if !rule.global_roles.is_empty() {
            let global = self.db.get_active_users_by_roles(&rule.global_roles).await?;
            for user in &global {
                if seen.insert(user.id.clone()) {
                    recipients.push(Recipient::from(user));
                }
            }
        }

        Ok(recipients)
    }
}
