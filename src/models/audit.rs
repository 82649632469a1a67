use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::format_rfc3339;

pub const ACTION_TRIGGER_ALERT: &str = "TRIGGER_ALERT";
pub const RESOURCE_ALERT: &str = "ALERT";

/// Append-only audit record. Never updated or deleted by this service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    pub id: String,
    pub action: String,
    pub resource_type: String,
    pub resource_id: String,
    pub new_values: Value,
    pub created_at: String, // ISO 8601 timestamp
}

impl AuditEntry {
    pub fn new(action: String, resource_type: String, resource_id: String, new_values: Value) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            action,
            resource_type,
            resource_id,
            new_values,
            created_at: format_rfc3339(OffsetDateTime::now_utc()),
        }
    }
}
