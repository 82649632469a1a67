use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::format_rfc3339;

/// Delivery channel for a notification. IN_SYSTEM is the channel of record
/// and is included for every severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Channel {
    InSystem,
    Push,
    Sms,
    Email,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::InSystem => "IN_SYSTEM",
            Channel::Push => "PUSH",
            Channel::Sms => "SMS",
            Channel::Email => "EMAIL",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<String> for Channel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "PUSH" => Channel::Push,
            "SMS" => Channel::Sms,
            "EMAIL" => Channel::Email,
            _ => Channel::InSystem, // Default fallback
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationStatus {
    Pending,
    Sent,
}

impl NotificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationStatus::Pending => "PENDING",
            NotificationStatus::Sent => "SENT",
        }
    }
}

impl From<String> for NotificationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SENT" => NotificationStatus::Sent,
            _ => NotificationStatus::Pending, // Default fallback
        }
    }
}

/// One notification row per (recipient, channel) pair for an alert.
/// Created PENDING; only status and sent_at ever change after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub alert_id: String,
    pub user_id: String,
    pub channel: Channel,
    pub content: Value,
    pub response_url: String,
    pub status: NotificationStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent_at: Option<String>,
    pub created_at: String, // ISO 8601 timestamp
}

impl Notification {
    pub fn new(
        alert_id: String,
        user_id: String,
        channel: Channel,
        content: Value,
        response_url: String,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            alert_id,
            user_id,
            channel,
            content,
            response_url,
            status: NotificationStatus::Pending,
            sent_at: None,
            created_at: format_rfc3339(OffsetDateTime::now_utc()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_channel_wire_names() {
        assert_eq!(Channel::InSystem.as_str(), "IN_SYSTEM");
        assert_eq!(Channel::Push.as_str(), "PUSH");
        assert_eq!(Channel::Sms.as_str(), "SMS");
        assert_eq!(Channel::Email.as_str(), "EMAIL");
    }

    #[test]
    fn test_channel_from_string_fallback() {
        assert_eq!(Channel::from("EMAIL".to_string()), Channel::Email);
        assert_eq!(Channel::from("carrier-pigeon".to_string()), Channel::InSystem);
    }

    #[test]
    fn test_new_notification_is_pending() {
        let n = Notification::new(
            "alert-1".to_string(),
            "user-1".to_string(),
            Channel::Push,
            json!({"title": "QC Failure"}),
            "http://localhost:3000/batches/B-42".to_string(),
        );

        assert_eq!(n.status, NotificationStatus::Pending);
        assert!(n.sent_at.is_none());
        assert_eq!(n.channel, Channel::Push);
        assert_eq!(n.alert_id, "alert-1");
    }
}
