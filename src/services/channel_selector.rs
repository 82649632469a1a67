use crate::models::{Channel, Role, Severity};

/// Ordered delivery channels for a notification. The in-app inbox
/// (IN_SYSTEM) is the channel of record and is always included.
///
/// The role parameter is currently unused; it is kept in the signature so
/// per-role tuning can land without touching call sites.
pub fn channels_for(severity: Severity, _role: Role) -> Vec<Channel> {
    match severity {
        Severity::Critical => vec![Channel::InSystem, Channel::Push, Channel::Sms, Channel::Email],
        Severity::High => vec![Channel::InSystem, Channel::Push, Channel::Email],
        Severity::Medium => vec![Channel::InSystem, Channel::Push, Channel::Email],
        Severity::Low => vec![Channel::InSystem, Channel::Email],
    }
}
