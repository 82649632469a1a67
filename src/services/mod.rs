pub mod alert_catalog;
pub mod alert_trigger_service;
pub mod audit_recorder;
pub mod channel_selector;
pub mod notification_dispatcher;
pub mod recipient_resolver;

pub use alert_catalog::{AlertCatalog, AlertDefinition, ResolvedAlert};
pub use alert_trigger_service::{AlertTriggerService, TriggerEvent, TriggerOutcome};
pub use audit_recorder::AuditRecorder;
pub use channel_selector::channels_for;
pub use notification_dispatcher::{response_url, DispatchOutcome, NotificationDispatcher};
pub use recipient_resolver::{standard_rules, RecipientResolver, RoutingRule};
