pub mod alerts;
pub mod error;
pub mod notifications;
pub mod router;

pub use error::*;

use crate::{database::Database, services::AlertTriggerService};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub alert_trigger_service: AlertTriggerService,
}
