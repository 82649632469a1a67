pub mod alert;
pub mod audit;
pub mod notification;
pub mod user;

pub use alert::*;
pub use audit::*;
pub use notification::*;
pub use user::*;

/// Timestamps are stored and exchanged as RFC 3339 strings.
pub fn format_rfc3339(ts: time::OffsetDateTime) -> String {
    ts.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| ts.to_string())
}
