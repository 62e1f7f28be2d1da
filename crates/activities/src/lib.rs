//! Activity log entries: calls, emails, meetings, notes.

mod activity;

pub use activity::{Activity, ActivityType, ActivityUpdate, NewActivity};
