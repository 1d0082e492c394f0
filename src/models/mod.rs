pub mod post;
pub mod user;

pub use post::{Post, PostView};
pub use user::User;

use chrono::{SecondsFormat, Utc};

/// Current time as fixed-width RFC 3339 UTC (microsecond precision, `Z` suffix).
///
/// Every stored timestamp uses this format so string comparison in SQL
/// orders rows chronologically.
#[must_use]
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
