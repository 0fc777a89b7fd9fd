//! Report period windows.
//!
//! Every aggregation endpoint takes an optional `period` query parameter that
//! bounds the query to a rolling or calendar-aligned window. Unrecognized or
//! missing values fall back to `daily`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A reporting window: the current UTC calendar day, the last 7 days, or the
/// last 30 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Daily,
    Weekly,
    Monthly,
}

impl Period {
    /// Resolves a raw query-string value, falling back to `Daily` for anything
    /// unrecognized (including absence).
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some("weekly") => Period::Weekly,
            Some("monthly") => Period::Monthly,
            _ => Period::Daily,
        }
    }

    /// The inclusive lower bound of this window, relative to `now`.
    ///
    /// `Daily` is the start of the current UTC day; the rolling windows are
    /// exact 7- and 30-day offsets.
    pub fn threshold(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Period::Daily => now
                .date_naive()
                .and_hms_opt(0, 0, 0)
                .expect("midnight is always a valid time")
                .and_utc(),
            Period::Weekly => now - Duration::days(7),
            Period::Monthly => now - Duration::days(30),
        }
    }

    /// Capitalized label used in report headers, e.g. `Daily`.
    pub fn label(&self) -> &'static str {
        match self {
            Period::Daily => "Daily",
            Period::Weekly => "Weekly",
            Period::Monthly => "Monthly",
        }
    }
}
