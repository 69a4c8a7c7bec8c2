//! ISO-8601 timestamps for record creation and update tracking.
//!
//! Timestamps are rendered in UTC with millisecond precision and a `Z`
//! suffix, for example `2024-01-01T00:00:00.000Z`. Every call re-reads the
//! clock; nothing is cached.
//!
//! The free functions read the system clock. [`Timestamps`] accepts an
//! injected [`Clock`] so callers can pin time in tests.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use mockable::{Clock, DefaultClock};
use serde::{Deserialize, Serialize};
use tracing::debug;

const NAIVE_DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// Creation and update stamps attached to an entity.
///
/// # Examples
/// ```
/// use record_kit::timestamps::create_timestamps;
///
/// let stamps = create_timestamps();
/// assert!(stamps.created_at() <= stamps.updated_at());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampPair {
    created_at: String,
    updated_at: String,
}

impl TimestampPair {
    /// When the entity was created.
    #[must_use]
    pub fn created_at(&self) -> &str {
        self.created_at.as_str()
    }

    /// When the entity was last updated.
    #[must_use]
    pub fn updated_at(&self) -> &str {
        self.updated_at.as_str()
    }

    /// Merge an update, replacing `updatedAt` and keeping `createdAt`.
    #[must_use]
    pub fn apply(self, update: TimestampUpdate) -> Self {
        Self {
            created_at: self.created_at,
            updated_at: update.updated_at,
        }
    }
}

/// Partial record carrying a fresh `updatedAt`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampUpdate {
    updated_at: String,
}

impl TimestampUpdate {
    /// The refreshed update stamp.
    #[must_use]
    pub fn updated_at(&self) -> &str {
        self.updated_at.as_str()
    }
}

/// Timestamp source backed by an injectable clock.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use mockable::DefaultClock;
/// use record_kit::Timestamps;
///
/// let timestamps = Timestamps::new(Arc::new(DefaultClock));
/// let update = timestamps.touch();
/// assert!(record_kit::timestamps::parse(Some(update.updated_at())).is_some());
/// ```
#[derive(Clone)]
pub struct Timestamps {
    clock: Arc<dyn Clock>,
}

impl Timestamps {
    /// Create a source reading from `clock`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// The clock's current instant as ISO-8601 text.
    #[must_use]
    pub fn now(&self) -> String {
        format(&self.clock.utc())
    }

    /// A fresh pair; each field is a separate clock read.
    #[must_use]
    pub fn create(&self) -> TimestampPair {
        let created_at = self.now();
        let updated_at = self.now();
        TimestampPair {
            created_at,
            updated_at,
        }
    }

    /// A fresh `updatedAt` for merging into an existing entity.
    #[must_use]
    pub fn touch(&self) -> TimestampUpdate {
        TimestampUpdate {
            updated_at: self.now(),
        }
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl fmt::Debug for Timestamps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timestamps").finish_non_exhaustive()
    }
}

/// Current UTC instant as ISO-8601 text.
#[must_use]
pub fn now() -> String {
    Timestamps::default().now()
}

/// Creation and update stamps for a new entity.
#[must_use]
pub fn create_timestamps() -> TimestampPair {
    Timestamps::default().create()
}

/// A fresh `updatedAt` stamp.
#[must_use]
pub fn touch() -> TimestampUpdate {
    Timestamps::default().touch()
}

/// Render an instant in the canonical millisecond `Z` form.
#[must_use]
pub fn format(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse ISO-8601 text into a UTC instant.
///
/// Accepts RFC 3339 date-times with any offset, date-times without an
/// offset (read as UTC), and bare `YYYY-MM-DD` dates, which resolve to
/// midnight UTC. Absent, empty, or unparseable text yields `None`.
///
/// # Examples
/// ```
/// use record_kit::timestamps::{format, parse};
///
/// let instant = parse(Some("2024-01-01T00:00:00.000Z")).expect("valid timestamp");
/// assert_eq!(format(&instant), "2024-01-01T00:00:00.000Z");
/// assert!(parse(Some("not-a-date")).is_none());
/// assert!(parse(None).is_none());
/// ```
#[must_use]
pub fn parse(text: Option<&str>) -> Option<DateTime<Utc>> {
    let candidate = text.filter(|value| !value.is_empty())?;
    match DateTime::parse_from_rfc3339(candidate) {
        Ok(instant) => Some(instant.with_timezone(&Utc)),
        Err(error) => {
            let fallback = parse_naive(candidate);
            if fallback.is_none() {
                debug!(input = candidate, %error, "rejected unparseable timestamp");
            }
            fallback
        }
    }
}

/// Offset-less date-times and bare dates, both read as UTC.
fn parse_naive(candidate: &str) -> Option<DateTime<Utc>> {
    NAIVE_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(candidate, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(candidate, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}
