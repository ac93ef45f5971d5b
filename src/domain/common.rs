use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque record identifier.
///
/// New records get UUID text, but stored ids are accepted as any string so
/// records written with other id schemes (e.g. `1714550400000-123456789`)
/// still load. Equality is plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value.to_string())
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&RecordId> for RecordId {
    fn from(value: &RecordId) -> Self {
        value.clone()
    }
}

/// Identifies entities that expose a stable unique identifier.
pub trait Identifiable {
    fn id(&self) -> &RecordId;
}

/// First item whose id equals `id`.
pub fn find_by_id<'a, T: Identifiable>(items: &'a [T], id: &RecordId) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Index of the first item whose id equals `id`.
pub fn position_by_id<T: Identifiable>(items: &[T], id: &RecordId) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Supplies a presentation-ready label for UI or logs.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Format used for user-supplied calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parses a stored calendar date.
///
/// Accepts `YYYY-MM-DD` and, for records written by older front ends, a full
/// RFC 3339 timestamp. Anything else yields `None`.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|stamp| stamp.date_naive())
        })
}

/// Renders a calendar date in the stored format.
pub fn format_calendar_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}
