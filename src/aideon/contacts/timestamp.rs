//! Last-modified timestamps as written by the address book export.
//!
//! Values look like `2023/01/01 10:00` or `2023/01/01 10:00:30`. Minute
//! precision values are normalized to `:00` seconds before comparison.

use std::borrow::Cow;

use chrono::NaiveDateTime;

/// Format every timestamp is parsed with after normalization.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Appends `:00` when the value carries hours and minutes only.
pub fn normalize(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    if trimmed.matches(':').count() == 1 {
        Cow::Owned(format!("{trimmed}:00"))
    } else {
        Cow::Borrowed(trimmed)
    }
}

/// Normalizes and parses a timestamp. `None` means the value is malformed.
pub fn parse_modified(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(&normalize(raw), TIMESTAMP_FORMAT).ok()
}

/// Outcome of comparing a remote timestamp against the local one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The remote copy is strictly older and must be replaced.
    RemoteOlder,
    /// The remote copy is as recent as the local one, or newer.
    UpToDate,
    /// At least one side could not be parsed. Treated as needing an update.
    Malformed,
}

impl Freshness {
    pub fn needs_update(self) -> bool {
        !matches!(self, Freshness::UpToDate)
    }
}

/// Compares the remote and local last-modified values.
pub fn compare(remote: Option<&str>, local: Option<&str>) -> Freshness {
    match (remote.and_then(parse_modified), local.and_then(parse_modified)) {
        (Some(remote), Some(local)) if remote < local => Freshness::RemoteOlder,
        (Some(_), Some(_)) => Freshness::UpToDate,
        _ => Freshness::Malformed,
    }
}
