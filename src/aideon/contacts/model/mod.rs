use std::fmt;

use serde::{Deserialize, Serialize};

mod person;

pub use person::{
    Address, Biography, ContactBody, EmailAddress, Name, Organization, PhoneNumber, UserDefined,
};

/// Numeric key embedded in every local row and mirrored into the remote
/// contact's user-defined attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExternalId(pub u64);

impl ExternalId {
    /// Parses an identifier read from the address book. Only plain ASCII
    /// digits are accepted, signs and whitespace are rejected.
    pub fn parse_local(raw: &str) -> Option<Self> {
        if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        raw.parse().ok().map(ExternalId)
    }

    /// Parses an identifier read back from a remote contact's user-defined
    /// key. Surrounding whitespace is tolerated.
    pub fn parse_remote(raw: &str) -> Option<Self> {
        raw.trim().parse().ok().map(ExternalId)
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One row of the address book export, header excluded.
///
/// The schema is positional and not enforced. The two trailing fields hold
/// the external identifier and the last-modified timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalRecord {
    fields: Vec<String>,
}

impl LocalRecord {
    /// Wraps the raw fields of one row.
    pub fn new(fields: Vec<String>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field at a zero-based column position.
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }

    /// Field counted from the end of the row, `1` being the last column.
    pub fn trailing(&self, from_end: usize) -> Option<&str> {
        if from_end == 0 || from_end > self.fields.len() {
            return None;
        }
        self.field(self.fields.len() - from_end)
    }

    /// Raw identifier column, whether or not it is numeric.
    pub fn raw_id(&self) -> Option<&str> {
        self.trailing(2)
    }

    /// The identifier as used for matching, when it is a non-negative integer.
    pub fn external_id(&self) -> Option<ExternalId> {
        self.raw_id().and_then(ExternalId::parse_local)
    }

    /// Raw last-modified timestamp column.
    pub fn modified_at(&self) -> Option<&str> {
        self.trailing(1)
    }
}

impl From<Vec<String>> for LocalRecord {
    fn from(fields: Vec<String>) -> Self {
        Self::new(fields)
    }
}

/// A contact as listed by the remote service, restricted to the fields the
/// reconciliation needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RemoteContact {
    /// Opaque remote identifier, e.g. `people/c123`.
    pub resource_name: String,
    /// Version tag required by in-place updates.
    pub etag: Option<String>,
    /// Display name of the first name entry, if any.
    pub display_name: Option<String>,
    /// First user-defined key/value pair carrying the synchronisation metadata.
    pub user_defined: Option<UserDefined>,
}

impl RemoteContact {
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            ..Self::default()
        }
    }

    /// Attaches the synchronisation key/value pair.
    pub fn with_user_defined(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.user_defined = Some(UserDefined {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    /// Identifier carried in the user-defined key, used only for log lines.
    pub fn record_key(&self) -> Option<&str> {
        self.user_defined.as_ref().map(|pair| pair.key.as_str())
    }
}

/// A contact group created on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactGroup {
    pub resource_name: String,
    #[serde(default)]
    pub name: Option<String>,
}
