use serde::{Deserialize, Serialize};

/// Body sent to the contacts service when creating or updating a contact.
///
/// Field names follow the People API `Person` resource.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default)]
    pub names: Vec<Name>,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    #[serde(default)]
    pub phone_numbers: Vec<PhoneNumber>,
    #[serde(default)]
    pub addresses: Vec<Address>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub biographies: Vec<Biography>,
    #[serde(default)]
    pub user_defined: Vec<UserDefined>,
}

impl ContactBody {
    /// Person fields written by this tool, as expected by `updatePersonFields`.
    pub const UPDATE_FIELDS: &'static str =
        "names,emailAddresses,phoneNumbers,addresses,organizations,biographies,userDefined";

    /// The synchronisation pair, if present.
    pub fn sync_pair(&self) -> Option<&UserDefined> {
        self.user_defined.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub given_name: String,
    #[serde(default)]
    pub middle_name: String,
    #[serde(default)]
    pub family_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailAddress {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub value: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Unstructured street address as exported by the address book.
    pub street_address: String,
    pub postal_code: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Organization entry. The address book keeps the department apart from
/// the name and title, so it is sent as a second entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Organization {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

/// Free-text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Biography {
    pub value: String,
}

/// Generic key/value attribute used to carry the external identifier
/// (key) and the last-modified timestamp (value).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UserDefined {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}
