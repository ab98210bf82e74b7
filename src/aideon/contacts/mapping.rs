use crate::aideon::contacts::error::{Result, SyncError};
use crate::aideon::contacts::model::{
    Address, Biography, ContactBody, EmailAddress, LocalRecord, Name, Organization, PhoneNumber,
    UserDefined,
};

/// Zero-based column positions of the address book export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub given_name: usize,
    pub middle_name: usize,
    pub family_name: usize,
    pub notes: usize,
    pub email_work: usize,
    pub email_home: usize,
    pub phone_mobile: usize,
    pub phone_work: usize,
    pub phone_home: usize,
    pub address_home: usize,
    pub postal_code_home: usize,
    pub address_work: usize,
    pub postal_code_work: usize,
    pub org_name: usize,
    pub org_title: usize,
    pub department: usize,
    /// Minimum row width. The identifier and timestamp columns trail the
    /// mapped ones, so a well-formed row is wider than the last mapped field.
    pub width: usize,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            given_name: 1,
            middle_name: 2,
            family_name: 3,
            notes: 25,
            email_work: 30,
            email_home: 32,
            phone_mobile: 34,
            phone_work: 36,
            phone_home: 38,
            address_home: 40,
            postal_code_home: 45,
            address_work: 50,
            postal_code_work: 55,
            org_name: 58,
            org_title: 60,
            department: 61,
            width: 67,
        }
    }
}

impl ColumnLayout {
    /// Builds the remote contact body for a local row.
    ///
    /// Rows narrower than [`ColumnLayout::width`] yield
    /// [`SyncError::MalformedRecord`].
    pub fn contact_body(&self, record: &LocalRecord) -> Result<ContactBody> {
        if record.len() < self.width {
            return Err(SyncError::MalformedRecord {
                record_id: record.raw_id().map(str::to_string),
                fields: record.len(),
                required: self.width,
            });
        }

        let at = |index: usize| record.field(index).unwrap_or_default().to_string();

        Ok(ContactBody {
            etag: None,
            names: vec![Name {
                display_name: None,
                given_name: at(self.given_name),
                middle_name: at(self.middle_name),
                family_name: at(self.family_name),
            }],
            email_addresses: vec![
                EmailAddress {
                    value: at(self.email_work),
                    kind: "work".into(),
                },
                EmailAddress {
                    value: at(self.email_home),
                    kind: "home".into(),
                },
            ],
            phone_numbers: vec![
                PhoneNumber {
                    value: at(self.phone_mobile),
                    kind: "mobile".into(),
                },
                PhoneNumber {
                    value: at(self.phone_home),
                    kind: "home".into(),
                },
                PhoneNumber {
                    value: at(self.phone_work),
                    kind: "work".into(),
                },
            ],
            addresses: vec![
                Address {
                    street_address: at(self.address_home),
                    postal_code: at(self.postal_code_home),
                    kind: "home".into(),
                },
                Address {
                    street_address: at(self.address_work),
                    postal_code: at(self.postal_code_work),
                    kind: "work".into(),
                },
            ],
            organizations: vec![
                Organization {
                    name: Some(at(self.org_name)),
                    title: Some(at(self.org_title)),
                    department: None,
                },
                Organization {
                    department: Some(at(self.department)),
                    ..Organization::default()
                },
            ],
            biographies: vec![Biography {
                value: at(self.notes),
            }],
            user_defined: vec![UserDefined {
                key: record.raw_id().unwrap_or_default().to_string(),
                value: record.modified_at().unwrap_or_default().to_string(),
            }],
        })
    }

    /// Short human label for log lines: `given family`.
    pub fn label(&self, record: &LocalRecord) -> String {
        let given = record.field(self.given_name).unwrap_or_default();
        let family = record.field(self.family_name).unwrap_or_default();
        format!("{given} {family}").trim().to_string()
    }
}
