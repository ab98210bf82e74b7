//! Seam between the reconciliation logic and the remote contacts service.
//!
//! [`ContactDirectory`] is the contract every backend honours. Failures are
//! not classified beyond [`SyncError`](crate::SyncError); callers decide
//! whether a failure is fatal.

use crate::aideon::contacts::error::Result;
use crate::aideon::contacts::model::{ContactBody, ContactGroup, RemoteContact};

pub mod dry_run;
pub mod memory;
pub mod people;

pub use dry_run::DryRun;
pub use memory::{Call, MemoryDirectory};
pub use people::PeopleClient;

/// Operations offered by a remote contacts store.
pub trait ContactDirectory {
    /// Lists every contact, following continuation tokens until the last page.
    fn list_all(&mut self) -> Result<Vec<RemoteContact>>;

    /// Creates one contact and returns its resource name.
    fn create(&mut self, body: &ContactBody) -> Result<String>;

    /// Overwrites an existing contact in place. Requires the listed etag.
    fn update(&mut self, contact: &RemoteContact, body: &ContactBody) -> Result<()>;

    /// Deletes one contact.
    fn delete(&mut self, resource_name: &str) -> Result<()>;

    fn create_group(&mut self, name: &str) -> Result<ContactGroup>;

    fn add_members(&mut self, group: &str, resource_names: &[String]) -> Result<()>;

    /// Deletes a group, and its members too when `delete_contacts` is set.
    fn delete_group(&mut self, group: &str, delete_contacts: bool) -> Result<()>;
}

impl<D: ContactDirectory + ?Sized> ContactDirectory for &mut D {
    fn list_all(&mut self) -> Result<Vec<RemoteContact>> {
        (**self).list_all()
    }

    fn create(&mut self, body: &ContactBody) -> Result<String> {
        (**self).create(body)
    }

    fn update(&mut self, contact: &RemoteContact, body: &ContactBody) -> Result<()> {
        (**self).update(contact, body)
    }

    fn delete(&mut self, resource_name: &str) -> Result<()> {
        (**self).delete(resource_name)
    }

    fn create_group(&mut self, name: &str) -> Result<ContactGroup> {
        (**self).create_group(name)
    }

    fn add_members(&mut self, group: &str, resource_names: &[String]) -> Result<()> {
        (**self).add_members(group, resource_names)
    }

    fn delete_group(&mut self, group: &str, delete_contacts: bool) -> Result<()> {
        (**self).delete_group(group, delete_contacts)
    }
}
