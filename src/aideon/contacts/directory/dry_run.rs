use tracing::info;

use crate::aideon::contacts::directory::ContactDirectory;
use crate::aideon::contacts::error::Result;
use crate::aideon::contacts::model::{ContactBody, ContactGroup, RemoteContact};

/// Reads through to the wrapped directory but only logs mutations.
#[derive(Debug)]
pub struct DryRun<D> {
    inner: D,
    suppressed: usize,
}

impl<D: ContactDirectory> DryRun<D> {
    pub fn new(inner: D) -> Self {
        Self {
            inner,
            suppressed: 0,
        }
    }

    /// Number of mutations that were logged instead of sent.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    pub fn into_inner(self) -> D {
        self.inner
    }

    fn placeholder(&mut self, prefix: &str) -> String {
        self.suppressed += 1;
        format!("{prefix}/dry-run-{}", self.suppressed)
    }
}

impl<D: ContactDirectory> ContactDirectory for DryRun<D> {
    fn list_all(&mut self) -> Result<Vec<RemoteContact>> {
        self.inner.list_all()
    }

    fn create(&mut self, body: &ContactBody) -> Result<String> {
        let key = body.sync_pair().map(|pair| pair.key.as_str()).unwrap_or_default();
        info!(record_id = key, "dry run: would create contact");
        Ok(self.placeholder("people"))
    }

    fn update(&mut self, contact: &RemoteContact, _body: &ContactBody) -> Result<()> {
        info!(resource_name = %contact.resource_name, "dry run: would update contact");
        self.suppressed += 1;
        Ok(())
    }

    fn delete(&mut self, resource_name: &str) -> Result<()> {
        info!(resource_name, "dry run: would delete contact");
        self.suppressed += 1;
        Ok(())
    }

    fn create_group(&mut self, name: &str) -> Result<ContactGroup> {
        info!(group = name, "dry run: would create contact group");
        Ok(ContactGroup {
            resource_name: self.placeholder("contactGroups"),
            name: Some(name.to_string()),
        })
    }

    fn add_members(&mut self, group: &str, resource_names: &[String]) -> Result<()> {
        info!(group, count = resource_names.len(), "dry run: would move contacts into group");
        self.suppressed += 1;
        Ok(())
    }

    fn delete_group(&mut self, group: &str, delete_contacts: bool) -> Result<()> {
        info!(group, delete_contacts, "dry run: would delete contact group");
        self.suppressed += 1;
        Ok(())
    }
}
