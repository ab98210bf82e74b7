use std::collections::BTreeMap;

use crate::aideon::contacts::directory::ContactDirectory;
use crate::aideon::contacts::error::{Result, SyncError};
use crate::aideon::contacts::model::{ContactBody, ContactGroup, RemoteContact};

/// A call received by [`MemoryDirectory`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListAll,
    Create(ContactBody),
    Update {
        resource_name: String,
        body: ContactBody,
    },
    Delete(String),
    CreateGroup(String),
    AddMembers {
        group: String,
        resource_names: Vec<String>,
    },
    DeleteGroup {
        group: String,
        delete_contacts: bool,
    },
}

#[derive(Debug, Clone)]
struct Group {
    name: String,
    members: Vec<String>,
}

/// In-process contacts store that records every call it receives.
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    contacts: Vec<RemoteContact>,
    groups: BTreeMap<String, Group>,
    calls: Vec<Call>,
    next_id: u64,
    /// Number of upcoming `add_members` calls that fail with a 404.
    pending_member_failures: u32,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a contact as if it already existed remotely. Not recorded as a call.
    pub fn insert(&mut self, contact: RemoteContact) {
        self.contacts.push(contact);
    }

    /// Convenience seed for a contact carrying the synchronisation pair.
    pub fn insert_synced(&mut self, id: &str, modified: &str) -> String {
        let resource_name = self.allocate();
        self.insert(RemoteContact::new(&resource_name).with_user_defined(id, modified));
        resource_name
    }

    /// Makes the next `count` membership changes fail, the way the service
    /// does while a freshly created group has not propagated yet.
    pub fn fail_next_member_changes(&mut self, count: u32) {
        self.pending_member_failures = count;
    }

    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Calls that change remote state.
    pub fn mutations(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| !matches!(call, Call::ListAll))
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub fn contacts(&self) -> &[RemoteContact] {
        &self.contacts
    }

    pub fn find_by_key(&self, key: &str) -> Option<&RemoteContact> {
        self.contacts
            .iter()
            .find(|contact| contact.record_key() == Some(key))
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn allocate(&mut self) -> String {
        self.next_id += 1;
        format!("people/c{:06}", self.next_id)
    }

    fn not_found(what: &str) -> SyncError {
        SyncError::Api {
            status: 404,
            message: format!("{what} not found"),
        }
    }

    fn to_contact(resource_name: String, body: &ContactBody, version: u64) -> RemoteContact {
        let display_name = body
            .names
            .first()
            .map(|name| format!("{} {}", name.given_name, name.family_name).trim().to_string())
            .filter(|name| !name.is_empty());
        RemoteContact {
            resource_name,
            etag: Some(format!("etag-{version}")),
            display_name,
            user_defined: body.sync_pair().cloned(),
        }
    }
}

impl ContactDirectory for MemoryDirectory {
    fn list_all(&mut self) -> Result<Vec<RemoteContact>> {
        self.calls.push(Call::ListAll);
        Ok(self.contacts.clone())
    }

    fn create(&mut self, body: &ContactBody) -> Result<String> {
        self.calls.push(Call::Create(body.clone()));
        let resource_name = self.allocate();
        let contact = Self::to_contact(resource_name.clone(), body, self.next_id);
        self.contacts.push(contact);
        Ok(resource_name)
    }

    fn update(&mut self, contact: &RemoteContact, body: &ContactBody) -> Result<()> {
        self.calls.push(Call::Update {
            resource_name: contact.resource_name.clone(),
            body: body.clone(),
        });
        self.next_id += 1;
        let version = self.next_id;
        let existing = self
            .contacts
            .iter_mut()
            .find(|existing| existing.resource_name == contact.resource_name)
            .ok_or_else(|| Self::not_found(&contact.resource_name))?;
        if existing.etag != contact.etag {
            return Err(SyncError::Api {
                status: 400,
                message: "etag mismatch".into(),
            });
        }
        *existing = Self::to_contact(contact.resource_name.clone(), body, version);
        Ok(())
    }

    fn delete(&mut self, resource_name: &str) -> Result<()> {
        self.calls.push(Call::Delete(resource_name.to_string()));
        let before = self.contacts.len();
        self.contacts
            .retain(|contact| contact.resource_name != resource_name);
        if self.contacts.len() == before {
            return Err(Self::not_found(resource_name));
        }
        Ok(())
    }

    fn create_group(&mut self, name: &str) -> Result<ContactGroup> {
        self.calls.push(Call::CreateGroup(name.to_string()));
        self.next_id += 1;
        let resource_name = format!("contactGroups/g{:06}", self.next_id);
        self.groups.insert(
            resource_name.clone(),
            Group {
                name: name.to_string(),
                members: Vec::new(),
            },
        );
        Ok(ContactGroup {
            resource_name,
            name: Some(name.to_string()),
        })
    }

    fn add_members(&mut self, group: &str, resource_names: &[String]) -> Result<()> {
        self.calls.push(Call::AddMembers {
            group: group.to_string(),
            resource_names: resource_names.to_vec(),
        });
        if self.pending_member_failures > 0 {
            self.pending_member_failures -= 1;
            return Err(Self::not_found(group));
        }
        let entry = self
            .groups
            .get_mut(group)
            .ok_or_else(|| Self::not_found(group))?;
        for resource_name in resource_names {
            if !entry.members.contains(resource_name) {
                entry.members.push(resource_name.clone());
            }
        }
        Ok(())
    }

    fn delete_group(&mut self, group: &str, delete_contacts: bool) -> Result<()> {
        self.calls.push(Call::DeleteGroup {
            group: group.to_string(),
            delete_contacts,
        });
        let removed = self
            .groups
            .remove(group)
            .ok_or_else(|| Self::not_found(group))?;
        if delete_contacts {
            self.contacts
                .retain(|contact| !removed.members.contains(&contact.resource_name));
        }
        tracing::trace!(group = %removed.name, "group removed");
        Ok(())
    }
}
