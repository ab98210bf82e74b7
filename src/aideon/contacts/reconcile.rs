//! One-way reconciliation of the address book into the contacts service.
//!
//! Local rows are indexed by external identifier, the full remote listing is
//! swept once, and whatever local rows were never matched get uploaded:
//!
//! * remote key absent: left alone
//! * remote key not an integer: remote deleted
//! * no local row for the key: remote deleted
//! * remote timestamp older than local, or either unparseable: replaced
//! * otherwise: left alone
//!
//! Per-record data problems end up as [`Outcome`]s. Service failures
//! propagate and abort the run, leaving the remote side partially
//! reconciled; the next run recomputes everything from scratch.

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::aideon::contacts::config::UpdateMode;
use crate::aideon::contacts::directory::ContactDirectory;
use crate::aideon::contacts::error::{Result, SyncError};
use crate::aideon::contacts::mapping::ColumnLayout;
use crate::aideon::contacts::model::{ExternalId, LocalRecord, RemoteContact};
use crate::aideon::contacts::timestamp::{self, Freshness};

/// Decision taken for one local row or remote contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Local-only row uploaded.
    Created {
        id: ExternalId,
        resource_name: String,
    },
    /// Remote contact without a local counterpart removed.
    Deleted {
        id: ExternalId,
        resource_name: String,
        display_name: Option<String>,
    },
    /// Remote contact replaced (or updated in place) from a newer local row.
    Updated {
        id: ExternalId,
        resource_name: String,
        in_place: bool,
    },
    /// Matched pair already up to date.
    Unchanged { id: ExternalId },
    /// Local row too short to build a remote body. Nothing was sent for it.
    SkippedMalformed {
        id: Option<String>,
        fields: usize,
        required: usize,
    },
    /// Remote key was not an integer; the remote contact was deleted.
    Corrupted { key: String, resource_name: String },
    /// Remote contact carries no synchronisation key and was left alone.
    SkippedUnkeyed {
        resource_name: String,
        display_name: Option<String>,
    },
    /// Local row whose identifier is not a non-negative integer. Never uploaded.
    SkippedInvalidId { row: usize, raw_id: Option<String> },
}

impl Outcome {
    /// Whether the remote side was changed.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Outcome::Created { .. }
                | Outcome::Deleted { .. }
                | Outcome::Updated { .. }
                | Outcome::Corrupted { .. }
        )
    }
}

/// Every decision of one run, in the order they were taken.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<Outcome>,
}

impl RunSummary {
    fn count(&self, predicate: impl Fn(&Outcome) -> bool) -> usize {
        self.outcomes.iter().filter(|outcome| predicate(outcome)).count()
    }

    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Created { .. }))
    }

    pub fn deleted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Deleted { .. }))
    }

    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Updated { .. }))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Unchanged { .. }))
    }

    pub fn malformed(&self) -> usize {
        self.count(|o| matches!(o, Outcome::SkippedMalformed { .. }))
    }

    pub fn corrupted(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Corrupted { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                Outcome::SkippedUnkeyed { .. } | Outcome::SkippedInvalidId { .. }
            )
        })
    }

    pub fn has_changes(&self) -> bool {
        self.outcomes.iter().any(Outcome::is_change)
    }
}

/// Knobs of a reconciliation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcileOptions {
    pub update_mode: UpdateMode,
    pub layout: ColumnLayout,
}

/// Runs the reconciliation sweep against a directory.
#[derive(Debug)]
pub struct Reconciler<D> {
    directory: D,
    options: ReconcileOptions,
}

impl<D: ContactDirectory> Reconciler<D> {
    pub fn new(directory: D, options: ReconcileOptions) -> Self {
        Self { directory, options }
    }

    pub fn directory(&self) -> &D {
        &self.directory
    }

    pub fn into_directory(self) -> D {
        self.directory
    }

    /// Reconciles the remote directory with `records`.
    #[instrument(level = "info", skip_all, fields(records = records.len()))]
    pub fn run(&mut self, records: &[LocalRecord]) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut index = build_index(records, &mut summary);

        let remote = self.directory.list_all()?;
        info!(count = remote.len(), "fetched remote contacts");

        for contact in &remote {
            let outcome = self.evaluate(contact, records, &mut index)?;
            summary.outcomes.push(outcome);
        }

        let mut local_only: Vec<(ExternalId, usize)> = index.into_iter().collect();
        local_only.sort_unstable();
        for (id, position) in local_only {
            let outcome = self.upload(id, &records[position])?;
            summary.outcomes.push(outcome);
        }

        Ok(summary)
    }

    fn evaluate(
        &mut self,
        contact: &RemoteContact,
        records: &[LocalRecord],
        index: &mut HashMap<ExternalId, usize>,
    ) -> Result<Outcome> {
        let Some(pair) = contact.user_defined.as_ref() else {
            info!(
                resource_name = %contact.resource_name,
                display_name = contact.display_name.as_deref().unwrap_or_default(),
                "remote contact has no id, leaving it alone"
            );
            return Ok(Outcome::SkippedUnkeyed {
                resource_name: contact.resource_name.clone(),
                display_name: contact.display_name.clone(),
            });
        };

        let Some(id) = ExternalId::parse_remote(&pair.key) else {
            warn!(
                key = %pair.key,
                resource_name = %contact.resource_name,
                "remote contact carries a corrupted id, deleting it"
            );
            self.directory.delete(&contact.resource_name)?;
            return Ok(Outcome::Corrupted {
                key: pair.key.clone(),
                resource_name: contact.resource_name.clone(),
            });
        };

        // Removing the entry marks it consumed so the upload pass skips it.
        let Some(position) = index.remove(&id) else {
            self.directory.delete(&contact.resource_name)?;
            info!(
                record_id = %id,
                display_name = contact.display_name.as_deref().unwrap_or_default(),
                "deleted contact absent from address book"
            );
            return Ok(Outcome::Deleted {
                id,
                resource_name: contact.resource_name.clone(),
                display_name: contact.display_name.clone(),
            });
        };

        let record = &records[position];
        match timestamp::compare(Some(pair.value.as_str()), record.modified_at()) {
            Freshness::UpToDate => Ok(Outcome::Unchanged { id }),
            freshness => {
                if freshness == Freshness::Malformed {
                    warn!(
                        record_id = %id,
                        remote = %pair.value,
                        local = record.modified_at().unwrap_or_default(),
                        "unparseable timestamp, forcing update"
                    );
                }
                self.replace(id, contact, record)
            }
        }
    }

    fn replace(
        &mut self,
        id: ExternalId,
        contact: &RemoteContact,
        record: &LocalRecord,
    ) -> Result<Outcome> {
        // Built before anything is deleted so a short row never loses the remote copy.
        let body = match self.options.layout.contact_body(record) {
            Ok(body) => body,
            Err(error) => return skipped_malformed(error),
        };

        let in_place = self.options.update_mode == UpdateMode::InPlace && contact.etag.is_some();
        let resource_name = if in_place {
            self.directory.update(contact, &body)?;
            contact.resource_name.clone()
        } else {
            self.directory.delete(&contact.resource_name)?;
            self.directory.create(&body)?
        };

        info!(
            record_id = %id,
            name = %self.options.layout.label(record),
            in_place,
            "updated contact"
        );
        Ok(Outcome::Updated {
            id,
            resource_name,
            in_place,
        })
    }

    fn upload(&mut self, id: ExternalId, record: &LocalRecord) -> Result<Outcome> {
        let body = match self.options.layout.contact_body(record) {
            Ok(body) => body,
            Err(error) => return skipped_malformed(error),
        };
        let resource_name = self.directory.create(&body)?;
        info!(
            record_id = %id,
            name = %self.options.layout.label(record),
            "uploaded contact"
        );
        Ok(Outcome::Created { id, resource_name })
    }
}

fn build_index(records: &[LocalRecord], summary: &mut RunSummary) -> HashMap<ExternalId, usize> {
    let mut index = HashMap::with_capacity(records.len());
    for (position, record) in records.iter().enumerate() {
        match record.external_id() {
            Some(id) => {
                if let Some(previous) = index.insert(id, position) {
                    warn!(
                        record_id = %id,
                        previous_row = previous + 1,
                        row = position + 1,
                        "duplicate id in address book, keeping the later row"
                    );
                }
            }
            None => {
                warn!(
                    row = position + 1,
                    raw_id = record.raw_id().unwrap_or_default(),
                    "address book row has no usable id, skipping it"
                );
                summary.outcomes.push(Outcome::SkippedInvalidId {
                    row: position + 1,
                    raw_id: record.raw_id().map(str::to_string),
                });
            }
        }
    }
    index
}

fn skipped_malformed(error: SyncError) -> Result<Outcome> {
    match error {
        SyncError::MalformedRecord {
            record_id,
            fields,
            required,
        } => {
            warn!(
                record_id = record_id.as_deref().unwrap_or_default(),
                fields,
                required,
                "record contains input errors, skipping it"
            );
            Ok(Outcome::SkippedMalformed {
                id: record_id,
                fields,
                required,
            })
        }
        other => Err(other),
    }
}
