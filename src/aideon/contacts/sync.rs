use std::path::Path;

use tracing::{info, instrument};

use crate::aideon::contacts::auth::TokenStore;
use crate::aideon::contacts::config::SyncConfig;
use crate::aideon::contacts::directory::{ContactDirectory, PeopleClient};
use crate::aideon::contacts::error::{Result, SyncError};
use crate::aideon::contacts::io::csv_read;
use crate::aideon::contacts::reconcile::{ReconcileOptions, Reconciler, RunSummary};

/// Builds a People API client authorized with the persisted token.
pub fn connect(config: &SyncConfig) -> Result<PeopleClient> {
    let tokens = TokenStore::new(config.token.clone(), config.client_secret.clone())?;
    PeopleClient::from_config(config, Box::new(tokens))
}

/// Reconciles the address book at `input` into `directory`.
#[instrument(level = "info", skip_all, fields(input = %input.display()))]
pub fn sync_file<D: ContactDirectory>(
    input: &Path,
    directory: D,
    options: ReconcileOptions,
) -> Result<RunSummary> {
    if !input.exists() {
        return Err(SyncError::MissingInput(input.to_path_buf()));
    }
    let records = csv_read::read_records(input)?;
    info!(record_count = records.len(), "read address book");

    let summary = Reconciler::new(directory, options).run(&records)?;
    info!(
        created = summary.created(),
        updated = summary.updated(),
        deleted = summary.deleted(),
        unchanged = summary.unchanged(),
        malformed = summary.malformed(),
        corrupted = summary.corrupted(),
        skipped = summary.skipped(),
        "update completed"
    );
    Ok(summary)
}

/// One line per address book row: `no.N [fields]`.
pub fn list_local(input: &Path) -> Result<Vec<String>> {
    if !input.exists() {
        return Err(SyncError::MissingInput(input.to_path_buf()));
    }
    let records = csv_read::read_records(input)?;
    Ok(records
        .iter()
        .enumerate()
        .map(|(i, record)| format!("no.{} {:?}", i + 1, record.fields()))
        .collect())
}

/// One line per remote contact: `no.N <display name> <resource name>`.
pub fn list_remote<D: ContactDirectory>(directory: &mut D) -> Result<Vec<String>> {
    let contacts = directory.list_all()?;
    if contacts.is_empty() {
        return Ok(vec!["No connections found.".to_string()]);
    }
    Ok(contacts
        .iter()
        .enumerate()
        .map(|(i, contact)| {
            format!(
                "no.{} {} {}",
                i + 1,
                contact.display_name.as_deref().unwrap_or("-"),
                contact.resource_name
            )
        })
        .collect())
}
