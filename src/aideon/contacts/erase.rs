//! Bulk removal of every remote contact.
//!
//! The contacts service has no delete-all operation. Instead every contact is
//! moved into a freshly created temporary group, and the group is deleted
//! together with its members. An interrupted run leaves the group and its
//! members behind for the next run to clean up.

use std::thread;
use std::time::Duration;

use tracing::{info, instrument, warn};

use crate::aideon::contacts::config::EraseConfig;
use crate::aideon::contacts::directory::ContactDirectory;
use crate::aideon::contacts::error::Result;

/// What a bulk erase did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EraseSummary {
    /// Resource name of the temporary group.
    pub group: String,
    /// Contacts moved into the group, and thus deleted with it.
    pub moved: usize,
}

/// Sleeps between attempts. Swapped out in tests.
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Pause for ThreadSleep {
    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Removes every contact from `directory`.
pub fn erase_all<D: ContactDirectory>(directory: &mut D, config: &EraseConfig) -> Result<EraseSummary> {
    erase_all_with(directory, config, &mut ThreadSleep)
}

/// [`erase_all`] with an explicit way of waiting.
#[instrument(level = "info", skip_all, fields(group_name = %config.group_name))]
pub fn erase_all_with<D: ContactDirectory, P: Pause>(
    directory: &mut D,
    config: &EraseConfig,
    pause: &mut P,
) -> Result<EraseSummary> {
    let group = directory.create_group(&config.group_name)?;
    info!(group = %group.resource_name, "created temporary group, waiting for it to propagate");
    pause.pause(config.grace());

    let contacts = directory.list_all()?;
    if contacts.is_empty() {
        info!("no connections found");
    }

    let mut moved = 0;
    for contact in &contacts {
        move_into_group(
            directory,
            &group.resource_name,
            &contact.resource_name,
            config,
            pause,
        )?;
        moved += 1;
        info!(resource_name = %contact.resource_name, "moved to the temporary group");
    }

    directory.delete_group(&group.resource_name, true)?;
    info!(moved, "all contacts have been deleted");
    Ok(EraseSummary {
        group: group.resource_name,
        moved,
    })
}

fn move_into_group<D: ContactDirectory, P: Pause>(
    directory: &mut D,
    group: &str,
    resource_name: &str,
    config: &EraseConfig,
    pause: &mut P,
) -> Result<()> {
    let members = [resource_name.to_string()];
    let mut delay = config.backoff();
    let mut attempt = 1;
    loop {
        match directory.add_members(group, &members) {
            Ok(()) => return Ok(()),
            Err(error) if attempt < config.max_attempts => {
                warn!(
                    resource_name,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    %error,
                    "moving contact into group failed, retrying"
                );
                pause.pause(delay);
                delay = delay.saturating_mul(2);
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
