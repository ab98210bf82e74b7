//! Core library for the aideon-contacts command line application.
//!
//! The library reconciles a local address-book export against a remote
//! contacts service. Responsibilities are kept narrow: the CSV reader lives
//! under [`aideon::contacts::io`], record and contact representations inside
//! [`aideon::contacts::model`], the remote service seam in
//! [`aideon::contacts::directory`], and the decision sweep in
//! [`aideon::contacts::reconcile`]. [`aideon::contacts::sync`] wires them
//! together for the command-line interface.

pub mod aideon;

pub use aideon::contacts::{
    Result, SyncError, auth, config, directory, erase, error, io, mapping, model, reconcile, sync,
    timestamp,
};
