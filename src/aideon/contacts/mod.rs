pub mod auth;
pub mod config;
pub mod directory;
pub mod erase;
pub mod error;
pub mod io;
pub mod mapping;
pub mod model;
pub mod reconcile;
pub mod sync;
pub mod timestamp;

pub use error::{Result, SyncError};
