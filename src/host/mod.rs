//! Privileged host — the only component that touches the filesystem or
//! shows native dialogs.
//!
//! This module handles:
//! - Resolving the data directory once per run (`paths`)
//! - Named JSON documents and imported workbooks on disk (`store`)
//! - Native open/save dialogs (`dialog`)
//! - Dispatching bridge requests and serving the command channel (`service`)

pub mod dialog;
pub mod errors;
pub mod paths;
pub mod service;
pub mod store;

pub use errors::HostError;
pub use paths::{DataDirs, RunMode};
pub use service::Host;
pub use store::DocumentStore;
