//! Command channel between the UI-facing bridge and the privileged host.
//!
//! Requests are addressed by operation name and answered on a per-request
//! oneshot. The bridge holds the sending half; the host drains the other.

pub mod bridge;
pub mod errors;
pub mod types;

pub use bridge::{channel, Bridge};
pub use errors::BridgeError;
pub use types::{Envelope, Operation, Reply, Request};
