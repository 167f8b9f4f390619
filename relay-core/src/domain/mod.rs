//! Core domain types
//!
//! Types describing remote jobs and the lifecycle of a poller driving one.
//! Shared between the poller (state machine), the client (wire access) and the CLI.

pub mod handle;
pub mod status;
pub mod tool;
