//! Relay Core
//!
//! Core types shared by the Relay task poller, the media API client and the CLI.
//!
//! This crate contains:
//! - Domain types: job handles, poller lifecycle, the tools the media API hosts
//! - DTOs: the wire shapes of the start and status endpoints

pub mod domain;
pub mod dto;
