//! Data Transfer Objects for the remote job API
//!
//! The media API answers loosely typed JSON. These DTOs accept every shape the
//! API is known to produce and expose typed accessors on top.

pub mod task;
