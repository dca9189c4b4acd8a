//! Bytesweep Database Layer
//!
//! Repository implementations over PostgreSQL for file records, system stat
//! snapshots and disk capacity records.

pub mod db;

pub use db::*;
