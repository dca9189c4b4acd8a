//! Data models for the application
//!
//! This module contains the data structures shared by the repositories and the
//! HTTP layer, organized by feature area.

mod cleanup;
mod file;
mod system;

pub use cleanup::*;
pub use file::*;
pub use system::*;
