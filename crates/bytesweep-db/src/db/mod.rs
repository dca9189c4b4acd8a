//! Database repositories for data access layer
//!
//! Each repository owns a clone of the connection pool and is responsible for
//! a single table.

pub mod disk;
pub mod file;
pub mod stats;

pub use disk::DiskRepository;
pub use file::FileRepository;
pub use stats::StatsRepository;
