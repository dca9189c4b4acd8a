pub mod cleanup;
pub mod compress;
pub mod files;
pub mod system;
