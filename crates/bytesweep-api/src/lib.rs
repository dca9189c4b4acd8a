//! Bytesweep API Library
//!
//! HTTP handlers, error mapping and application setup for the Bytesweep
//! server. The binary in `main.rs` only loads configuration and serves.

mod api_doc;
pub mod constants;
mod handlers;
mod utils;

pub mod error;
pub mod setup;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
