//! Models Module - Data Structures & Configuration
//!
//! Registry records, error taxonomy and runtime configuration.

pub mod config;
pub mod errors;
pub mod types;

pub use config::*;
pub use errors::*;
pub use types::*;
