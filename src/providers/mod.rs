//! Providers Module - External Data Sources
//!
//! Data paths: the Doma GraphQL registry, and the demo dataset that stands
//! in for it when credentials are rejected.

pub mod demo;
pub mod doma;

pub use demo::*;
pub use doma::*;
