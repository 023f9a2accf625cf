//! Core Module - Scoring Engine
//!
//! Activity scoring, market metrics, the credit score and the analyzer
//! that ties them to registry data.

pub mod activity_score;
pub mod analyzer;
pub mod credit_score;
pub mod metrics;

pub use activity_score::*;
pub use analyzer::*;
pub use credit_score::*;
pub use metrics::*;
