//! DomaVault Library
//!
//! Collateral analytics for tokenized domains on the Doma registry:
//! - Creditworthiness score (0-1000) from on-chain activity and name quality
//! - Risk tier, collateral value and maximum loan
//! - Lending and staking recommendations
//! - Demo dataset when the registry rejects our credentials

pub mod api;
pub mod core;
pub mod models;
pub mod providers;
pub mod utils;

pub use crate::core::analyzer::{compare, Comparison, DomainAnalysis, DomainAnalyzer, QuickScore};
pub use crate::core::credit_score::{CreditScore, CreditScoreBuilder};
pub use models::config::AppConfig;
pub use models::errors::{AppError, AppResult, ErrorCode};
pub use models::types::RiskTier;
pub use providers::doma::DomaClient;
