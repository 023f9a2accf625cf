//! Constants Module - Single Source of Truth
//!
//! Every tunable number, weight, threshold and default used by the
//! scoring engine and the API lives here.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "DomaVault";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for registry requests
pub const USER_AGENT: &str = concat!("DomaVault/", env!("CARGO_PKG_VERSION"));

// ============================================
// REGISTRY CONSTANTS
// ============================================

/// Default Doma GraphQL endpoint (testnet)
pub const DEFAULT_DOMA_ENDPOINT: &str = "https://api-testnet.doma.xyz/graphql";

/// Default timeout for registry requests (seconds)
pub const DEFAULT_DOMA_TIMEOUT_SECS: u64 = 10;

/// Page size requested for token activity history
pub const TOKEN_ACTIVITY_PAGE_SIZE: u32 = 100;

/// Data source label reported in analysis metadata
pub const DATA_SOURCE_LABEL: &str = "Doma Subgraph";

/// Data source label when demo data was substituted
pub const DEMO_DATA_SOURCE_LABEL: &str = "Demo dataset";

// ============================================
// SERVER CONSTANTS
// ============================================

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

/// Default rate limit window (milliseconds)
pub const DEFAULT_RATE_LIMIT_WINDOW_MS: u64 = 60_000;

/// Default requests allowed per window
pub const DEFAULT_RATE_LIMIT_MAX_REQUESTS: u32 = 30;

/// Default number of analyses run at once for batch/compare
pub const DEFAULT_BATCH_CONCURRENCY: usize = 5;

/// Maximum domains per batch request
pub const MAX_BATCH_DOMAINS: usize = 10;

/// Minimum and maximum domains per comparison
pub const MIN_COMPARE_DOMAINS: usize = 2;
pub const MAX_COMPARE_DOMAINS: usize = 5;

/// TLDs advertised by `/api/supported-tlds`
pub const SUPPORTED_TLDS: [&str; 6] = ["eth", "crypto", "blockchain", "nft", "dao", "web3"];

// ============================================
// PRICING
// ============================================

/// Fallback ETH/USD price used to value collateral
pub const DEFAULT_ETH_USD_PRICE: f64 = 2800.0;

/// USD value per domain-quality point when there is no sale history
pub const QUALITY_POINT_USD: f64 = 50.0;

// ============================================
// CREDIT SCORE WEIGHTS
// ============================================

pub const WEIGHT_TOKEN_ACTIVITY: f64 = 0.25;
pub const WEIGHT_NAME_ACTIVITY: f64 = 0.15;
pub const WEIGHT_LIQUIDITY: f64 = 0.15;
pub const WEIGHT_OWNERSHIP: f64 = 0.10;
pub const WEIGHT_DOMAIN_QUALITY: f64 = 0.20;
pub const WEIGHT_MARKET_DEMAND: f64 = 0.10;
pub const WEIGHT_WEB_PRESENCE: f64 = 0.05;

/// Fixed market demand component (no live data source)
pub const MARKET_DEMAND_SCORE: u32 = 75;

/// Fixed web presence component (no live data source)
pub const WEB_PRESENCE_SCORE: u32 = 60;

/// Quick score weights (name activity + domain quality only)
pub const QUICK_WEIGHT_NAME_ACTIVITY: f64 = 0.4;
pub const QUICK_WEIGHT_DOMAIN_QUALITY: f64 = 0.6;

/// Sub-scores are 0-100, the overall score is scaled to 0-1000
pub const SCORE_SCALE: u32 = 10;

// ============================================
// LENDING / STAKING TERMS
// ============================================

/// Minimum overall score for automatic loan approval
pub const LOAN_APPROVAL_THRESHOLD: u32 = 600;

/// Minimum overall score for staking
pub const STAKING_THRESHOLD: u32 = 500;

pub const STAKING_LOCK_PERIOD: &str = "30 days";

/// Early withdrawal penalty in percent
pub const EARLY_WITHDRAWAL_PENALTY: u32 = 5;

// ============================================
// DEMO DATASET
// ============================================

/// Wallet used as owner/claimant throughout the demo dataset
pub const DEMO_OWNER_ADDRESS: &str = "0x1234567890abcdef1234567890abcdef12345678";

/// Token id of the demo token
pub const DEMO_TOKEN_ID: &str = "12345";

/// TLD assumed when the requested name has none
pub const DEMO_DEFAULT_TLD: &str = "eth";
