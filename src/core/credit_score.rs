//! Credit Scoring Module
//! Combines 0-100 sub-scores into a 0-1000 creditworthiness score
//!
//! Score bands:
//! - 800-1000: Low Risk (75% LTV)
//! - 600-790: Medium Risk (60% LTV)
//! - 0-590: High Risk (40% LTV)

use serde::Serialize;

use crate::models::types::RiskTier;
use crate::utils::constants::{
    MARKET_DEMAND_SCORE, QUICK_WEIGHT_DOMAIN_QUALITY, QUICK_WEIGHT_NAME_ACTIVITY, SCORE_SCALE,
    WEB_PRESENCE_SCORE, WEIGHT_DOMAIN_QUALITY, WEIGHT_LIQUIDITY, WEIGHT_MARKET_DEMAND,
    WEIGHT_NAME_ACTIVITY, WEIGHT_OWNERSHIP, WEIGHT_TOKEN_ACTIVITY, WEIGHT_WEB_PRESENCE,
};

/// Overall creditworthiness of a domain (0-1000)
#[derive(Debug, Clone, Serialize)]
pub struct CreditScore {
    /// Overall score, always a multiple of 10
    pub total: u32,
    pub tier: RiskTier,
    pub components: CreditComponents,
    /// Detailed breakdown for transparency
    pub breakdown: Vec<ScoreFactor>,
}

/// Individual 0-100 components
#[derive(Debug, Clone, Serialize)]
pub struct CreditComponents {
    pub token_activity: u32,
    pub name_activity: u32,
    pub liquidity: u32,
    pub ownership: u32,
    pub domain_quality: u32,
    /// No live data source, fixed
    pub market_demand: u32,
    /// No live data source, fixed
    pub web_presence: u32,
}

impl Default for CreditComponents {
    fn default() -> Self {
        Self {
            token_activity: 0,
            name_activity: 0,
            liquidity: 0,
            ownership: 0,
            domain_quality: 0,
            market_demand: MARKET_DEMAND_SCORE,
            web_presence: WEB_PRESENCE_SCORE,
        }
    }
}

/// Individual factor contributing to score
#[derive(Debug, Clone, Serialize)]
pub struct ScoreFactor {
    pub name: String,
    pub score: u32,
    pub weight: f64,
    pub reason: String,
}

impl CreditScore {
    /// Weighted average of the components, scaled to 0-1000
    pub fn calculate(components: CreditComponents, factors: Vec<ScoreFactor>) -> Self {
        let weights = [
            (components.token_activity, WEIGHT_TOKEN_ACTIVITY),
            (components.name_activity, WEIGHT_NAME_ACTIVITY),
            (components.liquidity, WEIGHT_LIQUIDITY),
            (components.ownership, WEIGHT_OWNERSHIP),
            (components.domain_quality, WEIGHT_DOMAIN_QUALITY),
            (components.market_demand, WEIGHT_MARKET_DEMAND),
            (components.web_presence, WEIGHT_WEB_PRESENCE),
        ];

        let weighted: f64 = weights
            .iter()
            .map(|(score, weight)| (*score).min(100) as f64 * weight)
            .sum();

        let total = scale(weighted);

        Self {
            total,
            tier: RiskTier::from_score(total),
            components,
            breakdown: factors,
        }
    }

    /// Loan recommendation label
    pub fn loan_recommendation(&self) -> &'static str {
        if self.total >= crate::utils::constants::LOAN_APPROVAL_THRESHOLD {
            "Approved for lending"
        } else {
            "Requires manual review"
        }
    }

    /// Staking recommendation label
    pub fn staking_recommendation(&self) -> &'static str {
        if self.total >= crate::utils::constants::STAKING_THRESHOLD {
            "Qualified for staking"
        } else {
            "Not recommended"
        }
    }
}

/// Cheap estimate from name history and domain quality only (0-1000)
pub fn quick_score(name_activity: u32, domain_quality: u32) -> u32 {
    scale(
        name_activity.min(100) as f64 * QUICK_WEIGHT_NAME_ACTIVITY
            + domain_quality.min(100) as f64 * QUICK_WEIGHT_DOMAIN_QUALITY,
    )
}

/// Round a 0-100 weighted value and scale it to 0-1000
fn scale(weighted: f64) -> u32 {
    (weighted.round().clamp(0.0, 100.0) as u32) * SCORE_SCALE
}

/// Builder for creating credit scores from analysis results
pub struct CreditScoreBuilder {
    factors: Vec<ScoreFactor>,
    components: CreditComponents,
}

impl CreditScoreBuilder {
    pub fn new() -> Self {
        Self {
            factors: Vec::new(),
            components: CreditComponents::default(),
        }
    }

    /// Add token market activity score
    pub fn with_token_activity(mut self, score: u32, activity_count: usize) -> Self {
        self.components.token_activity = score;
        self.factors.push(ScoreFactor {
            name: "Token activity".to_string(),
            score,
            weight: WEIGHT_TOKEN_ACTIVITY,
            reason: format!("{} token activities on record", activity_count),
        });
        self
    }

    /// Add name registration history score
    pub fn with_name_activity(mut self, score: u32, activity_count: usize) -> Self {
        self.components.name_activity = score;
        self.factors.push(ScoreFactor {
            name: "Name activity".to_string(),
            score,
            weight: WEIGHT_NAME_ACTIVITY,
            reason: format!("{} name activities on record", activity_count),
        });
        self
    }

    /// Add secondary market liquidity
    pub fn with_liquidity(mut self, score: u32, total_volume: &str) -> Self {
        self.components.liquidity = score;
        self.factors.push(ScoreFactor {
            name: "Liquidity".to_string(),
            score,
            weight: WEIGHT_LIQUIDITY,
            reason: format!("Sales volume: {}", total_volume),
        });
        self
    }

    /// Add ownership stability
    pub fn with_ownership(mut self, score: u32, transfer_count: usize) -> Self {
        self.components.ownership = score;
        self.factors.push(ScoreFactor {
            name: "Ownership stability".to_string(),
            score,
            weight: WEIGHT_OWNERSHIP,
            reason: format!("{} transfers", transfer_count),
        });
        self
    }

    /// Add off-chain domain quality
    pub fn with_domain_quality(mut self, score: u32, length: usize) -> Self {
        self.components.domain_quality = score;
        self.factors.push(ScoreFactor {
            name: "Domain quality".to_string(),
            score,
            weight: WEIGHT_DOMAIN_QUALITY,
            reason: format!("Label length: {} characters", length),
        });
        self
    }

    /// Build final credit score
    pub fn build(self) -> CreditScore {
        CreditScore::calculate(self.components, self.factors)
    }
}

impl Default for CreditScoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_profile_is_medium_risk() {
        let score = CreditScoreBuilder::new()
            .with_token_activity(73, 3)
            .with_name_activity(93, 2)
            .with_liquidity(60, "0.0000 ETH")
            .with_ownership(95, 1)
            .with_domain_quality(83, 7)
            .build();

        assert_eq!(score.total, 780);
        assert_eq!(score.tier, RiskTier::Medium);
        assert_eq!(score.loan_recommendation(), "Approved for lending");
        assert_eq!(score.staking_recommendation(), "Qualified for staking");
        assert_eq!(score.breakdown.len(), 5);
    }

    #[test]
    fn test_perfect_components_hit_low_risk() {
        let score = CreditScoreBuilder::new()
            .with_token_activity(100, 50)
            .with_name_activity(100, 4)
            .with_liquidity(100, "12.0000 ETH")
            .with_ownership(100, 0)
            .with_domain_quality(100, 3)
            .build();

        // 85 + 7.5 + 3 = 95.5
        assert_eq!(score.total, 960);
        assert_eq!(score.tier, RiskTier::Low);
    }

    #[test]
    fn test_empty_builder_only_fixed_components() {
        let score = CreditScoreBuilder::new().build();
        // 75 * 0.10 + 60 * 0.05 = 10.5
        assert_eq!(score.total, 110);
        assert_eq!(score.tier, RiskTier::High);
        assert_eq!(score.loan_recommendation(), "Requires manual review");
        assert_eq!(score.staking_recommendation(), "Not recommended");
    }

    #[test]
    fn test_out_of_range_components_are_capped() {
        let components = CreditComponents {
            token_activity: 500,
            name_activity: 500,
            liquidity: 500,
            ownership: 500,
            domain_quality: 500,
            ..Default::default()
        };
        let score = CreditScore::calculate(components, vec![]);
        assert!(score.total <= 1000);
        assert_eq!(score.total % 10, 0);
    }

    #[test]
    fn test_quick_score() {
        // 93 * 0.4 + 83 * 0.6 = 37.2 + 49.8 = 87
        assert_eq!(quick_score(93, 83), 870);
        assert_eq!(quick_score(0, 0), 0);
        assert_eq!(quick_score(100, 100), 1000);
    }
}
