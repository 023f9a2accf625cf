//! Core analyzer module
//! Orchestrates the domain analysis pipeline: registry lookup (or demo
//! fallback), scoring, collateral valuation and lending recommendations.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::core::activity_score::{
    score_name_activities, score_token_activities, NameActivityScore, TokenActivityScore,
};
use crate::core::credit_score::{quick_score, CreditScore, CreditScoreBuilder, ScoreFactor};
use crate::core::metrics::{
    assess_domain_quality, calculate_liquidity, calculate_ownership, DomainQuality,
    LiquidityMetrics, OwnershipStability,
};
use crate::models::config::AppConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{NameActivity, NameRecord, RiskTier, TokenActivity, TokenActivityKind};
use crate::providers::demo::{demo_name_record, demo_token_activities};
use crate::providers::doma::DomaClient;
use crate::utils::constants::{
    DATA_SOURCE_LABEL, DEMO_DATA_SOURCE_LABEL, EARLY_WITHDRAWAL_PENALTY, QUALITY_POINT_USD,
    STAKING_LOCK_PERIOD,
};

// ============================================
// Report types
// ============================================

/// Full creditworthiness report for one domain
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainAnalysis {
    pub domain_name: String,
    pub overall_score: u32,
    pub risk_tier: String,
    /// USD
    pub collateral_value: u64,
    #[serde(rename = "maxLTV")]
    pub max_ltv: u32,
    /// USD
    pub max_loan_amount: u64,
    #[serde(rename = "stakingAPY")]
    pub staking_apy: u32,
    pub on_chain_metrics: OnChainMetrics,
    pub off_chain_metrics: OffChainMetrics,
    pub score_factors: Vec<ScoreFactor>,
    pub recommendations: Recommendations,
    pub metadata: AnalysisMetadata,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnChainMetrics {
    pub token_activity: TokenActivityScore,
    pub name_activity: NameActivityScore,
    pub liquidity_metrics: LiquidityMetrics,
    pub ownership_stability: OwnershipStability,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OffChainMetrics {
    pub domain_quality: DomainQuality,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendations {
    pub loan_terms: LoanTerms,
    pub staking_terms: StakingTerms,
    pub risk_factors: Vec<RiskFactor>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanTerms {
    pub recommended: String,
    pub max_loan: u64,
    pub ltv: u32,
    pub interest_rate: f64,
    /// Percent of the loan that must be covered by collateral
    pub collateralization_ratio: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingTerms {
    pub recommended: String,
    #[serde(rename = "baseAPY")]
    pub base_apy: u32,
    #[serde(rename = "bonusAPY")]
    pub bonus_apy: u32,
    pub lock_period: String,
    pub early_withdrawal_penalty: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Impact {
    Positive,
    Negative,
}

impl Impact {
    fn when_positive(positive: bool) -> Self {
        if positive {
            Self::Positive
        } else {
            Self::Negative
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskFactor {
    pub factor: String,
    pub impact: Impact,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisMetadata {
    pub analyzed_at: String,
    pub data_source: String,
    pub api_endpoint: String,
    pub token_id: Option<String>,
    pub total_token_activities: usize,
    pub total_name_activities: usize,
    /// Registry refused our credentials and demo data was scored instead
    pub demo_mode: bool,
}

/// Name-only estimate
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuickScore {
    pub domain: String,
    pub quick_score: u32,
    pub estimated_tier: String,
    pub note: String,
    pub demo_mode: bool,
}

/// Raw registry history for a domain
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityHistory {
    pub domain: String,
    pub name_activities: Vec<NameActivity>,
    pub token_activities: Vec<TokenActivity>,
    pub summary: ActivitySummary,
    pub demo_mode: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub total_name_activities: usize,
    pub total_token_activities: usize,
    pub token_id: Option<String>,
}

/// One row of a comparison; score fields are null when analysis failed
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonEntry {
    pub name: String,
    pub score: Option<u32>,
    pub risk_tier: Option<String>,
    pub collateral_value: Option<u64>,
    pub max_loan: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparison {
    pub domains: Vec<ComparisonEntry>,
    pub best_domain: Option<String>,
    pub average_score: u32,
}

/// Outcome of one analysis inside a batch, in request order
pub type DomainOutcome = (String, AppResult<DomainAnalysis>);

// ============================================
// Analyzer
// ============================================

/// Main analyzer - scores domains against the Doma registry
pub struct DomainAnalyzer {
    client: DomaClient,
    eth_usd_price: f64,
    /// Bounds fan-out of batch and compare across all requests
    fanout: Arc<Semaphore>,
}

impl DomainAnalyzer {
    pub fn new(client: DomaClient, eth_usd_price: f64, concurrency: usize) -> Self {
        Self {
            client,
            eth_usd_price,
            fanout: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let client = DomaClient::new(&config.doma)?;
        Ok(Self::new(client, config.eth_usd_price, config.batch_concurrency))
    }

    pub fn endpoint(&self) -> &str {
        self.client.endpoint()
    }

    /// Full analysis of a single domain
    pub async fn analyze(&self, domain: &str, api_key: Option<&str>) -> AppResult<DomainAnalysis> {
        let domain = normalize_domain(domain)?;
        info!(domain = %domain, "Analyzing domain");

        let (record, demo_name) = self.load_name(&domain, api_key).await?;
        let token_id = record.primary_token_id().map(str::to_string);
        let (token_activities, demo_tokens) = match &token_id {
            Some(id) if demo_name => (demo_token_activities(id), true),
            Some(id) => self.load_token_activities(id, api_key).await?,
            None => (Vec::new(), false),
        };

        let demo_mode = demo_name || demo_tokens;
        let analysis = self.assemble(&record, token_id, &token_activities, demo_mode);

        info!(
            domain = %analysis.domain_name,
            score = analysis.overall_score,
            tier = %analysis.risk_tier,
            demo = analysis.metadata.demo_mode,
            "Analysis complete"
        );
        Ok(analysis)
    }

    /// Estimate from name history and label quality only
    pub async fn quick_score(&self, domain: &str, api_key: Option<&str>) -> AppResult<QuickScore> {
        let domain = normalize_domain(domain)?;
        let (record, demo) = self.load_name(&domain, api_key).await?;

        let quality = assess_domain_quality(&record.name);
        let names = score_name_activities(&record.activities);
        let score = quick_score(names.score, quality.score);

        Ok(QuickScore {
            domain,
            quick_score: score,
            estimated_tier: RiskTier::from_score(score).as_str().to_string(),
            note: "Quick score based on name activities and domain quality only".to_string(),
            demo_mode: demo,
        })
    }

    /// Raw name and token history
    pub async fn activities(
        &self,
        domain: &str,
        api_key: Option<&str>,
    ) -> AppResult<ActivityHistory> {
        let domain = normalize_domain(domain)?;
        let (record, demo_name) = self.load_name(&domain, api_key).await?;

        let token_id = record.primary_token_id().map(str::to_string);
        let (token_activities, demo_tokens) = match &token_id {
            Some(id) if demo_name => (demo_token_activities(id), true),
            Some(id) => self.load_token_activities(id, api_key).await?,
            None => (Vec::new(), false),
        };

        Ok(ActivityHistory {
            domain,
            summary: ActivitySummary {
                total_name_activities: record.activities.len(),
                total_token_activities: token_activities.len(),
                token_id,
            },
            name_activities: record.activities,
            token_activities,
            demo_mode: demo_name || demo_tokens,
        })
    }

    /// Analyze several domains concurrently. Results come back in request
    /// order; one failure does not affect the others.
    pub async fn analyze_many(
        self: &Arc<Self>,
        domains: &[String],
        api_key: Option<String>,
    ) -> Vec<DomainOutcome> {
        let handles: Vec<_> = domains
            .iter()
            .cloned()
            .map(|domain| {
                let analyzer = Arc::clone(self);
                let key = api_key.clone();
                tokio::spawn(async move {
                    let _permit = analyzer
                        .fanout
                        .acquire()
                        .await
                        .map_err(|_| AppError::internal("Analyzer is shutting down"))?;
                    analyzer.analyze(&domain, key.as_deref()).await
                })
            })
            .collect();

        let mut outcomes = Vec::with_capacity(domains.len());
        for (domain, handle) in domains.iter().zip(handles) {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    warn!(domain = %domain, error = %e, "Analysis task failed");
                    Err(AppError::internal(format!("Analysis task failed: {}", e)))
                }
            };
            outcomes.push((domain.clone(), result));
        }
        outcomes
    }

    /// Fetch the name record, substituting demo data on credential rejection
    async fn load_name(
        &self,
        domain: &str,
        api_key: Option<&str>,
    ) -> AppResult<(NameRecord, bool)> {
        match self.client.fetch_name(domain, api_key).await {
            Ok(Some(record)) => Ok((record, false)),
            Ok(None) => Err(AppError::domain_not_found(domain)),
            Err(e) if e.is_auth_rejection() => {
                info!(domain = %domain, reason = %e, "Demo mode: serving demo name record");
                Ok((demo_name_record(domain), true))
            }
            Err(e) => Err(e),
        }
    }

    async fn load_token_activities(
        &self,
        token_id: &str,
        api_key: Option<&str>,
    ) -> AppResult<(Vec<TokenActivity>, bool)> {
        match self.client.fetch_token_activities(token_id, api_key).await {
            Ok(items) => Ok((items, false)),
            Err(e) if e.is_auth_rejection() => {
                info!(
                    token_id = %token_id,
                    reason = %e,
                    "Demo mode: serving demo token activities"
                );
                Ok((demo_token_activities(token_id), true))
            }
            Err(e) => Err(e),
        }
    }

    /// Score fetched records into a full report
    pub fn assemble(
        &self,
        record: &NameRecord,
        token_id: Option<String>,
        token_activities: &[TokenActivity],
        demo_mode: bool,
    ) -> DomainAnalysis {
        let token_score = score_token_activities(token_activities);
        let name_score = score_name_activities(&record.activities);
        let liquidity = calculate_liquidity(token_activities);
        let ownership = calculate_ownership(token_activities);
        let quality = assess_domain_quality(&record.name);

        let credit: CreditScore = CreditScoreBuilder::new()
            .with_token_activity(token_score.score, token_activities.len())
            .with_name_activity(name_score.score, record.activities.len())
            .with_liquidity(liquidity.score, &liquidity.total_volume)
            .with_ownership(ownership.score, ownership.transfer_count)
            .with_domain_quality(quality.score, quality.length)
            .build();
        let tier = credit.tier;

        let collateral_value = self.collateral_value(token_activities, quality.score);
        let max_ltv = tier.max_ltv();
        let max_loan_amount = (collateral_value as f64 * (max_ltv as f64 / 100.0)).floor() as u64;
        debug!(collateral_value, max_loan_amount, "Collateral valued");

        let offers = token_activities
            .iter()
            .filter(|a| a.kind() == TokenActivityKind::OfferReceived)
            .count();

        let risk_factors = vec![
            RiskFactor {
                factor: format!("{} transfers detected", ownership.transfer_count),
                impact: Impact::when_positive(ownership.transfer_count <= 5),
                severity: Severity::Low,
            },
            RiskFactor {
                factor: format!("{} offers received", offers),
                impact: Impact::when_positive(offers > 5),
                severity: Severity::Medium,
            },
            RiskFactor {
                factor: format!("Domain length: {} characters", quality.length),
                impact: Impact::when_positive(quality.length <= 8),
                severity: Severity::Low,
            },
        ];

        let recommendations = Recommendations {
            loan_terms: LoanTerms {
                recommended: credit.loan_recommendation().to_string(),
                max_loan: max_loan_amount,
                ltv: max_ltv,
                interest_rate: tier.interest_rate(),
                collateralization_ratio: (10_000.0 / max_ltv as f64).round() as u32,
            },
            staking_terms: StakingTerms {
                recommended: credit.staking_recommendation().to_string(),
                base_apy: tier.staking_apy(),
                bonus_apy: tier.bonus_apy(),
                lock_period: STAKING_LOCK_PERIOD.to_string(),
                early_withdrawal_penalty: EARLY_WITHDRAWAL_PENALTY,
            },
            risk_factors,
        };

        DomainAnalysis {
            domain_name: record.name.clone(),
            overall_score: credit.total,
            risk_tier: tier.as_str().to_string(),
            collateral_value,
            max_ltv,
            max_loan_amount,
            staking_apy: tier.staking_apy(),
            on_chain_metrics: OnChainMetrics {
                token_activity: token_score,
                name_activity: name_score,
                liquidity_metrics: liquidity,
                ownership_stability: ownership,
            },
            off_chain_metrics: OffChainMetrics { domain_quality: quality },
            score_factors: credit.breakdown,
            recommendations,
            metadata: AnalysisMetadata {
                analyzed_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                data_source: if demo_mode { DEMO_DATA_SOURCE_LABEL } else { DATA_SOURCE_LABEL }
                    .to_string(),
                api_endpoint: self.client.endpoint().to_string(),
                token_id,
                total_token_activities: token_activities.len(),
                total_name_activities: record.activities.len(),
                demo_mode,
            },
        }
    }

    /// USD value of the domain: average sale price when it has sold,
    /// otherwise a quality-based estimate.
    ///
    /// Every purchase counts toward the average and a missing amount counts
    /// as zero. One unreadable amount voids the sale history.
    fn collateral_value(&self, token_activities: &[TokenActivity], quality_score: u32) -> u64 {
        let amounts: Vec<Option<f64>> = token_activities
            .iter()
            .filter(|a| a.kind() == TokenActivityKind::Purchased)
            .map(|a| match a.payment_amount().map(str::trim).filter(|raw| !raw.is_empty()) {
                None => Some(0.0),
                Some(raw) => raw.parse::<f64>().ok().filter(|v| v.is_finite()),
            })
            .collect();

        let avg_price = match amounts.iter().copied().collect::<Option<Vec<f64>>>() {
            Some(prices) if !prices.is_empty() => {
                prices.iter().fold(0.0, |acc, v| acc + v) / prices.len() as f64
            }
            _ => 0.0,
        };

        let value = if avg_price > 0.0 {
            avg_price * self.eth_usd_price
        } else {
            quality_score as f64 * QUALITY_POINT_USD
        };
        value.round().max(0.0) as u64
    }
}

/// Trim and reject empty domain names
fn normalize_domain(domain: &str) -> AppResult<String> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(AppError::bad_request("Domain name is required"));
    }
    Ok(domain.to_string())
}

/// Summarize analyses side by side. Failed analyses count as zero toward
/// the average but never win.
pub fn compare(outcomes: &[DomainOutcome]) -> Comparison {
    let domains: Vec<ComparisonEntry> = outcomes
        .iter()
        .map(|(requested, result)| match result {
            Ok(a) => ComparisonEntry {
                name: a.domain_name.clone(),
                score: Some(a.overall_score),
                risk_tier: Some(a.risk_tier.clone()),
                collateral_value: Some(a.collateral_value),
                max_loan: Some(a.max_loan_amount),
                error: None,
            },
            Err(e) => ComparisonEntry {
                name: requested.clone(),
                score: None,
                risk_tier: None,
                collateral_value: None,
                max_loan: None,
                error: Some(e.message.clone()),
            },
        })
        .collect();

    // Strictly greater keeps the first of equal scores
    let best_domain = outcomes
        .iter()
        .filter_map(|(_, result)| result.as_ref().ok())
        .fold(None::<&DomainAnalysis>, |best, current| match best {
            Some(b) if b.overall_score >= current.overall_score => Some(b),
            _ => Some(current),
        })
        .map(|a| a.domain_name.clone());

    let total: u32 = domains.iter().filter_map(|d| d.score).sum();
    let average_score = if outcomes.is_empty() {
        0
    } else {
        (total as f64 / outcomes.len() as f64).round() as u32
    };

    Comparison {
        domains,
        best_domain,
        average_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::DomaConfig;
    use crate::providers::demo::{demo_name_record, demo_token_activities};
    use std::time::Duration;

    fn offline_analyzer() -> DomainAnalyzer {
        let client = DomaClient::new(&DomaConfig {
            endpoint: "http://127.0.0.1:9/graphql".to_string(),
            api_key: None,
            timeout: Duration::from_secs(1),
        })
        .unwrap();
        DomainAnalyzer::new(client, 2800.0, 2)
    }

    fn purchase(amount: &str, buyer: &str) -> TokenActivity {
        serde_json::from_value(serde_json::json!({
            "type": "PURCHASED",
            "buyer": buyer,
            "seller": "0xseller",
            "payment": { "amount": amount, "currency": "ETH" }
        }))
        .unwrap()
    }

    #[test]
    fn test_demo_dataset_report() {
        let analyzer = offline_analyzer();
        let record = demo_name_record("example.eth");
        let activities = demo_token_activities("12345");

        let report = analyzer.assemble(&record, Some("12345".to_string()), &activities, true);

        assert_eq!(report.overall_score, 780);
        assert_eq!(report.risk_tier, "Medium Risk");
        assert_eq!(report.max_ltv, 60);
        assert_eq!(report.collateral_value, 4150);
        assert_eq!(report.max_loan_amount, 2490);
        assert_eq!(report.staking_apy, 12);
        assert_eq!(report.recommendations.loan_terms.recommended, "Approved for lending");
        assert_eq!(report.recommendations.loan_terms.collateralization_ratio, 167);
        assert_eq!(report.recommendations.staking_terms.bonus_apy, 2);
        assert_eq!(report.metadata.data_source, DEMO_DATA_SOURCE_LABEL);
        assert_eq!(report.metadata.total_token_activities, 3);
        assert_eq!(report.metadata.total_name_activities, 2);
        assert!(report.metadata.demo_mode);

        let impacts: Vec<_> = report
            .recommendations
            .risk_factors
            .iter()
            .map(|f| f.impact)
            .collect();
        assert_eq!(impacts, vec![Impact::Positive, Impact::Negative, Impact::Positive]);
    }

    #[test]
    fn test_sale_history_drives_collateral() {
        let analyzer = offline_analyzer();
        let record = demo_name_record("example.eth");
        let activities = vec![purchase("2.0", "0xa"), purchase("3.0", "0xb")];

        let report = analyzer.assemble(&record, Some("1".to_string()), &activities, false);

        // avg(2.0, 3.0) * 2800
        assert_eq!(report.collateral_value, 7000);
        assert_eq!(report.max_loan_amount, 4200);
        assert_eq!(report.on_chain_metrics.liquidity_metrics.score, 75);
        assert_eq!(report.metadata.data_source, DATA_SOURCE_LABEL);
        assert!(!report.metadata.demo_mode);
    }

    #[test]
    fn test_missing_sale_amount_counts_as_zero() {
        let analyzer = offline_analyzer();
        let record = demo_name_record("example.eth");
        let mut unpriced = purchase("0", "0xb");
        unpriced.payment = None;

        let report = analyzer.assemble(&record, None, &[purchase("2.0", "0xa"), unpriced], false);

        // (2.0 + 0) / 2 * 2800
        assert_eq!(report.collateral_value, 2800);
    }

    #[test]
    fn test_unreadable_sale_amount_falls_back_to_quality() {
        let analyzer = offline_analyzer();
        let record = demo_name_record("example.eth");
        let activities = vec![purchase("2.0", "0xa"), purchase("junk", "0xb")];

        let report = analyzer.assemble(&record, None, &activities, false);

        // example.eth quality 83 * 50
        assert_eq!(report.collateral_value, 4150);
    }

    #[test]
    fn test_report_serializes_with_wire_names() {
        let analyzer = offline_analyzer();
        let record = demo_name_record("example.eth");
        let report = analyzer.assemble(&record, None, &[], false);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["domainName"], "example.eth");
        assert_eq!(json["maxLTV"], report.max_ltv);
        assert!(json.get("maxLtv").is_none());
        assert!(json["stakingAPY"].is_number());
        assert!(json["recommendations"]["stakingTerms"]["baseAPY"].is_number());
        assert!(json["metadata"]["tokenId"].is_null());
        assert_eq!(json["recommendations"]["riskFactors"][1]["severity"], "medium");
        assert_eq!(json["onChainMetrics"]["ownershipStability"]["transferFrequency"], "Low");
    }

    #[test]
    fn test_scores_stay_in_range() {
        let analyzer = offline_analyzer();
        let record = demo_name_record("a-really-long-domain-label-with-digits-123.web3");
        let report = analyzer.assemble(&record, None, &[], false);

        assert!(report.overall_score <= 1000);
        assert!(report.on_chain_metrics.token_activity.score <= 100);
        assert!(report.off_chain_metrics.domain_quality.score <= 100);
    }

    #[test]
    fn test_compare_picks_best_and_averages_over_requested() {
        let analyzer = offline_analyzer();
        let strong = analyzer.assemble(&demo_name_record("abc.eth"), None, &[], false);
        let weak = analyzer.assemble(
            &demo_name_record("averyveryverylongname.eth"),
            None,
            &[],
            false,
        );
        let strong_score = strong.overall_score;
        let weak_score = weak.overall_score;
        assert!(strong_score > weak_score);

        let outcomes: Vec<DomainOutcome> = vec![
            ("averyveryverylongname.eth".to_string(), Ok(weak)),
            ("abc.eth".to_string(), Ok(strong)),
            ("missing.eth".to_string(), Err(AppError::domain_not_found("missing.eth"))),
        ];
        let comparison = compare(&outcomes);

        assert_eq!(comparison.best_domain.as_deref(), Some("abc.eth"));
        assert_eq!(comparison.domains.len(), 3);
        assert_eq!(comparison.domains[2].name, "missing.eth");
        assert!(comparison.domains[2].score.is_none());
        assert_eq!(
            comparison.average_score,
            ((strong_score + weak_score) as f64 / 3.0).round() as u32
        );
    }

    #[test]
    fn test_compare_ties_keep_first() {
        let analyzer = offline_analyzer();
        let first = analyzer.assemble(&demo_name_record("one.eth"), None, &[], false);
        let second = analyzer.assemble(&demo_name_record("two.eth"), None, &[], false);
        assert_eq!(first.overall_score, second.overall_score);

        let comparison = compare(&[
            ("one.eth".to_string(), Ok(first)),
            ("two.eth".to_string(), Ok(second)),
        ]);
        assert_eq!(comparison.best_domain.as_deref(), Some("one.eth"));
    }

    #[test]
    fn test_compare_all_failed() {
        let comparison = compare(&[
            ("a.eth".to_string(), Err(AppError::domain_not_found("a.eth"))),
            ("b.eth".to_string(), Err(AppError::internal("boom"))),
        ]);
        assert!(comparison.best_domain.is_none());
        assert_eq!(comparison.average_score, 0);
    }

    #[test]
    fn test_blank_domain_rejected() {
        let err = normalize_domain("   ").unwrap_err();
        assert_eq!(err.code, crate::models::errors::ErrorCode::ApiBadRequest);
        assert_eq!(normalize_domain(" example.eth ").unwrap(), "example.eth");
    }
}
