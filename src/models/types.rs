//! Type definitions for DomaVault
//! Registry records as returned by the Doma GraphQL API, plus risk tiers

use serde::{Deserialize, Serialize};

/// Lending risk tier derived from the overall credit score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    /// Score >= 800
    Low,
    /// Score >= 600
    Medium,
    /// Everything else
    High,
}

impl RiskTier {
    /// Tier for an overall score on the 0-1000 scale
    pub fn from_score(score: u32) -> Self {
        if score >= 800 {
            RiskTier::Low
        } else if score >= 600 {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    /// Maximum loan-to-value ratio in percent
    pub fn max_ltv(&self) -> u32 {
        match self {
            RiskTier::Low => 75,
            RiskTier::Medium => 60,
            RiskTier::High => 40,
        }
    }

    /// Annual borrow interest rate in percent
    pub fn interest_rate(&self) -> f64 {
        match self {
            RiskTier::Low => 6.5,
            RiskTier::Medium => 9.5,
            RiskTier::High => 13.5,
        }
    }

    /// Base staking APY in percent
    pub fn staking_apy(&self) -> u32 {
        match self {
            RiskTier::Low => 15,
            RiskTier::Medium => 12,
            RiskTier::High => 8,
        }
    }

    /// Extra APY granted on top of the base staking rate
    pub fn bonus_apy(&self) -> u32 {
        match self {
            RiskTier::Low => 3,
            RiskTier::Medium => 2,
            RiskTier::High => 1,
        }
    }
}

/// Known name-level activity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameActivityKind {
    Claimed,
    Renewed,
    Tokenized,
    Detokenized,
    Other,
}

impl NameActivityKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "CLAIMED" => Self::Claimed,
            "RENEWED" => Self::Renewed,
            "TOKENIZED" => Self::Tokenized,
            "DETOKENIZED" => Self::Detokenized,
            _ => Self::Other,
        }
    }
}

/// Known token-level activity kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenActivityKind {
    Minted,
    Transferred,
    Listed,
    OfferReceived,
    Purchased,
    ListingCancelled,
    OfferCancelled,
    Other,
}

impl TokenActivityKind {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "MINTED" => Self::Minted,
            "TRANSFERRED" => Self::Transferred,
            "LISTED" => Self::Listed,
            "OFFER_RECEIVED" => Self::OfferReceived,
            "PURCHASED" => Self::Purchased,
            "LISTING_CANCELLED" => Self::ListingCancelled,
            "OFFER_CANCELLED" => Self::OfferCancelled,
            _ => Self::Other,
        }
    }
}

/// A registered name with its tokens and name-level history
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameRecord {
    pub name: String,
    #[serde(default)]
    pub expires_at: Option<String>,
    #[serde(default)]
    pub tokenized_at: Option<String>,
    #[serde(default)]
    pub eoi: Option<bool>,
    #[serde(default)]
    pub claimed_by: Option<String>,
    #[serde(default)]
    pub transfer_lock: Option<bool>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tokens: Vec<TokenRecord>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub activities: Vec<NameActivity>,
}

impl NameRecord {
    /// Token id of the first token, which is the one scored
    pub fn primary_token_id(&self) -> Option<&str> {
        self.tokens.first().map(|t| t.token_id.as_str())
    }
}

/// On-chain NFT representing a tokenized name
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub token_id: String,
    #[serde(default)]
    pub owner: Option<String>,
    /// Numeric chain id or CAIP-2 string depending on the registry version
    #[serde(default)]
    pub network_id: Option<serde_json::Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameActivity {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sld: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tld: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<serde_json::Value>,
}

impl NameActivity {
    pub fn kind(&self) -> NameActivityKind {
        NameActivityKind::parse(&self.activity_type)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default)]
    pub amount: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenActivity {
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finalized: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferred_to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transferred_from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchased_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TokenActivity {
    pub fn kind(&self) -> TokenActivityKind {
        TokenActivityKind::parse(&self.activity_type)
    }

    /// Raw payment amount string, if any
    pub fn payment_amount(&self) -> Option<&str> {
        self.payment.as_ref().and_then(|p| p.amount.as_deref())
    }

    /// Payment amount as a number. Unparseable or missing amounts are `None`.
    pub fn payment_value(&self) -> Option<f64> {
        self.payment_amount()
            .and_then(|a| a.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_tier_thresholds() {
        assert_eq!(RiskTier::from_score(1000), RiskTier::Low);
        assert_eq!(RiskTier::from_score(800), RiskTier::Low);
        assert_eq!(RiskTier::from_score(790), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(600), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(590), RiskTier::High);
        assert_eq!(RiskTier::from_score(0), RiskTier::High);
    }

    #[test]
    fn test_activity_kind_parsing() {
        assert_eq!(TokenActivityKind::parse("OFFER_RECEIVED"), TokenActivityKind::OfferReceived);
        assert_eq!(TokenActivityKind::parse("purchased"), TokenActivityKind::Other);
        assert_eq!(NameActivityKind::parse("DETOKENIZED"), NameActivityKind::Detokenized);
        assert_eq!(NameActivityKind::parse("NAME_UPDATED"), NameActivityKind::Other);
    }

    #[test]
    fn test_name_record_tolerates_nulls() {
        let record: NameRecord = serde_json::from_value(serde_json::json!({
            "name": "example.eth",
            "expiresAt": null,
            "tokens": null,
            "activities": [{ "type": "CLAIMED", "txHash": "0xabc" }]
        }))
        .unwrap();

        assert!(record.tokens.is_empty());
        assert_eq!(record.activities.len(), 1);
        assert_eq!(record.activities[0].kind(), NameActivityKind::Claimed);
        assert!(record.primary_token_id().is_none());
    }

    #[test]
    fn test_payment_value_parsing() {
        let activity: TokenActivity = serde_json::from_value(serde_json::json!({
            "type": "PURCHASED",
            "payment": { "amount": "1.25", "currency": "ETH" }
        }))
        .unwrap();
        assert_eq!(activity.payment_value(), Some(1.25));

        let bad: TokenActivity = serde_json::from_value(serde_json::json!({
            "type": "PURCHASED",
            "payment": { "amount": "n/a" }
        }))
        .unwrap();
        assert_eq!(bad.payment_value(), None);
        assert_eq!(bad.payment_amount(), Some("n/a"));
    }
}
