//! Market and Quality Metrics
//!
//! Liquidity and ownership stability come from token activity; domain
//! quality is judged from the name itself.

use serde::Serialize;
use std::collections::HashSet;

use crate::models::types::{TokenActivity, TokenActivityKind};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityMetrics {
    pub score: u32,
    pub total_volume: String,
    pub unique_buyers: usize,
    pub unique_sellers: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransferFrequency {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipStability {
    pub score: u32,
    pub transfer_frequency: TransferFrequency,
    pub transfer_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DomainQuality {
    pub score: u32,
    pub length: usize,
    pub brandability: u32,
    pub memorability: u32,
}

/// Secondary-market depth: sales volume, buyer diversity and offer flow
pub fn calculate_liquidity(activities: &[TokenActivity]) -> LiquidityMetrics {
    let purchases: Vec<&TokenActivity> = activities
        .iter()
        .filter(|a| a.kind() == TokenActivityKind::Purchased)
        .collect();
    let offers = activities
        .iter()
        .filter(|a| a.kind() == TokenActivityKind::OfferReceived)
        .count();

    // +0.0 start: an empty history is "0.0000", never "-0.0000"
    let total_volume = purchases
        .iter()
        .filter_map(|p| p.payment_value())
        .fold(0.0, |acc, v| acc + v);

    let unique_buyers = distinct(purchases.iter().map(|p| p.buyer.as_deref()));
    let unique_sellers = distinct(purchases.iter().map(|p| p.seller.as_deref()));

    let mut score = 60;
    if !purchases.is_empty() {
        score += 15;
    }
    if unique_buyers > 2 {
        score += 10;
    }
    if offers > 5 {
        score += 10;
    }

    LiquidityMetrics {
        score: score.min(100),
        total_volume: format!("{:.4} ETH", total_volume),
        unique_buyers,
        unique_sellers,
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a str>>) -> usize {
    values
        .flatten()
        .filter(|v| !v.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

/// Fewer transfers means a steadier holder and a safer collateral
pub fn calculate_ownership(activities: &[TokenActivity]) -> OwnershipStability {
    let transfer_count = activities
        .iter()
        .filter(|a| a.kind() == TokenActivityKind::Transferred)
        .count();

    let mut score = 70;
    if transfer_count <= 5 {
        score += 15;
    }
    if transfer_count <= 3 {
        score += 10;
    }

    let transfer_frequency = match transfer_count {
        0..=3 => TransferFrequency::Low,
        4..=8 => TransferFrequency::Medium,
        _ => TransferFrequency::High,
    };

    OwnershipStability {
        score: score.min(100),
        transfer_frequency,
        transfer_count,
    }
}

/// Off-chain appeal of the label: short, digit-free names score higher
pub fn assess_domain_quality(name: &str) -> DomainQuality {
    let label = name.split('.').next().unwrap_or_default();
    let length = label.chars().count();

    let length_score = match length {
        0..=3 => 100,
        4..=5 => 95,
        6..=8 => 85,
        9..=12 => 75,
        13..=15 => 65,
        _ => 50,
    };

    let has_digits = label.chars().any(|c| c.is_ascii_digit());
    let brandability = if has_digits { 70 } else { 85 };
    let memorability = if length <= 6 { 90 } else { 75 };

    // 88 is the fixed TLD-quality component
    let total = (length_score + brandability + memorability + 88) as f64 / 4.0;

    DomainQuality {
        score: total.round() as u32,
        length,
        brandability,
        memorability,
    }
}
