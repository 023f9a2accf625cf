//! Activity Scoring Module
//!
//! Turns registry activity history into 0-100 sub-scores. Token activity
//! measures market participation (mints, listings, offers, sales); name
//! activity measures registration hygiene (claim, renewals, tokenization).

use serde::Serialize;

use crate::models::types::{NameActivity, NameActivityKind, TokenActivity, TokenActivityKind};

/// Count, score and weight (percent) of one activity category
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ActivityComponent {
    pub count: usize,
    pub score: u32,
    pub weight: u32,
}

/// Purchase category also reports the most recent sale price
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseComponent {
    pub count: usize,
    pub score: u32,
    pub weight: u32,
    pub last_price: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenActivityBreakdown {
    pub minted_activity: ActivityComponent,
    pub transfer_activity: ActivityComponent,
    pub listing_activity: ActivityComponent,
    pub offer_activity: ActivityComponent,
    pub purchase_activity: PurchaseComponent,
    pub cancelled_listings: ActivityComponent,
    pub cancelled_offers: ActivityComponent,
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenActivityScore {
    pub score: u32,
    pub breakdown: TokenActivityBreakdown,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NameActivityBreakdown {
    pub claimed_activity: ActivityComponent,
    pub renewed_activity: ActivityComponent,
    pub tokenized_activity: ActivityComponent,
    pub detokenized_activity: ActivityComponent,
}

#[derive(Debug, Clone, Serialize)]
pub struct NameActivityScore {
    pub score: u32,
    pub breakdown: NameActivityBreakdown,
}

#[derive(Debug, Default)]
struct TokenCounts {
    minted: usize,
    transferred: usize,
    listed: usize,
    offers: usize,
    purchased: usize,
    cancelled_listings: usize,
    cancelled_offers: usize,
}

impl TokenCounts {
    fn tally(activities: &[TokenActivity]) -> Self {
        let mut counts = Self::default();
        for activity in activities {
            match activity.kind() {
                TokenActivityKind::Minted => counts.minted += 1,
                TokenActivityKind::Transferred => counts.transferred += 1,
                TokenActivityKind::Listed => counts.listed += 1,
                TokenActivityKind::OfferReceived => counts.offers += 1,
                TokenActivityKind::Purchased => counts.purchased += 1,
                TokenActivityKind::ListingCancelled => counts.cancelled_listings += 1,
                TokenActivityKind::OfferCancelled => counts.cancelled_offers += 1,
                TokenActivityKind::Other => {}
            }
        }
        counts
    }
}

fn transfer_score(transferred: usize) -> f64 {
    match transferred {
        0 => 50.0,
        1..=5 => 85.0,
        6..=10 => 75.0,
        _ => 65.0,
    }
}

fn listing_score(listed: usize) -> f64 {
    match listed {
        0 => 60.0,
        1..=3 => 90.0,
        4..=8 => 85.0,
        _ => 95.0,
    }
}

fn offer_score(offers: usize) -> f64 {
    match offers {
        0 => 60.0,
        1..=3 => 75.0,
        4..=8 => 85.0,
        9..=15 => 95.0,
        _ => 100.0,
    }
}

fn purchase_score(purchased: usize) -> f64 {
    match purchased {
        0 => 70.0,
        1 => 80.0,
        2..=4 => 90.0,
        _ => 95.0,
    }
}

/// 100 minus up to 30 points for the share of cancelled orders
fn cancellation_score(cancelled: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let ratio = (cancelled as f64 / total as f64).min(1.0);
    100.0 - ratio * 30.0
}

/// Score token-level market activity (0-100)
pub fn score_token_activities(activities: &[TokenActivity]) -> TokenActivityScore {
    let counts = TokenCounts::tally(activities);

    let minted = if counts.minted > 0 { 100.0 } else { 0.0 };
    let transfer = transfer_score(counts.transferred);
    let listing = listing_score(counts.listed);
    let offer = offer_score(counts.offers);
    let purchase = purchase_score(counts.purchased);
    let cancelled_listing = cancellation_score(counts.cancelled_listings, counts.listed);
    let cancelled_offer = cancellation_score(counts.cancelled_offers, counts.offers);

    let weighted = minted * 0.1
        + transfer * 0.2
        + listing * 0.15
        + offer * 0.2
        + purchase * 0.25
        + cancelled_listing * 0.05
        + cancelled_offer * 0.05;

    // First purchase in registry order (the query sorts newest first)
    let last_price = activities
        .iter()
        .find(|a| a.kind() == TokenActivityKind::Purchased)
        .and_then(|a| a.payment_amount())
        .unwrap_or("N/A")
        .to_string();

    TokenActivityScore {
        score: clamp_score(weighted),
        breakdown: TokenActivityBreakdown {
            minted_activity: component(counts.minted, minted, 10),
            transfer_activity: component(counts.transferred, transfer, 20),
            listing_activity: component(counts.listed, listing, 15),
            offer_activity: component(counts.offers, offer, 20),
            purchase_activity: PurchaseComponent {
                count: counts.purchased,
                score: clamp_score(purchase),
                weight: 25,
                last_price,
            },
            cancelled_listings: component(counts.cancelled_listings, cancelled_listing, 5),
            cancelled_offers: component(counts.cancelled_offers, cancelled_offer, 5),
        },
    }
}

/// Score name-level registration history (0-100)
pub fn score_name_activities(activities: &[NameActivity]) -> NameActivityScore {
    let (mut claimed, mut renewed) = (0usize, 0usize);
    let (mut tokenized, mut detokenized) = (0usize, 0usize);
    for activity in activities {
        match activity.kind() {
            NameActivityKind::Claimed => claimed += 1,
            NameActivityKind::Renewed => renewed += 1,
            NameActivityKind::Tokenized => tokenized += 1,
            NameActivityKind::Detokenized => detokenized += 1,
            NameActivityKind::Other => {}
        }
    }

    let claimed_score = if claimed > 0 { 100.0 } else { 0.0 };
    let renewed_score = match renewed {
        0 => 70.0,
        1 => 85.0,
        _ => 95.0,
    };
    let tokenized_score = if tokenized > 0 { 100.0 } else { 0.0 };
    let detokenized_score = (100.0 - detokenized as f64 * 20.0).max(0.0);

    let weighted = claimed_score * 0.3
        + renewed_score * 0.25
        + tokenized_score * 0.25
        + detokenized_score * 0.2;

    NameActivityScore {
        score: clamp_score(weighted),
        breakdown: NameActivityBreakdown {
            claimed_activity: component(claimed, claimed_score, 30),
            renewed_activity: component(renewed, renewed_score, 25),
            tokenized_activity: component(tokenized, tokenized_score, 25),
            detokenized_activity: component(detokenized, detokenized_score, 20),
        },
    }
}

fn component(count: usize, score: f64, weight: u32) -> ActivityComponent {
    ActivityComponent {
        count,
        score: clamp_score(score),
        weight,
    }
}

/// Round to the nearest integer and clamp to 0-100
pub(crate) fn clamp_score(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}
