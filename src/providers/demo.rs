//! Demo Dataset
//!
//! Stand-in registry data served when the Doma API refuses our credentials,
//! so the product can be explored without an API key. Content is fixed;
//! only timestamps move with the clock.

use chrono::{DateTime, Duration, SecondsFormat, Utc};

use crate::models::types::{NameActivity, NameRecord, Payment, TokenActivity, TokenRecord};
use crate::utils::constants::{DEMO_DEFAULT_TLD, DEMO_OWNER_ADDRESS, DEMO_TOKEN_ID};

const DEMO_BUYER_ADDRESS: &str = "0xefgh5678...";
const DEMO_SELLER_ADDRESS: &str = "0xabcd1234...";

fn days_from(now: DateTime<Utc>, days: i64) -> String {
    (now + Duration::days(days)).to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Split `label.tld` into its parts, defaulting the TLD
fn split_name(name: &str) -> (String, String) {
    let mut parts = name.split('.');
    let sld = parts.next().unwrap_or_default().to_string();
    let tld = parts
        .next()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEMO_DEFAULT_TLD)
        .to_string();
    (sld, tld)
}

/// Claimed 100 days ago, tokenized 90 days ago, expiring in a year
pub fn demo_name_record(name: &str) -> NameRecord {
    demo_name_record_at(name, Utc::now())
}

pub fn demo_name_record_at(name: &str, now: DateTime<Utc>) -> NameRecord {
    let (sld, tld) = split_name(name);
    let tokenized_at = days_from(now, -90);

    NameRecord {
        name: name.to_string(),
        expires_at: Some(days_from(now, 365)),
        tokenized_at: Some(tokenized_at.clone()),
        eoi: None,
        claimed_by: Some(DEMO_OWNER_ADDRESS.to_string()),
        transfer_lock: Some(false),
        tokens: vec![TokenRecord {
            token_id: DEMO_TOKEN_ID.to_string(),
            owner: Some(DEMO_OWNER_ADDRESS.to_string()),
            network_id: Some(serde_json::json!(1)),
            created_at: Some(tokenized_at),
        }],
        activities: vec![
            NameActivity {
                activity_type: "CLAIMED".to_string(),
                tx_hash: Some("0xabcd1234...".to_string()),
                sld: Some(sld.clone()),
                tld: Some(tld.clone()),
                created_at: Some(days_from(now, -100)),
                claimed_by: Some(DEMO_OWNER_ADDRESS.to_string()),
                expires_at: None,
                network_id: None,
            },
            NameActivity {
                activity_type: "TOKENIZED".to_string(),
                tx_hash: Some("0xefgh5678...".to_string()),
                sld: Some(sld),
                tld: Some(tld),
                created_at: Some(days_from(now, -90)),
                claimed_by: None,
                expires_at: None,
                network_id: Some(serde_json::json!(1)),
            },
        ],
    }
}

/// One transfer, one listing at 2.5 ETH and one offer at 2.0 ETH
pub fn demo_token_activities(token_id: &str) -> Vec<TokenActivity> {
    demo_token_activities_at(token_id, Utc::now())
}

pub fn demo_token_activities_at(token_id: &str, now: DateTime<Utc>) -> Vec<TokenActivity> {
    let base = TokenActivity {
        activity_type: String::new(),
        tx_hash: None,
        token_id: Some(token_id.to_string()),
        created_at: None,
        finalized: Some(true),
        transferred_to: None,
        transferred_from: None,
        order_id: None,
        seller: None,
        buyer: None,
        payment: None,
        starts_at: None,
        expires_at: None,
        purchased_at: None,
        reason: None,
    };

    vec![
        TokenActivity {
            activity_type: "TRANSFERRED".to_string(),
            tx_hash: Some("0x1111...".to_string()),
            created_at: Some(days_from(now, -30)),
            transferred_to: Some(DEMO_SELLER_ADDRESS.to_string()),
            transferred_from: Some(DEMO_OWNER_ADDRESS.to_string()),
            ..base.clone()
        },
        TokenActivity {
            activity_type: "LISTED".to_string(),
            tx_hash: Some("0x2222...".to_string()),
            created_at: Some(days_from(now, -15)),
            order_id: Some("order_123".to_string()),
            seller: Some(DEMO_SELLER_ADDRESS.to_string()),
            payment: Some(eth_payment("2.5")),
            starts_at: Some(days_from(now, -15)),
            expires_at: Some(days_from(now, 15)),
            ..base.clone()
        },
        TokenActivity {
            activity_type: "OFFER_RECEIVED".to_string(),
            tx_hash: Some("0x3333...".to_string()),
            created_at: Some(days_from(now, -10)),
            order_id: Some("offer_456".to_string()),
            buyer: Some(DEMO_BUYER_ADDRESS.to_string()),
            seller: Some(DEMO_SELLER_ADDRESS.to_string()),
            payment: Some(eth_payment("2.0")),
            expires_at: Some(days_from(now, 5)),
            ..base
        },
    ]
}

fn eth_payment(amount: &str) -> Payment {
    Payment {
        amount: Some(amount.to_string()),
        currency: Some("ETH".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::types::{NameActivityKind, TokenActivityKind};
    use chrono::TimeZone;

    #[test]
    fn test_demo_name_record_shape() {
        let now = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let record = demo_name_record_at("vault.dao", now);

        assert_eq!(record.name, "vault.dao");
        assert_eq!(record.primary_token_id(), Some(DEMO_TOKEN_ID));
        assert_eq!(record.activities.len(), 2);
        assert_eq!(record.activities[0].kind(), NameActivityKind::Claimed);
        assert_eq!(record.activities[1].kind(), NameActivityKind::Tokenized);
        assert_eq!(record.activities[0].sld.as_deref(), Some("vault"));
        assert_eq!(record.activities[0].tld.as_deref(), Some("dao"));
        assert_eq!(record.expires_at.as_deref(), Some("2026-01-01T00:00:00.000Z"));
        assert_eq!(record.tokenized_at.as_deref(), Some("2024-10-03T00:00:00.000Z"));
    }

    #[test]
    fn test_demo_name_without_tld_defaults_to_eth() {
        let record = demo_name_record("vault");
        assert_eq!(record.activities[0].tld.as_deref(), Some("eth"));
    }

    #[test]
    fn test_demo_token_activities() {
        let activities = demo_token_activities("777");
        let kinds: Vec<_> = activities.iter().map(|a| a.kind()).collect();

        assert_eq!(
            kinds,
            vec![
                TokenActivityKind::Transferred,
                TokenActivityKind::Listed,
                TokenActivityKind::OfferReceived
            ]
        );
        assert!(activities.iter().all(|a| a.token_id.as_deref() == Some("777")));
        assert_eq!(activities[1].payment_value(), Some(2.5));
        assert_eq!(activities[2].payment_value(), Some(2.0));
    }
}
