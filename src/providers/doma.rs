//! Doma Registry Client
//!
//! Thin GraphQL client over the Doma subgraph. Two queries are used: the
//! name record (tokens + name-level history) and the activity history of a
//! single token. Requests are not retried; callers decide what a failure
//! means (see `AppError::is_auth_rejection`).

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_ENCODING, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::config::DomaConfig;
use crate::models::errors::{AppError, AppResult};
use crate::models::types::{NameRecord, TokenActivity};
use crate::utils::constants::{TOKEN_ACTIVITY_PAGE_SIZE, USER_AGENT as USER_AGENT_CONST};

pub const DOMAIN_QUERY: &str = r#"
  query GetDomainData($name: String!) {
    name(name: $name) {
      name
      expiresAt
      tokenizedAt
      eoi
      claimedBy
      transferLock
      tokens {
        tokenId
        owner
        networkId
        createdAt
      }
      activities {
        type
        txHash
        sld
        tld
        createdAt
        ... on NameClaimedActivity {
          claimedBy
        }
        ... on NameRenewedActivity {
          expiresAt
        }
        ... on NameTokenizedActivity {
          networkId
        }
        ... on NameDetokenizedActivity {
          networkId
        }
      }
    }
  }
"#;

pub const TOKEN_ACTIVITIES_QUERY: &str = r#"
  query GetTokenActivities($tokenId: String!, $take: Int!) {
    tokenActivities(tokenId: $tokenId, take: $take, sortOrder: DESC) {
      items {
        type
        txHash
        tokenId
        createdAt
        finalized
        ... on TokenTransferredActivity {
          transferredTo
          transferredFrom
        }
        ... on TokenListedActivity {
          orderId
          seller
          buyer
          payment {
            amount
            currency
          }
          startsAt
          expiresAt
        }
        ... on TokenOfferReceivedActivity {
          orderId
          buyer
          seller
          payment {
            amount
            currency
          }
          expiresAt
        }
        ... on TokenPurchasedActivity {
          orderId
          seller
          buyer
          payment {
            amount
            currency
          }
          purchasedAt
        }
        ... on TokenListingCancelledActivity {
          orderId
          reason
        }
        ... on TokenOfferCancelledActivity {
          orderId
          reason
        }
      }
      totalCount
    }
  }
"#;

#[derive(Debug, Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Option<Vec<GraphQlError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct NameQueryData {
    name: Option<NameRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenActivitiesData {
    token_activities: Option<TokenActivityPage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenActivityPage {
    #[serde(default)]
    items: Vec<TokenActivity>,
    #[allow(dead_code)]
    total_count: Option<u64>,
}

/// Doma GraphQL API client
#[derive(Clone)]
pub struct DomaClient {
    client: reqwest::Client,
    endpoint: String,
    default_api_key: Option<String>,
}

impl DomaClient {
    pub fn new(config: &DomaConfig) -> AppResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_CONST));
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .gzip(true)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            default_api_key: config.api_key.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch a name record. `Ok(None)` means the registry has no such name.
    pub async fn fetch_name(
        &self,
        name: &str,
        api_key: Option<&str>,
    ) -> AppResult<Option<NameRecord>> {
        let data: NameQueryData = self
            .query(DOMAIN_QUERY, serde_json::json!({ "name": name }), api_key)
            .await?;
        Ok(data.name)
    }

    /// Fetch up to one page of activity for a token, newest first
    pub async fn fetch_token_activities(
        &self,
        token_id: &str,
        api_key: Option<&str>,
    ) -> AppResult<Vec<TokenActivity>> {
        let data: TokenActivitiesData = self
            .query(
                TOKEN_ACTIVITIES_QUERY,
                serde_json::json!({ "tokenId": token_id, "take": TOKEN_ACTIVITY_PAGE_SIZE }),
                api_key,
            )
            .await?;
        Ok(data.token_activities.map(|page| page.items).unwrap_or_default())
    }

    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        api_key: Option<&str>,
    ) -> AppResult<T> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables });

        // Client key wins over the server key
        if let Some(key) = api_key.or(self.default_api_key.as_deref()) {
            request = request.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!(status = status.as_u16(), "Doma registry returned error status");
            return Err(AppError::doma_http(
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown"),
            ));
        }

        let body: GraphQlResponse<T> = response.json().await?;

        if let Some(first) = body.errors.as_ref().and_then(|errors| errors.first()) {
            debug!(message = %first.message, "Doma GraphQL error");
            return Err(AppError::doma_graphql(first.message.clone()));
        }

        body.data
            .ok_or_else(|| AppError::doma_invalid_response("GraphQL response without data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn client_for(server: &MockServer, api_key: Option<&str>) -> DomaClient {
        DomaClient::new(&DomaConfig {
            endpoint: server.url("/graphql"),
            api_key: api_key.map(String::from),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_name_parses_record() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/graphql")
                    .body_contains("GetDomainData")
                    .body_contains("\"name\":\"example.eth\"");
                then.status(200).json_body(serde_json::json!({
                    "data": {
                        "name": {
                            "name": "example.eth",
                            "tokens": [{ "tokenId": "42", "owner": "0xowner" }],
                            "activities": [{ "type": "CLAIMED" }]
                        }
                    }
                }));
            })
            .await;

        let client = client_for(&server, None);
        let record = client.fetch_name("example.eth", None).await.unwrap().unwrap();

        mock.assert_async().await;
        assert_eq!(record.name, "example.eth");
        assert_eq!(record.primary_token_id(), Some("42"));
    }

    #[tokio::test]
    async fn test_missing_name_is_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(200).json_body(serde_json::json!({ "data": { "name": null } }));
            })
            .await;

        let client = client_for(&server, None);
        assert!(client.fetch_name("nothing.eth", None).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_client_key_overrides_server_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/graphql")
                    .header("authorization", "Bearer client-key");
                then.status(200).json_body(serde_json::json!({
                    "data": {
                        "tokenActivities": { "items": [{ "type": "LISTED" }], "totalCount": 1 }
                    }
                }));
            })
            .await;

        let client = client_for(&server, Some("server-key"));
        let items = client
            .fetch_token_activities("42", Some("client-key"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].activity_type, "LISTED");
    }

    #[tokio::test]
    async fn test_unauthorized_status_is_auth_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(401);
            })
            .await;

        let err = client_for(&server, None).fetch_name("x.eth", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DomaUnauthorized);
        assert!(err.is_auth_rejection());
    }

    #[tokio::test]
    async fn test_graphql_errors_surface_first_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(200).json_body(serde_json::json!({
                    "data": null,
                    "errors": [{ "message": "Missing API Key" }, { "message": "second" }]
                }));
            })
            .await;

        let err = client_for(&server, None).fetch_name("x.eth", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DomaGraphQlError);
        assert_eq!(err.message, "Missing API Key");
        assert!(err.is_auth_rejection());
    }

    #[tokio::test]
    async fn test_server_error_is_not_auth_rejection() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/graphql");
                then.status(502);
            })
            .await;

        let err = client_for(&server, None).fetch_name("x.eth", None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DomaHttpError);
        assert!(!err.is_auth_rejection());
    }
}
