//! Steam `IPhysicalGoodsService/CheckInventoryAvailableByPackage` client.
//!
//! The store frontend calls this endpoint with browser headers; requests
//! without `Origin`/`Referer` are sometimes refused, so the client sends the
//! same ones on every call.

use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use serde::Deserialize;
use serde_json::Value;

use deckwatch_core::config::InventoryConfig;

use crate::traits::{AvailabilityCheck, InventoryError};

const STORE_ORIGIN: &str = "https://store.steampowered.com";
const STORE_REFERER: &str = "https://store.steampowered.com/";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";
/// Error replies are often whole HTML maintenance pages.
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, Deserialize)]
struct InventoryEnvelope {
    #[serde(default)]
    response: InventoryResponse,
}

#[derive(Debug, Default, Deserialize)]
struct InventoryResponse {
    #[serde(default)]
    available: Value,
}

/// Checks package availability against the Steam inventory API.
#[derive(Debug)]
pub struct SteamInventoryClient {
    api_url: String,
    client: reqwest::Client,
}

impl SteamInventoryClient {
    /// Build a client with the store headers and the configured timeout.
    pub fn new(config: &InventoryConfig) -> Result<Self, InventoryError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ORIGIN, HeaderValue::from_static(STORE_ORIGIN));
        headers.insert(REFERER, HeaderValue::from_static(STORE_REFERER));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            api_url: config.api_url.clone(),
            client,
        })
    }
}

#[async_trait::async_trait]
impl AvailabilityCheck for SteamInventoryClient {
    async fn check(&self, package_id: u64, country_code: &str) -> Result<bool, InventoryError> {
        let package_id = package_id.to_string();
        tracing::debug!(package_id = %package_id, country_code, "checking inventory");

        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("packageid", package_id.as_str()),
                ("country_code", country_code),
                ("format", "json"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(InventoryError::Status {
                status,
                body: truncate_body(&body),
            });
        }

        let text = response.text().await?;
        parse_availability(&text)
    }
}

/// Extract `response.available` from a reply body.
///
/// A missing `response` or `available` key reads as unavailable. A
/// `response` that is present but not an object is a decode error.
fn parse_availability(body: &str) -> Result<bool, InventoryError> {
    let envelope: InventoryEnvelope = serde_json::from_str(body)?;
    Ok(is_truthy(&envelope.response.available))
}

fn truncate_body(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_string(),
    }
}

/// Loose truthiness: the API has been seen returning `1`/`0` as well as
/// booleans.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
