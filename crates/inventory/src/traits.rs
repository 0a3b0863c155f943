//! Availability check trait and shared error types.

/// Errors that can occur while asking the vendor about a package.
///
/// None of these mean "unavailable": callers must treat them as a failed
/// check, not as a negative answer.
#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("inventory API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not decode inventory response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl InventoryError {
    /// Whether the failure was a request timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, InventoryError::Http(e) if e.is_timeout())
    }
}

/// Something that can tell whether a package is purchasable in a country.
#[async_trait::async_trait]
pub trait AvailabilityCheck: Send + Sync {
    /// Returns `Ok(true)` when the package can be bought right now.
    async fn check(&self, package_id: u64, country_code: &str) -> Result<bool, InventoryError>;
}
