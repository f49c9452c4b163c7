//! Errors from the catalog client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be built or sent, or timed out
    #[error("Failed to send request to catalog: {0}")]
    Request(#[source] reqwest::Error),

    /// The catalog answered with a non-success status
    #[error("Catalog returned status {0}")]
    Status(reqwest::StatusCode),

    /// The response body was not the expected JSON
    #[error("Failed to parse catalog response: {0}")]
    Decode(#[source] reqwest::Error),
}
