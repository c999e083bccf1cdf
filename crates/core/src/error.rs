//! Error types for the flea-pricer system.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the flea-pricer system.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input record missing or violating a required field.
    ///
    /// Fatal for the whole batch: downstream consumers trust the price list
    /// is complete and validated, so a partially-correct list is worse than
    /// no list.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// A pack item references an id with neither a computed price nor a
    /// handbook entry. Fatal for that single pack's derivation only.
    #[error("No reference price for item {referenced_id} needed by pack {pack_id}")]
    MissingReferencePrice {
        /// Template id of the pack whose derivation failed.
        pack_id: String,
        /// Template id of the contained item that could not be priced.
        referenced_id: String,
    },

    /// HTTP / remote retrieval error.
    #[error("HTTP error: {0}")]
    Http(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Create a malformed-input error.
    pub fn malformed_input(msg: impl Into<String>) -> Self {
        Error::MalformedInput(msg.into())
    }

    /// Create a missing-reference-price error.
    pub fn missing_reference_price(
        pack_id: impl Into<String>,
        referenced_id: impl Into<String>,
    ) -> Self {
        Error::MissingReferencePrice {
            pack_id: pack_id.into(),
            referenced_id: referenced_id.into(),
        }
    }

    /// Create an HTTP error.
    pub fn http(msg: impl Into<String>) -> Self {
        Error::Http(msg.into())
    }
}
