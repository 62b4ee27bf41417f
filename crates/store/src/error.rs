use appraisal_core::types::RecordId;

/// Errors from the record store layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The store returned a non-2xx status code.
    #[error("Record store error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A success response whose body did not have the expected shape.
    #[error("Unexpected record store response: {0}")]
    Decode(String),

    #[error("Record not found: {id}")]
    NotFound { id: RecordId },

    /// Bad credentials or an expired session token.
    #[error("Invalid credentials or session")]
    Unauthorized,

    /// The store refused the payload (failed its own validation or rules).
    #[error("Record rejected: {0}")]
    Rejected(String),

    #[error("Invalid record store URL: {0}")]
    InvalidUrl(String),
}

impl StoreError {
    /// HTTP status reported by the store, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            Self::Unauthorized => Some(401),
            Self::Rejected(_) => Some(400),
            Self::Request(e) => e.status().map(|s| s.as_u16()),
            Self::Decode(_) | Self::InvalidUrl(_) => None,
        }
    }
}
