//! Transit API error types.

use std::fmt;

/// Errors from the transit API client.
#[derive(Debug)]
pub enum TransitError {
    /// Network failure or timeout
    Unavailable(reqwest::Error),

    /// The API answered with an error status
    Api { status: u16, message: String },

    /// The body is not JSON or does not have the expected shape
    Format {
        message: String,
        body: Option<String>,
    },

    /// A URL could not be built from the given identifiers
    InvalidUrl { message: String },
}

impl TransitError {
    /// Whether retrying later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            TransitError::Unavailable(_) => true,
            TransitError::Api { status, .. } => *status >= 500 || *status == 429,
            TransitError::Format { .. } | TransitError::InvalidUrl { .. } => false,
        }
    }
}

impl fmt::Display for TransitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransitError::Unavailable(e) => write!(f, "transit API unavailable: {e}"),
            TransitError::Api { status, message } => {
                write!(f, "transit API error {status}: {message}")
            }
            TransitError::Format { message, body } => {
                write!(f, "transit API format error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            TransitError::InvalidUrl { message } => write!(f, "invalid transit URL: {message}"),
        }
    }
}

impl std::error::Error for TransitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransitError::Unavailable(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransitError {
    fn from(err: reqwest::Error) -> Self {
        TransitError::Unavailable(err)
    }
}
