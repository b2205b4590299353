//! Reference catalog error types.

/// Errors that can occur when fetching the reference line catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Network or transport failure (connection refused, timeout, ...)
    #[error("catalog unavailable: {0}")]
    Unavailable(#[from] reqwest::Error),

    /// The endpoint answered with an error status
    #[error("catalog API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The payload does not have the expected shape
    #[error("catalog format error: {message}")]
    Format { message: String },
}

impl CatalogError {
    /// Whether retrying later may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            CatalogError::Unavailable(_) => true,
            CatalogError::Api { status, .. } => *status >= 500,
            CatalogError::Format { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = CatalogError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "catalog API error 503: Service Unavailable");
        assert!(err.is_transient());

        let err = CatalogError::Format {
            message: "expected a JSON array".into(),
        };
        assert_eq!(err.to_string(), "catalog format error: expected a JSON array");
        assert!(!err.is_transient());
    }
}
