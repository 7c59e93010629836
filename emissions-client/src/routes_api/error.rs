//! Routes API client error types.

use std::fmt;

/// Errors from the routes HTTP client.
#[derive(Debug)]
pub enum RoutesApiError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    ApiError { status: u16, message: String },
}

impl fmt::Display for RoutesApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutesApiError::Http(e) => write!(f, "HTTP error: {e}"),
            RoutesApiError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            RoutesApiError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
        }
    }
}

impl std::error::Error for RoutesApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RoutesApiError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for RoutesApiError {
    fn from(err: reqwest::Error) -> Self {
        RoutesApiError::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = RoutesApiError::ApiError {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "API error 502: Bad Gateway");

        let err = RoutesApiError::Json {
            message: "expected number".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected number"));
        assert!(err.to_string().contains("{}"));

        let err = RoutesApiError::Json {
            message: "eof".into(),
            body: None,
        };
        assert!(!err.to_string().contains("body"));
    }
}
