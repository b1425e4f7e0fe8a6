//! Places client error types.

use std::fmt;

use crate::search::ProviderError;

/// Errors from the Places HTTP client.
#[derive(Debug)]
pub enum PlacesError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// Server returned a non-success HTTP status
    HttpStatus { status: u16, message: String },

    /// API answered with a non-OK status field
    ApiStatus {
        status: String,
        message: Option<String>,
    },

    /// Rate limited by the API
    RateLimited,

    /// Invalid API key or unauthorized
    Unauthorized,

    /// Feature not configured or not available
    NotConfigured(String),
}

impl fmt::Display for PlacesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacesError::Http(e) => write!(f, "HTTP error: {e}"),
            PlacesError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            PlacesError::HttpStatus { status, message } => {
                write!(f, "HTTP status {status}: {message}")
            }
            PlacesError::ApiStatus { status, message } => {
                write!(f, "Places API error: {status}")?;
                if let Some(message) = message {
                    write!(f, " ({message})")?;
                }
                Ok(())
            }
            PlacesError::RateLimited => write!(f, "rate limited by Places API"),
            PlacesError::Unauthorized => write!(f, "unauthorized (invalid API key)"),
            PlacesError::NotConfigured(msg) => write!(f, "not configured: {msg}"),
        }
    }
}

impl std::error::Error for PlacesError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PlacesError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        PlacesError::Http(err)
    }
}

impl From<PlacesError> for ProviderError {
    fn from(err: PlacesError) -> Self {
        match err {
            PlacesError::RateLimited => ProviderError::RateLimited,
            PlacesError::Json { .. } => ProviderError::InvalidResponse(err.to_string()),
            other => ProviderError::Request(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = PlacesError::ApiStatus {
            status: "INVALID_REQUEST".into(),
            message: None,
        };
        assert_eq!(err.to_string(), "Places API error: INVALID_REQUEST");

        let err = PlacesError::ApiStatus {
            status: "REQUEST_DENIED".into(),
            message: Some("The provided API key is invalid.".into()),
        };
        assert_eq!(
            err.to_string(),
            "Places API error: REQUEST_DENIED (The provided API key is invalid.)"
        );

        let err = PlacesError::HttpStatus {
            status: 502,
            message: "Bad Gateway".into(),
        };
        assert_eq!(err.to_string(), "HTTP status 502: Bad Gateway");

        let err = PlacesError::Json {
            message: "expected string".into(),
            body: Some("{}".into()),
        };
        assert!(err.to_string().contains("JSON parse error"));
        assert!(err.to_string().contains("expected string"));
    }

    #[test]
    fn into_provider_error() {
        assert!(matches!(
            ProviderError::from(PlacesError::RateLimited),
            ProviderError::RateLimited
        ));
        assert!(matches!(
            ProviderError::from(PlacesError::Json {
                message: "eof".into(),
                body: None
            }),
            ProviderError::InvalidResponse(_)
        ));
        assert!(matches!(
            ProviderError::from(PlacesError::Unauthorized),
            ProviderError::Request(_)
        ));
    }
}
