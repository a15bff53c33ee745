//! Yandex client error types.

use std::fmt;

use super::convert::ConversionError;

/// Errors from the Yandex Rasp HTTP client.
#[derive(Debug)]
pub enum YandexError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// JSON deserialization failed
    Json {
        message: String,
        body: Option<String>,
    },

    /// API returned an error status code
    ApiError { status: u16, message: String },

    /// Invalid API key or unauthorized
    Unauthorized,

    /// Response parsed but its contents were unusable
    InvalidData(ConversionError),
}

impl fmt::Display for YandexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YandexError::Http(e) => write!(f, "HTTP error: {e}"),
            YandexError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            YandexError::ApiError { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            YandexError::Unauthorized => write!(f, "unauthorized: check YANDEX_API_KEY"),
            YandexError::InvalidData(e) => write!(f, "invalid data: {e}"),
        }
    }
}

impl std::error::Error for YandexError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            YandexError::Http(e) => Some(e),
            YandexError::InvalidData(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for YandexError {
    fn from(err: reqwest::Error) -> Self {
        YandexError::Http(err)
    }
}

impl From<ConversionError> for YandexError {
    fn from(err: ConversionError) -> Self {
        YandexError::InvalidData(err)
    }
}
