use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),

    /// `detail` is either the server's own `detail` field or a message built
    /// from the status code, so it is shown to the user as-is.
    #[error("{detail}")]
    Http { status: u16, detail: String },

    #[error("response parse error: {0}")]
    Parse(String),

    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,
}

impl ClientError {
    /// True when the request was given up on rather than answered.
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Parse(error.to_string())
        } else {
            Self::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        Self::Parse(error.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select your education level")]
    MissingEducation,

    #[error("Please add at least one skill")]
    NoSkills,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("unsupported result count {0}, expected one of 3, 5, 7, 10")]
    UnsupportedMaxResults(u8),

    #[error("unknown education level: {0}")]
    UnknownEducation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),

    #[error("a search is already in progress")]
    Busy,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unsupported language code: {0}")]
    UnsupportedLanguage(String),
}

pub type Result<T, E = ClientError> = std::result::Result<T, E>;
