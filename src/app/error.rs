use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaperbitesError {
    #[error("Network error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PaperbitesError {
    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Network {
            status,
            message: message.into(),
        }
    }

    /// Transport failures and non-2xx responses; the caller may retry.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Serialization or durable-write failures.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::Database(_) | Self::Serialization(_) | Self::Storage(_)
        )
    }

    /// A document that was read but could not be decoded.
    pub fn is_serialization(&self) -> bool {
        matches!(self, Self::Serialization(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Network { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PaperbitesError {
    fn from(e: reqwest::Error) -> Self {
        Self::Network {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PaperbitesError>;
