//! Error types for the conversion pipeline.

use crate::domain::AlertInfo;
use crate::dto::ServerErrorPayload;

pub const TITLE_FAILED_TO_CONVERT: &str = "Failed to Convert Currency";
pub const TITLE_NETWORKING_ISSUE: &str = "Networking Issue";
pub const TITLE_UNKNOWN_ERROR: &str = "Unknown error";
pub const TITLE_INVALID_INPUT: &str = "Invalid Input";

/// Coarse classification used to decide how a failure is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Rejected before dispatch (e.g. equal currencies).
    Input,
    /// Timeout, connectivity and other transport failures.
    Transport,
    /// Bad status code, empty or unparseable body.
    Protocol,
    Unknown,
}

/// Transport-level failures, as classified by the HTTP stack.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkingError {
    #[error("Request timed out")]
    RequestTimeout,

    #[error("No internet connection")]
    NoInternetConnection,

    #[error("Networking error: {0}")]
    Other(String),

    #[error("Unknown networking error: {0}")]
    Unknown(String),
}

/// API-client errors. Every network or decoding failure ends up here; nothing
/// propagates past the client boundary in any other form.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NetworkError {
    #[error("Bad response code: {status}")]
    BadResponseCode {
        status: u16,
        payload: Option<ServerErrorPayload>,
    },

    #[error("Empty response body")]
    BadResponseData,

    #[error("Bad response format: {0}")]
    BadResponseFormat(String),

    #[error(transparent)]
    Networking(#[from] NetworkingError),

    /// The request lineage was superseded or explicitly cancelled.
    #[error("Request cancelled")]
    Cancelled,
}

impl NetworkError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            NetworkError::BadResponseCode { .. }
            | NetworkError::BadResponseData
            | NetworkError::BadResponseFormat(_) => ErrorCategory::Protocol,
            NetworkError::Networking(NetworkingError::Unknown(_)) => ErrorCategory::Unknown,
            NetworkError::Networking(_) | NetworkError::Cancelled => ErrorCategory::Transport,
        }
    }
}

/// Interactor-level errors, already normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InteractorError {
    #[error("Input and output currencies are equal")]
    SameCurrency,

    #[error("Conversion cancelled")]
    Cancelled,

    #[error("{title}: {details}")]
    Failed {
        category: ErrorCategory,
        title: String,
        details: String,
    },
}

impl InteractorError {
    fn failed(category: ErrorCategory, title: &str, details: impl Into<String>) -> Self {
        InteractorError::Failed {
            category,
            title: title.to_string(),
            details: details.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            InteractorError::SameCurrency => ErrorCategory::Input,
            InteractorError::Cancelled => ErrorCategory::Transport,
            InteractorError::Failed { category, .. } => *category,
        }
    }

    /// Stable `(title, details)` pair intended for direct display.
    pub fn title_and_details(&self) -> (String, String) {
        match self {
            InteractorError::SameCurrency => (
                TITLE_INVALID_INPUT.to_string(),
                "Source and target currencies must differ.".to_string(),
            ),
            InteractorError::Cancelled => (String::new(), String::new()),
            InteractorError::Failed { title, details, .. } => (title.clone(), details.clone()),
        }
    }

    /// Alert to show for this error; a cancelled request shows nothing.
    pub fn alert(&self) -> Option<AlertInfo> {
        if matches!(self, InteractorError::Cancelled) {
            return None;
        }
        let (title, details) = self.title_and_details();
        Some(AlertInfo::default_alert(title, details))
    }
}

impl From<NetworkError> for InteractorError {
    fn from(err: NetworkError) -> Self {
        let category = err.category();
        match err {
            NetworkError::Cancelled => InteractorError::Cancelled,
            NetworkError::Networking(NetworkingError::RequestTimeout) => InteractorError::failed(
                category,
                TITLE_NETWORKING_ISSUE,
                "Request timed out. Please try again later.",
            ),
            NetworkError::Networking(NetworkingError::NoInternetConnection) => {
                InteractorError::failed(
                    category,
                    TITLE_NETWORKING_ISSUE,
                    "No internet connection. Please check your connection and try again.",
                )
            }
            NetworkError::Networking(NetworkingError::Other(desc)) => {
                InteractorError::failed(category, TITLE_NETWORKING_ISSUE, desc)
            }
            NetworkError::Networking(NetworkingError::Unknown(desc)) => {
                InteractorError::failed(category, TITLE_UNKNOWN_ERROR, desc)
            }
            NetworkError::BadResponseCode {
                status,
                payload: Some(payload),
            } => {
                let details = match payload.detail() {
                    "" => format!("The server responded with status code {}.", status),
                    detail => detail.to_string(),
                };
                InteractorError::failed(category, TITLE_FAILED_TO_CONVERT, details)
            }
            NetworkError::BadResponseCode {
                status,
                payload: None,
            } => InteractorError::failed(
                category,
                TITLE_FAILED_TO_CONVERT,
                format!("The server responded with status code {}.", status),
            ),
            NetworkError::BadResponseData => InteractorError::failed(
                category,
                TITLE_FAILED_TO_CONVERT,
                "The server returned an empty response.",
            ),
            NetworkError::BadResponseFormat(desc) => InteractorError::failed(
                category,
                TITLE_FAILED_TO_CONVERT,
                format!("Unexpected response format: {}", desc),
            ),
        }
    }
}
