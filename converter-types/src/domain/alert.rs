//! Alert content handed to the presentation layer.

use serde::{Deserialize, Serialize};

/// Title, optional message and the label of the single dismiss action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertInfo {
    pub title: String,
    pub message: Option<String>,
    pub dismiss_label: String,
}

impl AlertInfo {
    /// An alert with an `Ok` dismiss action. Empty details produce no message.
    pub fn default_alert(title: impl Into<String>, details: impl Into<String>) -> Self {
        let details = details.into();
        Self {
            title: title.into(),
            message: (!details.is_empty()).then_some(details),
            dismiss_label: "Ok".to_string(),
        }
    }
}
