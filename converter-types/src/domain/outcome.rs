//! Decoded conversion values and per-request outcomes.

use serde::{Deserialize, Serialize};

use currency_catalog::Currency;

use crate::domain::amount::FormattedAmount;
use crate::error::{ErrorCategory, InteractorError};

/// A successfully decoded conversion returned by the exchange API.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionValue {
    pub value: f64,
    pub currency: Currency,
}

impl ConversionValue {
    pub fn new(value: f64, currency: Currency) -> Self {
        Self { value, currency }
    }
}

/// Result of one fired request, projected straight into published state.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionOutcome {
    Success {
        value: f64,
        display_currency: Currency,
    },
    Failure {
        category: ErrorCategory,
        title: String,
        details: String,
    },
}

impl ConversionOutcome {
    /// Builds an outcome from an interactor result.
    ///
    /// Returns `None` for a cancelled request: a superseded lineage has nothing to publish.
    pub fn from_result(
        result: Result<f64, InteractorError>,
        display_currency: Currency,
    ) -> Option<Self> {
        match result {
            Ok(value) => Some(ConversionOutcome::Success {
                value,
                display_currency,
            }),
            Err(InteractorError::Cancelled) => None,
            Err(err) => {
                let (title, details) = err.title_and_details();
                Some(ConversionOutcome::Failure {
                    category: err.category(),
                    title,
                    details,
                })
            }
        }
    }

    /// Display text for a success; `None` for a failure.
    pub fn display_text(&self) -> Option<String> {
        match self {
            ConversionOutcome::Success {
                value,
                display_currency,
            } => Some(FormattedAmount::new(*value, *display_currency).to_string()),
            ConversionOutcome::Failure { .. } => None,
        }
    }
}
