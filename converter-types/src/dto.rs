//! Data Transfer Objects (DTOs) for exchange API responses.

use serde::{Deserialize, Serialize};

use currency_catalog::Currency;

use crate::domain::ConversionValue;
use crate::error::NetworkError;

// ─────────────────────────────────────────────────────────────────────────────
// Success body
// ─────────────────────────────────────────────────────────────────────────────

/// Success body: `{"currency": "EUR", "amount": "88.20"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResponse {
    pub currency: String,
    pub amount: AmountField,
}

/// The API sends the amount as a string; plain JSON numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Number(f64),
    Text(String),
}

impl AmountField {
    /// The finite numeric value, if there is one.
    pub fn value(&self) -> Option<f64> {
        let value = match self {
            AmountField::Number(n) => *n,
            AmountField::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        value.is_finite().then_some(value)
    }
}

impl TryFrom<ConversionResponse> for ConversionValue {
    type Error = NetworkError;

    fn try_from(resp: ConversionResponse) -> Result<Self, Self::Error> {
        let currency = Currency::parse(&resp.currency).ok_or_else(|| {
            NetworkError::BadResponseFormat(format!("unrecognized currency {}", resp.currency))
        })?;
        let value = resp.amount.value().ok_or_else(|| {
            NetworkError::BadResponseFormat(format!("non-numeric amount {:?}", resp.amount))
        })?;
        Ok(ConversionValue::new(value, currency))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Failure body
// ─────────────────────────────────────────────────────────────────────────────

/// Optional structured body sent with non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerErrorPayload {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ServerErrorPayload {
    /// Best human-readable detail: the description when present, else the error code.
    pub fn detail(&self) -> &str {
        self.error_description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&self.error)
    }
}
