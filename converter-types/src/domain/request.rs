//! Canonical conversion request and the direction toggle.

use serde::{Deserialize, Serialize};

use currency_catalog::Currency;

/// Which way the conversion runs relative to the selected currencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Source converts into target.
    #[default]
    Forward,
    /// Target converts into source.
    Backward,
}

impl Direction {
    pub fn toggled(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    /// Icon shown on the direction toggle.
    pub fn icon_name(self) -> &'static str {
        match self {
            Direction::Forward => "arrow.right",
            Direction::Backward => "arrow.left",
        }
    }
}

/// The deduplicated tuple the pipeline decides whether to send.
///
/// Equality is structural over all four fields; the orchestrator relies on it
/// to drop repeated requests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub amount: f64,
    pub source: Currency,
    pub target: Currency,
    pub direction: Direction,
}

impl ConversionRequest {
    pub fn new(amount: f64, source: Currency, target: Currency, direction: Direction) -> Self {
        Self {
            amount,
            source,
            target,
            direction,
        }
    }

    /// Source after applying the direction flag.
    pub fn effective_source(&self) -> Currency {
        match self.direction {
            Direction::Forward => self.source,
            Direction::Backward => self.target,
        }
    }

    /// Target after applying the direction flag.
    pub fn effective_target(&self) -> Currency {
        match self.direction {
            Direction::Forward => self.target,
            Direction::Backward => self.source,
        }
    }

    /// A request may only be sent for a positive amount between two distinct currencies.
    pub fn is_eligible(&self) -> bool {
        self.amount > 0.0 && self.effective_source() != self.effective_target()
    }

    /// The API-facing query, with the direction already applied.
    pub fn query(&self) -> ConversionQuery {
        ConversionQuery {
            amount: self.amount,
            from: self.effective_source(),
            to: self.effective_target(),
        }
    }
}

/// What actually crosses the API boundary: an amount and two effective currencies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConversionQuery {
    pub amount: f64,
    pub from: Currency,
    pub to: Currency,
}

impl ConversionQuery {
    pub fn new(amount: f64, from: Currency, to: Currency) -> Self {
        Self { amount, from, to }
    }
}

/// Parses raw amount text from an input field.
///
/// Both `.` and `,` are accepted as the decimal separator. Text that does not
/// parse to a finite number yields `0.0`, which is never eligible to fire.
pub fn parse_amount(text: &str) -> f64 {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}
