//! # Converter Types
//!
//! Domain types and port traits for the currency conversion pipeline.
//! This crate has ZERO external IO dependencies - only data structures,
//! display rules, the error taxonomy, and trait definitions.
//!
//! ## Architecture
//!
//! This crate represents the **innermost core** of the converter:
//! - `domain/` - Conversion requests, outcomes, formatted amounts, alerts
//! - `ports/` - Trait definitions that API adapters must implement
//! - `dto/` - Wire shapes of the exchange API responses
//! - `error/` - Network and interactor error types, alert titles

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use currency_catalog::{Currency, UnknownCurrency, all_currencies};
pub use domain::{
    AlertInfo, ConversionOutcome, ConversionQuery, ConversionRequest, ConversionValue, Direction,
    FormattedAmount, parse_amount,
};
pub use dto::{AmountField, ConversionResponse, ServerErrorPayload};
pub use error::{
    ErrorCategory, InteractorError, NetworkError, NetworkingError, TITLE_FAILED_TO_CONVERT,
    TITLE_INVALID_INPUT, TITLE_NETWORKING_ISSUE, TITLE_UNKNOWN_ERROR,
};
pub use ports::CurrencyConversion;
