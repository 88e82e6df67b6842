//! Port traits (interfaces for adapters).
//!
//! The interactor depends on these traits, not on the concrete HTTP client,
//! so tests can inject in-memory converters.

mod conversion;

pub use conversion::CurrencyConversion;
