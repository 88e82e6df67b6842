//! # Converter Core
//!
//! Conversion use case and the input pipeline that drives it.
//!
//! ## Architecture
//!
//! - `interactor` - one-request-at-a-time wrapper over the conversion port
//! - `orchestrator` - debounce, dedup, refresh and alert state for a UI
//!
//! Both are generic over `C: CurrencyConversion`, allowing the HTTP client or
//! an in-memory converter to be injected.

pub mod interactor;
pub mod orchestrator;

#[cfg(test)]
mod interactor_tests;

pub use interactor::ConverterInteractor;
pub use orchestrator::{Alert, ConversionOrchestrator, OrchestratorConfig, ViewState};
