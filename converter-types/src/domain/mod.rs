//! Domain models for the conversion pipeline.

pub mod alert;
pub mod amount;
pub mod outcome;
pub mod request;

pub use alert::AlertInfo;
pub use amount::FormattedAmount;
pub use outcome::{ConversionOutcome, ConversionValue};
pub use request::{ConversionQuery, ConversionRequest, Direction, parse_amount};
