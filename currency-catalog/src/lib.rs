//! Currency Catalog with Macro-Based Currency Generation
//!
//! The set of currencies the exchange API understands is closed and known at
//! compile time. Currencies are declared once in the `define_currencies!`
//! invocation below, which generates the [`Currency`] enum together with its
//! wire code, display symbol and minor-unit digits.
//!
//! # Adding a New Currency
//! Add a line to the `define_currencies!` invocation:
//! ```ignore
//! define_currencies! {
//!     // ... existing currencies ...
//!     CHF => ("CHF", "CHF ", 2),
//! }
//! ```
//!
//! # Example
//! ```
//! use currency_catalog::Currency;
//!
//! assert_eq!(Currency::parse("eur"), Some(Currency::EUR));
//! assert_eq!(Currency::parse("euro"), None);
//! assert_eq!(Currency::EUR.code(), "EUR");
//! ```

/// Error returned by [`std::str::FromStr`] when the text names no catalog currency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown currency: {0}")]
pub struct UnknownCurrency(pub String);

// ─────────────────────────────────────────────────────────────────────────────
// THE MACRO: Defines the Currency enum and its metadata lookups
// ─────────────────────────────────────────────────────────────────────────────

/// Macro to define the catalog with auto-generated lookups and conversions.
///
/// # Syntax
/// ```ignore
/// define_currencies! {
///     Variant => ("CODE", "SYMBOL", minor_digits),
/// }
/// ```
///
/// Declaration order is the catalog order returned by `Currency::all()`.
#[macro_export]
macro_rules! define_currencies {
    (
        $(
            $name:ident => ($code:literal, $symbol:literal, $minor_digits:expr)
        ),* $(,)?
    ) => {
        /// A currency supported by the exchange API.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(rename_all = "UPPERCASE")]
        pub enum Currency {
            $($name),*
        }

        impl Currency {
            /// Uppercase wire code, as used in request paths and response bodies.
            pub fn code(&self) -> &'static str {
                match self {
                    $(Currency::$name => $code),*
                }
            }

            pub fn symbol(&self) -> &'static str {
                match self {
                    $(Currency::$name => $symbol),*
                }
            }

            /// Number of digits shown after the decimal separator.
            pub fn minor_digits(&self) -> u8 {
                match self {
                    $(Currency::$name => $minor_digits),*
                }
            }

            /// Every catalog currency, in declaration order.
            pub fn all() -> &'static [Currency] {
                &[$(Currency::$name),*]
            }

            /// Case-insensitive exact match against the wire codes.
            ///
            /// Returns `None` for anything else; there is no fallback currency.
            pub fn parse(text: &str) -> Option<Currency> {
                Currency::all()
                    .iter()
                    .copied()
                    .find(|currency| currency.code().eq_ignore_ascii_case(text))
            }
        }

        impl std::fmt::Display for Currency {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.code())
            }
        }

        impl std::str::FromStr for Currency {
            type Err = $crate::UnknownCurrency;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Currency::parse(s).ok_or_else(|| $crate::UnknownCurrency(s.to_string()))
            }
        }
    };
}

// ─────────────────────────────────────────────────────────────────────────────
// CURRENCY DEFINITIONS - Add new currencies here!
// ─────────────────────────────────────────────────────────────────────────────

define_currencies! {
    USD => ("USD", "$", 2),
    JPY => ("JPY", "¥", 0),
    CAD => ("CAD", "CA$", 2),
    UAH => ("UAH", "₴", 2),
    EUR => ("EUR", "€", 2),
    CNY => ("CNY", "CN¥", 2),
    GBP => ("GBP", "£", 2),
    ILS => ("ILS", "₪", 2),
}

/// Ordered catalog used to populate selection lists.
pub fn all_currencies() -> &'static [Currency] {
    Currency::all()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
