//! Builds exchange API request descriptors.

use reqwest::{Method, Url};

use converter_types::ConversionQuery;

use crate::ClientError;

/// Everything needed to issue one conversion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub method: Method,
    pub url: Url,
    pub accept: &'static str,
}

/// Turns conversion queries into `GET {base}/currency/commercial/exchange/{amount}-{FROM}/{TO}/latest`.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    base_url: Url,
}

impl RequestBuilder {
    /// Validates the base endpoint once; per-request building cannot fail afterwards.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot carry a path".to_string()));
        }

        Ok(Self { base_url: url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn build(&self, query: &ConversionQuery) -> RequestDescriptor {
        let mut url = self.base_url.clone();
        let amount_segment = format!("{}-{}", query.amount, query.from.code());
        // `new` rejects base URLs that cannot carry a path, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend([
                "currency",
                "commercial",
                "exchange",
                amount_segment.as_str(),
                query.to.code(),
                "latest",
            ]);
        }

        RequestDescriptor {
            method: Method::GET,
            url,
            accept: "application/json",
        }
    }
}
