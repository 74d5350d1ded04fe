//! Quote fetching
//!
//! A [`QuoteSource`] turns a ticker into a price snapshot. Failures of any
//! kind are collapsed into a placeholder by the refresh loop, so sources
//! only need to report them, never recover from them.

mod sina;

use std::sync::OnceLock;

use async_trait::async_trait;
use regex_lite::Regex;
use thiserror::Error;

use crate::core::{QuoteSnapshot, TickerCode};

pub use sina::SinaQuoteSource;

/// Errors that can occur while fetching a quote
#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Quote service returned HTTP {0}")]
    Status(u16),

    #[error("Failed to parse quote: {0}")]
    Parse(String),
}

/// Source of quote snapshots
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the latest snapshot; `Ok(None)` means the response had no usable quote
    async fn fetch_snapshot(&self, ticker: &TickerCode) -> Result<Option<QuoteSnapshot>, QuoteError>;

    /// Fetch the change against the previous close, in percent
    async fn fetch(&self, ticker: &TickerCode) -> Result<Option<f64>, QuoteError> {
        Ok(self
            .fetch_snapshot(ticker)
            .await?
            .map(|snapshot| snapshot.percent_change()))
    }
}

fn quote_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r#"="(.*)""#).expect("Invalid quote regex"))
}

/// Parse a `var hq_str_xxx="name,open,prev_close,current,...";` body.
///
/// Returns `Ok(None)` when the quoted field list is missing or has fewer
/// than four fields, which is what the service sends for unknown codes.
pub fn parse_quote(body: &str) -> Result<Option<QuoteSnapshot>, QuoteError> {
    let Some(captures) = quote_regex().captures(body) else {
        return Ok(None);
    };

    let fields: Vec<&str> = captures[1].split(',').collect();
    if fields.len() < 4 {
        return Ok(None);
    }

    let previous_close = parse_price(fields[2], "previous close")?;
    let current_price = parse_price(fields[3], "current price")?;

    if previous_close == 0.0 {
        return Err(QuoteError::Parse("previous close is zero".to_string()));
    }

    Ok(Some(QuoteSnapshot::new(current_price, previous_close)))
}

fn parse_price(field: &str, name: &str) -> Result<f64, QuoteError> {
    let value: f64 = field
        .trim()
        .parse()
        .map_err(|e| QuoteError::Parse(format!("{} {:?}: {}", name, field, e)))?;

    if !value.is_finite() {
        return Err(QuoteError::Parse(format!("{} {:?} is not finite", name, field)));
    }
    Ok(value)
}

/// Decode a GBK response body
pub fn decode_gbk(bytes: &[u8]) -> String {
    let (text, _, had_errors) = encoding_rs::GBK.decode(bytes);
    if had_errors {
        tracing::debug!("Quote body contained invalid GBK sequences");
    }
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quote() {
        let body = r#"var hq_str_sh600000="浦发银行,10.00,10.00,10.50,10.60,9.90";"#;
        let snapshot = parse_quote(body).unwrap().unwrap();
        assert_eq!(snapshot.previous_close, 10.0);
        assert_eq!(snapshot.current_price, 10.5);
        assert_eq!(format!("{:.2}", snapshot.percent_change()), "5.00");
    }

    #[test]
    fn test_parse_quote_without_pattern_is_none() {
        assert!(parse_quote("").unwrap().is_none());
        assert!(parse_quote("<html>Forbidden</html>").unwrap().is_none());
    }

    #[test]
    fn test_parse_quote_with_too_few_fields_is_none() {
        // Unknown codes come back as an empty quoted string
        assert!(parse_quote(r#"var hq_str_sh999999="";"#).unwrap().is_none());
        assert!(parse_quote(r#"var hq_str_sh600000="a,1,2";"#).unwrap().is_none());
    }

    #[test]
    fn test_parse_quote_bad_number_is_error() {
        let result = parse_quote(r#"var hq_str_sh600000="name,1.0,abc,2.0";"#);
        assert!(matches!(result, Err(QuoteError::Parse(_))));
    }

    #[test]
    fn test_parse_quote_zero_previous_close_is_error() {
        let result = parse_quote(r#"var hq_str_sh600000="name,0.00,0.00,0.00";"#);
        assert!(matches!(result, Err(QuoteError::Parse(_))));
    }

    #[test]
    fn test_parse_quote_rejects_nan() {
        let result = parse_quote(r#"var hq_str_sh600000="name,1.0,NaN,2.0";"#);
        assert!(matches!(result, Err(QuoteError::Parse(_))));
    }

    #[test]
    fn test_decode_gbk() {
        let (bytes, _, _) = encoding_rs::GBK.encode("浦发银行,10.00");
        assert_eq!(decode_gbk(&bytes), "浦发银行,10.00");
    }

    struct FixedSource(Option<QuoteSnapshot>);

    #[async_trait]
    impl QuoteSource for FixedSource {
        async fn fetch_snapshot(&self, _ticker: &TickerCode) -> Result<Option<QuoteSnapshot>, QuoteError> {
            Ok(self.0)
        }
    }

    #[test]
    fn test_default_fetch_computes_percent() {
        let ticker = TickerCode::new("sh600000");

        let source = FixedSource(Some(QuoteSnapshot::new(9.5, 10.0)));
        let percent = tokio_test::block_on(source.fetch(&ticker)).unwrap().unwrap();
        assert_eq!(format!("{:.2}", percent), "-5.00");

        let empty = FixedSource(None);
        assert!(tokio_test::block_on(empty.fetch(&ticker)).unwrap().is_none());
    }
}
