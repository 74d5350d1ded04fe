//! Sina Finance quote client
//!
//! `GET http://hq.sinajs.cn/list=<code>` answers with a GBK-encoded
//! JavaScript assignment. The service rejects requests without a Sina referer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::REFERER;
use reqwest::Response;

use super::{decode_gbk, parse_quote, QuoteError, QuoteSource};
use crate::core::{QuoteSnapshot, TickerCode};

const BASE_URL: &str = "http://hq.sinajs.cn";
const REFERER_URL: &str = "http://finance.sina.com.cn";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Reads a response body as GBK regardless of its declared charset
#[async_trait]
trait TextForceGbk {
    async fn text_force_gbk(self) -> Result<String, QuoteError>;
}

#[async_trait]
impl TextForceGbk for Response {
    async fn text_force_gbk(self) -> Result<String, QuoteError> {
        Ok(decode_gbk(self.bytes().await?.as_ref()))
    }
}

/// Quote source backed by the Sina Finance HTTP endpoint
pub struct SinaQuoteSource {
    client: reqwest::Client,
    base_url: String,
}

impl SinaQuoteSource {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the client at another host, e.g. a local test server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn quote_url(&self, ticker: &TickerCode) -> String {
        format!("{}/list={}", self.base_url.trim_end_matches('/'), ticker)
    }
}

impl Default for SinaQuoteSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteSource for SinaQuoteSource {
    async fn fetch_snapshot(&self, ticker: &TickerCode) -> Result<Option<QuoteSnapshot>, QuoteError> {
        let url = self.quote_url(ticker);
        tracing::debug!("Fetching quote from {}", url);

        let response = self
            .client
            .get(&url)
            .header(REFERER, REFERER_URL)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(QuoteError::Status(response.status().as_u16()));
        }

        let body = response.text_force_gbk().await?;
        parse_quote(&body)
    }
}
