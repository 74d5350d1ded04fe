//! Runtime configuration owned by the UI thread

use super::TickerCode;

/// Ticker and window-level settings.
///
/// Lives inside the UI app and is lent out by reference; the ticker is the
/// only field that gets persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub ticker: TickerCode,
    pub topmost: bool,
}

impl AppConfig {
    pub fn new(ticker: TickerCode) -> Self {
        Self {
            ticker,
            topmost: true,
        }
    }
}
