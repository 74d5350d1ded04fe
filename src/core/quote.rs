//! Quote snapshot and the text shown in the overlay

use super::TickerCode;

/// Marker for a non-negative change
pub const UP_MARKER: char = '*';
/// Marker for a negative change
pub const DOWN_MARKER: char = '#';
/// Shown when a refresh fails for any reason
pub const PLACEHOLDER: &str = "--";
/// Shown before the first refresh completes
pub const LOADING: &str = "Loading...";

/// Prices from one upstream response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteSnapshot {
    pub current_price: f64,
    pub previous_close: f64,
}

impl QuoteSnapshot {
    pub fn new(current_price: f64, previous_close: f64) -> Self {
        Self {
            current_price,
            previous_close,
        }
    }

    /// Change against the previous close, in percent
    pub fn percent_change(&self) -> f64 {
        (self.current_price - self.previous_close) / self.previous_close * 100.0
    }
}

/// Direction of the last rendered change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Up,
    Down,
    /// No quote yet, or the last refresh failed
    Unknown,
}

impl Trend {
    pub fn from_percent(percent: f64) -> Self {
        if percent >= 0.0 {
            Trend::Up
        } else {
            Trend::Down
        }
    }

    /// RGB color, red for up and green for down as on mainland exchanges
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Trend::Up => (244, 67, 54),
            Trend::Down => (76, 175, 80),
            Trend::Unknown => (158, 158, 158),
        }
    }
}

/// What the overlay label currently shows
#[derive(Debug, Clone, PartialEq)]
pub enum QuoteDisplay {
    Loading,
    Change { digits: String, percent: f64 },
    Unavailable,
}

impl QuoteDisplay {
    pub fn change(ticker: &TickerCode, percent: f64) -> Self {
        QuoteDisplay::Change {
            digits: ticker.digits().to_string(),
            percent,
        }
    }

    /// Label text, e.g. `"600000\n*5.00^"`
    pub fn text(&self) -> String {
        match self {
            QuoteDisplay::Loading => LOADING.to_string(),
            QuoteDisplay::Unavailable => PLACEHOLDER.to_string(),
            QuoteDisplay::Change { digits, percent } => {
                let sign = if *percent >= 0.0 { UP_MARKER } else { DOWN_MARKER };
                format!("{}\n{}{:.2}^", digits, sign, percent.abs())
            }
        }
    }

    pub fn trend(&self) -> Trend {
        match self {
            QuoteDisplay::Change { percent, .. } => Trend::from_percent(*percent),
            _ => Trend::Unknown,
        }
    }
}
