//! Ticker code model - a market-prefixed A-share symbol (e.g. `sh600000`)

use std::fmt;

/// Number of digits in a mainland A-share code
pub const CODE_DIGITS: usize = 6;

/// Exchange a 6-digit code is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    /// Shanghai Stock Exchange (codes starting with 6)
    Shanghai,
    /// Shenzhen Stock Exchange (codes starting with 0 or 3)
    Shenzhen,
}

impl Market {
    /// Guess the market from the leading digit of a raw code
    pub fn for_code(code: &str) -> Option<Self> {
        match code.as_bytes().first() {
            Some(b'6') => Some(Market::Shanghai),
            Some(b'0') | Some(b'3') => Some(Market::Shenzhen),
            _ => None,
        }
    }

    /// Two-letter prefix used by the quote service
    pub fn prefix(&self) -> &'static str {
        match self {
            Market::Shanghai => "sh",
            Market::Shenzhen => "sz",
        }
    }
}

/// Prefix a raw code with its market. Unrecognized codes pass through unchanged.
pub fn format_code(code: &str) -> String {
    match Market::for_code(code) {
        Some(market) => format!("{}{}", market.prefix(), code),
        None => code.to_string(),
    }
}

/// Whether user input is exactly six ASCII digits
pub fn is_valid_input(raw: &str) -> bool {
    raw.len() == CODE_DIGITS && raw.bytes().all(|b| b.is_ascii_digit())
}

/// A market-prefixed ticker code.
///
/// Malformed codes are tolerated: whatever is stored is sent upstream as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickerCode(String);

impl TickerCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Build a ticker from Settings input, or `None` if the input is not 6 digits
    pub fn from_input(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if is_valid_input(raw) {
            Some(Self(format_code(raw)))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last six characters, i.e. the code without its market prefix
    pub fn digits(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(CODE_DIGITS - 1)
            .map_or(0, |(i, _)| i);
        &self.0[start..]
    }
}

impl fmt::Display for TickerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
