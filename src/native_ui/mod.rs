//! Native egui-based UI for StockBar
//!
//! A small borderless overlay showing the quote, plus the Settings window

mod app;
mod overlay;
mod settings;
mod theme;

pub use app::run;
