// Hide console window on Windows
#![windows_subsystem = "windows"]

//! StockBar - desktop overlay for a single A-share quote
//!
//! Provides:
//! - A small always-on-top window with the daily change of one stock
//! - System tray icon with Show/Hide/Settings/Exit
//! - A Settings window to change the stock code

mod config;
mod core;
mod dispatch;
mod logging;
mod native_ui;
mod quote;
mod refresh;
mod tray;

mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
}

fn main() {
    std::process::exit(run());
}

fn run() -> i32 {
    if let Err(e) = logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    match native_ui::run() {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            tracing::error!("StockBar failed: {:#}", e);
            exit_codes::UNEXPECTED_FAILURE
        }
    }
}
