//! Core data models

mod app_config;
mod quote;
mod ticker;

pub use app_config::*;
pub use quote::*;
pub use ticker::*;
