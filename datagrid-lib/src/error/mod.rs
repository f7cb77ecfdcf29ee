//! Error types

mod config;
mod fetch;
mod table;

pub use config::*;
pub use fetch::*;
pub use table::*;
