//! Shared utilities for the Verdict poll client.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat};
pub use time::format_created_date;
