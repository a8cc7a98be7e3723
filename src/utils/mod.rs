//! Utility functions and helpers for the promptpix service.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and credential redaction for log text.
//!
//! Author: kelexine (<https://github.com/kelexine>)

pub mod logging;
