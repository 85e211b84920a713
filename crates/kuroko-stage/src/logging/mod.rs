//! Logging utilities.
//!
//! Centralizes logger initialization. Everything in the crate logs
//! through the standard `log` facade; this module only decides where
//! those records go.

mod init;

pub use init::{LoggingConfig, init_logging};
