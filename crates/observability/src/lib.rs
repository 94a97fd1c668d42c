//! Observability infrastructure for the simulated exchange workspace
//!
//! This crate provides structured logging via `tracing`, shared by the
//! simulation core and the demo binary.
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("simx", LogFormat::Pretty)?;
//! tracing::info!("starting");
//! ```

pub mod logging;

pub use logging::{init_logging, LogFormat};
