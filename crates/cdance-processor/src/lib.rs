//! Offline choreography processor.
//!
//! This crate provides:
//! - JSON + environment configuration with CLI overrides
//! - Continuous and key-pose choreography building
//! - Choreography persistence
//! - Structured run logging

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod processor;

pub use cli::Cli;
pub use config::{ProcessingMode, ProcessorConfig};
pub use error::{ProcessorError, ProcessorResult};
pub use logging::{init_tracing, RunLogger};
pub use processor::{load_sequence, ChoreographyProcessor, ProcessRequest};
