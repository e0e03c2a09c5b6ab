//! ps-core: Core abstractions and configuration for poolstat
//!
//! This crate provides the attribute value model, error types, and
//! configuration structures shared by the registry client and the CLI.

pub mod config;
pub mod error;
pub mod value;

pub use error::{CommandError, ConfigError, PoolStatError, RegistryError};
pub use value::{Attribute, Record, ScalarValue};
