//! Core error types for poolstat

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the poolstat ecosystem
#[derive(Error, Debug)]
pub enum PoolStatError {
    /// Registry access error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Command execution error
    #[error("Command error: {0}")]
    Command(#[from] CommandError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Failures talking to the remote instrumentation registry.
///
/// Any of these is fatal to the current run: the polling driver does not
/// retry a failed iteration.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Could not establish the registry connection
    #[error("Failed to connect to registry at {address}: {source}")]
    Connect {
        address: String,
        #[source]
        source: io::Error,
    },

    /// A request was issued before the connection was established
    #[error("Not connected to registry")]
    NotConnected,

    /// The connection dropped mid-request
    #[error("Registry connection lost: {0}")]
    Io(#[from] io::Error),

    /// The registry sent something that does not parse
    #[error("Malformed registry response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The registry reported a failure for the request
    #[error("Registry reported failure: {0}")]
    Remote(String),

    /// The registry answered with the wrong response kind
    #[error("Unexpected registry response: {0}")]
    Unexpected(String),
}

/// Failures executing a wrapped database command
#[derive(Error, Debug)]
pub enum CommandError {
    /// The server refused the command
    #[error("Command rejected by server: {0}")]
    Rejected(String),

    /// The command never reached the server
    #[error("Command transport failed: {0}")]
    Transport(#[from] io::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
