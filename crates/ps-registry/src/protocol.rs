//! Request/response messages for registry access
//!
//! Uses JSON-encoded messages over TCP, one message per line. Scalar and
//! record-array attribute reads share a single response shape carrying an
//! [`Attribute`]; the client dispatches on the known key.

use serde::{Deserialize, Serialize};

use ps_core::value::Attribute;

/// Request from the monitor to the registry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryRequest {
    /// Discover instruments whose name matches a pattern
    FindInstruments { pattern: String },

    /// Read a scalar attribute of an instrument
    GetAttribute { instrument: String, key: String },

    /// Read a record-array attribute of an instrument
    GetRecordAttribute { instrument: String, key: String },

    /// Ping (liveness probe)
    Ping,
}

/// Response from the registry to the monitor
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RegistryResponse {
    /// Matching instrument identities, in registry iteration order
    Instruments { names: Vec<String> },

    /// Attribute value; `None` means the attribute is absent
    Attribute { value: Option<Attribute> },

    /// Error response
    Error { message: String },

    /// Pong response
    Pong,
}
