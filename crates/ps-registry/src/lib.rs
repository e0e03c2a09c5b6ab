//! ps-registry: Wire protocol and client for the instrumentation registry
//!
//! The registry is the remote facility through which pool instruments are
//! discovered and their attributes read. Messages are JSON-encoded, one per
//! line, over a single TCP connection held for the lifetime of the run.

pub mod client;
pub mod operation;
pub mod protocol;

pub use client::{RegistryClient, TcpRegistryClient};
pub use protocol::{RegistryRequest, RegistryResponse};
