//! Registry client
//!
//! The connection is opened once at process start and released once at
//! process end, however many poll iterations run in between.

use std::io;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

use ps_core::value::{Attribute, Record, ScalarValue};
use ps_core::RegistryError;

use crate::protocol::{RegistryRequest, RegistryResponse};

/// Read access to the remote instrumentation registry.
///
/// Consumed by the snapshot collector; implemented over TCP in production
/// and by scripted doubles in tests.
#[async_trait]
pub trait RegistryClient: Send {
    /// Discover instrument identities matching a name pattern
    async fn find_instruments(&mut self, pattern: &str) -> Result<Vec<String>, RegistryError>;

    /// Read a scalar attribute; `None` means the attribute is absent
    async fn attribute(
        &mut self,
        instrument: &str,
        key: &str,
    ) -> Result<Option<ScalarValue>, RegistryError>;

    /// Read a record-array attribute in registry order
    async fn record_attribute(
        &mut self,
        instrument: &str,
        key: &str,
    ) -> Result<Vec<Record>, RegistryError>;
}

/// Client for the registry exposed by a running server process
pub struct TcpRegistryClient {
    address: String,
    stream: Option<TcpStream>,
}

impl TcpRegistryClient {
    /// Create a new client for the given `host:port` address
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            stream: None,
        }
    }

    /// Get the address
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Connect to the registry. Idempotent.
    pub async fn connect(&mut self) -> Result<(), RegistryError> {
        if self.stream.is_some() {
            return Ok(());
        }

        tracing::debug!("Connecting to registry at {}", self.address);

        let stream =
            TcpStream::connect(&self.address)
                .await
                .map_err(|source| RegistryError::Connect {
                    address: self.address.clone(),
                    source,
                })?;

        self.stream = Some(stream);
        Ok(())
    }

    /// Check whether the registry is answering
    pub async fn ping(&mut self) -> Result<bool, RegistryError> {
        self.connect().await?;

        match self.send_request(RegistryRequest::Ping).await {
            Ok(RegistryResponse::Pong) => Ok(true),
            Ok(_) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Release the registry connection.
    ///
    /// Called on every exit path; a client that never connected is a no-op.
    pub async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
            tracing::debug!("Closed registry connection to {}", self.address);
        }
    }

    async fn send_request(
        &mut self,
        request: RegistryRequest,
    ) -> Result<RegistryResponse, RegistryError> {
        let stream = self.stream.as_mut().ok_or(RegistryError::NotConnected)?;

        // Send request as JSON line
        let mut request_json = serde_json::to_string(&request)?;
        request_json.push('\n');
        stream.write_all(request_json.as_bytes()).await?;

        // Read response line
        let (reader, _writer) = stream.split();
        let mut reader = BufReader::new(reader);
        let mut response_line = String::new();
        let n = reader.read_line(&mut response_line).await?;
        if n == 0 {
            return Err(RegistryError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "registry closed the connection",
            )));
        }

        // A registry-level failure propagates unmodified to the driver
        let response: RegistryResponse = serde_json::from_str(&response_line)?;
        match response {
            RegistryResponse::Error { message } => Err(RegistryError::Remote(message)),
            other => Ok(other),
        }
    }
}

#[async_trait]
impl RegistryClient for TcpRegistryClient {
    async fn find_instruments(&mut self, pattern: &str) -> Result<Vec<String>, RegistryError> {
        self.connect().await?;

        let request = RegistryRequest::FindInstruments {
            pattern: pattern.to_string(),
        };

        match self.send_request(request).await? {
            RegistryResponse::Instruments { names } => Ok(names),
            other => Err(RegistryError::Unexpected(format!("{:?}", other))),
        }
    }

    async fn attribute(
        &mut self,
        instrument: &str,
        key: &str,
    ) -> Result<Option<ScalarValue>, RegistryError> {
        self.connect().await?;

        let request = RegistryRequest::GetAttribute {
            instrument: instrument.to_string(),
            key: key.to_string(),
        };

        match self.send_request(request).await? {
            RegistryResponse::Attribute { value: None } => Ok(None),
            RegistryResponse::Attribute {
                value: Some(Attribute::Scalar(value)),
            } => Ok(Some(value)),
            RegistryResponse::Attribute {
                value: Some(Attribute::RecordArray(_)),
            } => Err(RegistryError::Unexpected(format!(
                "record array for scalar attribute {}",
                key
            ))),
            other => Err(RegistryError::Unexpected(format!("{:?}", other))),
        }
    }

    async fn record_attribute(
        &mut self,
        instrument: &str,
        key: &str,
    ) -> Result<Vec<Record>, RegistryError> {
        self.connect().await?;

        let request = RegistryRequest::GetRecordAttribute {
            instrument: instrument.to_string(),
            key: key.to_string(),
        };

        match self.send_request(request).await? {
            RegistryResponse::Attribute { value: None } => Ok(Vec::new()),
            RegistryResponse::Attribute {
                value: Some(Attribute::RecordArray(records)),
            } => Ok(records),
            RegistryResponse::Attribute {
                value: Some(Attribute::Scalar(_)),
            } => Err(RegistryError::Unexpected(format!(
                "scalar for record-array attribute {}",
                key
            ))),
            other => Err(RegistryError::Unexpected(format!("{:?}", other))),
        }
    }
}
