//! Test doubles shared by the collector and driver tests

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use ps_core::value::{Record, ScalarValue};
use ps_core::RegistryError;
use ps_registry::RegistryClient;

/// Scripted in-memory registry
#[derive(Default)]
pub struct FakeRegistry {
    instruments: Vec<String>,
    scalars: HashMap<(String, String), ScalarValue>,
    records: HashMap<String, Vec<Record>>,
    /// Number of discovery calls that succeed before one fails;
    /// `None` means discovery never fails
    pub fail_discovery_after: Option<u32>,
    /// Instrument whose attribute reads fail
    pub fail_attribute_for: Option<String>,
    discovery_calls: u32,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_pool(&mut self, name: &str) {
        self.instruments.push(name.to_string());
    }

    pub fn set_scalar(&mut self, name: &str, key: &str, value: impl Into<ScalarValue>) {
        self.scalars
            .insert((name.to_string(), key.to_string()), value.into());
    }

    pub fn set_records(&mut self, name: &str, records: Vec<Record>) {
        self.records.insert(name.to_string(), records);
    }

    fn check_instrument(&self, instrument: &str) -> Result<(), RegistryError> {
        if self.fail_attribute_for.as_deref() == Some(instrument) {
            return Err(RegistryError::Remote(format!(
                "attribute read failed for {}",
                instrument
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RegistryClient for FakeRegistry {
    async fn find_instruments(&mut self, _pattern: &str) -> Result<Vec<String>, RegistryError> {
        if let Some(limit) = self.fail_discovery_after {
            if self.discovery_calls >= limit {
                return Err(RegistryError::Remote("registry unavailable".to_string()));
            }
        }
        self.discovery_calls += 1;
        Ok(self.instruments.clone())
    }

    async fn attribute(
        &mut self,
        instrument: &str,
        key: &str,
    ) -> Result<Option<ScalarValue>, RegistryError> {
        self.check_instrument(instrument)?;
        Ok(self
            .scalars
            .get(&(instrument.to_string(), key.to_string()))
            .cloned())
    }

    async fn record_attribute(
        &mut self,
        instrument: &str,
        _key: &str,
    ) -> Result<Vec<Record>, RegistryError> {
        self.check_instrument(instrument)?;
        Ok(self.records.get(instrument).cloned().unwrap_or_default())
    }
}

/// `io::Write` sink backed by shared memory, inspectable after a driver
/// task finishes with it
#[derive(Clone, Default)]
pub struct SharedSink(Arc<Mutex<Vec<u8>>>);

impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
