//! Point-in-time snapshots of connection pool state

use ps_core::value::ScalarValue;

/// One connection pool's state at one instant.
///
/// Scalars the registry did not report are `None` and are omitted from the
/// rendered report entirely. A fresh set of snapshots is built on every poll
/// iteration; nothing persists across iterations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolSnapshot {
    /// Instrument identity naming the pool
    pub identity: String,
    /// Host of the server the pool connects to
    pub host: Option<ScalarValue>,
    /// Port of the server the pool connects to
    pub port: Option<ScalarValue>,
    /// Configured maximum connection count
    pub size: Option<ScalarValue>,
    /// Connections currently allocated
    pub total: Option<ScalarValue>,
    /// Lifetime count of connections ever allocated
    pub ever_created: Option<ScalarValue>,
    /// Count of currently checked-out connections
    pub in_use: Option<ScalarValue>,
    /// In-use connections, in registry order.
    ///
    /// The length is whatever the registry returned at the instant of the
    /// query and is not reconciled against `in_use`; the two can race.
    pub in_use_connections: Vec<ConnectionSnapshot>,
}

/// One in-use connection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionSnapshot {
    /// Resource path the operation targets
    pub namespace: Option<ScalarValue>,
    /// Kind of operation in flight
    pub op_code: Option<ScalarValue>,
    /// Operation filter/body, already serialized as structured data by the
    /// registry; rendered verbatim rather than quoted
    pub query: Option<ScalarValue>,
    /// Documents involved (mostly relevant for batch operations)
    pub num_documents: Option<ScalarValue>,
    /// Executing thread identifier
    pub thread_name: Option<ScalarValue>,
    /// Milliseconds the operation has been running
    pub duration_ms: Option<ScalarValue>,
    /// Local endpoint port; always rendered last with no trailing separator
    pub local_port: Option<ScalarValue>,
}
