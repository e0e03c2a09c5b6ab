//! Snapshot collection
//!
//! Discovers every registered connection pool instrument and pulls its
//! scalar attributes and nested in-use connection records into snapshots.

use ps_core::RegistryError;
use ps_registry::RegistryClient;

use crate::snapshot::{ConnectionSnapshot, PoolSnapshot};

/// Name pattern matching every registered connection pool instrument
pub const POOL_PATTERN: &str = "*:type=ConnectionPool,*";

/// Attribute key for the nested in-use connection records
pub const IN_USE_CONNECTIONS_KEY: &str = "InUseConnections";

/// Collect a snapshot of every registered connection pool.
///
/// Pools come back in registry iteration order. An attribute that is merely
/// absent becomes `None`; a failure reading the registry itself aborts the
/// whole collection, so an incomplete report is never produced.
pub async fn collect_pools<C>(client: &mut C) -> Result<Vec<PoolSnapshot>, RegistryError>
where
    C: RegistryClient + ?Sized,
{
    let names = client.find_instruments(POOL_PATTERN).await?;
    tracing::debug!(pools = names.len(), "Discovered connection pool instruments");

    let mut pools = Vec::with_capacity(names.len());
    for name in names {
        pools.push(collect_pool(client, name).await?);
    }

    Ok(pools)
}

async fn collect_pool<C>(client: &mut C, identity: String) -> Result<PoolSnapshot, RegistryError>
where
    C: RegistryClient + ?Sized,
{
    let host = client.attribute(&identity, "Host").await?;
    let port = client.attribute(&identity, "Port").await?;
    let size = client.attribute(&identity, "Size").await?;
    let total = client.attribute(&identity, "Total").await?;
    let ever_created = client.attribute(&identity, "EverCreated").await?;
    let in_use = client.attribute(&identity, "InUse").await?;

    let records = client
        .record_attribute(&identity, IN_USE_CONNECTIONS_KEY)
        .await?;
    let in_use_connections = records
        .iter()
        .map(|record| ConnectionSnapshot {
            namespace: record.get("namespace").cloned(),
            op_code: record.get("opCode").cloned(),
            query: record.get("query").cloned(),
            num_documents: record.get("numDocuments").cloned(),
            thread_name: record.get("threadName").cloned(),
            duration_ms: record.get("durationMS").cloned(),
            local_port: record.get("localPort").cloned(),
        })
        .collect();

    Ok(PoolSnapshot {
        identity,
        host,
        port,
        size,
        total,
        ever_created,
        in_use,
        in_use_connections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::FakeRegistry;
    use ps_core::value::{Record, ScalarValue};

    #[tokio::test]
    async fn test_collects_pools_in_registry_order() {
        let mut registry = FakeRegistry::new();
        registry.add_pool("pool:name=b");
        registry.add_pool("pool:name=a");
        registry.set_scalar("pool:name=b", "Size", 5);
        registry.set_scalar("pool:name=a", "Size", 10);

        let pools = collect_pools(&mut registry).await.unwrap();
        assert_eq!(pools.len(), 2);
        assert_eq!(pools[0].identity, "pool:name=b");
        assert_eq!(pools[1].identity, "pool:name=a");
        assert_eq!(pools[0].size, Some(ScalarValue::Int(5)));
    }

    #[tokio::test]
    async fn test_absent_attributes_become_none() {
        let mut registry = FakeRegistry::new();
        registry.add_pool("pool:name=a");
        registry.set_scalar("pool:name=a", "Size", 10);
        registry.set_scalar("pool:name=a", "InUse", 0);

        let pools = collect_pools(&mut registry).await.unwrap();
        let pool = &pools[0];
        assert_eq!(pool.host, None);
        assert_eq!(pool.port, None);
        assert_eq!(pool.total, None);
        assert_eq!(pool.ever_created, None);
        assert_eq!(pool.size, Some(ScalarValue::Int(10)));
        assert!(pool.in_use_connections.is_empty());
    }

    #[tokio::test]
    async fn test_connection_records_in_order() {
        let mut registry = FakeRegistry::new();
        registry.add_pool("pool:name=a");
        registry.set_records(
            "pool:name=a",
            vec![
                Record::new()
                    .with("namespace", "db.coll")
                    .with("opCode", "query")
                    .with("query", "{}")
                    .with("numDocuments", 1)
                    .with("threadName", "t1")
                    .with("durationMS", 5)
                    .with("localPort", 54000),
                Record::new().with("threadName", "t2"),
            ],
        );

        let pools = collect_pools(&mut registry).await.unwrap();
        let connections = &pools[0].in_use_connections;
        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].namespace, Some("db.coll".into()));
        assert_eq!(connections[0].local_port, Some(ScalarValue::Int(54000)));
        assert_eq!(connections[1].thread_name, Some("t2".into()));
        assert_eq!(connections[1].op_code, None);
    }

    #[tokio::test]
    async fn test_in_use_count_not_reconciled_with_list() {
        // The two attributes race on the server side; we report both as-is.
        let mut registry = FakeRegistry::new();
        registry.add_pool("pool:name=a");
        registry.set_scalar("pool:name=a", "InUse", 3);
        registry.set_records("pool:name=a", vec![Record::new().with("threadName", "t1")]);

        let pools = collect_pools(&mut registry).await.unwrap();
        assert_eq!(pools[0].in_use, Some(ScalarValue::Int(3)));
        assert_eq!(pools[0].in_use_connections.len(), 1);
    }

    #[tokio::test]
    async fn test_discovery_failure_aborts_collection() {
        let mut registry = FakeRegistry::new();
        registry.add_pool("pool:name=a");
        registry.fail_discovery_after = Some(0);

        let err = collect_pools(&mut registry).await.unwrap_err();
        assert!(matches!(err, RegistryError::Remote(_)));
    }

    #[tokio::test]
    async fn test_attribute_failure_fails_whole_collection() {
        // No partial-pool suppression: one unreadable pool fails everything.
        let mut registry = FakeRegistry::new();
        registry.add_pool("pool:name=a");
        registry.add_pool("pool:name=b");
        registry.set_scalar("pool:name=a", "Size", 10);
        registry.fail_attribute_for = Some("pool:name=b".to_string());

        let err = collect_pools(&mut registry).await.unwrap_err();
        assert!(matches!(err, RegistryError::Remote(_)));
    }
}
