//! Polling driver
//!
//! Repeats collect → render → emit with a fixed delay between iterations,
//! a bounded number of times or until cancelled. One cycle runs to
//! completion before the next begins; nothing is shared between cycles.

use std::io::Write;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use ps_core::PoolStatError;
use ps_registry::RegistryClient;

use crate::collector::collect_pools;
use crate::render::render;

/// Drives repeated collect/render/emit cycles against one registry client
pub struct PollingDriver {
    iterations: u64,
    interval: Duration,
}

impl PollingDriver {
    /// A `rowcount` of 0 means run until cancelled
    pub fn new(rowcount: u64, interval: Duration) -> Self {
        let iterations = if rowcount == 0 { u64::MAX } else { rowcount };
        Self {
            iterations,
            interval,
        }
    }

    /// Run the polling loop, emitting one report per iteration to the sink.
    ///
    /// Stops after the configured iteration count, on cancellation, or on
    /// the first collection failure. A failed iteration emits nothing; the
    /// run is not retried. Returns the number of reports emitted.
    pub async fn run<C, W>(
        &self,
        client: &mut C,
        sink: &mut W,
        cancel: &CancellationToken,
    ) -> Result<u64, PoolStatError>
    where
        C: RegistryClient + ?Sized,
        W: Write,
    {
        let mut emitted = 0;

        for i in 0..self.iterations {
            if cancel.is_cancelled() {
                break;
            }

            let pools = collect_pools(client).await?;
            let report = render(&pools);

            // The report ends in a newline already; the extra one leaves a
            // blank line between consecutive reports.
            writeln!(sink, "{}", report)?;
            sink.flush()?;
            emitted += 1;

            tracing::debug!(iteration = i + 1, pools = pools.len(), "Report emitted");

            // No delay after the final iteration
            if i + 1 != self.iterations {
                tokio::select! {
                    _ = tokio::time::sleep(self.interval) => {}
                    _ = cancel.cancelled() => break,
                }
            }
        }

        Ok(emitted)
    }
}
