//! poolstat: live connection pool statistics
//!
//! Polls a remote instrumentation registry for every registered connection
//! pool, captures a point-in-time snapshot of each pool and its in-use
//! connections, and renders the set as one stable text report per poll
//! iteration.

pub mod collector;
pub mod driver;
pub mod output;
pub mod render;
pub mod snapshot;

#[cfg(test)]
mod testutil;
