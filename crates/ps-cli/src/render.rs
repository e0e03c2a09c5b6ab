//! Report rendering
//!
//! Serializes pool snapshots into the stable quasi-JSON text format that
//! existing tooling parses. The format rules are load-bearing: keys render
//! with a lower-cased first character, text values are single-quoted while
//! numbers render bare, a pre-serialized query body renders verbatim, and
//! every element except the last in its sequence is followed by a
//! separator. Absent fields emit nothing, separator included.

use ps_core::value::ScalarValue;

use crate::snapshot::{ConnectionSnapshot, PoolSnapshot};

/// Whether a field is followed by the regular separator or closes its object
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Regular,
    Last,
}

/// How a text value renders: quoted, or verbatim for pre-serialized bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TextStyle {
    Quoted,
    Verbatim,
}

/// Render a full report for one poll iteration.
///
/// Pure function of its input: repeated calls over the same snapshots
/// produce byte-identical text.
pub fn render(pools: &[PoolSnapshot]) -> String {
    let mut out = String::new();
    out.push_str("{ pools : [\n");
    for (i, pool) in pools.iter().enumerate() {
        render_pool(&mut out, pool, i == pools.len() - 1);
    }
    out.push_str("  ]\n");
    out.push_str("}\n");
    out
}

fn render_pool(out: &mut String, pool: &PoolSnapshot, last: bool) {
    let identity = ScalarValue::from(pool.identity.as_str());

    out.push_str("   { ");
    push_field(out, "ObjectName", Some(&identity), Position::Regular, TextStyle::Quoted);
    out.push('\n');

    out.push_str("     ");
    push_field(out, "Host", pool.host.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "Port", pool.port.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "Size", pool.size.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "Total", pool.total.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "EverCreated", pool.ever_created.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "InUse", pool.in_use.as_ref(), Position::Regular, TextStyle::Quoted);
    out.push('\n');

    render_connections(out, &pool.in_use_connections);

    out.push_str("   }");
    if !last {
        out.push(',');
    }
    out.push('\n');
}

fn render_connections(out: &mut String, connections: &[ConnectionSnapshot]) {
    out.push_str("     ");
    out.push_str(&key_string("InUseConnections"));
    out.push_str(": [\n");
    for (i, connection) in connections.iter().enumerate() {
        render_connection(out, connection, i == connections.len() - 1);
    }
    out.push_str("     ]\n");
}

fn render_connection(out: &mut String, connection: &ConnectionSnapshot, last: bool) {
    out.push_str("      { ");
    push_field(out, "namespace", connection.namespace.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "opCode", connection.op_code.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "query", connection.query.as_ref(), Position::Regular, TextStyle::Verbatim);
    push_field(out, "numDocuments", connection.num_documents.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "threadName", connection.thread_name.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "durationMS", connection.duration_ms.as_ref(), Position::Regular, TextStyle::Quoted);
    push_field(out, "localPort", connection.local_port.as_ref(), Position::Last, TextStyle::Quoted);
    out.push_str(" }");
    if !last {
        out.push_str(", ");
    }
    out.push('\n');
}

/// Emit `key: value` plus the separator its position calls for.
///
/// An absent value emits nothing at all, so separator placement follows
/// what was actually emitted rather than the fixed field list.
fn push_field(
    out: &mut String,
    key: &str,
    value: Option<&ScalarValue>,
    position: Position,
    style: TextStyle,
) {
    let Some(value) = value else { return };
    out.push_str(&key_string(key));
    out.push_str(": ");
    out.push_str(&value_string(value, style));
    if position == Position::Regular {
        out.push_str(", ");
    }
}

/// Attribute keys render with their first character lower-cased
fn key_string(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Text values are single-quoted unless the field carries pre-serialized
/// structured data; numbers render in their natural form.
fn value_string(value: &ScalarValue, style: TextStyle) -> String {
    match value {
        ScalarValue::Text(s) if style == TextStyle::Quoted => format!("'{}'", s),
        other => other.to_string(),
    }
}
