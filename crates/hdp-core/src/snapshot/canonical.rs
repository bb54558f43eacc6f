//! Byte-level canonicalization shared by the builder and the verifier

use super::ColumnSpec;
use serde_json::Value;
use std::borrow::Cow;

/// Rewrite every line ending as a single LF
///
/// A LF and the run of CR bytes directly before it become one LF, so the
/// result never contains CRLF and normalizing twice equals normalizing once.
/// Any other CR is left alone, so a CR that replaces or joins another byte
/// still changes the digest.
pub fn normalize_line_endings(bytes: &[u8]) -> Cow<'_, [u8]> {
    if !bytes.windows(2).any(|w| w == b"\r\n") {
        return Cow::Borrowed(bytes);
    }

    let mut out = Vec::with_capacity(bytes.len());
    let mut pending_cr = 0usize;
    for &b in bytes {
        match b {
            b'\r' => pending_cr += 1,
            b'\n' => {
                pending_cr = 0;
                out.push(b'\n');
            }
            _ => {
                out.resize(out.len() + pending_cr, b'\r');
                pending_cr = 0;
                out.push(b);
            }
        }
    }
    out.resize(out.len() + pending_cr, b'\r');
    Cow::Owned(out)
}

/// Canonical serialization of an ordered column list
///
/// A JSON array with one entry per column in source order: the bare name,
/// or a `[name, type]` pair when the source declared a type.
pub fn canonical_schema_bytes(columns: &[ColumnSpec]) -> Vec<u8> {
    let entries: Vec<Value> = columns
        .iter()
        .map(|c| match &c.declared_type {
            None => Value::String(c.name.clone()),
            Some(t) => Value::Array(vec![Value::String(c.name.clone()), Value::String(t.clone())]),
        })
        .collect();
    // Serializing a Value built from strings cannot fail
    serde_json::to_vec(&Value::Array(entries)).unwrap_or_default()
}
