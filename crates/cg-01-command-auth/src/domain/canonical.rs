//! # Canonical Encoding
//!
//! Deterministic serialization of a value tree into the string that gets
//! signed. Two logically equal values always encode identically, whatever
//! the member order of the source document.
//!
//! ## Rules
//!
//! | Value | Encoding |
//! |-------|----------|
//! | object | `{"k":v,...}`, keys sorted bytewise, keys not escaped |
//! | array | `[v,...]` in source order |
//! | string | quoted; only `\`, `"`, `\n`, `\r`, `\t` escaped |
//! | integer | plain decimal |
//! | float | fixed 6 decimals (`1.500000`) |
//! | bool / null | `true` `false` `null` |
//!
//! Other control characters pass through unescaped. Remote signers depend on
//! this exact byte sequence, so it must not be "corrected" to JSON escaping.
//!
//! ## Bounds
//!
//! A value deeper than [`MAX_DEPTH`] (root is depth 0) or an object with more
//! than [`MAX_KEYS`] members fails. Both bounds cap the work per command.

use super::errors::CanonicalError;
use super::value::{Node, ValueTree};
use std::fmt::Write;

/// Deepest allowed nesting level; the root is level 0.
pub const MAX_DEPTH: usize = 10;

/// Most members allowed in a single object.
pub const MAX_KEYS: usize = 64;

/// Encoding of an absent parameters value.
pub const EMPTY_PARAMETERS: &str = "{}";

/// Canonicalize a value tree.
///
/// # Errors
///
/// Fails when a bound is exceeded or a float is NaN or infinite.
pub fn canonicalize<V: ValueTree + ?Sized>(value: &V) -> Result<String, CanonicalError> {
    let mut out = String::new();
    write_value(value, 0, &mut out)?;
    Ok(out)
}

/// Canonicalize a command's parameters; `null` or absent encodes as `{}`.
///
/// # Errors
///
/// Same as [`canonicalize`].
pub fn canonical_parameters<V: ValueTree + ?Sized>(value: &V) -> Result<String, CanonicalError> {
    if matches!(value.node(), Node::Null) {
        return Ok(EMPTY_PARAMETERS.to_owned());
    }
    canonicalize(value)
}

fn write_value<V: ValueTree + ?Sized>(
    value: &V,
    depth: usize,
    out: &mut String,
) -> Result<(), CanonicalError> {
    if depth > MAX_DEPTH {
        return Err(CanonicalError::DepthExceeded {
            depth,
            max: MAX_DEPTH,
        });
    }

    match value.node() {
        Node::Null => out.push_str("null"),
        Node::Bool(true) => out.push_str("true"),
        Node::Bool(false) => out.push_str("false"),
        // Writing to a String cannot fail.
        Node::Int(i) => {
            let _ = write!(out, "{i}");
        }
        Node::UInt(u) => {
            let _ = write!(out, "{u}");
        }
        Node::Float(f) => {
            if !f.is_finite() {
                return Err(CanonicalError::NonFiniteFloat);
            }
            let _ = write!(out, "{f:.6}");
        }
        Node::Str(s) => write_string(s, out),
        Node::Array(items) => {
            out.push('[');
            for (i, item) in items.enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, depth + 1, out)?;
            }
            out.push(']');
        }
        Node::Object(members) => {
            let mut members: Vec<(&str, &V)> = members.collect();
            if members.len() > MAX_KEYS {
                return Err(CanonicalError::TooManyKeys {
                    count: members.len(),
                    max: MAX_KEYS,
                });
            }
            members.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push('{');
            for (i, (key, member)) in members.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('"');
                out.push_str(key);
                out.push_str("\":");
                write_value(member, depth + 1, out)?;
            }
            out.push('}');
        }
    }
    Ok(())
}

fn write_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
}
