//! Loose-object encoding: type-tagged, length-prefixed, SHA-1 addressed.
//!
//! Every object serializes to
//!
//! ```text
//! "<kind> <size>\0" + body
//! ```
//!
//! with an ASCII header, single space separator and single NUL terminator.
//! The object id is the SHA-1 of those bytes, so the id is a pure function
//! of kind and body.

use crate::error::{Error, Result};
use crate::hash::ObjectId;
use std::fmt;

/// Object kinds. A kind determines how a body is interpreted, never how it
/// is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Raw file content.
    Blob,
    /// A directory listing of named entries.
    Tree,
    /// A snapshot reference plus authorship metadata.
    Commit,
}

impl ObjectKind {
    /// Header tag for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
            ObjectKind::Commit => "commit",
        }
    }

    /// Parse a header tag.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(ObjectKind::Blob),
            "tree" => Some(ObjectKind::Tree),
            "commit" => Some(ObjectKind::Commit),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A decoded loose object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObject {
    /// Kind parsed from the header.
    pub kind: ObjectKind,
    /// Size declared by the header; always equals `body.len()` for a
    /// well-formed object.
    pub size: u64,
    /// The object body.
    pub body: Vec<u8>,
}

/// Compute the id and serialized store bytes for an object.
///
/// Pure function: identical `(kind, body)` inputs always yield identical
/// output, byte for byte.
pub fn encode(kind: ObjectKind, body: &[u8]) -> (ObjectId, Vec<u8>) {
    let header = format!("{} {}\0", kind.as_str(), body.len());
    let mut data = Vec::with_capacity(header.len() + body.len());
    data.extend_from_slice(header.as_bytes());
    data.extend_from_slice(body);
    let id = ObjectId::digest(&data);
    (id, data)
}

/// Split and validate serialized object bytes read back from disk.
///
/// `id` is only used for error context.
pub fn decode(id: &ObjectId, data: &[u8]) -> Result<RawObject> {
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::corrupt(id.to_hex(), "missing header terminator"))?;

    let header = std::str::from_utf8(&data[..nul])
        .map_err(|_| Error::corrupt(id.to_hex(), "header is not valid UTF-8"))?;

    let (kind_str, size_str) = header
        .split_once(' ')
        .ok_or_else(|| Error::corrupt(id.to_hex(), "malformed header"))?;

    let kind = ObjectKind::parse(kind_str).ok_or_else(|| {
        Error::corrupt(id.to_hex(), format!("unknown object kind '{}'", kind_str))
    })?;

    let size: u64 = size_str
        .parse()
        .map_err(|_| Error::corrupt(id.to_hex(), format!("bad size '{}'", size_str)))?;

    let body = data[nul + 1..].to_vec();
    if body.len() as u64 != size {
        return Err(Error::corrupt(
            id.to_hex(),
            format!("size mismatch: header says {}, body is {}", size, body.len()),
        ));
    }

    Ok(RawObject { kind, size, body })
}
