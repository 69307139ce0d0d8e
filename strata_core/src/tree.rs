//! The binary tree-entry format for directory listings.
//!
//! Each entry serializes as
//!
//! ```text
//! <mode> <name>\0<20 raw id bytes>
//! ```
//!
//! with no separator between entries; the fixed-width id and the NUL after
//! the name make the format self-delimiting.

use crate::error::{Error, Result};
use crate::hash::{ID_SIZE, ObjectId};

/// Mode string for regular files.
pub const MODE_FILE: &str = "100644";

/// Mode string for directories.
pub const MODE_DIR: &str = "040000";

/// Width modes are normalized to.
const MODE_WIDTH: usize = 6;

/// What a tree entry points at, derived from its mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A file entry.
    Blob,
    /// A subdirectory entry.
    Tree,
}

impl EntryKind {
    /// Display name for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Blob => "blob",
            EntryKind::Tree => "tree",
        }
    }
}

/// A named, mode-tagged reference to a blob or subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    /// Six-character octal mode string, e.g. `100644` or `040000`.
    pub mode: String,
    /// Id of the referenced object.
    pub id: ObjectId,
    /// Entry name (a single path component, UTF-8).
    pub name: String,
}

impl TreeEntry {
    /// Create an entry, normalizing the mode to six characters.
    pub fn new(mode: &str, id: ObjectId, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::invalid_entry("name cannot be empty"));
        }
        if name.contains('\0') {
            return Err(Error::invalid_entry("name cannot contain NUL bytes"));
        }
        if mode.is_empty()
            || mode.len() > MODE_WIDTH
            || !mode.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(Error::invalid_entry(format!("bad mode '{}'", mode)));
        }

        Ok(Self {
            mode: normalize_mode(mode),
            id,
            name,
        })
    }

    /// Entry kind, derived from the mode prefix: `04` means a subtree.
    pub fn kind(&self) -> EntryKind {
        if self.mode.starts_with("04") {
            EntryKind::Tree
        } else {
            EntryKind::Blob
        }
    }
}

/// Left-pad a mode with `0` to six characters, e.g. `40000` -> `040000`.
fn normalize_mode(mode: &str) -> String {
    format!("{:0>width$}", mode, width = MODE_WIDTH)
}

/// Serialize entries back-to-back, in the order given.
///
/// The codec writes exactly the sequence it receives; canonical name
/// ordering is the caller's concern.
pub fn encode(entries: &[TreeEntry]) -> Vec<u8> {
    let mut buf = Vec::new();
    for entry in entries {
        buf.extend_from_slice(entry.mode.as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(entry.name.as_bytes());
        buf.push(0);
        buf.extend_from_slice(entry.id.as_bytes());
    }
    buf
}

/// Parse a tree body into its entries.
pub fn decode(body: &[u8]) -> Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut offset = 0;

    while offset < body.len() {
        // mode ends at the first space
        let space = find(body, offset, b' ')
            .ok_or_else(|| Error::corrupt_tree("unterminated mode"))?;
        let mode = std::str::from_utf8(&body[offset..space])
            .map_err(|_| Error::corrupt_tree("mode is not valid UTF-8"))?;

        // name ends at the next NUL
        let nul = find(body, space + 1, 0)
            .ok_or_else(|| Error::corrupt_tree("unterminated name"))?;
        let name = std::str::from_utf8(&body[space + 1..nul])
            .map_err(|_| Error::corrupt_tree("name is not valid UTF-8"))?
            .to_string();

        // the next 20 bytes are the raw id
        let id_end = nul + 1 + ID_SIZE;
        if id_end > body.len() {
            return Err(Error::corrupt_tree("truncated hash"));
        }
        let mut raw = [0u8; ID_SIZE];
        raw.copy_from_slice(&body[nul + 1..id_end]);

        entries.push(TreeEntry {
            mode: normalize_mode(mode),
            id: ObjectId::from_bytes(raw),
            name,
        });

        offset = id_end;
    }

    Ok(entries)
}

fn find(buf: &[u8], from: usize, byte: u8) -> Option<usize> {
    buf[from..].iter().position(|&b| b == byte).map(|i| from + i)
}
