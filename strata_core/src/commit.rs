//! Commit objects: a tree reference plus authorship and a message.
//!
//! A commit body is UTF-8 text: header lines (`tree`, optional `parent`,
//! `author`, `committer`), a blank line, then the free-form message with a
//! trailing newline.

use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::object::ObjectKind;
use crate::store::Store;

/// Who authored a commit, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Author name.
    pub name: String,
    /// Author email.
    pub email: String,
    /// Seconds since the Unix epoch.
    pub timestamp: i64,
    /// Timezone offset in `+HHMM` form.
    pub tz: String,
}

impl Signature {
    /// Create a signature.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        timestamp: i64,
        tz: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            timestamp,
            tz: tz.into(),
        }
    }

    fn header_value(&self) -> String {
        format!(
            "{} <{}> {} {}",
            self.name, self.email, self.timestamp, self.tz
        )
    }
}

/// A commit: a snapshot (tree) plus metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Root tree of the snapshot.
    pub tree: ObjectId,
    /// Preceding commit, absent for the first commit.
    pub parent: Option<ObjectId>,
    /// Used for both the author and committer lines.
    pub identity: Signature,
    /// Free-form message; empty is permitted.
    pub message: String,
}

impl Commit {
    /// Serialize the commit body.
    ///
    /// Header lines appear in fixed order; the `parent` line only when a
    /// parent is present.
    pub fn encode(&self) -> Vec<u8> {
        let mut body = format!("tree {}\n", self.tree);
        if let Some(parent) = &self.parent {
            body.push_str(&format!("parent {}\n", parent));
        }
        body.push_str(&format!("author {}\n", self.identity.header_value()));
        body.push_str(&format!("committer {}\n", self.identity.header_value()));
        body.push('\n');
        body.push_str(&self.message);
        body.push('\n');
        body.into_bytes()
    }
}

/// Extract the tree id from an encoded commit body.
///
/// Scans the header lines (everything before the blank separator) for the
/// `tree` header.
pub fn tree_id(body: &[u8]) -> Result<ObjectId> {
    let text = std::str::from_utf8(body)
        .map_err(|_| Error::corrupt_commit("body is not valid UTF-8"))?;

    for line in text.lines() {
        if line.is_empty() {
            break;
        }
        if let Some(hex) = line.strip_prefix("tree ") {
            return ObjectId::from_hex(hex.trim());
        }
    }

    Err(Error::corrupt_commit("missing tree header"))
}

impl Store {
    /// Encode and store a commit, returning its id.
    pub fn write_commit(&self, commit: &Commit) -> Result<ObjectId> {
        self.write(ObjectKind::Commit, &commit.encode())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn some_tree() -> ObjectId {
        ObjectId::from_hex("d670460b4b4aece5915caf5c68d12f560a9fe3e4").unwrap()
    }

    fn identity() -> Signature {
        Signature::new("Ada Lovelace", "ada@example.com", 1_700_000_000, "+0100")
    }

    #[test]
    fn test_encode_without_parent() {
        let commit = Commit {
            tree: some_tree(),
            parent: None,
            identity: identity(),
            message: "init".to_string(),
        };

        let body = String::from_utf8(commit.encode()).unwrap();
        let first_line = body.lines().next().unwrap();

        assert_eq!(
            first_line,
            "tree d670460b4b4aece5915caf5c68d12f560a9fe3e4"
        );
        assert!(!body.contains("\nparent "));
        assert!(body.ends_with("\n\ninit\n"));
    }

    #[test]
    fn test_encode_with_parent() {
        let parent = ObjectId::digest(b"previous commit");
        let commit = Commit {
            tree: some_tree(),
            parent: Some(parent),
            identity: identity(),
            message: "second".to_string(),
        };

        let body = String::from_utf8(commit.encode()).unwrap();
        let lines: Vec<&str> = body.lines().collect();

        assert!(lines[0].starts_with("tree "));
        assert_eq!(lines[1], format!("parent {}", parent));
        assert_eq!(
            lines[2],
            "author Ada Lovelace <ada@example.com> 1700000000 +0100"
        );
        assert_eq!(
            lines[3],
            "committer Ada Lovelace <ada@example.com> 1700000000 +0100"
        );
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "second");
    }

    #[test]
    fn test_encode_empty_message() {
        let commit = Commit {
            tree: some_tree(),
            parent: None,
            identity: identity(),
            message: String::new(),
        };

        let body = String::from_utf8(commit.encode()).unwrap();
        // Blank separator line followed by the empty message's newline
        assert!(body.ends_with("+0100\n\n\n"));
    }

    #[test]
    fn test_tree_id_parses_header() {
        let commit = Commit {
            tree: some_tree(),
            parent: Some(ObjectId::digest(b"parent")),
            identity: identity(),
            message: "tree imposter: not this one".to_string(),
        };

        let parsed = tree_id(&commit.encode()).unwrap();
        assert_eq!(parsed, some_tree());
    }

    #[test]
    fn test_tree_id_ignores_message_lines() {
        // A "tree" line after the blank separator is message content
        let body = b"parent aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\n\ntree deadbeef\n";
        let err = tree_id(body).unwrap_err();
        assert!(matches!(err, Error::CorruptCommit { .. }));
    }

    #[test]
    fn test_tree_id_missing_header() {
        let err = tree_id(b"just a message\n").unwrap_err();
        assert!(matches!(err, Error::CorruptCommit { .. }));
    }

    #[test]
    fn test_tree_id_not_utf8() {
        let err = tree_id(&[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, Error::CorruptCommit { .. }));
    }

    #[test]
    fn test_write_commit_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let commit = Commit {
            tree: some_tree(),
            parent: None,
            identity: identity(),
            message: "first".to_string(),
        };

        let id = store.write_commit(&commit).unwrap();
        let obj = store.read(&id).unwrap();

        assert_eq!(obj.kind, ObjectKind::Commit);
        assert_eq!(obj.body, commit.encode());
        assert_eq!(tree_id(&obj.body).unwrap(), some_tree());
    }

    #[test]
    fn test_write_commit_deterministic() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::init(temp_dir.path()).unwrap();

        let commit = Commit {
            tree: some_tree(),
            parent: None,
            identity: identity(),
            message: "same".to_string(),
        };

        let id1 = store.write_commit(&commit).unwrap();
        let id2 = store.write_commit(&commit).unwrap();
        assert_eq!(id1, id2);
    }
}
