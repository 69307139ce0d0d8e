//! Working-tree snapshots: files become blobs, directories become trees.

use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::object::ObjectKind;
use crate::store::{META_DIR, Store};
use crate::tree::{self, MODE_DIR, MODE_FILE, TreeEntry};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Recursion bound for nested directories.
const MAX_DEPTH: usize = 256;

impl Store {
    /// Store a file's contents as a blob, returning its id.
    pub fn write_blob(&self, path: &Path) -> Result<ObjectId> {
        let data = fs::read(path)?;
        self.write(ObjectKind::Blob, &data)
    }

    /// Snapshot a directory into a tree of objects, depth-first.
    ///
    /// Regular files become blob entries (`100644`), subdirectories become
    /// subtree entries (`040000`). Returns `None` when there is nothing to
    /// snapshot: the directory is empty, or every child is itself an empty
    /// subtree. Empty tree objects are never written, and an empty subtree
    /// leaves no entry in its parent.
    pub fn snapshot(&self, dir: &Path) -> Result<Option<ObjectId>> {
        self.snapshot_dir(dir, 0)
    }

    fn snapshot_dir(&self, dir: &Path, depth: usize) -> Result<Option<ObjectId>> {
        if depth >= MAX_DEPTH {
            return Err(Error::TooDeep {
                path: dir.to_path_buf(),
            });
        }

        let mut entries = Vec::new();

        let walker = ignore::WalkBuilder::new(dir)
            .max_depth(Some(1)) // Only immediate children
            .hidden(false) // Include hidden files
            .git_ignore(false)
            .build();

        for walk_entry in walker {
            let walk_entry = walk_entry?;
            let path = walk_entry.path();

            // Skip the directory itself
            if path == dir {
                continue;
            }

            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    Error::invalid_entry(format!("unencodable file name: {}", path.display()))
                })?
                .to_string();

            // The repository's own metadata never enters a snapshot
            if name == META_DIR {
                continue;
            }

            let metadata = fs::symlink_metadata(path)?;
            if metadata.is_file() {
                let id = self.write_blob(path)?;
                entries.push(TreeEntry::new(MODE_FILE, id, name)?);
            } else if metadata.is_dir() {
                if let Some(id) = self.snapshot_dir(path, depth + 1)? {
                    entries.push(TreeEntry::new(MODE_DIR, id, name)?);
                }
            }
            // Symlinks and special files are skipped
        }

        if entries.is_empty() {
            debug!(dir = %dir.display(), "nothing to snapshot");
            return Ok(None);
        }

        // Name-sorted entries make the tree id independent of the
        // filesystem's native listing order.
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));

        let id = self.write(ObjectKind::Tree, &tree::encode(&entries))?;
        debug!(dir = %dir.display(), id = %id, entries = entries.len(), "tree written");
        Ok(Some(id))
    }
}
