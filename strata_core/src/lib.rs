//! # Strata Core
//!
//! A minimal content-addressable object store in the style of a version
//! control system's plumbing layer.
//!
//! Arbitrary byte content (file contents, directory listings, commit
//! metadata) is stored as immutable, SHA-1-identified objects: each object
//! is type-tagged, length-prefixed, DEFLATE-compressed and written once
//! under a two-level fan-out directory keyed by its hash.
//!
//! ## Features
//!
//! - Content-addressed storage with write-once loose objects
//! - Binary tree objects representing directory listings
//! - Commit objects tying a tree to authorship and a message
//! - Recursive working-tree snapshots (directories in, tree ids out)
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use strata_core::{ObjectKind, Store};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Initialize a repository and store some content
//! let store = Store::init("./work")?;
//! let id = store.write(ObjectKind::Blob, b"hello\n")?;
//! let object = store.read(&id)?;
//! assert_eq!(object.body, b"hello\n");
//!
//! // Snapshot the working directory into a tree of objects
//! if let Some(root) = store.snapshot(Path::new("./work"))? {
//!     println!("{}", root);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod hash;
mod store;
mod walk;

pub mod commit;
pub mod object;
pub mod tree;

pub use commit::{Commit, Signature};
pub use error::{Error, Result};
pub use hash::{ID_SIZE, ObjectId};
pub use object::{ObjectKind, RawObject};
pub use store::{META_DIR, Store};
pub use tree::{EntryKind, TreeEntry};
