//! Store management and loose-object I/O.

use crate::error::{Error, Result};
use crate::hash::ObjectId;
use crate::object::{self, ObjectKind, RawObject};
use crate::tree::{self, TreeEntry};
use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the repository metadata directory.
pub const META_DIR: &str = ".strata";

/// Contents of the HEAD pointer written at init.
const HEAD_CONTENT: &str = "ref: refs/heads/main\n";

/// A content-addressed object store rooted at a working directory.
///
/// The root is always explicit; nothing resolves against the process
/// working directory.
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Initialize a repository skeleton under `root`.
    ///
    /// Creates the directory structure:
    /// - `.strata/objects/` for loose objects
    /// - `.strata/refs/` (empty)
    /// - `.strata/HEAD` pointing at `refs/heads/main`
    ///
    /// Re-running init on an existing repository leaves existing content
    /// in place.
    pub fn init<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let meta = root.join(META_DIR);

        fs::create_dir_all(meta.join("objects"))?;
        fs::create_dir_all(meta.join("refs"))?;

        let head = meta.join("HEAD");
        if !head.exists() {
            fs::write(&head, HEAD_CONTENT)?;
        }

        Ok(Self { root })
    }

    /// Open an existing repository at `root`.
    ///
    /// Validates the repository skeleton.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        let meta = root.join(META_DIR);

        if !meta.exists() {
            return Err(Error::invalid_store(
                &root,
                "repository metadata directory missing",
            ));
        }
        if !meta.join("objects").exists() {
            return Err(Error::invalid_store(&root, "objects directory missing"));
        }

        Ok(Self { root })
    }

    /// The working-directory root this store is attached to.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The repository metadata directory.
    pub fn meta_dir(&self) -> PathBuf {
        self.root.join(META_DIR)
    }

    /// Path of the loose object file for `id`.
    ///
    /// Objects fan out as `objects/{2-hex}/{38-hex}`. The split is part of
    /// the on-disk format: any compatible reader derives the same path.
    pub fn object_path(&self, id: &ObjectId) -> PathBuf {
        self.meta_dir()
            .join("objects")
            .join(id.prefix())
            .join(id.suffix())
    }

    /// Whether an object with this id is already stored.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.object_path(id).exists()
    }

    /// Store an object, returning its id.
    ///
    /// Writes are write-once: an existing object file is trusted and never
    /// overwritten, since identical content always serializes to identical
    /// bytes. The compressed form is built fully in memory and persisted
    /// through a temp file, so a reader never observes a partial object.
    pub fn write(&self, kind: ObjectKind, body: &[u8]) -> Result<ObjectId> {
        let (id, store_data) = object::encode(kind, body);

        let dir = self.meta_dir().join("objects").join(id.prefix());
        let path = dir.join(id.suffix());
        if path.exists() {
            debug!(id = %id, "object already present, skipping write");
            return Ok(id);
        }

        // mkdir tolerates the fan-out directory already existing
        fs::create_dir_all(&dir)?;

        let compressed = deflate(&store_data)?;

        let mut temp_file = tempfile::NamedTempFile::new_in(&dir)?;
        temp_file.write_all(&compressed)?;
        temp_file.flush()?;
        temp_file.persist(&path)?;

        debug!(id = %id, kind = %kind, bytes = body.len(), "object written");
        Ok(id)
    }

    /// Load and decode the object stored under `id`.
    pub fn read(&self, id: &ObjectId) -> Result<RawObject> {
        let path = self.object_path(id);
        if !path.exists() {
            return Err(Error::not_found(id.to_hex()));
        }

        let compressed = fs::read(&path)?;
        let data = inflate(&compressed)
            .map_err(|_| Error::corrupt(id.to_hex(), "zlib inflate failed"))?;

        object::decode(id, &data)
    }

    /// Read an object and decode it as a tree listing.
    pub fn read_tree(&self, id: &ObjectId) -> Result<Vec<TreeEntry>> {
        let obj = self.read(id)?;
        if obj.kind != ObjectKind::Tree {
            return Err(Error::kind_mismatch(
                ObjectKind::Tree.as_str(),
                obj.kind.as_str(),
            ));
        }
        tree::decode(&obj.body)
    }
}

/// Compress serialized object bytes with zlib (DEFLATE).
fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompress a loose object file.
fn inflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = ZlibDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}
