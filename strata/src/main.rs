use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use strata_core::{Commit, ObjectId, ObjectKind, Signature, Store, commit, object, tree};

/// Strata - a content-addressed object store with tree snapshots
#[derive(Parser)]
#[command(name = "strata")]
#[command(about = "Content-addressed object store with tree snapshots", long_about = None)]
#[command(version)]
struct Cli {
    /// Repository root (defaults to STRATA_ROOT env var or the current directory)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new repository
    Init,

    /// Compute the blob id of a file
    HashObject {
        /// Also write the blob to the store
        #[arg(short = 'w', long)]
        write: bool,

        /// File to hash
        file: PathBuf,
    },

    /// Print the contents of a stored object
    CatFile {
        /// Pretty-print the object body
        #[arg(short = 'p')]
        pretty: bool,

        /// Object id
        id: String,
    },

    /// Snapshot a directory and print its root tree id
    WriteTree {
        /// Directory to snapshot (defaults to the repository root)
        dir: Option<PathBuf>,
    },

    /// List the entries of a tree (a commit id resolves to its tree)
    LsTree {
        /// Print entry names only
        #[arg(long)]
        name_only: bool,

        /// Tree or commit id
        id: String,
    },

    /// Create a commit object for a tree
    CommitTree {
        /// Tree id to commit
        tree: String,

        /// Parent commit id
        #[arg(short = 'p', long)]
        parent: Option<String>,

        /// Commit message
        #[arg(short = 'm', long)]
        message: String,
    },

    /// Compare one file between two commits
    CompareCommit {
        /// First commit id
        a: String,

        /// Second commit id
        b: String,

        /// Entry name in the commits' root trees
        name: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Determine repository root: CLI arg > STRATA_ROOT env var > current dir
    let root = cli
        .root
        .or_else(|| std::env::var("STRATA_ROOT").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."));

    match cli.command {
        Commands::Init => cmd_init(&root),
        Commands::HashObject { write, file } => cmd_hash_object(&root, write, &file),
        Commands::CatFile { pretty, id } => cmd_cat_file(&root, pretty, &id),
        Commands::WriteTree { dir } => cmd_write_tree(&root, dir),
        Commands::LsTree { name_only, id } => cmd_ls_tree(&root, name_only, &id),
        Commands::CommitTree {
            tree,
            parent,
            message,
        } => cmd_commit_tree(&root, &tree, parent, &message),
        Commands::CompareCommit { a, b, name } => cmd_compare_commit(&root, &a, &b, &name),
    }
}

fn open_store(root: &Path) -> Result<Store> {
    Store::open(root).with_context(|| format!("failed to open repository at {}", root.display()))
}

fn parse_id(hex: &str) -> Result<ObjectId> {
    ObjectId::from_hex(hex).with_context(|| format!("invalid object id: {}", hex))
}

fn cmd_init(root: &Path) -> Result<()> {
    Store::init(root)
        .with_context(|| format!("failed to initialize repository at {}", root.display()))?;

    println!("Initialized empty repository at {}", root.display());

    Ok(())
}

fn cmd_hash_object(root: &Path, write: bool, file: &Path) -> Result<()> {
    let id = if write {
        let store = open_store(root)?;
        store
            .write_blob(file)
            .with_context(|| format!("failed to store {}", file.display()))?
    } else {
        // Hash only, no repository required
        let data =
            fs::read(file).with_context(|| format!("cannot open {}", file.display()))?;
        let (id, _) = object::encode(ObjectKind::Blob, &data);
        id
    };

    println!("{}", id);

    Ok(())
}

fn cmd_cat_file(root: &Path, pretty: bool, id_str: &str) -> Result<()> {
    if !pretty {
        anyhow::bail!("only pretty-printed output (-p) is supported");
    }

    let store = open_store(root)?;
    let id = parse_id(id_str)?;
    let obj = store
        .read(&id)
        .with_context(|| format!("failed to read object {}", id))?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match obj.kind {
        ObjectKind::Blob | ObjectKind::Commit => {
            handle.write_all(&obj.body)?;
        }
        ObjectKind::Tree => {
            for entry in tree::decode(&obj.body)? {
                writeln!(
                    handle,
                    "{} {} {}\t{}",
                    entry.mode,
                    entry.kind().as_str(),
                    entry.id,
                    entry.name
                )?;
            }
        }
    }

    Ok(())
}

fn cmd_write_tree(root: &Path, dir: Option<PathBuf>) -> Result<()> {
    let store = open_store(root)?;
    let dir = dir.unwrap_or_else(|| root.to_path_buf());

    let id = store
        .snapshot(&dir)
        .with_context(|| format!("failed to snapshot {}", dir.display()))?;

    match id {
        Some(id) => println!("{}", id),
        None => anyhow::bail!("nothing to snapshot: {} is empty", dir.display()),
    }

    Ok(())
}

fn cmd_ls_tree(root: &Path, name_only: bool, id_str: &str) -> Result<()> {
    let store = open_store(root)?;
    let id = parse_id(id_str)?;
    let obj = store
        .read(&id)
        .with_context(|| format!("failed to read object {}", id))?;

    let entries = match obj.kind {
        ObjectKind::Tree => tree::decode(&obj.body)?,
        ObjectKind::Commit => {
            // A commit id resolves through its tree header
            let tree_id = commit::tree_id(&obj.body)?;
            store
                .read_tree(&tree_id)
                .with_context(|| format!("failed to read tree {} of commit {}", tree_id, id))?
        }
        ObjectKind::Blob => anyhow::bail!("object {} is not a tree or commit", id),
    };

    for entry in entries {
        if name_only {
            println!("{}", entry.name);
        } else {
            println!(
                "{} {} {}\t{}",
                entry.mode,
                entry.kind().as_str(),
                entry.id,
                entry.name
            );
        }
    }

    Ok(())
}

fn cmd_commit_tree(
    root: &Path,
    tree_str: &str,
    parent_str: Option<String>,
    message: &str,
) -> Result<()> {
    let store = open_store(root)?;

    let tree = parse_id(tree_str)?;
    if !store.contains(&tree) {
        anyhow::bail!("tree {} not found in repository", tree);
    }

    let parent = match parent_str {
        Some(hex) => Some(parse_id(&hex)?),
        None => None,
    };

    let name = std::env::var("STRATA_AUTHOR_NAME").unwrap_or_else(|_| "Strata".to_string());
    let email = std::env::var("STRATA_AUTHOR_EMAIL")
        .unwrap_or_else(|_| "strata@localhost".to_string());

    let now = Local::now();
    let identity = Signature::new(name, email, now.timestamp(), now.format("%z").to_string());

    let commit = Commit {
        tree,
        parent,
        identity,
        message: message.to_string(),
    };

    let id = store
        .write_commit(&commit)
        .with_context(|| "failed to write commit")?;

    println!("{}", id);

    Ok(())
}

fn cmd_compare_commit(root: &Path, a: &str, b: &str, name: &str) -> Result<()> {
    let store = open_store(root)?;

    let content_a = file_in_commit(&store, a, name)?;
    let content_b = file_in_commit(&store, b, name)?;

    if content_a == content_b {
        println!("File '{}' is identical in both commits.", name);
    } else {
        println!("File '{}' differs between commits.", name);
        println!("--- Commit {}", a);
        print!("{}", String::from_utf8_lossy(&content_a));
        println!("--- Commit {}", b);
        print!("{}", String::from_utf8_lossy(&content_b));
    }

    Ok(())
}

/// Load the blob named `name` from the root tree of the given commit.
fn file_in_commit(store: &Store, commit_str: &str, name: &str) -> Result<Vec<u8>> {
    let id = parse_id(commit_str)?;
    let obj = store
        .read(&id)
        .with_context(|| format!("failed to read object {}", id))?;

    if obj.kind != ObjectKind::Commit {
        anyhow::bail!("object {} is not a commit", id);
    }

    let tree_id = commit::tree_id(&obj.body)?;
    let entries = store
        .read_tree(&tree_id)
        .with_context(|| format!("failed to read tree {} of commit {}", tree_id, id))?;

    let entry = entries
        .iter()
        .find(|e| e.name == name)
        .with_context(|| format!("file '{}' not found in tree {}", name, tree_id))?;

    let blob = store
        .read(&entry.id)
        .with_context(|| format!("failed to read blob {}", entry.id))?;

    if blob.kind != ObjectKind::Blob {
        anyhow::bail!("entry '{}' in tree {} is not a blob", name, tree_id);
    }

    Ok(blob.body)
}
