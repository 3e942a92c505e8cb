use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tempfile::NamedTempFile;
use log::{debug, info};
use crate::{Book, Result, Error};

#[allow(unused_imports)]
use crate::engine::MemStore;

/// Key under which the collection is stored in the document.
pub const BOOKS_KEY: &str = "books";

/// The whole persisted JSON document.
///
/// Top-level keys other than `books` are carried through untouched so that a
/// rewrite never drops data it does not understand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Handles disk I/O for the [`MemStore`].
///
/// The document lives in a single file. Writes go to a temporary file in the
/// same directory which is then renamed over the target, so a crash mid-write
/// leaves the previous version intact.
pub struct Persistence {
    path: PathBuf,
}

impl Persistence {
    /// Creates a handler for the document at `path`.
    ///
    /// The parent directory is created if it does not exist. The file itself
    /// is not touched until [`Persistence::load`] or [`Persistence::save`].
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the document from disk.
    ///
    /// A missing or empty file, or one without a `books` key, is initialised
    /// with an empty collection and written back before returning. A file that
    /// is not a JSON object is an error.
    pub fn load(&self) -> Result<StoreDocument> {
        let content = match fs::read(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            info!("No store document at {:?}, creating an empty one", self.path);
            let doc = StoreDocument::default();
            self.save(&doc)?;
            return Ok(doc);
        }

        let mut raw: Map<String, Value> = serde_json::from_slice(&content)?;
        let has_books = match raw.get(BOOKS_KEY) {
            Some(Value::Null) => {
                raw.remove(BOOKS_KEY);
                false
            }
            Some(_) => true,
            None => false,
        };

        let doc: StoreDocument = serde_json::from_value(Value::Object(raw))?;
        if !has_books {
            info!("Store document {:?} has no '{}' collection, initialising it", self.path, BOOKS_KEY);
            self.save(&doc)?;
        }

        debug!("Loaded {} books from {:?}", doc.books.len(), self.path);
        Ok(doc)
    }

    /// Writes the whole document to disk atomically.
    pub fn save(&self, doc: &StoreDocument) -> Result<()> {
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let bytes = serde_json::to_vec_pretty(doc)?;

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&bytes)?;
        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;

        debug!("Flushed {} books to {:?}", doc.books.len(), self.path);
        Ok(())
    }
}
