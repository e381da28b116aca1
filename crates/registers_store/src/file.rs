//! File-based store for persistent documents.

use crate::error::{StoreError, StoreResult};
use crate::store::RegistersStore;
use parking_lot::Mutex;
use registers_model::{CompanyNumber, RegistersDocument};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A directory of JSON documents, one file per company number.
///
/// # Durability
///
/// `put` writes to a temporary file, syncs it, and renames it over the
/// previous document, so a reader sees either the old or the new
/// document and never a partial one.
///
/// # Thread Safety
///
/// Writes are serialised through an internal lock; reads take no lock.
///
/// # Example
///
/// ```no_run
/// use registers_store::{FileStore, RegistersStore};
/// use std::path::Path;
///
/// let store = FileStore::open(Path::new("/var/lib/registers")).unwrap();
/// ```
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
            write_lock: Mutex::new(()),
        })
    }

    /// Returns the store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, id: &CompanyNumber) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn temp_path(&self, id: &CompanyNumber) -> PathBuf {
        self.dir.join(format!(".{}.json.tmp", id))
    }

    /// Writes `bytes` to `temp`, syncs it and renames it to `target`.
    /// The temporary file is removed if any step fails.
    fn replace_file(temp: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
        let result = File::create(temp)
            .and_then(|mut file| {
                file.write_all(bytes)?;
                file.sync_all()
            })
            .and_then(|()| fs::rename(temp, target));

        if let Err(e) = &result {
            warn!(path = %temp.display(), error = %e, "document write failed");
            if let Err(cleanup) = fs::remove_file(temp) {
                if cleanup.kind() != io::ErrorKind::NotFound {
                    warn!(path = %temp.display(), error = %cleanup, "temp file left behind");
                }
            }
        }
        result
    }
}

impl RegistersStore for FileStore {
    fn get(&self, id: &CompanyNumber) -> StoreResult<Option<RegistersDocument>> {
        let bytes = match fs::read(self.document_path(id)) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let document: RegistersDocument = serde_json::from_slice(&bytes)?;
        if document.id() != id {
            return Err(StoreError::Corrupted(format!(
                "document for {} filed under {}",
                document.id(),
                id
            )));
        }
        Ok(Some(document))
    }

    fn put(&self, document: &RegistersDocument) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let _guard = self.write_lock.lock();

        Self::replace_file(
            &self.temp_path(document.id()),
            &self.document_path(document.id()),
            &bytes,
        )?;
        debug!(company_number = %document.id(), bytes = bytes.len(), "document written");
        Ok(())
    }

    fn delete(&self, id: &CompanyNumber) -> StoreResult<()> {
        let _guard = self.write_lock.lock();
        match fs::remove_file(self.document_path(id)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::NotFound(id.clone())),
            Err(e) => Err(e.into()),
        }
    }
}
