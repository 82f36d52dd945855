// Crypto Provider — File-backed keyring
//
// One JSON file per record inside an owner-only directory. The file name is
// the hex SHA-256 of the record key, so keys of any length map to safe,
// fixed-length file names; the key itself is kept inside the record.
//
// Records are plain JSON. The passphrase checked in `keyring::open` gates
// access through this crate only; anyone able to read the directory can
// read the records. They hold provider metadata, never private keys.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::record::StoredItem;
use super::{Keyring, KeyringBackend, KeyringError, KeyringResult, Record};
use crate::secure_fs;

const RECORD_EXTENSION: &str = "record";

pub struct FileKeyring {
    dir: PathBuf,
    backend: KeyringBackend,
}

impl FileKeyring {
    /// Open (creating if needed) a record directory. `backend` is reported
    /// back by `Keyring::backend` and distinguishes `file` from `test`.
    pub fn new(dir: &Path, backend: KeyringBackend) -> KeyringResult<Self> {
        secure_fs::ensure_private_dir(dir)?;

        Ok(Self {
            dir: dir.to_path_buf(),
            backend,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn record_path(&self, uid: &str) -> PathBuf {
        let digest = Sha256::digest(uid.as_bytes());
        self.dir
            .join(format!("{}.{}", hex::encode(digest), RECORD_EXTENSION))
    }

    fn read_record(path: &Path) -> KeyringResult<Record> {
        let contents = fs::read(path)?;
        let item: StoredItem = serde_json::from_slice(&contents)?;
        Record::from_item(item)
    }
}

impl Keyring for FileKeyring {
    fn list(&self) -> KeyringResult<Vec<Record>> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == RECORD_EXTENSION) {
                records.push(Self::read_record(&path)?);
            }
        }

        Ok(records)
    }

    fn get(&self, uid: &str) -> KeyringResult<Record> {
        let path = self.record_path(uid);
        if !path.exists() {
            return Err(KeyringError::NotFound(uid.to_string()));
        }
        Self::read_record(&path)
    }

    fn delete(&self, uid: &str) -> KeyringResult<()> {
        match fs::remove_file(self.record_path(uid)) {
            Ok(()) => {
                tracing::debug!(key = %uid, "Keyring record deleted");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(KeyringError::NotFound(uid.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn new_item(&self, uid: &str, data: &[u8], codec_type: &str) -> KeyringResult<Record> {
        let record = Record::new(uid, data, codec_type);
        let encoded = serde_json::to_vec_pretty(&record.to_item())?;

        secure_fs::write_private_file(&self.record_path(uid), &encoded)?;
        tracing::debug!(key = %uid, "Keyring record written");

        Ok(record)
    }

    fn backend(&self) -> KeyringBackend {
        self.backend
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
