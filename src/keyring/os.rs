// Crypto Provider — OS native keyring
//
// Records are stored in the platform credential store via the `keyring`
// crate:
//   - macOS: Security.framework Keychain
//   - Windows: Windows Credential Manager
//   - Linux: D-Bus Secret Service (GNOME Keyring / KDE Wallet)
//
// Native stores cannot enumerate entries, so the set of known keys is kept in
// an extra index entry alongside the records.

use std::collections::BTreeSet;

use keyring::Entry;
use parking_lot::Mutex;

use super::record::StoredItem;
use super::{Keyring, KeyringBackend, KeyringError, KeyringResult, Record};

/// Entry name of the key index. Not a valid record key.
const INDEX_ENTRY: &str = "__crypto_provider_index__";

pub struct OsKeyring {
    service: String,
    // Serializes read-modify-write cycles on the index entry.
    index_lock: Mutex<()>,
}

impl OsKeyring {
    /// `service` namespaces every entry, usually the application name.
    pub fn new(service: &str) -> KeyringResult<Self> {
        // Fail early if no platform store is reachable
        Entry::new(service, INDEX_ENTRY).map_err(os_error)?;

        Ok(Self {
            service: service.to_string(),
            index_lock: Mutex::new(()),
        })
    }

    fn entry(&self, uid: &str) -> KeyringResult<Entry> {
        Entry::new(&self.service, uid).map_err(os_error)
    }

    fn read_index(&self) -> KeyringResult<BTreeSet<String>> {
        match self.entry(INDEX_ENTRY)?.get_password() {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(keyring::Error::NoEntry) => Ok(BTreeSet::new()),
            Err(e) => Err(os_error(e)),
        }
    }

    fn write_index(&self, index: &BTreeSet<String>) -> KeyringResult<()> {
        let json = serde_json::to_string(index)?;
        self.entry(INDEX_ENTRY)?.set_password(&json).map_err(os_error)
    }
}

impl Keyring for OsKeyring {
    fn list(&self) -> KeyringResult<Vec<Record>> {
        let index = self.read_index()?;
        let mut records = Vec::with_capacity(index.len());

        for uid in &index {
            match self.get(uid) {
                Ok(record) => records.push(record),
                // Removed behind our back; the index is only a hint
                Err(KeyringError::NotFound(_)) => {
                    tracing::debug!(key = %uid, "Indexed keyring entry is missing");
                }
                Err(e) => return Err(e),
            }
        }

        Ok(records)
    }

    fn get(&self, uid: &str) -> KeyringResult<Record> {
        let json = self.entry(uid)?.get_password().map_err(|e| match e {
            keyring::Error::NoEntry => KeyringError::NotFound(uid.to_string()),
            other => os_error(other),
        })?;

        let item: StoredItem = serde_json::from_str(&json)?;
        Record::from_item(item)
    }

    fn delete(&self, uid: &str) -> KeyringResult<()> {
        let _guard = self.index_lock.lock();

        self.entry(uid)?.delete_credential().map_err(|e| match e {
            keyring::Error::NoEntry => KeyringError::NotFound(uid.to_string()),
            other => os_error(other),
        })?;

        let mut index = self.read_index()?;
        if index.remove(uid) {
            self.write_index(&index)?;
        }

        Ok(())
    }

    fn new_item(&self, uid: &str, data: &[u8], codec_type: &str) -> KeyringResult<Record> {
        if uid == INDEX_ENTRY {
            return Err(KeyringError::Format(format!("reserved key: {}", uid)));
        }

        let _guard = self.index_lock.lock();

        let record = Record::new(uid, data, codec_type);
        let json = serde_json::to_string(&record.to_item())?;
        self.entry(uid)?.set_password(&json).map_err(os_error)?;

        let mut index = self.read_index()?;
        if index.insert(uid.to_string()) {
            self.write_index(&index)?;
        }

        Ok(record)
    }

    fn backend(&self) -> KeyringBackend {
        KeyringBackend::Os
    }
}

fn os_error(e: keyring::Error) -> KeyringError {
    KeyringError::Os(e.to_string())
}

// ─── Tests ───────────────────────────────────────────────────────────────────
