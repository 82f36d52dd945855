// Crypto Provider — In-memory keyring
//
// Volatile backend: records live for the lifetime of the process.

use std::collections::HashMap;

use parking_lot::RwLock;

use super::{Keyring, KeyringBackend, KeyringError, KeyringResult, Record};

#[derive(Default)]
pub struct MemoryKeyring {
    records: RwLock<HashMap<String, Record>>,
}

impl MemoryKeyring {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Keyring for MemoryKeyring {
    fn list(&self) -> KeyringResult<Vec<Record>> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn get(&self, uid: &str) -> KeyringResult<Record> {
        self.records
            .read()
            .get(uid)
            .cloned()
            .ok_or_else(|| KeyringError::NotFound(uid.to_string()))
    }

    fn delete(&self, uid: &str) -> KeyringResult<()> {
        self.records
            .write()
            .remove(uid)
            .map(|_| ())
            .ok_or_else(|| KeyringError::NotFound(uid.to_string()))
    }

    fn new_item(&self, uid: &str, data: &[u8], codec_type: &str) -> KeyringResult<Record> {
        let record = Record::new(uid, data, codec_type);
        self.records.write().insert(uid.to_string(), record.clone());
        Ok(record)
    }

    fn backend(&self) -> KeyringBackend {
        KeyringBackend::Memory
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_item_then_get() {
        let kr = MemoryKeyring::new();
        let record = kr.new_item("testkey1", b"testvalue1", "json").unwrap();
        assert_eq!(record.key, "testkey1");

        let fetched = kr.get("testkey1").unwrap();
        assert_eq!(fetched.data, b"testvalue1");
        assert_eq!(fetched.codec_type, "json");
    }

    #[test]
    fn test_new_item_overwrites() {
        let kr = MemoryKeyring::new();
        kr.new_item("k", b"v1", "json").unwrap();
        kr.new_item("k", b"v2", "json").unwrap();

        assert_eq!(kr.get("k").unwrap().data, b"v2");
        assert_eq!(kr.list().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_keys_are_not_found() {
        let kr = MemoryKeyring::new();
        assert!(matches!(kr.get("nope"), Err(KeyringError::NotFound(_))));
        assert!(matches!(kr.delete("nope"), Err(KeyringError::NotFound(_))));
    }

    #[test]
    fn test_delete_removes_only_target() {
        let kr = MemoryKeyring::new();
        kr.new_item("a", b"1", "json").unwrap();
        kr.new_item("b", b"2", "json").unwrap();

        kr.delete("a").unwrap();
        assert!(matches!(kr.delete("a"), Err(KeyringError::NotFound(_))));

        let keys: Vec<String> = kr.list().unwrap().into_iter().map(|r| r.key).collect();
        assert_eq!(keys, vec!["b".to_string()]);
    }
}
