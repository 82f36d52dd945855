// Crypto Provider — Keyring records
//
// A Record is the unit of keyring storage. Backends that persist records
// encode them as a StoredItem: `{key, data (base64), description}` where
// the description carries the codec tag.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};

use super::{KeyringError, KeyringResult};

/// Codec tag for JSON-encoded record data.
pub const CODEC_JSON: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: String,
    pub data: Vec<u8>,
    pub codec_type: String,
}

impl Record {
    pub fn new(key: &str, data: &[u8], codec_type: &str) -> Self {
        Self {
            key: key.to_string(),
            data: data.to_vec(),
            codec_type: codec_type.to_string(),
        }
    }

    pub(crate) fn to_item(&self) -> StoredItem {
        StoredItem {
            key: self.key.clone(),
            data: STANDARD.encode(&self.data),
            description: self.codec_type.clone(),
        }
    }

    pub(crate) fn from_item(item: StoredItem) -> KeyringResult<Self> {
        let data = STANDARD
            .decode(item.data.as_bytes())
            .map_err(|e| KeyringError::Format(format!("record '{}': {}", item.key, e)))?;

        Ok(Self {
            key: item.key,
            data,
            codec_type: item.description,
        })
    }
}

/// Backend encoding of a record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct StoredItem {
    pub key: String,
    pub data: String,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_conversion_preserves_record() {
        let record = Record::new("k1", &[0, 159, 146, 150], CODEC_JSON);
        let item = record.to_item();
        assert_eq!(item.description, "json");
        assert_eq!(Record::from_item(item).unwrap(), record);
    }

    #[test]
    fn test_corrupt_item_data_is_a_format_error() {
        let item = StoredItem {
            key: "k1".to_string(),
            data: "!!!not base64!!!".to_string(),
            description: CODEC_JSON.to_string(),
        };
        assert!(matches!(Record::from_item(item), Err(KeyringError::Format(_))));
    }
}
