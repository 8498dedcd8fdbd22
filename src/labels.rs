//! Label primitives (spec §4.9): label IDs, content/value hashes, and the
//! compact `LabelSet` JSON codec used to persist scan results.

use crate::error::{OpenRiskError, Result};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;

const LABEL_ID_PREFIX: &str = "ol_";
const LABEL_ID_HEX_LEN: usize = 12;
const CONTENT_HASH_HEX_LEN: usize = 12;
const VALUE_HASH_HEX_LEN: usize = 6;

/// Generate a new label ID: `ol_` followed by 12 hex characters from a
/// CSPRNG (6 random bytes, hex-encoded).
pub fn generate_label_id() -> String {
    let mut bytes = [0u8; LABEL_ID_HEX_LEN / 2];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{LABEL_ID_PREFIX}{}", hex_encode(&bytes))
}

/// First 12 hex chars of the SHA-256 digest of the full content.
pub fn content_hash(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    hex_encode(&digest)[..CONTENT_HASH_HEX_LEN].to_string()
}

/// First 6 hex chars of the SHA-256 digest of a per-type-normalized value.
/// Used to detect the same underlying value recurring across spans
/// without storing the raw value itself.
pub fn value_hash(entity_type: &str, raw_value: &str) -> String {
    let normalized = normalize_value(entity_type, raw_value);
    let digest = Sha256::digest(normalized.as_bytes());
    hex_encode(&digest)[..VALUE_HASH_HEX_LEN].to_string()
}

/// Strip formatting punctuation so that e.g. `123-45-6789` and
/// `123456789` hash identically for SSN, while leaving free-text types
/// (NAME, ADDRESS) case-folded only.
fn normalize_value(entity_type: &str, raw_value: &str) -> String {
    match entity_type {
        "SSN" | "PHONE" | "FAX" | "CREDIT_CARD" | "BANK_ROUTING" | "NPI" | "MRN" => {
            raw_value.chars().filter(|c| c.is_ascii_alphanumeric()).collect::<String>().to_ascii_uppercase()
        }
        "EMAIL" => raw_value.trim().to_ascii_lowercase(),
        _ => raw_value.trim().to_ascii_lowercase(),
    }
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// One detected entity, stored compactly: single-letter keys keep
/// serialized label sets small when thousands are persisted per scan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelEntry {
    #[serde(rename = "t")]
    pub entity_type: String,
    #[serde(rename = "c")]
    pub count: usize,
    #[serde(rename = "v")]
    pub value_hash: String,
    #[serde(rename = "w")]
    pub weight: u8,
}

/// A full scan's worth of labels plus the score that was computed for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LabelSet {
    #[serde(rename = "id")]
    pub label_id: String,
    #[serde(rename = "h")]
    pub content_hash: String,
    #[serde(rename = "s")]
    pub score: u32,
    #[serde(rename = "e")]
    pub entries: Vec<LabelEntry>,
}

impl LabelSet {
    pub fn new(content: &str, score: u32, entity_counts: &HashMap<String, (usize, String, u8)>) -> Self {
        let mut entries: Vec<LabelEntry> = entity_counts
            .iter()
            .map(|(entity_type, (count, value_hash, weight))| LabelEntry {
                entity_type: entity_type.clone(),
                count: *count,
                value_hash: value_hash.clone(),
                weight: *weight,
            })
            .collect();
        entries.sort_by(|a, b| a.entity_type.cmp(&b.entity_type));

        LabelSet {
            label_id: generate_label_id(),
            content_hash: content_hash(content),
            score,
            entries,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| OpenRiskError::MalformedLabelSet { reason: e.to_string() })
    }

    /// Strict deserialization: unknown fields or structurally invalid
    /// JSON are rejected rather than silently defaulted.
    pub fn from_json(raw: &str) -> Result<Self> {
        let label_set: LabelSet = serde_json::from_str(raw).map_err(|e| OpenRiskError::MalformedLabelSet { reason: e.to_string() })?;
        if !label_set.label_id.starts_with(LABEL_ID_PREFIX) {
            return Err(OpenRiskError::MalformedLabelSet {
                reason: format!("label_id {} missing prefix {LABEL_ID_PREFIX}", label_set.label_id),
            });
        }
        Ok(label_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_id_has_expected_shape() {
        let id = generate_label_id();
        assert!(id.starts_with("ol_"));
        assert_eq!(id.len(), 3 + LABEL_ID_HEX_LEN);
        assert!(id[3..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn label_ids_are_unique() {
        assert_ne!(generate_label_id(), generate_label_id());
    }

    #[test]
    fn content_hash_is_deterministic() {
        assert_eq!(content_hash("hello world"), content_hash("hello world"));
        assert_eq!(content_hash("hello world").len(), CONTENT_HASH_HEX_LEN);
    }

    #[test]
    fn value_hash_normalizes_ssn_formatting() {
        assert_eq!(value_hash("SSN", "123-45-6789"), value_hash("SSN", "123456789"));
    }

    #[test]
    fn label_set_round_trips_through_json() {
        let mut counts = HashMap::new();
        counts.insert("SSN".to_string(), (1usize, value_hash("SSN", "123456789"), 10u8));
        let set = LabelSet::new("some content", 42, &counts);
        let json = set.to_json().unwrap();
        let parsed = LabelSet::from_json(&json).unwrap();
        assert_eq!(set, parsed);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(LabelSet::from_json("{not valid json").is_err());
    }

    #[test]
    fn missing_prefix_is_rejected() {
        let bad = r#"{"id":"xx_abc123","h":"deadbeef0123","s":1,"e":[]}"#;
        assert!(LabelSet::from_json(bad).is_err());
    }
}
