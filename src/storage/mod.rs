// ABOUTME: Key/value persistence for profile, logs and cached plans with pluggable backends
// ABOUTME: Values are JSON wrapped in a versioned envelope; legacy unversioned values still load
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

//! # Storage
//!
//! NutriPlan keeps its state in a flat string key/value store, one JSON value
//! per key. Writes are last-write-wins with no transactions.
//!
//! Every value is written as `{"version": 1, "data": <value>}`. On read:
//!
//! - an envelope at or below the current version yields its `data`
//! - an envelope from a newer version is ignored with a warning
//! - anything else is treated as a legacy unversioned value
//! - a value that does not match the expected type is ignored with a warning

/// One-file-per-key directory backend
pub mod file;
/// Process-local backend for tests and ephemeral sessions
pub mod memory;

pub use file::FileStore;
pub use memory::InMemoryStore;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::{AppError, AppResult};
use nutriplan_core::constants::schema::CURRENT_VERSION;

/// Raw string key/value backend
pub trait KeyValueStore: Send + Sync {
    /// Stored string for `key`
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_raw(&self, key: &str) -> AppResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn set_raw(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete `key`; returns whether it existed
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn remove(&self, key: &str) -> AppResult<bool>;

    /// All stored keys, sorted
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be listed.
    fn keys(&self) -> AppResult<Vec<String>>;

    /// Delete every key
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    fn clear(&self) -> AppResult<()>;
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    version: u32,
    data: &'a T,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Envelope {
    version: u32,
    data: Value,
}

/// Wrap a value in the current envelope
///
/// # Errors
///
/// Returns `SerializationError` if the value cannot be serialized.
pub fn encode<T: Serialize>(value: &T) -> AppResult<String> {
    Ok(serde_json::to_string(&EnvelopeRef {
        version: CURRENT_VERSION,
        data: value,
    })?)
}

/// Unwrap a stored string, accepting legacy unversioned values
///
/// Returns `None` for values written by a newer version or that do not match `T`.
#[must_use]
pub fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Option<T> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Ignoring stored value that is not JSON");
            return None;
        }
    };

    // Only objects can be envelopes; derived structs also accept sequences
    let envelope = if value.is_object() {
        serde_json::from_value::<Envelope>(value.clone()).ok()
    } else {
        None
    };
    let data = match envelope {
        Some(envelope) if envelope.version > CURRENT_VERSION => {
            warn!(
                key,
                version = envelope.version,
                supported = CURRENT_VERSION,
                "Ignoring stored value from a newer version"
            );
            return None;
        }
        Some(envelope) => envelope.data,
        None => value,
    };

    serde_json::from_value(data)
        .map_err(|e| warn!(key, error = %e, "Ignoring stored value with an unexpected shape"))
        .ok()
}

/// Typed access on top of any [`KeyValueStore`]
pub trait KeyValueStoreExt: KeyValueStore {
    /// Typed value for `key`, if present and readable
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        Ok(self.get_raw(key)?.and_then(|raw| decode(key, &raw)))
    }

    /// Store `value` under `key` in the current envelope
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` or `StorageError` on failure.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> AppResult<()> {
        self.set_raw(key, &encode(value)?)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}

/// Reject keys that could escape a file-backed store
///
/// # Errors
///
/// Returns `InvalidInput` for empty keys or keys with characters other than
/// ASCII letters, digits, `-` and `_`.
pub fn validate_key(key: &str) -> AppResult<()> {
    if !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!("Invalid storage key '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_encode_wraps_in_envelope() {
        let raw = encode(&json!({"a": 1})).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, json!({"version": 1, "data": {"a": 1}}));
    }

    #[test]
    fn test_decode_legacy_and_newer_versions() {
        assert_eq!(decode::<Vec<u32>>("k", "[1,2]"), Some(vec![1, 2]));
        assert_eq!(
            decode::<Vec<u32>>("k", r#"{"version":1,"data":[3]}"#),
            Some(vec![3])
        );
        assert_eq!(decode::<Vec<u32>>("k", r#"{"version":2,"data":[3]}"#), None);
        assert_eq!(decode::<Vec<u32>>("k", "not json"), None);
    }

    #[test]
    fn test_legacy_two_element_array_is_not_an_envelope() {
        assert_eq!(decode::<Vec<u32>>("k", "[1,2]"), Some(vec![1, 2]));
        assert_eq!(decode::<(u32, u32)>("k", "[3,4]"), Some((3, 4)));
        assert_eq!(decode::<Vec<u32>>("k", "[99,[5]]"), None);
    }

    #[test]
    fn test_legacy_object_with_version_field_is_not_an_envelope() {
        #[derive(Deserialize, PartialEq, Debug)]
        struct Legacy {
            version: u32,
            name: String,
        }
        let decoded: Option<Legacy> = decode("k", r#"{"version":7,"name":"x"}"#);
        assert_eq!(
            decoded,
            Some(Legacy {
                version: 7,
                name: "x".to_owned()
            })
        );
    }

    #[test]
    fn test_key_validation() {
        assert!(validate_key("consumed-2025-01-31").is_ok());
        assert!(validate_key("../etc").is_err());
        assert!(validate_key("").is_err());
    }
}
