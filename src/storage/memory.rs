// ABOUTME: In-memory key/value store backed by a locked BTreeMap
// ABOUTME: Used by tests and by sessions that should leave nothing on disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 NutriPlan Contributors

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use super::{validate_key, KeyValueStore};
use crate::errors::{AppError, AppResult};

/// Process-local store; contents vanish with the value
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl InMemoryStore {
    /// Empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> AppError {
    AppError::storage("In-memory store lock poisoned")
}

impl KeyValueStore for InMemoryStore {
    fn get_raw(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: &str) -> AppResult<()> {
        validate_key(key)?;
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> AppResult<bool> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        Ok(entries.remove(key).is_some())
    }

    fn keys(&self) -> AppResult<Vec<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.keys().cloned().collect())
    }

    fn clear(&self) -> AppResult<()> {
        self.entries.write().map_err(poisoned)?.clear();
        Ok(())
    }
}
