//! Namespaced in-memory key-value store.
//!
//! Holds patient data that outlives a single conversation thread, keyed
//! by a two-part namespace plus a string key. Values are JSON documents.
//! Access is serialized behind a single mutex; the store never persists.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StoreError;

/// Namespace scope under which patient interaction data is stored.
pub const PATIENT_INTERACTIONS: &str = "patient_interactions";

/// Key under which a patient's profile text is stored.
pub const PATIENT_PROFILE_KEY: &str = "patient_profile";

// =============================================================================
// Namespace
// =============================================================================

/// Two-part namespace isolating values in the store.
///
/// The first part names a data category, the second an owner within it,
/// e.g. `("patient_interactions", "42")`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Namespace {
    pub scope: String,
    pub id: String,
}

impl Namespace {
    pub fn new(scope: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            id: id.into(),
        }
    }

    /// The namespace holding a patient's interaction data.
    pub fn patient_interactions(patient_id: impl Into<String>) -> Self {
        Self::new(PATIENT_INTERACTIONS, patient_id)
    }
}

// =============================================================================
// StoredValue
// =============================================================================

/// A value in the store together with its write timestamps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StoredValue {
    pub value: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// InMemoryStore
// =============================================================================

/// Process-local key-value store, namespaced per patient.
///
/// `get` of an absent key returns `None`; `put` overwrites in place and
/// preserves the original `created_at`.
#[derive(Default)]
pub struct InMemoryStore {
    entries: Mutex<HashMap<Namespace, HashMap<String, StoredValue>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a value under `namespace`/`key`, replacing any existing value.
    pub fn put(&self, namespace: &Namespace, key: &str, value: Value) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;

        let now = Utc::now();
        let bucket = entries.entry(namespace.clone()).or_default();
        match bucket.get_mut(key) {
            Some(existing) => {
                existing.value = value;
                existing.updated_at = now;
            }
            None => {
                bucket.insert(
                    key.to_string(),
                    StoredValue {
                        value,
                        created_at: now,
                        updated_at: now,
                    },
                );
            }
        }

        tracing::debug!(scope = %namespace.scope, id = %namespace.id, key, "Store write");
        Ok(())
    }

    /// Read the value under `namespace`/`key`, if present.
    pub fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<StoredValue>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        Ok(entries
            .get(namespace)
            .and_then(|bucket| bucket.get(key))
            .cloned())
    }

    /// Remove the value under `namespace`/`key`.
    ///
    /// Returns `true` if a value was removed.
    pub fn delete(&self, namespace: &Namespace, key: &str) -> Result<bool, StoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let removed = entries
            .get_mut(namespace)
            .map(|bucket| bucket.remove(key).is_some())
            .unwrap_or(false);
        if removed {
            tracing::debug!(scope = %namespace.scope, id = %namespace.id, key, "Store delete");
        }
        Ok(removed)
    }

    /// List the keys present under a namespace, sorted.
    pub fn list_keys(&self, namespace: &Namespace) -> Result<Vec<String>, StoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))?;
        let mut keys: Vec<String> = entries
            .get(namespace)
            .map(|bucket| bucket.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        Ok(keys)
    }
}
