//! Typed repository for persisted image collections.
//!
//! Wraps the raw storage keys behind save/load so call sites never touch the
//! key-value store directly. Loading walks an ordered candidate key list and
//! the first key yielding a non-empty collection is authoritative; remaining
//! keys are never consulted.

use serde_json::Value;

use crate::error::StoreError;
use crate::models::ImageRef;
use crate::services::text_store::TextStore;

/// Default key for saves.
pub const DEFAULT_SAVE_KEY: &str = "uploadedImages";

/// Candidate keys consulted by [`CollectionStore::load_default`], in priority
/// order.
pub const DEFAULT_LOAD_KEYS: &[&str] = &["uploadedImages", "productImages", "uploadedFiles"];

/// Repository for ordered image collections over a [`TextStore`].
pub struct CollectionStore<S> {
    store: S,
}

impl<S: TextStore> CollectionStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Persist `images` under `key`, fully replacing any prior value.
    ///
    /// Failures are returned (and logged); this never panics. An empty slice
    /// is still written, since a save is a full replacement.
    pub fn save(&self, images: &[ImageRef], key: &str) -> Result<(), StoreError> {
        let payload = serde_json::to_string(images)?;
        if let Err(e) = self.store.set(key, &payload) {
            tracing::warn!(key = %key, %e, "Failed to save image collection");
            return Err(e);
        }
        tracing::debug!(key = %key, count = images.len(), "Saved image collection");
        Ok(())
    }

    /// Persist `images` under the default key.
    pub fn save_default(&self, images: &[ImageRef]) -> Result<(), StoreError> {
        self.save(images, DEFAULT_SAVE_KEY)
    }

    /// Load the first non-empty collection among `keys`.
    ///
    /// For each key in order: a stored JSON array wins if it yields at least
    /// one image reference; a stored JSON object wins if its values filter
    /// down to at least one string or record exposing `url`/`preview`/`src`.
    /// Empty results, scalars, and parse failures fall through to the next
    /// key. Never fails; returns an empty vector when no key matches, so
    /// absence of data and read errors are indistinguishable here.
    pub fn load(&self, keys: &[&str]) -> Vec<ImageRef> {
        for key in keys {
            let Some(raw) = self.store.get(key) else {
                continue;
            };
            let value: Value = match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(key = %key, %e, "Stored collection is not valid JSON");
                    continue;
                }
            };

            let images = match value {
                Value::Array(items) => collect_array(key, items),
                Value::Object(map) => extract_from_object(map),
                _ => Vec::new(),
            };

            if !images.is_empty() {
                tracing::debug!(key = %key, count = images.len(), "Loaded image collection");
                return images;
            }
        }
        Vec::new()
    }

    /// Load using the well-known candidate key list.
    pub fn load_default(&self) -> Vec<ImageRef> {
        self.load(DEFAULT_LOAD_KEYS)
    }
}

/// Deserialize the elements of a stored array, dropping anything that is
/// neither a string nor a record shape.
fn collect_array(key: &str, items: Vec<Value>) -> Vec<ImageRef> {
    let mut images = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<ImageRef>(item) {
            Ok(image) => images.push(image),
            Err(e) => {
                tracing::warn!(key = %key, %e, "Dropping unusable entry from stored array");
            }
        }
    }
    images
}

/// Filter an object payload's values down to recognizable image shapes:
/// strings, or records exposing `url`, `preview`, or `src`.
fn extract_from_object(map: serde_json::Map<String, Value>) -> Vec<ImageRef> {
    let mut images = Vec::new();
    for (_, value) in map {
        match value {
            Value::String(url) => images.push(ImageRef::Url(url)),
            Value::Object(_) => {
                if let Ok(ImageRef::Record(record)) = serde_json::from_value::<ImageRef>(value) {
                    if record.has_display_field() {
                        images.push(ImageRef::Record(record));
                    }
                }
            }
            _ => {}
        }
    }
    images
}
