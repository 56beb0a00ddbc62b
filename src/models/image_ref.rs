//! Image reference shapes and URL resolution.
//!
//! Producers hand over image references in several historical shapes: a plain
//! URL string, a structured record with any subset of URL-ish fields, or a
//! local file. [`ImageRef::resolve`] turns any of them into a displayable URL
//! with a fixed field precedence, degrading to an empty string (never an
//! error) when nothing usable is present.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::services::object_urls;

/// A single image reference in any of the supported shapes.
///
/// Deserialization is untagged: JSON strings become [`ImageRef::Url`], JSON
/// objects become [`ImageRef::Record`]. [`ImageRef::File`] is process-local
/// input only; it serializes as its path string and therefore round-trips
/// through storage as a plain URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageRef {
    /// Already a URL, including data-URLs. Passed through verbatim.
    Url(String),
    /// Structured record carrying zero or more URL-ish fields.
    Record(ImageRecord),
    /// Local file, resolved to a transient object URL.
    File(PathBuf),
}

/// Record shape with the recognized URL fields, all optional.
///
/// Field precedence on resolution: `preview`, `url`, `src`, `path`, `uri`,
/// then `data` (only when it carries an image data-URL or http prefix), then
/// `objectURL`. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImageRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,

    #[serde(default, rename = "objectURL", skip_serializing_if = "Option::is_none")]
    pub object_url: Option<String>,
}

impl ImageRecord {
    /// First non-empty field in display precedence order, if any.
    pub fn primary_url(&self) -> Option<&str> {
        for field in [&self.preview, &self.url, &self.src, &self.path, &self.uri] {
            if let Some(value) = field.as_deref() {
                if !value.is_empty() {
                    return Some(value);
                }
            }
        }
        if let Some(data) = self.data.as_deref() {
            if data.starts_with("data:image") || data.starts_with("http") {
                return Some(data);
            }
        }
        self.object_url.as_deref().filter(|value| !value.is_empty())
    }

    /// Whether the record exposes one of the fields the collection loader
    /// accepts when extracting entries from an object payload.
    pub fn has_display_field(&self) -> bool {
        [&self.url, &self.preview, &self.src]
            .iter()
            .any(|field| matches!(field, Some(value) if !value.is_empty()))
    }
}

impl ImageRef {
    /// Resolve this reference to a displayable URL.
    ///
    /// Never fails: references with no extractable URL resolve to an empty
    /// string after a diagnostic, and callers must treat that as "no
    /// displayable image" rather than an error.
    pub fn resolve(&self) -> String {
        match self {
            ImageRef::Url(url) => url.clone(),
            ImageRef::File(path) => match std::fs::read(path) {
                Ok(bytes) => {
                    let mime = object_urls::sniff_mime(&bytes);
                    object_urls::register(bytes, mime)
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), %e, "Failed to read image file");
                    String::new()
                }
            },
            ImageRef::Record(record) => match record.primary_url() {
                Some(url) => url.to_string(),
                None => {
                    tracing::warn!(record = ?record, "No displayable URL in image record");
                    String::new()
                }
            },
        }
    }
}
