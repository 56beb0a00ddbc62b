//! Process-local object URL registry.
//!
//! The Rust stand-in for platform object URLs: byte buffers are registered
//! under a minted `blob:<n>` URL that is only meaningful inside the current
//! process. Nothing here is persisted. A registered URL dies with the process
//! and must never be written to a collection store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, OnceLock};

/// Registered bytes plus their sniffed or caller-provided MIME type.
#[derive(Debug, Clone)]
pub struct ObjectUrlEntry {
    pub bytes: Vec<u8>,
    pub mime: String,
}

/// Magic-byte signatures for the raster formats the helpers care about.
const IMAGE_SIGNATURES: &[(&[u8], &str)] = &[
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    (&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A], "image/png"),
    // JPEG: FF D8 FF
    (&[0xFF, 0xD8, 0xFF], "image/jpeg"),
    // GIF: 47 49 46 38
    (b"GIF8", "image/gif"),
    // WebP: RIFF .... WEBP
    (b"RIFF", "image/webp"),
    // BMP: 42 4D
    (b"BM", "image/bmp"),
];

static REGISTRY: OnceLock<Mutex<HashMap<String, ObjectUrlEntry>>> = OnceLock::new();
static NEXT_ID: AtomicU64 = AtomicU64::new(1);

fn registry() -> &'static Mutex<HashMap<String, ObjectUrlEntry>> {
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Detect an image MIME type from leading bytes.
///
/// Returns `application/octet-stream` for anything unrecognized; registration
/// still succeeds, the compressor's decoder has the final say.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
    for (signature, mime) in IMAGE_SIGNATURES {
        if bytes.starts_with(signature) {
            // WebP shares the RIFF container prefix with other media
            if *mime == "image/webp" {
                if bytes.len() >= 12 && &bytes[8..12] == b"WEBP" {
                    return mime;
                }
                continue;
            }
            return mime;
        }
    }
    "application/octet-stream"
}

/// Register bytes and mint a transient `blob:` URL for them.
pub fn register(bytes: Vec<u8>, mime: impl Into<String>) -> String {
    let url = format!("blob:{}", NEXT_ID.fetch_add(1, Ordering::Relaxed));
    let entry = ObjectUrlEntry {
        bytes,
        mime: mime.into(),
    };
    tracing::debug!(url = %url, size = entry.bytes.len(), "Registered object URL");
    registry().lock().unwrap().insert(url.clone(), entry);
    url
}

/// Look up a registered object URL.
pub fn resolve(url: &str) -> Option<ObjectUrlEntry> {
    registry().lock().unwrap().get(url).cloned()
}

/// Release a registered object URL. Returns whether anything was removed.
pub fn revoke(url: &str) -> bool {
    registry().lock().unwrap().remove(url).is_some()
}

/// Whether a string looks like a URL minted by this registry.
pub fn is_object_url(url: &str) -> bool {
    url.starts_with("blob:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let url = register(vec![1, 2, 3], "image/png");
        assert!(is_object_url(&url));

        let entry = resolve(&url).unwrap();
        assert_eq!(entry.bytes, vec![1, 2, 3]);
        assert_eq!(entry.mime, "image/png");
    }

    #[test]
    fn test_resolve_unknown_url() {
        assert!(resolve("blob:no-such-entry").is_none());
    }

    #[test]
    fn test_register_mints_distinct_urls() {
        let a = register(vec![1], "image/png");
        let b = register(vec![1], "image/png");
        assert_ne!(a, b);
    }

    #[test]
    fn test_revoke() {
        let url = register(vec![9], "image/gif");
        assert!(revoke(&url));
        assert!(resolve(&url).is_none());
        assert!(!revoke(&url));
    }

    #[test]
    fn test_sniff_mime_png() {
        let bytes = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00];
        assert_eq!(sniff_mime(&bytes), "image/png");
    }

    #[test]
    fn test_sniff_mime_jpeg() {
        assert_eq!(sniff_mime(&[0xFF, 0xD8, 0xFF, 0xE0]), "image/jpeg");
    }

    #[test]
    fn test_sniff_mime_webp_needs_marker() {
        let mut bytes = b"RIFF\x00\x00\x00\x00WEBP".to_vec();
        assert_eq!(sniff_mime(&bytes), "image/webp");

        bytes[8..12].copy_from_slice(b"WAVE");
        assert_eq!(sniff_mime(&bytes), "application/octet-stream");
    }

    #[test]
    fn test_sniff_mime_unknown() {
        assert_eq!(sniff_mime(b"hello"), "application/octet-stream");
    }
}
