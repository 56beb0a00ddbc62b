//! Parsing and formatting of `data:` URLs.
//!
//! The compressor consumes and produces data-URLs and the reference resolver
//! keys off the `data:image` prefix, so this is core plumbing rather than a
//! general-purpose codec. Both base64 and percent-encoded payloads are
//! accepted on parse; formatting always emits base64.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use percent_encoding::percent_decode_str;
use thiserror::Error;

/// MIME type assumed when the URL header names none (per RFC 2397).
const DEFAULT_MIME: &str = "text/plain";

#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("not a data URL")]
    MissingScheme,

    #[error("data URL has no comma separator")]
    MissingComma,

    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// A decoded `data:` URL: MIME type plus raw payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUrl {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Parse a `data:` URL into its MIME type and payload bytes.
pub fn parse(url: &str) -> Result<DataUrl, DataUrlError> {
    let rest = url.strip_prefix("data:").ok_or(DataUrlError::MissingScheme)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingComma)?;

    let mime = match header.split(';').next().unwrap_or("") {
        "" => DEFAULT_MIME.to_string(),
        m => m.to_string(),
    };
    let is_base64 = header
        .split(';')
        .any(|part| part.eq_ignore_ascii_case("base64"));

    let bytes = if is_base64 {
        BASE64.decode(payload)?
    } else {
        percent_decode_str(payload).collect()
    };

    Ok(DataUrl { mime, bytes })
}

/// Format bytes as a base64 `data:` URL.
pub fn format(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, BASE64.encode(bytes))
}
