use thiserror::Error;

/// Failures writing a collection to the text store.
///
/// Reads never produce these: `load` absorbs and logs every failure and
/// returns an empty collection instead.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures in the compression pipeline.
#[derive(Debug, Error)]
pub enum CompressError {
    #[error("empty source URL")]
    EmptySource,

    #[error("unsupported source scheme: {0}")]
    UnsupportedScheme(String),

    #[error("object URL not registered in this process: {0}")]
    DanglingObjectUrl(String),

    #[error("data URL error: {0}")]
    DataUrl(#[from] crate::data_url::DataUrlError),

    #[error("fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("HTTP status {0} fetching source")]
    HttpStatus(u16),

    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
