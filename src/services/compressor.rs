//! Bounded image recompression.
//!
//! Re-encodes an already-loaded image so its longer side does not exceed a
//! configured bound, at a configured quality. Sources may be data-URLs,
//! transient object URLs, http(s) URLs, or local files; the result is always
//! a data-URL. Decode and fetch failures surface as [`CompressError`], and
//! network fetches carry a timeout, so a bad source never leaves the caller
//! waiting on a completion that cannot arrive.

use std::io::Cursor;
use std::time::Duration;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageEncoder};

use crate::data_url;
use crate::error::CompressError;
use crate::services::object_urls;

/// Default bound for the longer image side, in pixels.
pub const DEFAULT_MAX_DIMENSION: u32 = 1200;

/// Default JPEG quality: the canvas 0.8 factor on the 0-100 encoder scale.
pub const DEFAULT_QUALITY: u8 = 80;

/// Default timeout applied to network fetches.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Scale `(width, height)` so the longer side does not exceed `max`.
///
/// Dimensions already within the bound are returned unchanged. Otherwise the
/// longer side becomes exactly `max` and the shorter side scales
/// proportionally, rounded to the nearest pixel (clamped to at least 1 so
/// degenerate aspect ratios still encode).
pub fn bounded_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width <= max && height <= max {
        return (width, height);
    }
    if width > height {
        let scaled = (height as f64 * max as f64 / width as f64).round() as u32;
        (max, scaled.max(1))
    } else {
        let scaled = (width as f64 * max as f64 / height as f64).round() as u32;
        (scaled.max(1), max)
    }
}

/// Output encoding selected from the requested MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Jpeg,
    Png,
}

impl OutputFormat {
    /// Map a requested MIME type to an encoder, falling back to JPEG.
    fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => OutputFormat::Png,
            "" | "image/jpeg" | "image/jpg" => OutputFormat::Jpeg,
            other => {
                tracing::warn!(mime = %other, "Unsupported output MIME type, encoding as JPEG");
                OutputFormat::Jpeg
            }
        }
    }

    fn mime(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// Bounded recompression pipeline with named configuration.
///
/// The builder is reusable: `compress()` takes `&self`, and concurrent calls
/// share no mutable state.
///
/// # Example
///
/// ```no_run
/// use imgstash::services::Compressor;
///
/// # async fn demo() -> Result<(), imgstash::error::CompressError> {
/// let compressor = Compressor::new().max_dimension(800).quality(70);
/// let data_url = compressor.compress("photo.jpg", "image/jpeg").await?;
/// # Ok(())
/// # }
/// ```
pub struct Compressor {
    max_dimension: u32,
    quality: u8,
    client: reqwest::Client,
}

impl Compressor {
    /// Create a compressor with the default bound, quality, and fetch timeout.
    pub fn new() -> Self {
        Self {
            max_dimension: DEFAULT_MAX_DIMENSION,
            quality: DEFAULT_QUALITY,
            client: build_client(DEFAULT_FETCH_TIMEOUT),
        }
    }

    /// Set the bound for the longer image side.
    #[inline]
    pub fn max_dimension(mut self, max: u32) -> Self {
        self.max_dimension = max;
        self
    }

    /// Set the JPEG encode quality (0-100).
    #[inline]
    pub fn quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    /// Set the timeout applied to http(s) source fetches.
    pub fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_client(timeout);
        self
    }

    /// Compress the image at `source_url` and return the result as a
    /// data-URL in the requested MIME type.
    pub async fn compress(&self, source_url: &str, mime: &str) -> Result<String, CompressError> {
        let bytes = self.fetch_source(source_url).await?;
        let decoded = image::load_from_memory(&bytes)?;

        let (width, height) = (decoded.width(), decoded.height());
        let (target_width, target_height) = bounded_dimensions(width, height, self.max_dimension);

        let resized = if (target_width, target_height) == (width, height) {
            decoded
        } else {
            tracing::debug!(
                width = width,
                height = height,
                target_width = target_width,
                target_height = target_height,
                "Downscaling image"
            );
            decoded.resize_exact(target_width, target_height, FilterType::Lanczos3)
        };

        let format = OutputFormat::from_mime(mime);
        let encoded = self.encode(&resized, format)?;
        Ok(data_url::format(format.mime(), &encoded))
    }

    /// Fetch raw source bytes for any of the supported URL shapes.
    async fn fetch_source(&self, source_url: &str) -> Result<Vec<u8>, CompressError> {
        if source_url.is_empty() {
            return Err(CompressError::EmptySource);
        }
        if source_url.starts_with("data:") {
            return Ok(data_url::parse(source_url)?.bytes);
        }
        if object_urls::is_object_url(source_url) {
            return object_urls::resolve(source_url)
                .map(|entry| entry.bytes)
                .ok_or_else(|| CompressError::DanglingObjectUrl(source_url.to_string()));
        }
        if source_url.starts_with("http://") || source_url.starts_with("https://") {
            let response = self.client.get(source_url).send().await?;
            let status = response.status();
            if !status.is_success() {
                return Err(CompressError::HttpStatus(status.as_u16()));
            }
            return Ok(response.bytes().await?.to_vec());
        }
        if let Some(path) = source_url.strip_prefix("file://") {
            return Ok(std::fs::read(path)?);
        }
        if !source_url.contains("://") {
            // Bare filesystem path
            return Ok(std::fs::read(source_url)?);
        }
        Err(CompressError::UnsupportedScheme(source_url.to_string()))
    }

    fn encode(&self, img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, CompressError> {
        let mut out = Vec::new();
        match format {
            OutputFormat::Jpeg => {
                let rgb = img.to_rgb8();
                let encoder = JpegEncoder::new_with_quality(Cursor::new(&mut out), self.quality);
                encoder.write_image(
                    rgb.as_raw(),
                    rgb.width(),
                    rgb.height(),
                    ExtendedColorType::Rgb8,
                )?;
            }
            OutputFormat::Png => {
                let rgba = img.to_rgba8();
                let encoder = PngEncoder::new(Cursor::new(&mut out));
                encoder.write_image(
                    rgba.as_raw(),
                    rgba.width(),
                    rgba.height(),
                    ExtendedColorType::Rgba8,
                )?;
            }
        }
        Ok(out)
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new()
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .expect("failed to build HTTP client")
}
