//! Test fixtures: generated in-memory images.

use image::{DynamicImage, ImageBuffer, Rgb};
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Encode a solid-color RGB image as PNG bytes.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let buffer = ImageBuffer::from_pixel(width, height, Rgb::<u8>([40, 90, 160]));
    let mut out = Vec::new();
    DynamicImage::ImageRgb8(buffer)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .expect("encode test PNG");
    out
}

/// Write a solid-color PNG into `dir` and return its path.
pub fn write_png(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, png_bytes(width, height)).expect("write test PNG");
    path
}

/// Decode a data-URL produced by the compressor back into an image.
pub fn decode_data_url(url: &str) -> (String, DynamicImage) {
    let parsed = imgstash::data_url::parse(url).expect("parse data URL");
    let decoded = image::load_from_memory(&parsed.bytes).expect("decode data URL payload");
    (parsed.mime, decoded)
}
