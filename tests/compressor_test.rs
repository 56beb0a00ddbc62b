//! Compressor pipeline tests, including http(s) sources against a mock server.

mod common;

use common::fixtures::{decode_data_url, png_bytes, write_png};
use imgstash::error::CompressError;
use imgstash::services::Compressor;

#[tokio::test]
async fn compresses_oversized_http_source() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/photo.png"))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_raw(png_bytes(3000, 1500), "image/png"),
        )
        .mount(&server)
        .await;

    let result = Compressor::new()
        .compress(&format!("{}/photo.png", server.uri()), "image/jpeg")
        .await
        .unwrap();

    let (mime, decoded) = decode_data_url(&result);
    assert_eq!(mime, "image/jpeg");
    assert_eq!((decoded.width(), decoded.height()), (1200, 600));
}

#[tokio::test]
async fn http_source_within_bound_keeps_dimensions() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/small.png"))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_raw(png_bytes(100, 50), "image/png"),
        )
        .mount(&server)
        .await;

    let result = Compressor::new()
        .compress(&format!("{}/small.png", server.uri()), "image/png")
        .await
        .unwrap();

    let (mime, decoded) = decode_data_url(&result);
    assert_eq!(mime, "image/png");
    assert_eq!((decoded.width(), decoded.height()), (100, 50));
}

#[tokio::test]
async fn http_error_status_is_reported() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/missing.png"))
        .respond_with(wiremock::ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = Compressor::new()
        .compress(&format!("{}/missing.png", server.uri()), "image/jpeg")
        .await;

    assert!(matches!(result, Err(CompressError::HttpStatus(404))));
}

#[tokio::test]
async fn http_body_that_is_not_an_image_fails_decode() {
    let server = wiremock::MockServer::start().await;
    wiremock::Mock::given(wiremock::matchers::method("GET"))
        .and(wiremock::matchers::path("/page.html"))
        .respond_with(
            wiremock::ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let result = Compressor::new()
        .compress(&format!("{}/page.html", server.uri()), "image/jpeg")
        .await;

    assert!(matches!(result, Err(CompressError::Codec(_))));
}

#[tokio::test]
async fn compresses_local_file_by_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "in.png", 2400, 600);

    let result = Compressor::new()
        .compress(&path.to_string_lossy(), "image/jpeg")
        .await
        .unwrap();

    let (_, decoded) = decode_data_url(&result);
    assert_eq!((decoded.width(), decoded.height()), (1200, 300));
}

#[tokio::test]
async fn compresses_file_url_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_png(dir.path(), "in.png", 10, 20);

    let result = Compressor::new()
        .compress(&format!("file://{}", path.display()), "image/png")
        .await
        .unwrap();

    let (_, decoded) = decode_data_url(&result);
    assert_eq!((decoded.width(), decoded.height()), (10, 20));
}

#[tokio::test]
async fn round_trips_through_resolve_and_store() {
    // The composed pipeline: compress, persist the data-URL, load, resolve.
    use imgstash::models::ImageRef;
    use imgstash::services::{CollectionStore, MemoryTextStore};

    let source = imgstash::data_url::format("image/png", &png_bytes(1500, 3000));
    let compressed = Compressor::new()
        .compress(&source, "image/jpeg")
        .await
        .unwrap();

    let store = CollectionStore::new(MemoryTextStore::new());
    store
        .save_default(&[ImageRef::Url(compressed.clone())])
        .unwrap();

    let loaded = store.load_default();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].resolve(), compressed);

    let (_, decoded) = decode_data_url(&loaded[0].resolve());
    assert_eq!((decoded.width(), decoded.height()), (600, 1200));
}
