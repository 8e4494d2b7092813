#![allow(dead_code)]

use std::io::Cursor;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::{DynamicImage, ImageFormat, RgbImage};
use tempfile::TempDir;

use shelf::config::Config;
use shelf::database::models::User;
use shelf::jobs::JobReceiver;
use shelf::AppState;

/// Fresh state over an in-memory database and a temp content root. The
/// TempDir must stay alive for the duration of the test.
pub async fn setup_test_env() -> (AppState, JobReceiver, TempDir) {
    let temp = tempfile::tempdir().expect("failed to create temp dir");
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        sqlite_path: None,
        storage_root: temp.path().join("content"),
        session_ttl: Duration::from_secs(60),
        worker_count: 2,
        log_level: tracing::Level::INFO,
    };

    let (state, receiver) = AppState::from_config(&config)
        .await
        .expect("failed to build app state");
    (state, receiver, temp)
}

pub async fn create_user(state: &AppState, email: &str) -> User {
    User::create(email, "secret", state.database())
        .await
        .expect("failed to create user")
}

/// A solid-color PNG, for exercising the thumbnail pipeline.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([120, 30, 200])));
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .expect("failed to encode test image");
    out
}

pub fn base64_of(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}
