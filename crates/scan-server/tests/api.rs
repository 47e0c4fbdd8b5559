//! Router tests driven through `tower::ServiceExt::oneshot`.

use std::fs;
use std::path::Path;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use scan_io::stack::{write_gray8, write_gray16};
use scan_server::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

struct Fixture {
    _dir: tempfile::TempDir,
    app: Router,
}

fn fixture(populate: impl FnOnce(&Path)) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("img");
    let client = dir.path().join("build");
    fs::create_dir_all(&images).unwrap();
    fs::create_dir_all(&client).unwrap();
    fs::write(client.join("index.html"), "<html>scanner</html>").unwrap();
    populate(&images);
    let app = router(AppState::new(&images, 1 << 20), &client);
    Fixture { _dir: dir, app }
}

fn ramp(images: &Path) {
    // 4x3, value = offset * 10
    let data: Vec<u8> = (0..12).map(|i| i * 10).collect();
    write_gray8(images.join("ramp.tif"), 4, 3, &data, 72).unwrap();
    write_gray8(images.join("zeros.tif"), 4, 3, &[0; 12], 72).unwrap();
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

async fn post_json(app: &Router, body: Value) -> (StatusCode, Value) {
    let request = Request::post("/api")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, bytes) = send(app, request).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, bytes) = send(app, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn load_lists_sorted_stacks() {
    let f = fixture(ramp);
    let (status, body) = get_json(&f.app, "/api/load").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "bitsPerSample": 8, "files": ["ramp", "zeros"], "height": 3, "width": 4 })
    );
}

#[tokio::test]
async fn load_skips_unaddressable_files() {
    let f = fixture(|images| {
        ramp(images);
        write_gray8(images.join("..tif"), 2, 2, &[0; 4], 72).unwrap();
    });
    let (status, body) = get_json(&f.app, "/api/load").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["files"], json!(["ramp", "zeros"]));
}

#[tokio::test]
async fn load_without_stacks_is_server_error() {
    let f = fixture(|_| {});
    let (status, body) = get_json(&f.app, "/api/load").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("no .tif stacks"));
}

#[tokio::test]
async fn filter_returns_band_offsets() {
    let f = fixture(ramp);
    let (status, body) = post_json(
        &f.app,
        json!({ "distance": 10, "imageName": "ramp", "pixelWeight": 50 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let message = body["message"].as_object().unwrap();
    let mut keys: Vec<_> = message.keys().map(String::as_str).collect();
    keys.sort_unstable();
    assert_eq!(
        keys,
        [
            "bitsPerSample",
            "height",
            "offset",
            "resolutionUnit",
            "size",
            "truncated",
            "width",
            "xResolution",
            "yResolution"
        ]
    );
    assert_eq!(message["offset"], json!([4, 5, 6]));
    assert_eq!(message["size"], json!(12));
    assert_eq!(message["truncated"], json!(false));
    assert_eq!(message["resolutionUnit"], json!(2));
    assert_eq!(message["xResolution"], json!(72.0));
}

#[tokio::test]
async fn string_numbers_are_coerced() {
    let f = fixture(ramp);
    let (status, body) = post_json(
        &f.app,
        json!({ "distance": " 0 ", "imageName": "ramp", "pixelWeight": "110" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["offset"], json!([11]));

    // Unparsable numbers produce a NaN band, which matches nothing.
    let (status, body) = post_json(
        &f.app,
        json!({ "distance": "wide", "imageName": "ramp", "pixelWeight": 50 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["offset"], json!([]));
}

#[tokio::test]
async fn numeric_image_name_selects_stack() {
    let f = fixture(|images| {
        let data: Vec<u8> = (0..12).map(|i| i * 10).collect();
        write_gray8(images.join("0.tif"), 4, 3, &data, 72).unwrap();
    });
    let (status, body) = post_json(
        &f.app,
        json!({ "distance": 0, "imageName": 0, "pixelWeight": 30 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["offset"], json!([3]));

    let (status, body) = post_json(
        &f.app,
        json!({ "distance": [10], "imageName": "0", "pixelWeight": ["50"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["offset"], json!([4, 5, 6]));
}

#[tokio::test]
async fn zero_band_without_zero_pixels_is_empty() {
    let f = fixture(|images| {
        write_gray16(images.join("deep.tif"), 3, 3, &[1000; 9], 300).unwrap();
    });
    let (status, body) = post_json(
        &f.app,
        json!({ "distance": 0, "imageName": "deep", "pixelWeight": 0 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"]["offset"], json!([]));
    assert_eq!(body["message"]["truncated"], json!(false));
    assert_eq!(body["message"]["bitsPerSample"], json!(16));
}

#[tokio::test]
async fn invalid_requests_are_client_errors() {
    let f = fixture(ramp);
    for body in [
        json!({ "distance": 1, "pixelWeight": 1 }),
        json!({ "distance": 1, "imageName": "../img/ramp", "pixelWeight": 1 }),
        json!({ "distance": 1, "imageName": "", "pixelWeight": 1 }),
    ] {
        let (status, reply) = post_json(&f.app, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(reply["message"].is_string());
    }
}

#[tokio::test]
async fn malformed_body_is_client_error() {
    let f = fixture(ramp);
    let request = Request::post("/api")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let (status, bytes) = send(&f.app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn missing_or_corrupt_stack_is_server_error() {
    let f = fixture(|images| {
        fs::write(images.join("broken.tif"), b"II*\0garbage").unwrap();
    });
    for name in ["absent", "broken"] {
        let (status, body) = post_json(
            &f.app,
            json!({ "distance": 1, "imageName": name, "pixelWeight": 1 }),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{name}");
        assert!(body["message"].as_str().unwrap().starts_with("decode error"));
    }
}

#[tokio::test]
async fn serves_images_and_client() {
    let f = fixture(|images| {
        fs::create_dir_all(images.join("reference")).unwrap();
        fs::write(images.join("reference").join("0.jpg"), b"jpeg").unwrap();
    });

    let (status, bytes) = send(
        &f.app,
        Request::get("/img/reference/0.jpg").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"jpeg");

    let (status, bytes) = send(&f.app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"<html>scanner</html>");
}
