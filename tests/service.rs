#![cfg(feature = "service")]
#![allow(clippy::unwrap_used)]

use std::io::Cursor;

use colorbuddy::service::{Method, PaletteService, ServiceError, Settings, Upload};
use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use serde_json::{json, Value};

fn encode_png(image: &RgbImage) -> Vec<u8> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();
    bytes.into_inner()
}

/// Three vertical stripes of 50, 30, and 20 columns over 10 rows.
fn stripes() -> Vec<u8> {
    let image = RgbImage::from_fn(100, 10, |x, _| match x {
        0..=49 => Rgb([230, 57, 70]),
        50..=79 => Rgb([29, 53, 87]),
        _ => Rgb([241, 250, 238]),
    });
    encode_png(&image)
}

fn to_json(result: Result<impl serde::Serialize, ServiceError>) -> (u16, Value) {
    match result {
        Ok(response) => (200, serde_json::to_value(response).unwrap()),
        Err(e) => (e.status_code(), serde_json::to_value(e.to_body()).unwrap()),
    }
}

#[test]
fn extract_response_shape() {
    let service = PaletteService::new(Settings { name_colors: false, ..Settings::default() });
    let upload = Upload::new("image/png", stripes()).filename("stripes.png");

    let (status, body) = to_json(service.extract(&upload, Some(6)));
    assert_eq!(status, 200);
    assert_eq!(
        body,
        json!({
            "palette": [{ "hex": "#E63946" }, { "hex": "#1D3557" }, { "hex": "#F1FAEE" }],
            "message": "Palette extracted successfully."
        })
    );
}

#[test]
fn extract_limits_colors() {
    let service = PaletteService::default();
    let upload = Upload::new("image/png", stripes());

    let response = service.extract(&upload, Some(2)).unwrap();
    assert_eq!(response.palette.len(), 2);
    assert!(response.palette.iter().all(|c| c.name.is_some()));
}

#[test]
fn extract_with_kmeans_is_deterministic() {
    let settings = Settings { quantize_method: Method::Kmeans, seed: 7, ..Settings::default() };
    let service = PaletteService::new(settings);

    #[allow(clippy::cast_possible_truncation)]
    let image = RgbImage::from_fn(64, 64, |x, y| Rgb([(x * 4) as u8, (y * 4) as u8, 128]));
    let upload = Upload::new("image/png", encode_png(&image));

    let a = service.extract(&upload, Some(5)).unwrap();
    let b = service.extract(&upload, Some(5)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.palette.len(), 5);
}

#[test]
fn rejected_uploads() {
    let service = PaletteService::new(Settings { max_image_upload_size_mb: 1, ..Settings::default() });

    let cases = [
        (Upload::default(), None, 422),
        (Upload::new("application/pdf", stripes()), None, 400),
        (Upload { content_type: None, ..Upload::new("", stripes()) }, None, 400),
        (Upload::new("image/png", vec![0; 2 * 1024 * 1024]), None, 413),
        (Upload::new("image/png", stripes()), Some(0), 422),
        (Upload::new("image/png", stripes()), Some(21), 422),
        (Upload::new("image/jpeg", b"definitely not a jpeg".to_vec()), None, 500),
    ];

    for (upload, k, expected) in cases {
        let (status, body) = to_json(service.extract(&upload, k));
        assert_eq!(status, expected);
        assert!(body["detail"].is_string());
    }
}

#[test]
fn transparent_image_fails_extraction() {
    let image = RgbaImage::from_pixel(8, 8, Rgba([255, 255, 255, 0]));
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png).unwrap();

    let upload = Upload::new("image/png", bytes.into_inner());
    let (status, body) = to_json(PaletteService::default().extract(&upload, None));
    assert_eq!(status, 500);
    assert_eq!(body, json!({ "detail": "Could not extract any dominant colors from the image." }));
}

#[test]
fn random_response_shape() {
    let service = PaletteService::default();

    let (status, body) = to_json(service.random(Some(4), Some("serene beach sunset"), Some(42)));
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Palette generated.");

    let palette = body["palette"].as_array().unwrap();
    assert_eq!(palette.len(), 4);
    for color in palette {
        let hex = color["hex"].as_str().unwrap();
        assert_eq!(hex.len(), 7);
        assert!(hex.starts_with('#'));
        assert!(hex[1..].chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    assert_eq!(to_json(service.random(Some(0), None, None)).0, 422);
    assert_eq!(to_json(service.random(Some(11), None, None)).0, 422);
}
