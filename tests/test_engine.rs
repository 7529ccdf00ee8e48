// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use micr_sdk::{
    config::Config,
    image::{ImageType, LumaImage, PackedImage, PlanarImage},
    platform::Platform,
    recognizer::Recognizer,
    result::{MicrFormat, Zone},
    Engine, Error, Result,
};
use std::{
    io,
    sync::{Arc, Mutex},
};

#[derive(Default)]
struct Calls {
    loads: usize,
    warm_ups: Vec<ImageType>,
    frames: Vec<(usize, usize)>,
    unloads: usize,
}

/// Backend returning canned zones and recording how the engine drives it.
#[derive(Clone, Default)]
struct MockRecognizer {
    calls: Arc<Mutex<Calls>>,
    zones: Vec<Zone>,
    fail: bool,
}

impl MockRecognizer {
    fn with_zones(zones: Vec<Zone>) -> Self {
        Self {
            zones,
            ..Default::default()
        }
    }
}

impl Recognizer for MockRecognizer {
    fn load(&mut self, _platform: &dyn Platform, _config: &Config) -> Result<()> {
        self.calls.lock().unwrap().loads += 1;
        Ok(())
    }

    fn warm_up(&mut self, image_type: ImageType) -> Result<()> {
        self.calls.lock().unwrap().warm_ups.push(image_type);
        Ok(())
    }

    fn recognize(&mut self, frame: &LumaImage, _config: &Config) -> Result<Vec<Zone>> {
        if self.fail {
            return Err(Error::Recognition("model exploded".into()));
        }
        self.calls
            .lock()
            .unwrap()
            .frames
            .push((frame.width(), frame.height()));
        Ok(self.zones.clone())
    }

    fn unload(&mut self) {
        self.calls.lock().unwrap().unloads += 1;
    }
}

struct TestPlatform;

impl Platform for TestPlatform {
    fn read_asset(&self, _name: &str) -> io::Result<Vec<u8>> {
        Err(io::ErrorKind::NotFound.into())
    }

    fn device_fingerprint(&self) -> io::Result<String> {
        Ok("test-device".to_string())
    }
}

fn zone(format: MicrFormat, text: &str, scores: &[f32]) -> Zone {
    Zone {
        format,
        text: text.to_string(),
        warped_box: [0.0, 0.0, 4.0, 0.0, 4.0, 2.0, 0.0, 2.0],
        confidences: scores.to_vec(),
    }
}

fn engine_with(config: &str, recognizer: MockRecognizer) -> Engine {
    Engine::builder()
        .config(config)
        .platform(TestPlatform)
        .recognizer(recognizer)
        .init()
        .unwrap()
}

const GRAY: [u8; 8 * 4] = [100; 32];

#[test]
fn test_init_deinit() {
    let mut engine = Engine::init(None).unwrap();
    assert!(engine.is_initialized());
    assert!(engine.deinit().is_ok());
    assert!(!engine.is_initialized());
}

#[test]
fn test_init_result() {
    let (engine, res) = Engine::init_result(Some(r#"{"format": "e13b"}"#));
    assert!(engine.is_some());
    assert!(res.is_ok());

    let (engine, res) = Engine::init_result(Some("{not json"));
    assert!(engine.is_none());
    assert_eq!(res.code(), 3);
    assert!(!res.phrase().is_empty());
}

#[test]
fn test_init_resource_failures() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");
    let config = serde_json::json!({ "assets_folder": missing }).to_string();
    assert_eq!(Engine::init(Some(&config)).unwrap_err().code(), 5);

    let config = serde_json::json!({ "license_token_file": missing }).to_string();
    assert_eq!(Engine::init(Some(&config)).unwrap_err().code(), 5);

    let token = dir.path().join("token.lic");
    std::fs::write(&token, "TOKEN").unwrap();
    let config = serde_json::json!({
        "assets_folder": dir.path(),
        "license_token_file": token,
    })
    .to_string();
    let engine = Engine::init(Some(&config)).unwrap();
    assert_eq!(engine.license_token(), Some("TOKEN"));
}

#[test]
fn test_calls_after_deinit_are_rejected() {
    let mock = MockRecognizer::default();
    let calls = mock.calls.clone();
    let mut engine = engine_with("{}", mock);
    assert!(engine.deinit().is_ok());

    let image = PackedImage::new(ImageType::Y, &GRAY, 8, 4);
    assert_eq!(engine.process(&image).code(), 1);
    assert_eq!(engine.warm_up(ImageType::Y).code(), 1);
    assert_eq!(engine.request_runtime_license_key(false).code(), 1);
    assert_eq!(engine.deinit().code(), 1);

    let calls = calls.lock().unwrap();
    assert_eq!(calls.loads, 0);
    assert!(calls.frames.is_empty());
}

#[test]
fn test_warm_up_loads_once() {
    let mock = MockRecognizer::default();
    let calls = mock.calls.clone();
    let mut engine = engine_with("{}", mock);

    assert!(engine.warm_up(ImageType::Nv12).is_ok());
    let image = PackedImage::new(ImageType::Y, &GRAY, 8, 4);
    assert!(engine.process(&image).is_ok());
    assert!(engine.process(&image).is_ok());
    assert!(engine.deinit().is_ok());

    let calls = calls.lock().unwrap();
    assert_eq!(calls.loads, 1);
    assert_eq!(calls.warm_ups, vec![ImageType::Nv12]);
    assert_eq!(calls.frames.len(), 2);
    assert_eq!(calls.unloads, 1);
}

#[test]
fn test_warm_up_does_not_change_results() {
    let zones = vec![zone(MicrFormat::E13b, "A123", &[0.9, 0.8])];
    let image = PackedImage::new(ImageType::Y, &GRAY, 8, 4);

    let mut cold = engine_with("{}", MockRecognizer::with_zones(zones.clone()));
    let mut warm = engine_with("{}", MockRecognizer::with_zones(zones));
    assert!(warm.warm_up(ImageType::Y).is_ok());

    assert_eq!(cold.process(&image), warm.process(&image));
}

#[test]
fn test_drop_unloads() {
    let mock = MockRecognizer::default();
    let calls = mock.calls.clone();
    {
        let mut engine = engine_with("{}", mock);
        assert!(engine.warm_up(ImageType::Y).is_ok());
    }
    assert_eq!(calls.lock().unwrap().unloads, 1);
}

#[test]
fn test_invalid_orientation_is_rejected() {
    let mock = MockRecognizer::default();
    let calls = mock.calls.clone();
    let mut engine = engine_with("{}", mock);

    for orientation in [0, 9, -1] {
        let image = PackedImage::new(ImageType::Y, &GRAY, 8, 4).with_orientation(orientation);
        let res = engine.process(&image);
        assert_eq!(res.code(), 4);
        assert!(res.phrase().contains("orientation"));
    }
    assert!(calls.lock().unwrap().frames.is_empty());
}

#[test]
fn test_orientation_swaps_frame() {
    let mock = MockRecognizer::default();
    let calls = mock.calls.clone();
    let mut engine = engine_with("{}", mock);

    let image = PackedImage::new(ImageType::Y, &GRAY, 8, 4).with_orientation(6);
    assert!(engine.process(&image).is_ok());
    assert_eq!(calls.lock().unwrap().frames, vec![(4, 8)]);
}

#[test]
fn test_roi_crops_and_translates() {
    let mock = MockRecognizer::with_zones(vec![zone(MicrFormat::E13b, "123", &[0.9])]);
    let calls = mock.calls.clone();
    let mut engine = engine_with(r#"{"roi": [2, 6, 1, 4]}"#, mock);

    let res = engine.process(&PackedImage::new(ImageType::Y, &GRAY, 8, 4));
    assert!(res.is_ok());
    assert_eq!(calls.lock().unwrap().frames, vec![(4, 3)]);

    let zones = res.zones().unwrap();
    assert_eq!(zones[0].warped_box, [2.0, 1.0, 6.0, 1.0, 6.0, 3.0, 2.0, 3.0]);
}

#[test]
fn test_roi_outside_frame() {
    let mut engine = engine_with(r#"{"roi": [100, 200, 0, 4]}"#, MockRecognizer::default());
    let res = engine.process(&PackedImage::new(ImageType::Y, &GRAY, 8, 4));
    assert_eq!(res.code(), 4);
}

#[test]
fn test_scores_and_filtering() {
    let zones = vec![
        zone(MicrFormat::E13b, "keep", &[0.9, 0.5, 0.8]),
        zone(MicrFormat::E13b, "weak", &[0.9, 0.1, 0.2]),
        zone(MicrFormat::Cmc7, "font", &[0.9, 0.9]),
    ];
    let mut engine = engine_with(
        r#"{"format": "e13b", "score_type": "min", "min_score": 0.4}"#,
        MockRecognizer::with_zones(zones),
    );

    let res = engine.process(&PackedImage::new(ImageType::Y, &GRAY, 8, 4));
    assert!(res.is_ok());
    assert_eq!(res.num_zones(), 1);

    let zones = res.zones().unwrap();
    assert_eq!(zones.len(), res.num_zones());
    assert_eq!(zones[0].text, "keep");
    assert_eq!(zones[0].confidences, vec![0.5, 0.9, 0.5, 0.8]);
}

#[test]
fn test_no_zones_is_empty_payload() {
    let mut engine = engine_with("{}", MockRecognizer::default());
    let res = engine.process(&PackedImage::new(ImageType::Y, &GRAY, 8, 4));
    assert!(res.is_ok());
    assert_eq!(res.num_zones(), 0);
    assert_eq!(res.json(), "");
}

#[test]
fn test_backend_failure() {
    let mock = MockRecognizer {
        fail: true,
        ..Default::default()
    };
    let mut engine = engine_with("{}", mock);
    let res = engine.process(&PackedImage::new(ImageType::Y, &GRAY, 8, 4));
    assert_eq!(res.code(), 7);
    assert!(res.phrase().contains("model exploded"));
}

#[test]
fn test_bad_buffers() {
    let mut engine = engine_with("{}", MockRecognizer::default());
    let res = engine.process(&PackedImage::new(ImageType::Rgb24, &GRAY, 8, 4));
    assert_eq!(res.code(), 4);

    let res = engine.process(&PackedImage::new(ImageType::Y, &GRAY, 8, 4).with_stride(4));
    assert_eq!(res.code(), 4);

    let planes =
        PlanarImage::new(ImageType::Bgra32, [&GRAY[..], &GRAY[..], &GRAY[..]], 8, 4, [8, 4, 4]);
    assert_eq!(engine.process_planar(&planes).code(), 4);
}

#[test]
fn test_oversized_frames_are_rejected() {
    let mock = MockRecognizer::default();
    let calls = mock.calls.clone();
    let mut engine = engine_with("{}", mock);

    let data = [0u8; 64];
    let res = engine.process(&PackedImage::new(ImageType::Rgb24, &data, usize::MAX / 2, 2));
    assert_eq!(res.code(), 4);
    let res = engine.process(&PackedImage::new(ImageType::Rgb24, &data, usize::MAX / 3 + 1, 1));
    assert_eq!(res.code(), 4);
    let res = engine.process(&PackedImage::new(ImageType::Yuv420p, &data, 4, usize::MAX / 2));
    assert_eq!(res.code(), 4);

    let planes = PlanarImage::new(
        ImageType::Yuv420p,
        [&data[..], &data[..8], &data[8..16]],
        4,
        usize::MAX / 2,
        [usize::MAX / 2, 2, 2],
    )
    .with_uv_pixel_stride(1);
    assert_eq!(engine.process_planar(&planes).code(), 4);

    assert!(calls.lock().unwrap().frames.is_empty());
}

#[test]
fn test_non_finite_scores_are_dropped() {
    let zones = vec![
        zone(MicrFormat::E13b, "nan", &[f32::NAN, 0.9]),
        zone(MicrFormat::E13b, "inf", &[f32::INFINITY, 0.9]),
        zone(MicrFormat::E13b, "ok", &[0.9, 0.9]),
    ];
    let mut engine = engine_with(r#"{"score_type": "mean"}"#, MockRecognizer::with_zones(zones));

    let res = engine.process(&PackedImage::new(ImageType::Y, &GRAY, 8, 4));
    assert!(res.is_ok());
    assert_eq!(res.num_zones(), 1);
    let zones = res.zones().unwrap();
    assert_eq!(zones.len(), res.num_zones());
    assert_eq!(zones[0].text, "ok");
}

#[test]
fn test_process_planar() {
    let mock = MockRecognizer::default();
    let calls = mock.calls.clone();
    let mut engine = engine_with("{}", mock);

    let chroma = [128u8; 16];
    let planes = PlanarImage::new(
        ImageType::Yuv420p,
        [&GRAY[..], &chroma[..8], &chroma[8..]],
        8,
        4,
        [8, 4, 4],
    )
    .with_uv_pixel_stride(1);
    assert!(engine.process_planar(&planes).is_ok());
    assert_eq!(calls.lock().unwrap().frames, vec![(8, 4)]);
}

#[test]
fn test_runtime_license_key() {
    let engine = engine_with("{}", MockRecognizer::default());

    let raw = engine.request_runtime_license_key(true);
    assert!(raw.is_ok());
    assert_eq!(raw.json(), micr_sdk::license::runtime_key("test-device"));

    let wrapped = engine.request_runtime_license_key(false);
    assert!(wrapped.is_ok());
    let value: serde_json::Value = serde_json::from_str(wrapped.json()).unwrap();
    assert_eq!(value["runtimeLicenseKey"], raw.json());
}

#[test]
fn test_debug_input_dump() {
    let dir = tempfile::tempdir().unwrap();
    let config = serde_json::json!({
        "debug_write_input_image_enabled": true,
        "debug_internal_data_path": dir.path(),
    })
    .to_string();
    let mut engine = engine_with(&config, MockRecognizer::default());
    assert!(engine.process(&PackedImage::new(ImageType::Y, &GRAY, 8, 4)).is_ok());

    let dumps: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(dumps, vec!["micr_input_000001_y.jpg".to_string()]);
}

#[test]
fn test_engine_is_send() {
    fn assert_send<T: Send>() {}
    assert_send::<Engine>();
}
