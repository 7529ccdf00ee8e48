// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

//! # MICR Engine SDK
//!
//! This library exposes the engine used to detect and recognize MICR
//! (Magnetic Ink Character Recognition) lines on checks and other financial
//! documents. It ingests camera or scanner frames in the common packed and
//! planar pixel layouts, normalizes them and drives a recognition backend,
//! reporting every outcome through a uniform [`EngineResult`] value.
//!
//! ## Features
//!
//! - **Pixel Ingestion**: RGB24, BGR24, RGBA32, BGRA32, grayscale, NV12,
//!   NV21, I420, YV12, YUV 4:2:2 and 4:4:4, from one buffer or three planes
//!   with explicit strides.
//! - **Orientation**: EXIF orientation codes 1 to 8 are applied before
//!   recognition, followed by the configured region of interest.
//! - **Scoring**: per-character scores fold into an overall zone score
//!   (`min`, `mean`, `median`, `max`, `minmax`) filtered by `min_score`.
//! - **Pluggable Backend**: the recognition models live behind the
//!   [`Recognizer`](recognizer::Recognizer) trait, host services behind
//!   [`Platform`](platform::Platform).
//!
//! ## Example
//!
//! ```no_run
//! use micr_sdk::{engine::Engine, image::{ImageType, PackedImage}};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = Engine::init(Some(r#"{"format": "e13b", "min_score": 0.4}"#))?;
//! assert!(engine.warm_up(ImageType::Nv12).is_ok());
//!
//! let frame = vec![128u8; 1280 * 720 * 3 / 2];
//! let result = engine.process(&PackedImage::new(ImageType::Nv12, &frame, 1280, 720));
//! if result.is_ok() {
//!     for zone in result.zones()? {
//!         println!("{}", zone.text);
//!     }
//! }
//! engine.deinit();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod image;
pub mod license;
pub mod platform;
pub mod recognizer;
pub mod result;

pub use engine::{Engine, EngineBuilder};
pub use error::{Error, Result};
pub use result::EngineResult;
