// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use clap::Parser;
use micr_sdk::image::ImageType;
use serde_json::{json, Value};
use std::{error::Error, fs, path::PathBuf};

/// Pixel layout of raw input frames.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum ImageTypeSetting {
    Rgb24,
    Rgba32,
    Bgra32,
    Nv12,
    Nv21,
    Yuv420p,
    Yvu420p,
    Yuv422p,
    Yuv444p,
    Y,
    Bgr24,
}

impl From<ImageTypeSetting> for ImageType {
    fn from(value: ImageTypeSetting) -> Self {
        match value {
            ImageTypeSetting::Rgb24 => ImageType::Rgb24,
            ImageTypeSetting::Rgba32 => ImageType::Rgba32,
            ImageTypeSetting::Bgra32 => ImageType::Bgra32,
            ImageTypeSetting::Nv12 => ImageType::Nv12,
            ImageTypeSetting::Nv21 => ImageType::Nv21,
            ImageTypeSetting::Yuv420p => ImageType::Yuv420p,
            ImageTypeSetting::Yvu420p => ImageType::Yvu420p,
            ImageTypeSetting::Yuv422p => ImageType::Yuv422p,
            ImageTypeSetting::Yuv444p => ImageType::Yuv444p,
            ImageTypeSetting::Y => ImageType::Y,
            ImageTypeSetting::Bgr24 => ImageType::Bgr24,
        }
    }
}

/// MICR fonts to look for.
#[derive(clap::ValueEnum, Clone, Debug, PartialEq, Copy)]
pub enum FormatSetting {
    /// E-13B lines only
    E13b,
    /// CMC-7 lines only
    Cmc7,
    /// Both fonts (slower)
    #[value(name = "e13b+cmc7")]
    Both,
}

impl FormatSetting {
    fn config_name(self) -> &'static str {
        match self {
            FormatSetting::E13b => "e13b",
            FormatSetting::Cmc7 => "cmc7",
            FormatSetting::Both => "e13b+cmc7",
        }
    }
}

/// Command-line arguments for the MICR recognizer.
///
/// Options given on the command line override the entries of the
/// configuration file.
///
/// # Example
///
/// ```bash
/// # JPEG input
/// micr-sdk --image check.jpg --format e13b
///
/// # Raw NV12 camera frame rotated by 90 degrees
/// micr-sdk --image frame.nv12 --image-type nv12 --size "1280 720" --orientation 6
///
/// # Print the runtime license key of this device
/// micr-sdk --license-key --raw-key
/// ```
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Image to process, a JPEG file or a raw frame described by
    /// --image-type and --size
    #[arg(short, long, env = "IMAGE", required_unless_present = "license_key")]
    pub image: Option<PathBuf>,

    /// Pixel layout of raw frames
    #[arg(long, env = "IMAGE_TYPE", default_value = "rgb24", value_enum)]
    pub image_type: ImageTypeSetting,

    /// Raw frame resolution in pixels (width height)
    #[arg(long, env = "IMAGE_SIZE", value_delimiter = ' ', num_args = 2)]
    pub size: Vec<usize>,

    /// Raw frame row stride in samples, 0 for unpadded rows
    #[arg(long, env = "STRIDE", default_value = "0")]
    pub stride: usize,

    /// EXIF orientation of the image (1 to 8)
    #[arg(long, env = "ORIENTATION", default_value = "1")]
    pub orientation: i32,

    /// Path to the engine JSON configuration file
    #[arg(short, long, env = "CONFIG")]
    pub config: Option<PathBuf>,

    /// MICR fonts to detect
    #[arg(long, env = "FORMAT", value_enum)]
    pub format: Option<FormatSetting>,

    /// Minimum overall score for a zone to be reported, within ]0, 1]
    #[arg(long, env = "MIN_SCORE")]
    pub min_score: Option<f32>,

    /// Region of interest in upright pixels (left right top bottom)
    #[arg(long, env = "ROI", value_delimiter = ' ', num_args = 4)]
    pub roi: Vec<f32>,

    /// Folder holding the recognition models
    #[arg(long, env = "ASSETS")]
    pub assets: Option<PathBuf>,

    /// Print the runtime license key of this device and exit
    #[arg(long)]
    pub license_key: bool,

    /// Print the runtime license key as a bare string instead of JSON
    #[arg(long, requires = "license_key")]
    pub raw_key: bool,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Forward logs to the systemd journal
    #[arg(long, env = "JOURNALD")]
    pub journald: bool,

    /// Enable Tracy profiler for performance analysis
    #[arg(long, env = "TRACY")]
    pub tracy: bool,
}

impl Args {
    /// Engine configuration document: the configuration file, if any, with
    /// the command-line overrides applied.
    pub fn config_json(&self) -> Result<String, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str::<Value>(&fs::read_to_string(path)?)?,
            None => json!({}),
        };
        let Some(entries) = config.as_object_mut() else {
            return Err(Box::from("configuration file must hold a JSON object"));
        };

        if let Some(format) = self.format {
            entries.insert("format".into(), json!(format.config_name()));
        }
        if let Some(min_score) = self.min_score {
            entries.insert("min_score".into(), json!(min_score));
        }
        if !self.roi.is_empty() {
            entries.insert("roi".into(), json!(self.roi));
        }
        if let Some(assets) = &self.assets {
            entries.insert("assets_folder".into(), json!(assets));
        }
        if self.verbose {
            entries.insert("debug_level".into(), json!("verbose"));
        }

        Ok(config.to_string())
    }
}
