// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

/// Console verbosity requested by the configuration.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugLevel {
    Verbose,
    #[default]
    Info,
    Warn,
    Error,
    Fatal,
}

impl DebugLevel {
    pub fn as_tracing(self) -> tracing::Level {
        match self {
            DebugLevel::Verbose => tracing::Level::DEBUG,
            DebugLevel::Info => tracing::Level::INFO,
            DebugLevel::Warn => tracing::Level::WARN,
            DebugLevel::Error | DebugLevel::Fatal => tracing::Level::ERROR,
        }
    }
}

/// Hysteresis thresholds of the text segmenter, lower means more fragments.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmenterAccuracy {
    VeryHigh,
    #[default]
    High,
    Medium,
    Low,
    VeryLow,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
}

/// MICR fonts to look for.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormatSet {
    #[serde(rename = "e13b")]
    E13b,
    #[serde(rename = "cmc7")]
    Cmc7,
    #[default]
    #[serde(rename = "e13b+cmc7")]
    Both,
}

impl FormatSet {
    pub fn contains(self, format: crate::result::MicrFormat) -> bool {
        use crate::result::MicrFormat;
        matches!(
            (self, format),
            (FormatSet::Both, _)
                | (FormatSet::E13b, MicrFormat::E13b)
                | (FormatSet::Cmc7, MicrFormat::Cmc7)
        )
    }
}

/// How per-character scores fold into a zone's overall score.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreType {
    Min,
    Mean,
    #[default]
    Median,
    Max,
    MinMax,
}

impl ScoreType {
    /// Overall score of `scores`, 0 when empty.
    pub fn aggregate(self, scores: &[f32]) -> f32 {
        if scores.is_empty() {
            return 0.0;
        }
        let min = scores.iter().copied().fold(f32::INFINITY, f32::min);
        let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        match self {
            ScoreType::Min => min,
            ScoreType::Max => max,
            ScoreType::MinMax => (min + max) * 0.5,
            ScoreType::Mean => scores.iter().sum::<f32>() / scores.len() as f32,
            ScoreType::Median => {
                let mut sorted = scores.to_vec();
                sorted.sort_by(f32::total_cmp);
                let mid = sorted.len() / 2;
                if sorted.len() % 2 == 0 {
                    (sorted[mid - 1] + sorted[mid]) * 0.5
                } else {
                    sorted[mid]
                }
            }
        }
    }
}

fn default_debug_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_num_threads() -> i32 {
    -1
}

fn default_min_score() -> f32 {
    0.3
}

fn default_workload_balancing() -> bool {
    cfg!(any(target_arch = "arm", target_arch = "aarch64"))
}

fn default_x86() -> bool {
    cfg!(target_arch = "x86_64")
}

/// Engine configuration, parsed from the JSON document handed to
/// [`Engine::init`](crate::engine::Engine::init).
///
/// Every entry is optional. Unknown entries are kept in `extra` and reported
/// once at init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub debug_level: DebugLevel,

    /// Write every prepared input frame to `debug_internal_data_path`.
    #[serde(default)]
    pub debug_write_input_image_enabled: bool,

    #[serde(default = "default_debug_path")]
    pub debug_internal_data_path: PathBuf,

    /// Worker thread hint for the backend, -1 lets it decide.
    #[serde(default = "default_num_threads")]
    pub num_threads: i32,

    #[serde(default = "default_true")]
    pub gpgpu_enabled: bool,

    #[serde(default = "default_workload_balancing")]
    pub gpgpu_workload_balancing_enabled: bool,

    #[serde(default)]
    pub segmenter_accuracy: SegmenterAccuracy,

    #[serde(default = "default_x86")]
    pub backpropagation_enabled: bool,

    /// Image enhancement for low contrast documents.
    #[serde(default = "default_x86")]
    pub ielcd_enabled: bool,

    #[serde(default)]
    pub interpolation: Interpolation,

    #[serde(default)]
    pub format: FormatSet,

    /// `[left, right, top, bottom]` in upright frame pixels, zeros for the
    /// whole frame.
    #[serde(default)]
    pub roi: [f32; 4],

    #[serde(default, alias = "recogn_score_type")]
    pub score_type: ScoreType,

    /// Zones scoring below this are dropped, within `]0, 1]`.
    #[serde(default = "default_min_score")]
    pub min_score: f32,

    #[serde(default)]
    pub assets_folder: Option<PathBuf>,

    #[serde(default)]
    pub license_token_file: Option<PathBuf>,

    #[serde(default)]
    pub license_token_data: Option<String>,

    #[serde(flatten, skip_serializing)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debug_level: DebugLevel::default(),
            debug_write_input_image_enabled: false,
            debug_internal_data_path: default_debug_path(),
            num_threads: default_num_threads(),
            gpgpu_enabled: true,
            gpgpu_workload_balancing_enabled: default_workload_balancing(),
            segmenter_accuracy: SegmenterAccuracy::default(),
            backpropagation_enabled: default_x86(),
            ielcd_enabled: default_x86(),
            interpolation: Interpolation::default(),
            format: FormatSet::default(),
            roi: [0.0; 4],
            score_type: ScoreType::default(),
            min_score: default_min_score(),
            assets_folder: None,
            license_token_file: None,
            license_token_data: None,
            extra: serde_json::Map::new(),
        }
    }
}

impl Config {
    /// Parses and validates a configuration document.
    ///
    /// `None`, an empty or a blank string yield the defaults.
    pub fn from_json(json: Option<&str>) -> Result<Self> {
        let config = match json.map(str::trim) {
            None | Some("") => Config::default(),
            Some(text) => serde_json::from_str(text)?,
        };
        config.validate()?;
        for key in config.extra.keys() {
            warn!("ignoring unknown configuration entry '{key}'");
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_score > 0.0 && self.min_score <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "min_score {} outside ]0, 1]",
                self.min_score
            )));
        }

        if self.roi.iter().all(|v| *v == 0.0) {
            return Ok(());
        }
        let [left, right, top, bottom] = self.roi;
        if self.roi.iter().any(|v| !v.is_finite() || *v < 0.0) || right < left || bottom < top {
            return Err(Error::InvalidConfig(format!(
                "roi {:?} is not a [left, right, top, bottom] rectangle",
                self.roi
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::MicrFormat;

    #[test]
    fn test_defaults() {
        let config = Config::from_json(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(Config::from_json(Some("  ")).unwrap(), Config::default());
        assert_eq!(config.min_score, 0.3);
        assert_eq!(config.score_type, ScoreType::Median);
        assert_eq!(config.format, FormatSet::Both);
        assert_eq!(config.num_threads, -1);
    }

    #[test]
    fn test_parse_entries() {
        let config = Config::from_json(Some(
            r#"{
                "debug_level": "warn",
                "format": "cmc7",
                "segmenter_accuracy": "veryhigh",
                "interpolation": "nearest",
                "roi": [10, 200, 5, 80],
                "recogn_score_type": "min",
                "min_score": 0.4,
                "num_threads": 4,
                "vendor_option": true
            }"#,
        ))
        .unwrap();
        assert_eq!(config.debug_level, DebugLevel::Warn);
        assert_eq!(config.format, FormatSet::Cmc7);
        assert_eq!(config.segmenter_accuracy, SegmenterAccuracy::VeryHigh);
        assert_eq!(config.interpolation, Interpolation::Nearest);
        assert_eq!(config.roi, [10.0, 200.0, 5.0, 80.0]);
        assert_eq!(config.score_type, ScoreType::Min);
        assert_eq!(config.num_threads, 4);
        assert!(config.extra.contains_key("vendor_option"));
    }

    #[test]
    fn test_invalid_documents() {
        assert_eq!(Config::from_json(Some("{")).unwrap_err().code(), 3);
        assert_eq!(
            Config::from_json(Some(r#"{"format": "ocrb"}"#)).unwrap_err().code(),
            3
        );
        assert_eq!(
            Config::from_json(Some(r#"{"min_score": 0}"#)).unwrap_err().code(),
            3
        );
        assert_eq!(
            Config::from_json(Some(r#"{"min_score": 1.5}"#)).unwrap_err().code(),
            3
        );
        assert_eq!(
            Config::from_json(Some(r#"{"roi": [10, 5, 0, 10]}"#)).unwrap_err().code(),
            3
        );
    }

    #[test]
    fn test_score_aggregation() {
        let scores = [0.2, 0.9, 0.5, 0.6];
        assert_eq!(ScoreType::Min.aggregate(&scores), 0.2);
        assert_eq!(ScoreType::Max.aggregate(&scores), 0.9);
        assert!((ScoreType::MinMax.aggregate(&scores) - 0.55).abs() < 1e-6);
        assert!((ScoreType::Mean.aggregate(&scores) - 0.55).abs() < 1e-6);
        assert!((ScoreType::Median.aggregate(&scores) - 0.55).abs() < 1e-6);
        assert_eq!(ScoreType::Median.aggregate(&[0.1, 0.7, 0.3]), 0.3);
        assert_eq!(ScoreType::Mean.aggregate(&[]), 0.0);
    }

    #[test]
    fn test_format_set() {
        assert!(FormatSet::Both.contains(MicrFormat::Cmc7));
        assert!(FormatSet::E13b.contains(MicrFormat::E13b));
        assert!(!FormatSet::E13b.contains(MicrFormat::Cmc7));
    }
}
