// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    config::Config,
    error::Result,
    image::{ImageType, LumaImage},
    platform::Platform,
    result::Zone,
};
use tracing::debug;

/// Detection and recognition backend driven by the engine.
///
/// The engine hands over upright, region-of-interest cropped grayscale
/// frames. Zones come back with boxes in the coordinates of that frame and
/// one confidence per recognized character; the engine maps the boxes back
/// to the full upright image, prepends the overall score and filters zones
/// on it.
pub trait Recognizer: Send {
    /// Loads models and other assets. Called once, on the first `warm_up` or
    /// `process`.
    fn load(&mut self, platform: &dyn Platform, config: &Config) -> Result<()>;

    /// Prepares for frames of `image_type`.
    fn warm_up(&mut self, image_type: ImageType) -> Result<()> {
        let _ = image_type;
        Ok(())
    }

    fn recognize(&mut self, frame: &LumaImage, config: &Config) -> Result<Vec<Zone>>;

    /// Releases whatever `load` acquired.
    fn unload(&mut self) {}
}

/// Backend that loads nothing and never finds a zone.
///
/// Used until a real backend is registered with
/// [`EngineBuilder::recognizer`](crate::engine::EngineBuilder::recognizer).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRecognizer;

impl Recognizer for NullRecognizer {
    fn load(&mut self, _platform: &dyn Platform, _config: &Config) -> Result<()> {
        debug!("null recognizer loaded");
        Ok(())
    }

    fn recognize(&mut self, frame: &LumaImage, _config: &Config) -> Result<Vec<Zone>> {
        debug!("null recognizer skipped {frame}");
        Ok(Vec::new())
    }
}
