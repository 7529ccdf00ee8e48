// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::{
    config::Config,
    error::{Error, Result},
    image::{encode_jpeg, ImageType, LumaImage, Orientation, PackedImage, PlanarImage, Rect},
    license,
    platform::{HostPlatform, Platform},
    recognizer::{NullRecognizer, Recognizer},
    result::{EngineResult, Zone},
};
use std::fs;
use tracing::{debug, info, instrument, warn};

const DEBUG_JPEG_QUALITY: i32 = 90;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum State {
    Initialized,
    Deinitialized,
}

/// Builder for an [`Engine`] with a custom platform or backend.
///
/// # Example
///
/// ```no_run
/// use micr_sdk::{engine::Engine, recognizer::NullRecognizer};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = Engine::builder()
///     .config(r#"{"format": "e13b", "min_score": 0.4}"#)
///     .recognizer(NullRecognizer)
///     .init()?;
/// # Ok(())
/// # }
/// ```
pub struct EngineBuilder {
    config: Option<String>,
    platform: Option<Box<dyn Platform>>,
    recognizer: Box<dyn Recognizer>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            config: None,
            platform: None,
            recognizer: Box::new(NullRecognizer),
        }
    }
}

impl EngineBuilder {
    /// JSON configuration document.
    pub fn config(mut self, json: impl Into<String>) -> Self {
        self.config = Some(json.into());
        self
    }

    /// Replaces the [`HostPlatform`] built from `assets_folder`.
    pub fn platform(mut self, platform: impl Platform + 'static) -> Self {
        self.platform = Some(Box::new(platform));
        self
    }

    pub fn recognizer(mut self, recognizer: impl Recognizer + 'static) -> Self {
        self.recognizer = Box::new(recognizer);
        self
    }

    /// Validates the configuration and acquires the engine resources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration is not valid JSON or holds invalid values
    /// - The assets folder does not exist
    /// - The license token file cannot be read
    pub fn init(self) -> Result<Engine> {
        let config = Config::from_json(self.config.as_deref())?;

        let platform = match self.platform {
            Some(platform) => platform,
            None => {
                let assets = config.assets_folder.clone();
                let platform =
                    HostPlatform::new(assets.clone()).map_err(|source| Error::Asset {
                        name: assets.unwrap_or_default().display().to_string(),
                        source,
                    })?;
                Box::new(platform)
            }
        };

        let license_token = match &config.license_token_file {
            Some(path) => Some(fs::read_to_string(path).map_err(|source| Error::Asset {
                name: path.display().to_string(),
                source,
            })?),
            None => config.license_token_data.clone(),
        };

        info!(
            "engine initialized format: {:?} score: {:?} >= {}",
            config.format, config.score_type, config.min_score
        );
        Ok(Engine {
            config,
            platform,
            recognizer: self.recognizer,
            state: State::Initialized,
            loaded: false,
            license_token,
            frames: 0,
        })
    }
}

/// Handle over an initialized MICR engine.
///
/// An `Engine` only exists once [`Engine::init`] succeeded. After
/// [`Engine::deinit`] every operation returns the "engine not initialized"
/// result. Dropping an initialized engine deinitializes it.
///
/// # Thread Safety
///
/// Operations take `&mut self`. The engine is `Send`; share it between
/// threads behind a `Mutex`.
///
/// # Example
///
/// ```no_run
/// use micr_sdk::{engine::Engine, image::{ImageType, PackedImage}};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut engine = Engine::init(None)?;
/// let pixels = vec![255u8; 640 * 480];
/// let result = engine.process(&PackedImage::new(ImageType::Y, &pixels, 640, 480));
/// assert!(result.is_ok());
/// println!("{} zones {}", result.num_zones(), result.json());
/// assert!(engine.deinit().is_ok());
/// # Ok(())
/// # }
/// ```
pub struct Engine {
    config: Config,
    platform: Box<dyn Platform>,
    recognizer: Box<dyn Recognizer>,
    state: State,
    loaded: bool,
    license_token: Option<String>,
    frames: u64,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("loaded", &self.loaded)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Initializes an engine with the default platform and backend.
    pub fn init(config: Option<&str>) -> Result<Self> {
        let builder = Self::builder();
        match config {
            Some(json) => builder.config(json).init(),
            None => builder.init(),
        }
    }

    /// Same as [`Engine::init`], reporting the outcome as a result value.
    pub fn init_result(config: Option<&str>) -> (Option<Self>, EngineResult) {
        match Self::init(config) {
            Ok(engine) => (Some(engine), EngineResult::bodyless_ok()),
            Err(e) => {
                warn!("engine init failed: {e}");
                (None, EngineResult::from(e))
            }
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.state == State::Initialized
    }

    /// License token from `license_token_file` or `license_token_data`.
    pub fn license_token(&self) -> Option<&str> {
        self.license_token.as_deref()
    }

    /// Releases the backend. Must be the last call on the engine.
    pub fn deinit(&mut self) -> EngineResult {
        if let Err(e) = self.ensure_initialized() {
            return e.into();
        }
        if self.loaded {
            self.recognizer.unload();
            self.loaded = false;
        }
        self.state = State::Deinitialized;
        info!("engine deinitialized after {} frames", self.frames);
        EngineResult::bodyless_ok()
    }

    /// Detects and recognizes MICR lines in a single-buffer frame.
    #[instrument(skip_all, fields(image_type = %image.image_type))]
    pub fn process(&mut self, image: &PackedImage) -> EngineResult {
        self.run(image.image_type, image.orientation, || image.to_luma())
            .into()
    }

    /// Detects and recognizes MICR lines in a frame given as Y, U and V
    /// planes.
    #[instrument(skip_all, fields(image_type = %image.image_type))]
    pub fn process_planar(&mut self, image: &PlanarImage) -> EngineResult {
        self.run(image.image_type, image.orientation, || image.to_luma())
            .into()
    }

    /// Loads the backend ahead of the first frame so that `process` does
    /// not pay for it.
    #[instrument(skip(self))]
    pub fn warm_up(&mut self, image_type: ImageType) -> EngineResult {
        self.try_warm_up(image_type).into()
    }

    /// Builds the runtime license key of this device, as a bare string when
    /// `raw` or wrapped in a JSON entry.
    pub fn request_runtime_license_key(&self, raw: bool) -> EngineResult {
        self.try_request_runtime_license_key(raw).into()
    }

    fn try_warm_up(&mut self, image_type: ImageType) -> Result<EngineResult> {
        self.ensure_initialized()?;
        self.ensure_loaded()?;
        self.recognizer.warm_up(image_type)?;
        Ok(EngineResult::bodyless_ok())
    }

    fn try_request_runtime_license_key(&self, raw: bool) -> Result<EngineResult> {
        self.ensure_initialized()?;
        let payload = license::request_payload(self.platform.as_ref(), raw)?;
        Ok(EngineResult::new(0, "OK", payload, 0))
    }

    fn ensure_initialized(&self) -> Result<()> {
        match self.state {
            State::Initialized => Ok(()),
            State::Deinitialized => Err(Error::NotInitialized),
        }
    }

    fn ensure_loaded(&mut self) -> Result<()> {
        if !self.loaded {
            self.recognizer.load(self.platform.as_ref(), &self.config)?;
            self.loaded = true;
            debug!("backend loaded");
        }
        Ok(())
    }

    fn run(
        &mut self,
        image_type: ImageType,
        orientation: i32,
        decode: impl FnOnce() -> Result<LumaImage>,
    ) -> Result<EngineResult> {
        self.ensure_initialized()?;
        let orientation = Orientation::try_from(orientation)?;
        let upright = orientation.apply(&decode()?);

        let roi = Rect::from_roi(self.config.roi, upright.width(), upright.height())?;
        let frame = match &roi {
            Some(rect) => upright.crop(rect)?,
            None => upright,
        };

        self.frames += 1;
        if self.config.debug_write_input_image_enabled {
            self.dump(&frame, image_type);
        }

        self.ensure_loaded()?;
        let zones = self.recognizer.recognize(&frame, &self.config)?;
        let zones = self.finish_zones(zones, roi);
        debug!("frame {} {}: {} zones", self.frames, frame, zones.len());
        EngineResult::from_zones(&zones)
    }

    /// Maps backend zones to upright frame coordinates, prepends the overall
    /// score and drops zones of disabled formats, with NaN or infinite values
    /// or scoring below `min_score`.
    fn finish_zones(&self, zones: Vec<Zone>, roi: Option<Rect>) -> Vec<Zone> {
        let (dx, dy) = roi.map_or((0.0, 0.0), |r| (r.x as f32, r.y as f32));
        zones
            .into_iter()
            .filter_map(|mut zone| {
                if !self.config.format.contains(zone.format) {
                    debug!("dropping {:?} zone '{}'", zone.format, zone.text);
                    return None;
                }
                let mut values = zone.confidences.iter().chain(&zone.warped_box);
                if values.any(|v| !v.is_finite()) {
                    warn!("dropping zone '{}' with non-finite scores or box", zone.text);
                    return None;
                }
                let score = self.config.score_type.aggregate(&zone.confidences);
                if score < self.config.min_score {
                    debug!("dropping zone '{}' score {score:.3}", zone.text);
                    return None;
                }
                zone.confidences.insert(0, score);
                zone.translate(dx, dy);
                Some(zone)
            })
            .collect()
    }

    fn dump(&self, frame: &LumaImage, image_type: ImageType) {
        let path = self
            .config
            .debug_internal_data_path
            .join(format!("micr_input_{:06}_{image_type}.jpg", self.frames));
        let res = encode_jpeg(frame, DEBUG_JPEG_QUALITY)
            .and_then(|jpeg| fs::write(&path, &jpeg[..]).map_err(Error::from));
        match res {
            Ok(()) => debug!("wrote {}", path.display()),
            Err(e) => warn!("failed to write {}: {e}", path.display()),
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if self.is_initialized() {
            let _ = self.deinit();
        }
    }
}
