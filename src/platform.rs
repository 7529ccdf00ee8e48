// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use std::{
    fs, io,
    path::{Component, Path, PathBuf},
};
use tracing::debug;

/// Host services needed by the engine outside of pixel processing.
///
/// Only the init and license paths talk to the platform. Embedders on hosts
/// where models ship inside an application bundle provide their own
/// implementation.
pub trait Platform: Send {
    /// Reads an asset (model, dictionary) by relative name.
    fn read_asset(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Stable identifier for this device.
    fn device_fingerprint(&self) -> io::Result<String>;
}

const FINGERPRINT_SOURCES: [&str; 3] = [
    "/etc/machine-id",
    "/var/lib/dbus/machine-id",
    "/etc/hostname",
];

/// Filesystem backed [`Platform`].
#[derive(Debug, Clone, Default)]
pub struct HostPlatform {
    assets: Option<PathBuf>,
}

impl HostPlatform {
    /// Creates a platform reading assets below `assets`.
    ///
    /// # Errors
    ///
    /// Returns an error if `assets` is set but is not a directory.
    pub fn new(assets: Option<PathBuf>) -> io::Result<Self> {
        if let Some(dir) = &assets {
            if !fs::metadata(dir)?.is_dir() {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} is not a directory", dir.display()),
                ));
            }
            debug!("assets folder {}", dir.display());
        }
        Ok(Self { assets })
    }

    pub fn assets(&self) -> Option<&Path> {
        self.assets.as_deref()
    }
}

impl Platform for HostPlatform {
    fn read_asset(&self, name: &str) -> io::Result<Vec<u8>> {
        let Some(dir) = &self.assets else {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                "no assets folder configured",
            ));
        };
        let relative = Path::new(name);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("asset name '{name}' must be a relative path"),
            ));
        }
        fs::read(dir.join(relative))
    }

    fn device_fingerprint(&self) -> io::Result<String> {
        for source in FINGERPRINT_SOURCES {
            match fs::read_to_string(source) {
                Ok(id) if !id.trim().is_empty() => {
                    debug!("device fingerprint from {source}");
                    return Ok(id.trim().to_string());
                }
                _ => continue,
            }
        }
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            "no device identifier available",
        ))
    }
}
