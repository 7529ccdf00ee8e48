// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use crate::error::{Error, Result};
use core::fmt;
use serde::{Deserialize, Serialize};

/// MICR fonts a zone can be recognized in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MicrFormat {
    E13b,
    Cmc7,
}

/// A recognized MICR line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub format: MicrFormat,
    pub text: String,
    /// Four (x, y) corners, clockwise from top-left, in upright frame pixels.
    pub warped_box: [f32; 8],
    /// Overall score first, then one score per character.
    pub confidences: Vec<f32>,
}

impl Zone {
    /// Shifts the box by (`dx`, `dy`).
    pub fn translate(&mut self, dx: f32, dy: f32) {
        for corner in self.warped_box.chunks_exact_mut(2) {
            corner[0] += dx;
            corner[1] += dy;
        }
    }
}

#[derive(Serialize, Deserialize)]
struct ZoneList {
    zones: Vec<Zone>,
}

/// Result returned by every engine operation.
///
/// The code is 0 on success. `json` carries the operation payload: the
/// recognized zones for `process`, the runtime key for license requests,
/// and is empty otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineResult {
    code: i32,
    phrase: String,
    json: String,
    num_zones: usize,
}

impl EngineResult {
    pub fn new(code: i32, phrase: impl Into<String>, json: impl Into<String>, num_zones: usize) -> Self {
        Self {
            code,
            phrase: phrase.into(),
            json: json.into(),
            num_zones,
        }
    }

    pub fn bodyless(code: i32, phrase: impl Into<String>) -> Self {
        Self::new(code, phrase, "", 0)
    }

    pub fn bodyless_ok() -> Self {
        Self::bodyless(0, "OK")
    }

    /// Success result listing `zones`, with an empty payload when there are none.
    pub fn from_zones(zones: &[Zone]) -> Result<Self> {
        if zones.is_empty() {
            return Ok(Self::bodyless_ok());
        }
        let json = serde_json::to_string(&ZoneList {
            zones: zones.to_vec(),
        })
        .map_err(|e| Error::Recognition(format!("failed to serialize zones: {e}")))?;
        Ok(Self::new(0, "OK", json, zones.len()))
    }

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    pub fn json(&self) -> &str {
        &self.json
    }

    /// Number of zones in [`json`](Self::json), without parsing it.
    pub fn num_zones(&self) -> usize {
        self.num_zones
    }

    pub fn is_ok(&self) -> bool {
        self.code == 0
    }

    /// Parses the zones back out of the payload.
    pub fn zones(&self) -> Result<Vec<Zone>> {
        if self.json.is_empty() {
            return Ok(Vec::new());
        }
        let list: ZoneList = serde_json::from_str(&self.json)?;
        Ok(list.zones)
    }
}

impl From<&Error> for EngineResult {
    fn from(err: &Error) -> Self {
        Self::bodyless(err.code(), err.to_string())
    }
}

impl From<Error> for EngineResult {
    fn from(err: Error) -> Self {
        Self::from(&err)
    }
}

impl From<Result<EngineResult>> for EngineResult {
    fn from(res: Result<EngineResult>) -> Self {
        res.unwrap_or_else(EngineResult::from)
    }
}

impl fmt::Display for EngineResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}", self.code, self.phrase)
    }
}
