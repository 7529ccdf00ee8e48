// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Au-Zone Technologies. All Rights Reserved.

use thiserror::Error;

/// Errors raised by the engine and its helpers.
///
/// Every variant maps onto the numeric status code carried by
/// [`EngineResult`](crate::result::EngineResult) through [`Error::code`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("engine not initialized")]
    NotInitialized,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to load asset '{name}': {source}")]
    Asset {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("license error: {0}")]
    License(String),

    #[error("recognition failed: {0}")]
    Recognition(String),

    #[error("JPEG error: {0}")]
    Jpeg(#[from] turbojpeg::Error),
}

impl Error {
    /// Status code reported in results, never 0.
    pub fn code(&self) -> i32 {
        match self {
            Error::NotInitialized => 1,
            Error::InvalidConfig(_) | Error::Json(_) => 3,
            Error::InvalidArgument(_) => 4,
            Error::Asset { .. } | Error::Io(_) => 5,
            Error::License(_) => 6,
            Error::Recognition(_) => 7,
            Error::Jpeg(_) => 8,
        }
    }

    pub(crate) fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
