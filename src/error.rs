use std::path::PathBuf;

use crate::encoder::{EcLevel, VersionChoice};

pub type QrResult<T> = Result<T, QrError>;

/// Every way the generation pipeline can fail. Each variant belongs to exactly
/// one stage, see [`QrError::stage`].
#[derive(thiserror::Error, Debug)]
pub enum QrError {
    #[error("invalid payload: {0}")]
    InvalidPayload(String),

    #[error("payload of {len} bytes does not fit a QR code at level {ec:?} ({version})")]
    EncodingCapacityExceeded {
        len: usize,
        ec: EcLevel,
        version: VersionChoice,
    },

    #[error("invalid QR version {0}, expected 1..=40")]
    InvalidVersion(i16),

    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    #[error("failed to load logo '{}': {source}", .path.display())]
    LogoLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("logo scale {0} must be in (0, 1] and leave at least one pixel")]
    InvalidScale(f64),

    #[error("failed to write '{}': {source}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("config error: {0}")]
    Config(String),
}

impl QrError {
    pub fn invalid_payload(msg: impl Into<String>) -> Self {
        Self::InvalidPayload(msg.into())
    }

    pub fn invalid_dimensions(msg: impl Into<String>) -> Self {
        Self::InvalidDimensions(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Name of the pipeline stage that produced this error.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidPayload(_)
            | Self::EncodingCapacityExceeded { .. }
            | Self::InvalidVersion(_) => "encode",
            Self::InvalidDimensions(_) => "rasterize",
            Self::LogoLoad { .. } | Self::InvalidScale(_) => "composite",
            Self::OutputWrite { .. } => "save",
            Self::Config(_) => "config",
        }
    }
}
