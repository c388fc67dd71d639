//! QR encoding adapter.
//!
//! The matrix encoding itself is delegated to the `qrcode` crate. This module
//! narrows it down to what the rest of the pipeline needs: a square grid of
//! dark/light modules, produced from a payload, an error correction level and
//! an optional fixed version.

use std::fmt;

use qrcode::types::QrError as RawQrError;
use serde::{Deserialize, Serialize};

use crate::error::{QrError, QrResult};

/// Largest payload accepted, in bytes. This is the byte-mode capacity of a
/// version 40 symbol at level L; no level can hold more.
pub const MAX_PAYLOAD_BYTES: usize = 2953;

/// Error correction level, from least (L, ~7%) to most (H, ~30%) resilient.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum EcLevel {
    L,
    M,
    Q,
    #[default]
    H,
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(ec: EcLevel) -> Self {
        match ec {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

/// Symbol version to encode at.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum VersionChoice {
    /// Smallest version that holds the payload.
    #[default]
    Auto,
    /// Exactly this version (1..=40).
    Fixed(i16),
}

impl fmt::Display for VersionChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto-fit"),
            Self::Fixed(v) => write!(f, "version {v}"),
        }
    }
}

/// A square grid of modules, `true` meaning dark. The quiet-zone border is not
/// part of the grid.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModuleGrid {
    side: usize,
    modules: Vec<bool>,
    version: i16,
    ec: EcLevel,
}

impl ModuleGrid {
    /// Builds a grid from row-major modules.
    ///
    /// # Errors
    ///
    /// Returns [`QrError::InvalidDimensions`] if `modules` is not `side * side` long.
    pub fn from_modules(side: usize, modules: Vec<bool>, version: i16, ec: EcLevel) -> QrResult<Self> {
        if side == 0 || side.checked_mul(side) != Some(modules.len()) {
            return Err(QrError::invalid_dimensions(format!(
                "grid of {} modules is not {side}x{side}",
                modules.len()
            )));
        }
        Ok(Self {
            side,
            modules,
            version,
            ec,
        })
    }

    /// Width and height in modules.
    pub fn side(&self) -> usize {
        self.side
    }

    pub fn version(&self) -> i16 {
        self.version
    }

    pub fn error_correction_level(&self) -> EcLevel {
        self.ec
    }

    /// Returns whether the module at (x, y) is dark. Coordinates outside the
    /// grid are light, which is what the border renders as.
    pub fn is_dark(&self, x: i64, y: i64) -> bool {
        let side = self.side as i64;
        if x < 0 || y < 0 || x >= side || y >= side {
            return false;
        }
        self.modules[(y * side + x) as usize]
    }

    pub fn dark_count(&self) -> usize {
        self.modules.iter().filter(|m| **m).count()
    }
}

/// Turns a payload into a module grid.
pub trait Encoder {
    fn encode(&self, payload: &str, ec: EcLevel, version: VersionChoice) -> QrResult<ModuleGrid>;
}

/// [`Encoder`] backed by the `qrcode` crate.
#[derive(Copy, Clone, Debug, Default)]
pub struct QrEncoder;

impl Encoder for QrEncoder {
    fn encode(&self, payload: &str, ec: EcLevel, version: VersionChoice) -> QrResult<ModuleGrid> {
        if payload.is_empty() {
            return Err(QrError::invalid_payload("payload is empty"));
        }
        if payload.len() > MAX_PAYLOAD_BYTES {
            return Err(QrError::invalid_payload(format!(
                "payload is {} bytes, at most {MAX_PAYLOAD_BYTES} are supported",
                payload.len()
            )));
        }

        let encoded = match version {
            VersionChoice::Auto => qrcode::QrCode::with_error_correction_level(payload, ec.into()),
            VersionChoice::Fixed(v) => {
                if !(1..=40).contains(&v) {
                    return Err(QrError::InvalidVersion(v));
                }
                qrcode::QrCode::with_version(payload, qrcode::Version::Normal(v), ec.into())
            }
        };
        let code = encoded.map_err(|err| match err {
            RawQrError::DataTooLong => QrError::EncodingCapacityExceeded {
                len: payload.len(),
                ec,
                version,
            },
            RawQrError::InvalidVersion => match version {
                VersionChoice::Fixed(v) => QrError::InvalidVersion(v),
                VersionChoice::Auto => QrError::invalid_payload(err.to_string()),
            },
            other => QrError::invalid_payload(other.to_string()),
        })?;

        let side = code.width();
        let modules = code
            .to_colors()
            .into_iter()
            .map(|c| c == qrcode::Color::Dark)
            .collect();
        let version = match code.version() {
            qrcode::Version::Normal(v) | qrcode::Version::Micro(v) => v,
        };

        tracing::debug!(side, version, ?ec, "encoded payload");
        ModuleGrid::from_modules(side, modules, version, ec)
    }
}
