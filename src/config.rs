use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::encoder::EcLevel;
use crate::error::{QrError, QrResult};

/// Hotel used when none is configured.
pub const DEFAULT_HOTEL_CODE: &str = "Woodrose";
/// Logo file, relative to the working directory.
pub const DEFAULT_LOGO_PATH: &str = "room-mitra-square-transparent.png";
/// Directory generated codes are written to.
pub const DEFAULT_OUTPUT_DIR: &str = "qrs";
/// Pixels per module edge.
pub const DEFAULT_MODULE_PIXEL_SIZE: u32 = 12;
/// Quiet zone width in modules.
pub const DEFAULT_BORDER_MODULES: u32 = 4;
/// Logo side as a fraction of the image side.
pub const DEFAULT_LOGO_SCALE: f64 = 0.25;

/// Everything one generation run needs. Missing fields in a JSON config fall
/// back to the defaults below.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Hotel identifier, appended to the feedback URL and the file name. Default `Woodrose`.
    pub hotel_code: String,
    /// Logo image placed at the center. Default `room-mitra-square-transparent.png`.
    pub logo_path: PathBuf,
    /// Directory the PNG is written to, created if missing. Default `qrs`.
    pub output_dir: PathBuf,
    /// Pixels per module edge. Default 12.
    pub module_pixel_size: u32,
    /// Quiet zone width in modules. Default 4.
    pub border_modules: u32,
    /// Logo side as a fraction of the image side, in (0, 1]. Default 0.25.
    pub logo_scale: f64,
    /// Default H, so the code survives the logo covering its center.
    pub error_correction_level: EcLevel,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            hotel_code: DEFAULT_HOTEL_CODE.to_string(),
            logo_path: PathBuf::from(DEFAULT_LOGO_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            module_pixel_size: DEFAULT_MODULE_PIXEL_SIZE,
            border_modules: DEFAULT_BORDER_MODULES,
            logo_scale: DEFAULT_LOGO_SCALE,
            error_correction_level: EcLevel::H,
        }
    }
}

impl GeneratorConfig {
    /// Reads a (possibly partial) config from a JSON file.
    pub fn from_json_file(path: &Path) -> QrResult<Self> {
        let f = File::open(path)
            .map_err(|e| QrError::config(format!("open '{}': {e}", path.display())))?;
        serde_json::from_reader(BufReader::new(f))
            .map_err(|e| QrError::config(format!("parse '{}': {e}", path.display())))
    }

    /// Where the PNG for this config ends up.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(crate::url::output_file_name(&self.hotel_code))
    }
}
