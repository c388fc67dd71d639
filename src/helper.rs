//! High-level generation: the whole pipeline from a [`GeneratorConfig`] to a
//! saved PNG.
//!
//! Rendering and saving are separate steps. [`render_feedback_qr`] never
//! touches the filesystem beyond reading the logo, so a failure at any stage
//! leaves nothing behind.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::codec::{ImageCodec, ImageCrateCodec};
use crate::composite::composite;
use crate::config::GeneratorConfig;
use crate::encoder::{EcLevel, Encoder, QrEncoder, VersionChoice};
use crate::error::{QrError, QrResult};
use crate::raster::{rasterize, BLACK, WHITE};
use crate::transparency::make_color_transparent;
use crate::url::feedback_url;

/// A rendered image and the path it is meant to be written to.
#[derive(Clone, Debug)]
pub struct CompositionResult {
    pub payload: String,
    pub image: RgbaImage,
    pub path: PathBuf,
}

/// Renders `payload` as a QR code with a transparent background and the logo
/// at `logo_path` centered on it.
///
/// # Arguments
///
/// * `payload` - The text to encode.
/// * `logo_path` - Logo image, any format the codec can decode.
/// * `ec` - Error correction level. Use H when the logo covers many modules.
/// * `module_pixel_size` - Pixels per module edge.
/// * `border_modules` - Quiet zone width in modules.
/// * `logo_scale` - Logo side as a fraction of the image side, in (0, 1].
#[allow(clippy::too_many_arguments)]
pub fn render_qr_with_logo(
    payload: &str,
    logo_path: &Path,
    ec: EcLevel,
    module_pixel_size: u32,
    border_modules: u32,
    logo_scale: f64,
    encoder: &dyn Encoder,
    codec: &dyn ImageCodec,
) -> QrResult<RgbaImage> {
    let grid = encoder.encode(payload, ec, VersionChoice::Auto)?;
    let img = rasterize(&grid, module_pixel_size, border_modules, BLACK, WHITE)?;
    let [r, g, b, _] = WHITE.0;
    let img = make_color_transparent(img, [r, g, b]);
    composite(img, logo_path, logo_scale, codec)
}

/// Renders the feedback QR code described by `config` without writing it.
#[tracing::instrument(skip(encoder, codec), fields(hotel = %config.hotel_code))]
pub fn render_feedback_qr(
    config: &GeneratorConfig,
    encoder: &dyn Encoder,
    codec: &dyn ImageCodec,
) -> QrResult<CompositionResult> {
    let payload = feedback_url(&config.hotel_code);
    let image = render_qr_with_logo(
        &payload,
        &config.logo_path,
        config.error_correction_level,
        config.module_pixel_size,
        config.border_modules,
        config.logo_scale,
        encoder,
        codec,
    )?;
    Ok(CompositionResult {
        payload,
        image,
        path: config.output_path(),
    })
}

/// Writes a rendered result to its path, creating the directory if needed.
///
/// # Errors
///
/// Returns [`QrError::OutputWrite`] if the directory or file cannot be written.
pub fn save_result(result: &CompositionResult, codec: &dyn ImageCodec) -> QrResult<PathBuf> {
    codec
        .save_png(&result.image, &result.path)
        .map_err(|source| QrError::OutputWrite {
            path: result.path.clone(),
            source,
        })?;
    tracing::info!(path = %result.path.display(), "saved QR code");
    Ok(result.path.clone())
}

/// Renders and saves the feedback QR code for `config` using the `qrcode` and
/// `image` backed implementations. Returns the path written.
///
/// # Example
///
/// ```no_run
/// use feedback_qr::{config::GeneratorConfig, helper::generate_feedback_qr};
///
/// let config = GeneratorConfig {
///     hotel_code: "Woodrose".into(),
///     ..GeneratorConfig::default()
/// };
/// let path = generate_feedback_qr(&config).expect("generation failed");
/// println!("Saved {}", path.display());
/// ```
pub fn generate_feedback_qr(config: &GeneratorConfig) -> QrResult<PathBuf> {
    let codec = ImageCrateCodec::default();
    let result = render_feedback_qr(config, &QrEncoder, &codec)?;
    save_result(&result, &codec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::ModuleGrid;
    use image::{ImageError, Rgba};
    use std::cell::RefCell;

    /// Encoder returning a fixed grid with a dark center module.
    struct FixedEncoder;

    impl Encoder for FixedEncoder {
        fn encode(&self, _payload: &str, ec: EcLevel, _version: VersionChoice) -> QrResult<ModuleGrid> {
            let mut modules = vec![false; 25];
            modules[0] = true;
            modules[12] = true;
            ModuleGrid::from_modules(5, modules, 1, ec)
        }
    }

    struct RecordingCodec {
        logo: RgbaImage,
        saved: RefCell<Vec<PathBuf>>,
        fail_save: bool,
    }

    impl RecordingCodec {
        fn new(logo: RgbaImage) -> Self {
            Self {
                logo,
                saved: RefCell::new(Vec::new()),
                fail_save: false,
            }
        }
    }

    impl ImageCodec for RecordingCodec {
        fn load_rgba(&self, _path: &Path) -> Result<RgbaImage, ImageError> {
            Ok(self.logo.clone())
        }

        fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
            image::imageops::resize(image, width, height, image::imageops::FilterType::Nearest)
        }

        fn save_png(&self, _image: &RgbaImage, path: &Path) -> Result<(), ImageError> {
            if self.fail_save {
                return Err(ImageError::IoError(std::io::Error::other("disk full")));
            }
            self.saved.borrow_mut().push(path.to_path_buf());
            Ok(())
        }
    }

    fn config() -> GeneratorConfig {
        GeneratorConfig {
            hotel_code: "Woodrose".into(),
            module_pixel_size: 2,
            border_modules: 1,
            logo_scale: 0.2,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn render_runs_every_stage_in_order() {
        let codec = RecordingCodec::new(RgbaImage::from_pixel(1, 1, Rgba([0, 128, 0, 255])));
        let result = render_feedback_qr(&config(), &FixedEncoder, &codec).unwrap();

        assert_eq!(result.payload, "https://roommitra.com/feedback?h=Woodrose");
        assert_eq!(result.path, Path::new("qrs").join("qr_Woodrose.png"));
        assert_eq!(result.image.dimensions(), (14, 14));
        // background keyed
        assert_eq!(result.image.get_pixel(0, 0).0, [255, 255, 255, 0]);
        // dark module (0, 0) starts after a 2px border
        assert_eq!(result.image.get_pixel(2, 2).0, [0, 0, 0, 255]);
        // logo side floor(14 * 0.2) = 2 at offset 6 covers the center module
        assert_eq!(result.image.get_pixel(6, 6).0, [0, 128, 0, 255]);
        assert_eq!(result.image.get_pixel(7, 7).0, [0, 128, 0, 255]);
        assert!(codec.saved.borrow().is_empty());
    }

    #[test]
    fn white_logo_pixels_survive_keying() {
        let codec = RecordingCodec::new(RgbaImage::from_pixel(1, 1, WHITE));
        let result = render_feedback_qr(&config(), &FixedEncoder, &codec).unwrap();
        assert_eq!(*result.image.get_pixel(6, 6), WHITE);
    }

    #[test]
    fn errors_abort_before_saving() {
        let codec = RecordingCodec::new(RgbaImage::new(1, 1));
        let cfg = GeneratorConfig {
            logo_scale: 0.01,
            ..config()
        };
        let err = render_feedback_qr(&cfg, &FixedEncoder, &codec).unwrap_err();
        assert!(matches!(err, QrError::InvalidScale(_)));

        let cfg = GeneratorConfig {
            module_pixel_size: 0,
            ..config()
        };
        let err = render_feedback_qr(&cfg, &FixedEncoder, &codec).unwrap_err();
        assert_eq!(err.stage(), "rasterize");
        assert!(codec.saved.borrow().is_empty());
    }

    #[test]
    fn save_reports_output_write_errors() {
        let mut codec = RecordingCodec::new(RgbaImage::from_pixel(1, 1, WHITE));
        let result = render_feedback_qr(&config(), &FixedEncoder, &codec).unwrap();

        assert_eq!(save_result(&result, &codec).unwrap(), result.path);
        assert_eq!(codec.saved.borrow().as_slice(), &[result.path.clone()]);

        codec.fail_save = true;
        let err = save_result(&result, &codec).unwrap_err();
        assert!(matches!(err, QrError::OutputWrite { .. }));
        assert!(err.to_string().contains("disk full"));
    }
}
