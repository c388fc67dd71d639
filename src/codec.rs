//! Image decode, resize and encode, behind [`ImageCodec`] so that compositing
//! can be tested with synthetic buffers.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::imageops::FilterType;
use image::{ImageError, RgbaImage};
use tempfile::NamedTempFile;

pub trait ImageCodec {
    /// Decodes the image at `path` into RGBA8. Sources without an alpha
    /// channel come back fully opaque.
    fn load_rgba(&self, path: &Path) -> Result<RgbaImage, ImageError>;

    /// Resamples `image` to exactly `width` x `height`.
    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage;

    /// Writes `image` as PNG, creating missing parent directories. A failed
    /// write leaves nothing at `path`.
    fn save_png(&self, image: &RgbaImage, path: &Path) -> Result<(), ImageError>;
}

/// [`ImageCodec`] backed by the `image` crate. Resizing uses Lanczos3 so that
/// heavily downscaled logos do not alias.
#[derive(Copy, Clone, Debug)]
pub struct ImageCrateCodec {
    pub filter: FilterType,
}

impl Default for ImageCrateCodec {
    fn default() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl ImageCodec for ImageCrateCodec {
    fn load_rgba(&self, path: &Path) -> Result<RgbaImage, ImageError> {
        let img = image::ImageReader::open(path)?
            .with_guessed_format()?
            .decode()?;
        Ok(img.to_rgba8())
    }

    fn resize(&self, image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
        image::imageops::resize(image, width, height, self.filter)
    }

    fn save_png(&self, image: &RgbaImage, path: &Path) -> Result<(), ImageError> {
        write_atomically(path, |w| image.write_with_encoder(PngEncoder::new(w)))
    }
}

/// Runs `write` against a temporary file next to `path` and renames it into
/// place once everything is flushed. On error the temporary file is removed
/// and whatever was at `path` before is left as it was.
pub fn write_atomically<F>(path: &Path, write: F) -> Result<(), ImageError>
where
    F: FnOnce(&mut dyn Write) -> Result<(), ImageError>,
{
    let dir = match path.parent().filter(|d| !d.as_os_str().is_empty()) {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            dir
        }
        None => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write(&mut writer)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ImageError::IoError(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba};
    use std::io;

    fn entries(dir: &Path) -> Vec<std::path::PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect()
    }

    #[test]
    fn rgb_sources_load_fully_opaque() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        RgbImage::from_pixel(2, 2, Rgb([10, 20, 30])).save(&path).unwrap();

        let img = ImageCrateCodec::default().load_rgba(&path).unwrap();
        assert_eq!(img.dimensions(), (2, 2));
        assert!(img.pixels().all(|p| p.0 == [10, 20, 30, 255]));
    }

    #[test]
    fn undecodable_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.png");
        fs::write(&path, b"definitely not a png").unwrap();
        assert!(ImageCrateCodec::default().load_rgba(&path).is_err());
        assert!(ImageCrateCodec::default()
            .load_rgba(&dir.path().join("missing.png"))
            .is_err());
    }

    #[test]
    fn resize_hits_requested_size() {
        let src = RgbaImage::from_pixel(40, 40, Rgba([200, 0, 0, 255]));
        let out = ImageCrateCodec::default().resize(&src, 7, 7);
        assert_eq!(out.dimensions(), (7, 7));
    }

    #[test]
    fn save_creates_parents_and_keeps_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/out.png");
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 0]));
        img.put_pixel(1, 1, Rgba([0, 0, 0, 255]));

        let codec = ImageCrateCodec::default();
        codec.save_png(&img, &path).unwrap();
        // second save into the existing directory is fine
        codec.save_png(&img, &path).unwrap();

        let back = codec.load_rgba(&path).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn failed_write_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join("qrs");
        let path = out_dir.join("qr_Woodrose.png");

        let err = write_atomically(&path, |w| {
            w.write_all(b"\x89PNG partial")?;
            Err(ImageError::IoError(io::Error::other("disk full")))
        })
        .unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert!(!path.exists());
        assert!(entries(&out_dir).is_empty());
    }

    #[test]
    fn failed_write_keeps_previous_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("qr_Woodrose.png");
        let img = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        ImageCrateCodec::default().save_png(&img, &path).unwrap();

        assert!(write_atomically(&path, |w| {
            w.write_all(b"garbage")?;
            Err(ImageError::IoError(io::Error::other("boom")))
        })
        .is_err());

        assert_eq!(ImageCrateCodec::default().load_rgba(&path).unwrap(), img);
        assert_eq!(entries(dir.path()), vec![path]);
    }
}
