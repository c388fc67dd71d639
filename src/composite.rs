//! Logo compositing.
//!
//! The logo is resized to a square `floor(min(w, h) * scale)` pixels wide and
//! blended over the center of the base image using its own alpha channel as
//! the mask. Pixels outside the logo rectangle are left untouched.

use std::path::Path;

use image::RgbaImage;

use crate::codec::ImageCodec;
use crate::error::{QrError, QrResult};

/// Side length of the resized logo for a `width` x `height` base.
///
/// # Errors
///
/// Returns [`QrError::InvalidScale`] if `scale` is not in (0, 1] or the side
/// rounds down to zero.
pub fn logo_side(width: u32, height: u32, scale: f64) -> QrResult<u32> {
    if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
        return Err(QrError::InvalidScale(scale));
    }
    let side = (f64::from(width.min(height)) * scale).floor() as u32;
    if side == 0 {
        return Err(QrError::InvalidScale(scale));
    }
    Ok(side)
}

/// Top-left corner that centers a `side` square on a `width` x `height` base.
/// Odd slack leaves the extra pixel on the right and bottom.
pub fn centered_offset(width: u32, height: u32, side: u32) -> (u32, u32) {
    (width.saturating_sub(side) / 2, height.saturating_sub(side) / 2)
}

/// Blends straight-alpha `src` over `dst`.
///
/// Color channels mix linearly by the source alpha; the output alpha is the
/// usual "over" result, so a fully transparent `dst` picks up the logo's own
/// opacity.
pub fn blend_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    let sa = u32::from(src[3]);
    if sa == 0 {
        return dst;
    }
    if sa == 255 {
        return src;
    }
    let inv = 255 - sa;

    let mut out = [0u8; 4];
    for i in 0..3 {
        out[i] = div255(u32::from(src[i]) * sa + u32::from(dst[i]) * inv);
    }
    out[3] = div255(sa * 255 + u32::from(dst[3]) * inv);
    out
}

fn div255(x: u32) -> u8 {
    ((x + 127) / 255).min(255) as u8
}

/// Blends `overlay` onto `base` with its top-left corner at (`x`, `y`).
/// Parts of the overlay falling outside `base` are clipped.
pub fn overlay_at(base: &mut RgbaImage, overlay: &RgbaImage, x: u32, y: u32) {
    let (bw, bh) = base.dimensions();
    for (ox, oy, src) in overlay.enumerate_pixels() {
        let (Some(tx), Some(ty)) = (x.checked_add(ox), y.checked_add(oy)) else {
            continue;
        };
        if tx >= bw || ty >= bh {
            continue;
        }
        let dst = base.get_pixel_mut(tx, ty);
        dst.0 = blend_over(dst.0, src.0);
    }
}

/// Resizes an already decoded logo and blends it over the center of `base`.
pub fn composite_image(
    mut base: RgbaImage,
    logo: &RgbaImage,
    logo_scale: f64,
    codec: &dyn ImageCodec,
) -> QrResult<RgbaImage> {
    let (width, height) = base.dimensions();
    let side = logo_side(width, height, logo_scale)?;
    let resized = codec.resize(logo, side, side);
    let (x, y) = centered_offset(width, height, side);

    overlay_at(&mut base, &resized, x, y);
    tracing::debug!(side, x, y, "composited logo");
    Ok(base)
}

/// Loads the logo at `logo_path` and composites it over the center of `base`.
///
/// # Errors
///
/// [`QrError::LogoLoad`] if the logo cannot be read or decoded, and
/// [`QrError::InvalidScale`] if `logo_scale` leaves no pixels.
pub fn composite(
    base: RgbaImage,
    logo_path: &Path,
    logo_scale: f64,
    codec: &dyn ImageCodec,
) -> QrResult<RgbaImage> {
    let logo = codec.load_rgba(logo_path).map_err(|source| QrError::LogoLoad {
        path: logo_path.to_path_buf(),
        source,
    })?;
    composite_image(base, &logo, logo_scale, codec)
}
