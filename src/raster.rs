use image::{Rgba, RgbaImage};

use crate::encoder::ModuleGrid;
use crate::error::{QrError, QrResult};

/// Dark module color.
pub const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
/// Light module and border color, keyed out later.
pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Side length in pixels of a rasterized grid, or `None` on overflow.
pub fn image_side(grid_side: usize, module_pixel_size: u32, border_modules: u32) -> Option<u32> {
    let modules = u32::try_from(grid_side)
        .ok()?
        .checked_add(border_modules.checked_mul(2)?)?;
    modules.checked_mul(module_pixel_size)
}

/// Renders a module grid into a square RGBA image.
///
/// Every module becomes a `module_pixel_size` square block; dark modules are
/// painted `dark`, light modules and the `border_modules` wide quiet zone are
/// painted `light`.
///
/// # Errors
///
/// Returns [`QrError::InvalidDimensions`] if `module_pixel_size` is zero or the
/// resulting image side does not fit in a `u32`.
pub fn rasterize(
    grid: &ModuleGrid,
    module_pixel_size: u32,
    border_modules: u32,
    dark: Rgba<u8>,
    light: Rgba<u8>,
) -> QrResult<RgbaImage> {
    if module_pixel_size == 0 {
        return Err(QrError::invalid_dimensions("module pixel size must be positive"));
    }
    let side = image_side(grid.side(), module_pixel_size, border_modules).ok_or_else(|| {
        QrError::invalid_dimensions(format!(
            "{} modules with border {border_modules} at {module_pixel_size}px overflows",
            grid.side()
        ))
    })?;

    let border = i64::from(border_modules);
    let scale = module_pixel_size;
    let mut img = RgbaImage::new(side, side);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let qr_x = i64::from(x / scale) - border;
        let qr_y = i64::from(y / scale) - border;
        *pixel = if grid.is_dark(qr_x, qr_y) { dark } else { light };
    }

    tracing::debug!(
        side,
        module_pixel_size,
        border_modules,
        version = grid.version(),
        ec = ?grid.error_correction_level(),
        dark_modules = grid.dark_count(),
        "rasterized grid"
    );
    Ok(img)
}
