//! Color keying.
//!
//! Matching is exact on RGB. Near-white pixels are left opaque, which keeps
//! module edges crisp.

use image::RgbaImage;

/// Makes every pixel whose RGB equals `target` fully transparent and returns
/// the image. The comparison ignores alpha; matched pixels keep their RGB.
pub fn make_color_transparent(mut image: RgbaImage, target: [u8; 3]) -> RgbaImage {
    make_color_transparent_in_place(&mut image, target);
    image
}

/// In-place form of [`make_color_transparent`]. Returns how many pixels were keyed.
pub fn make_color_transparent_in_place(image: &mut RgbaImage, target: [u8; 3]) -> usize {
    let mut keyed = 0usize;
    for px in image.pixels_mut() {
        if px.0[..3] == target {
            px.0[3] = 0;
            keyed += 1;
        }
    }
    tracing::debug!(keyed, ?target, "keyed background to transparent");
    keyed
}
