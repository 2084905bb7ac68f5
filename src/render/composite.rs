//! Pixel blending for the banner band and the glyph layer.
//!
//! Blending happens on gamma-encoded sRGB values, matching how the icon
//! artwork and the configured colors are authored.

use image::{Rgba, RgbaImage};
use palette::Srgba;
use palette::blend::Compose;
use resvg::tiny_skia::Pixmap;

use super::layout::RectPx;
use crate::color::BannerColor;

/// Blends `src` over `dst` (Porter-Duff "source over").
pub fn blend_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => dst,
        u8::MAX => src,
        _ => {
            let top: Srgba<f32> = to_srgba(src).into_format();
            let bottom: Srgba<f32> = to_srgba(dst).into_format();
            let out: Srgba<u8> = top.over(bottom).into_format();
            Rgba([out.red, out.green, out.blue, out.alpha])
        }
    }
}

fn to_srgba(pixel: Rgba<u8>) -> Srgba<u8> {
    let [r, g, b, a] = pixel.0;
    Srgba::new(r, g, b, a)
}

/// Blends a solid color over the pixels of `dest` inside `rect`.
pub fn fill_rect(dest: &mut RgbaImage, rect: RectPx, color: BannerColor) {
    let src = Rgba(color.rgba());
    for (x, y, pixel) in dest.enumerate_pixels_mut() {
        if rect.contains(x, y) {
            *pixel = blend_over(src, *pixel);
        }
    }
}

/// Blends `layer` over `dest`. Both images must have the same size.
pub fn composite_layer(dest: &mut RgbaImage, layer: &RgbaImage) {
    debug_assert_eq!(dest.dimensions(), layer.dimensions());
    for (dst, src) in dest.pixels_mut().zip(layer.pixels()) {
        *dst = blend_over(*src, *dst);
    }
}

/// Converts a rendered pixmap (premultiplied) to a straight-alpha image.
pub fn pixmap_to_rgba_image(pixmap: &Pixmap) -> Option<RgbaImage> {
    let data = pixmap
        .pixels()
        .iter()
        .flat_map(|pixel| {
            let color = pixel.demultiply();
            [color.red(), color.green(), color.blue(), color.alpha()]
        })
        .collect();
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
}
