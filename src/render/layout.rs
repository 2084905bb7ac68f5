//! Banner geometry.
//!
//! All positions are derived from the icon size and the measured text
//! height, so the same inputs always give the same rectangles. The banner
//! sits near the bottom edge: its lower edge is `round(H/10)` above the
//! bottom of the icon and the text box starts a further `H/24` up.

/// A rectangle in pixel coordinates, origin at the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge coordinate (x + width).
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT: f32 = 1.2;

/// Computed placement of the banner and its text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BannerLayout {
    pub font_size: f32,
    /// The filled background band, spanning the full icon width.
    pub band: RectPx,
    /// Where the label is drawn, centered horizontally.
    pub text_box: RectPx,
}

impl BannerLayout {
    /// Font size for an icon of the given height.
    pub fn font_size(height: u32) -> f32 {
        height as f32 / 6.0
    }

    /// The box the label is wrapped into: `0.9·W` by `(0.8 − 1/12)·H`.
    pub fn text_limits(width: u32, height: u32) -> (f32, f32) {
        (width as f32 * 0.9, height as f32 * (0.8 - 1.0 / 12.0))
    }

    /// Lays out the banner for an icon of `width` x `height` whose label
    /// measures `text_height` pixels.
    pub fn new(width: u32, height: u32, text_height: f32) -> Self {
        let w = width as f32;
        let h = height as f32;

        let band_height = (text_height + h / 12.0).round() as u32;
        let band_bottom = height.saturating_sub((h / 10.0).round() as u32);
        let band_top = band_bottom.saturating_sub(band_height);

        let text_height = text_height.ceil() as u32;
        let text_bottom = height.saturating_sub((h / 10.0 + h / 24.0).round() as u32);
        let text_top = text_bottom.saturating_sub(text_height);

        Self {
            font_size: Self::font_size(height),
            band: RectPx::new(0, band_top, width, band_bottom - band_top),
            text_box: RectPx::new(
                (w * 0.05).round() as u32,
                text_top,
                (w * 0.9).round() as u32,
                text_bottom - text_top,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let rect = RectPx::new(10, 20, 100, 200);
        assert_eq!(rect.right(), 110);
        assert_eq!(rect.bottom(), 220);
        assert!(rect.contains(10, 20));
        assert!(!rect.contains(110, 20));
    }

    #[test]
    fn layout_for_square_icon() {
        // 120px icon, one line of 20px text at 1.2 line height.
        let layout = BannerLayout::new(120, 120, 24.0);

        assert_eq!(layout.font_size, 20.0);
        assert_eq!(layout.band, RectPx::new(0, 74, 120, 34));
        assert_eq!(layout.text_box, RectPx::new(6, 79, 108, 24));
    }

    #[test]
    fn text_sits_inside_band() {
        for size in [29, 40, 58, 87, 120, 180, 1024] {
            let text = BannerLayout::font_size(size) * LINE_HEIGHT;
            let layout = BannerLayout::new(size, size, text);
            assert!(layout.text_box.y >= layout.band.y, "size {size}");
            assert!(layout.text_box.bottom() <= layout.band.bottom(), "size {size}");
            assert_eq!(layout.band.width, size);
        }
    }

    #[test]
    fn tiny_icons_do_not_underflow() {
        let layout = BannerLayout::new(2, 2, 50.0);
        assert_eq!(layout.band.y, 0);
        assert_eq!(layout.text_box.y, 0);
    }

    #[test]
    fn text_limits_follow_icon_size() {
        let (w, h) = BannerLayout::text_limits(100, 120);
        assert!((w - 90.0).abs() < 1e-4);
        assert!((h - 86.0).abs() < 1e-3);
    }
}
