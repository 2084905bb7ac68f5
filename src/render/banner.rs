//! The version banner overlay.

use std::path::PathBuf;

use image::RgbaImage;
use log::debug;

use super::composite::{composite_layer, fill_rect};
use super::layout::BannerLayout;
use super::text::{TextBlock, TextEngine};
use crate::color::BannerColor;
use crate::error::{Error, Result};
use crate::options::Options;

// ============================================================================
// BannerStyle
// ============================================================================

/// Colors and font used for the banner.
#[derive(Debug, Clone, PartialEq)]
pub struct BannerStyle {
    pub background: BannerColor,
    pub foreground: BannerColor,
    pub font_family: String,
    /// Extra font file loaded in addition to the system fonts.
    pub font_file: Option<PathBuf>,
}

impl Default for BannerStyle {
    fn default() -> Self {
        Self {
            background: BannerColor::DEFAULT_BACKGROUND,
            foreground: BannerColor::DEFAULT_FOREGROUND,
            font_family: "sans-serif".into(),
            font_file: None,
        }
    }
}

impl BannerStyle {
    pub fn from_options(options: &Options) -> Self {
        Self {
            background: options.version_background_color,
            foreground: options.version_text_color,
            font_family: options.font_family.clone(),
            font_file: options.font_file.clone(),
        }
    }
}

// ============================================================================
// BannerRenderer
// ============================================================================

/// Draws a version label onto icon bitmaps.
///
/// Rendering is a pure function of the input pixels, the label and the
/// style: the same inputs always produce the same output pixels.
///
/// # Algorithm
///
/// 1. Wrap the label at font size `H/6` into a `0.9·W` by `(0.8 − 1/12)·H`
///    box and measure its height.
/// 2. Blend a full-width band of `text height + H/12` in the background
///    color over the icon, `round(H/10)` above the bottom edge.
/// 3. Draw the label centered between `0.05·W` margins, `H/24` above the
///    band's lower edge, in the foreground color.
pub struct BannerRenderer {
    style: BannerStyle,
    text: TextEngine,
}

impl BannerRenderer {
    /// Creates a renderer using the system fonts plus `style.font_file`.
    pub fn new(style: BannerStyle) -> Result<Self> {
        let text = TextEngine::new(&style.font_family);
        Self::with_engine(style, text)
    }

    /// Creates a renderer around an existing text engine.
    pub fn with_engine(style: BannerStyle, mut text: TextEngine) -> Result<Self> {
        if let Some(path) = &style.font_file {
            text.load_font_file(path).map_err(|e| {
                Error::cannot_read(&path.display().to_string(), Some(&e.to_string()))
            })?;
            debug!("loaded font file {}", path.display());
        }
        Ok(Self { style, text })
    }

    pub fn style(&self) -> &BannerStyle {
        &self.style
    }

    /// Wraps the label and lays out the banner for an icon size.
    pub fn layout(&self, width: u32, height: u32, label: &str) -> (BannerLayout, TextBlock) {
        let font_size = BannerLayout::font_size(height);
        let (max_width, max_height) = BannerLayout::text_limits(width, height);
        let block = self.text.wrap(label, font_size, max_width, max_height);
        (BannerLayout::new(width, height, block.height()), block)
    }

    /// Returns a copy of `base` with the banner drawn over it.
    ///
    /// Fails with [`Error::FontUnavailable`] when the label has text but no
    /// loaded font can draw it.
    pub fn render(&self, base: &RgbaImage, label: &str) -> Result<RgbaImage> {
        let (width, height) = base.dimensions();
        let mut output = base.clone();
        if width == 0 || height == 0 {
            return Ok(output);
        }

        let (layout, block) = self.layout(width, height, label);
        fill_rect(&mut output, layout.band, self.style.background);

        let Some(first_line) = block.lines.first() else {
            return Ok(output);
        };
        if self.text.line_width(first_line, layout.font_size) <= 0.0 {
            return Err(Error::FontUnavailable {
                family: self.style.font_family.clone(),
            });
        }

        let glyphs = self
            .text
            .render(&block, &layout, width, height, self.style.foreground)?;
        composite_layer(&mut output, &glyphs);
        Ok(output)
    }
}
