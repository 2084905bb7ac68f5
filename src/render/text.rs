//! Label measuring, wrapping and rasterising through resvg/usvg.
//!
//! Text is expressed as a small SVG document and handed to usvg, which
//! shapes it with the fonts in its font database. Measuring and drawing
//! share the same database so wrapped lines fit what is drawn.

use std::fmt::Write as _;
use std::path::Path;

use image::RgbaImage;
use log::{debug, warn};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::fontdb::{self, Family, Query, Stretch, Style, Weight};
use resvg::usvg::{Options, Tree};

use super::composite::pixmap_to_rgba_image;
use super::layout::{BannerLayout, LINE_HEIGHT};
use crate::color::BannerColor;
use crate::error::{Error, Result};

/// Baseline offset from the top of a line, as a multiple of the font size.
const ASCENT: f32 = 0.95;

/// Faces tried, in order, when a generic family has no installed default.
const SANS_SERIF_FALLBACKS: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];
const SERIF_FALLBACKS: &[&str] = &[
    "DejaVu Serif",
    "Liberation Serif",
    "Noto Serif",
    "Times New Roman",
];

// ============================================================================
// TextBlock
// ============================================================================

/// A label broken into lines.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub lines: Vec<String>,
    pub line_height: f32,
}

impl TextBlock {
    /// Total height of all lines.
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }
}

// ============================================================================
// TextEngine
// ============================================================================

/// Font database and family used for banner labels.
pub struct TextEngine {
    options: Options<'static>,
    family: String,
}

impl TextEngine {
    /// Creates an engine backed by the system fonts.
    ///
    /// `sans-serif` and `serif` are pointed at installed faces when the
    /// font database's defaults (Arial, Times New Roman) are missing.
    pub fn new(family: &str) -> Self {
        let mut engine = Self::without_fonts(family);
        let db = engine.options.fontdb_mut();
        db.load_system_fonts();
        if db.is_empty() {
            warn!("no system fonts found");
        }
        map_generic_families(db);
        engine
    }

    /// Creates an engine with an empty font database.
    ///
    /// Nothing is drawn until fonts are loaded with [`load_font_file`](Self::load_font_file).
    pub fn without_fonts(family: &str) -> Self {
        let mut options = Options::default();
        options.font_family = family.to_string();
        Self {
            options,
            family: family.to_string(),
        }
    }

    /// Adds a font file to the database.
    pub fn load_font_file(&mut self, path: &Path) -> std::io::Result<()> {
        let db = self.options.fontdb_mut();
        db.load_font_file(path)?;
        map_generic_families(db);
        Ok(())
    }

    /// Width of the inked area of `text` on a single line.
    ///
    /// Returns 0.0 when no font can shape the text.
    pub fn line_width(&self, text: &str, font_size: f32) -> f32 {
        let size = (font_size * (text.chars().count() as f32 + 2.0)).ceil().max(1.0);
        let svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}"><text x="0" y="{font_size}" font-family="{family}" font-size="{font_size}">{text}</text></svg>"#,
            family = escape_xml(&self.family),
            text = escape_xml(text),
        );

        match Tree::from_str(&svg, &self.options) {
            Ok(tree) => tree.root().abs_bounding_box().width(),
            Err(_) => 0.0,
        }
    }

    /// Greedily wraps `label` into at most `max_height` worth of lines, each
    /// no wider than `max_width`.
    ///
    /// Lines break between words; a word wider than `max_width` on its own
    /// is broken between characters. A line always holds at least one
    /// character, and a non-empty label always keeps at least one line.
    pub fn wrap(&self, label: &str, font_size: f32, max_width: f32, max_height: f32) -> TextBlock {
        let line_height = font_size * LINE_HEIGHT;
        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();

        for word in label.split_whitespace() {
            for piece in self.split_word(word, font_size, max_width) {
                if current.is_empty() {
                    current = piece;
                    continue;
                }
                let candidate = format!("{current} {piece}");
                if self.line_width(&candidate, font_size) <= max_width {
                    current = candidate;
                } else {
                    lines.push(std::mem::replace(&mut current, piece));
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }

        let max_lines = ((max_height / line_height).floor() as usize).max(1);
        lines.truncate(max_lines);

        TextBlock { lines, line_height }
    }

    /// Breaks `word` into the longest runs of characters that fit `max_width`.
    fn split_word(&self, word: &str, font_size: f32, max_width: f32) -> Vec<String> {
        if self.line_width(word, font_size) <= max_width {
            return vec![word.to_string()];
        }

        let mut pieces = Vec::new();
        let mut piece = String::new();
        for ch in word.chars() {
            piece.push(ch);
            if piece.chars().count() > 1 && self.line_width(&piece, font_size) > max_width {
                piece.pop();
                pieces.push(std::mem::replace(&mut piece, ch.to_string()));
            }
        }
        if !piece.is_empty() {
            pieces.push(piece);
        }
        pieces
    }

    /// Draws the lines of `block` centered in `layout.text_box` on a
    /// transparent canvas of the icon's size.
    ///
    /// Fails for empty canvases or when usvg rejects the document.
    pub fn render(
        &self,
        block: &TextBlock,
        layout: &BannerLayout,
        width: u32,
        height: u32,
        color: BannerColor,
    ) -> Result<RgbaImage> {
        let svg = self.text_svg(block, layout, width, height, color);
        let tree =
            Tree::from_str(&svg, &self.options).map_err(|e| Error::TextRender(e.to_string()))?;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| Error::TextRender(format!("invalid canvas size {width}x{height}")))?;
        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());
        pixmap_to_rgba_image(&pixmap)
            .ok_or_else(|| Error::TextRender("pixmap does not match canvas size".into()))
    }

    fn text_svg(
        &self,
        block: &TextBlock,
        layout: &BannerLayout,
        width: u32,
        height: u32,
        color: BannerColor,
    ) -> String {
        let center_x = layout.text_box.x as f32 + layout.text_box.width as f32 / 2.0;
        let top = layout.text_box.y as f32;

        let mut svg = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}"><text font-family="{family}" font-size="{size}" fill="{paint}" fill-opacity="{opacity}" text-anchor="middle">"#,
            family = escape_xml(&self.family),
            size = layout.font_size,
            paint = color.svg_paint(),
            opacity = color.opacity(),
        );
        for (index, line) in block.lines.iter().enumerate() {
            let baseline = top + index as f32 * block.line_height + layout.font_size * ASCENT;
            let _ = write!(
                svg,
                r#"<tspan x="{center_x}" y="{baseline}">{}</tspan>"#,
                escape_xml(line)
            );
        }
        svg.push_str("</text></svg>");
        svg
    }
}

/// Points `sans-serif` and `serif` at installed faces when they do not
/// resolve.
fn map_generic_families(db: &mut fontdb::Database) {
    if !resolves(db, Family::SansSerif) {
        if let Some(name) = fallback_family(db, SANS_SERIF_FALLBACKS) {
            debug!("using `{name}' for sans-serif");
            db.set_sans_serif_family(name);
        }
    }
    if !resolves(db, Family::Serif) {
        if let Some(name) = fallback_family(db, SERIF_FALLBACKS) {
            debug!("using `{name}' for serif");
            db.set_serif_family(name);
        }
    }
}

fn resolves(db: &fontdb::Database, family: Family<'_>) -> bool {
    let query = Query {
        families: &[family],
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };
    db.query(&query).is_some()
}

/// The first installed family from `preferred`, else any installed family.
fn fallback_family(db: &fontdb::Database, preferred: &[&str]) -> Option<String> {
    let installed = |name: &str| {
        db.faces()
            .any(|face| face.families.iter().any(|(family, _)| family == name))
    };
    preferred
        .iter()
        .copied()
        .find(|name| installed(name))
        .map(str::to_string)
        .or_else(|| {
            db.faces()
                .find_map(|face| face.families.first().map(|(family, _)| family.clone()))
        })
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
