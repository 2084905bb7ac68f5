//! Rendering of the version banner onto icon bitmaps.
//!
//! [`BannerRenderer`] ties the pieces together: [`layout`] computes where
//! the band and the text go, [`text`] wraps and rasterises the label with
//! resvg, and [`composite`] blends everything over the original pixels.

pub mod banner;
pub mod composite;
pub mod layout;
pub mod text;

pub use banner::{BannerRenderer, BannerStyle};
pub use layout::{BannerLayout, RectPx};
pub use text::{TextBlock, TextEngine};
