//! icon-versioner: stamps the app version onto launcher icons.
//!
//! Run as a build step, it decides whether the current build should show
//! its version on the icon and then either draws a banner with the version
//! onto every icon or puts the original icons back. Originals are kept
//! next to each icon, so every run starts again from pristine pixels and
//! repeated runs give identical files.
//!
//! iOS projects decide from the bundle identifier (development bundles get
//! a banner); Android projects state it explicitly.
//!
//! # Example
//!
//! ```no_run
//! use icon_versioner::{Mode, Options, Pipeline};
//!
//! let options = Options {
//!     mode: Mode::Android,
//!     override_show_version: Some(true),
//!     application_version: Some("2.4.0".into()),
//!     resources_path: "app/src/main/res".into(),
//!     ..Options::default()
//! };
//!
//! let report = Pipeline::from_options(&options)?.run()?;
//! println!("processed {} icons", report.icons.len());
//! # Ok::<(), icon_versioner::Error>(())
//! ```

mod color;
mod error;
mod icon;
mod options;
mod pipeline;
pub mod platform;
pub mod render;
mod version;

pub use color::{BannerColor, ParseColorError};
pub use error::{Error, Result};
pub use icon::{BackupNaming, IconFile};
pub use options::{Mode, Options, expand_vars, keys, parse_flag};
pub use pipeline::{Pipeline, RunReport};
pub use platform::{AndroidSource, IconSource, IosSource, Manifest};
pub use render::{BannerLayout, BannerRenderer, BannerStyle, RectPx};
pub use version::{
    AndroidContext, BundleContext, PlatformContext, VersionDecision, manifest_keys, resolve,
};
