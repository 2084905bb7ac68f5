//! One run of the tool: resolve the version, then stamp or restore every
//! discovered icon.

use std::path::PathBuf;

use log::info;

use crate::error::Result;
use crate::icon::{BackupNaming, IconFile};
use crate::options::Options;
use crate::platform::{self, IconSource};
use crate::render::{BannerRenderer, BannerStyle};
use crate::version::VersionDecision;

/// What a successful run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub decision: VersionDecision,
    /// Working icon paths, in processing order.
    pub icons: Vec<PathBuf>,
}

/// Applies one version decision to all icons of a project.
///
/// Icons are processed one at a time in discovery order. The first error
/// stops the run; icons already processed keep their new state.
pub struct Pipeline {
    source: Box<dyn IconSource>,
    naming: BackupNaming,
    style: BannerStyle,
    override_show_version: Option<bool>,
}

impl Pipeline {
    /// Builds a pipeline from validated options.
    pub fn from_options(options: &Options) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            source: platform::for_options(options),
            naming: BackupNaming::from_options(options)?,
            style: BannerStyle::from_options(options),
            override_show_version: options.override_show_version,
        })
    }

    /// Builds a pipeline around a custom icon source.
    pub fn new(
        source: Box<dyn IconSource>,
        naming: BackupNaming,
        style: BannerStyle,
        override_show_version: Option<bool>,
    ) -> Self {
        Self {
            source,
            naming,
            style,
            override_show_version,
        }
    }

    pub fn run(&self) -> Result<RunReport> {
        let decision = self.source.resolve_version(self.override_show_version)?;
        match &decision {
            VersionDecision::Enabled(label) => info!("stamping version `{label}'"),
            VersionDecision::Disabled => info!("version banner disabled, restoring originals"),
        }

        let icons = self.source.discover_icons()?;
        match &decision {
            VersionDecision::Enabled(label) => {
                // Fonts are only loaded when something will be drawn.
                let renderer = BannerRenderer::new(self.style.clone())?;
                for path in &icons {
                    IconFile::new(path.clone(), &self.naming).render(label, &renderer)?;
                    info!("stamped {}", path.display());
                }
            }
            VersionDecision::Disabled => {
                for path in &icons {
                    IconFile::new(path.clone(), &self.naming).restore()?;
                    info!("restored {}", path.display());
                }
            }
        }

        Ok(RunReport { decision, icons })
    }
}
