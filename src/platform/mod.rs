//! Platform-specific icon discovery and version inputs.
//!
//! Each platform implements [`IconSource`]: it knows where a project keeps
//! its launcher icons and how to gather the inputs for version resolution.
//! The implementation is picked once per run from [`Mode`].

pub mod android;
pub mod ios;
pub mod manifest;

pub use android::AndroidSource;
pub use ios::IosSource;
pub use manifest::Manifest;

use std::path::PathBuf;

use crate::error::Result;
use crate::options::{Mode, Options};
use crate::version::{self, PlatformContext, VersionDecision};

/// What a project layout has to provide to the pipeline.
pub trait IconSource {
    /// Lists the working icon paths, in processing order.
    fn discover_icons(&self) -> Result<Vec<PathBuf>>;

    /// Gathers the platform inputs for version resolution.
    fn version_context(&self) -> Result<PlatformContext>;

    /// Resolves the version decision for this platform.
    ///
    /// The platform context is only gathered when the override does not
    /// already settle the decision.
    fn resolve_version(&self, override_show_version: Option<bool>) -> Result<VersionDecision> {
        version::resolve(override_show_version, || self.version_context())
    }
}

/// Creates the icon source selected by `options.mode`.
pub fn for_options(options: &Options) -> Box<dyn IconSource> {
    match options.mode {
        Mode::Ios => Box::new(IosSource::from_options(options)),
        Mode::Android => Box::new(AndroidSource::from_options(options)),
    }
}

/// Returns true if `path` is a directory that is not marked read-only.
///
/// This is a best-effort check on the permission bits: on Unix it only
/// rejects directories with every write bit cleared, so a directory owned
/// by another user can still pass. Real permission problems surface when
/// the first icon is written.
pub(crate) fn is_writable_dir(path: &std::path::Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.is_dir() && !meta.permissions().readonly())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn read_only_directory_is_rejected() {
        let dir = TempDir::new().unwrap();
        let icons = dir.path().join("mipmap-hdpi");
        fs::create_dir(&icons).unwrap();
        assert!(is_writable_dir(&icons));

        let mut permissions = fs::metadata(&icons).unwrap().permissions();
        permissions.set_readonly(true);
        fs::set_permissions(&icons, permissions.clone()).unwrap();
        assert!(!is_writable_dir(&icons));

        permissions.set_readonly(false);
        fs::set_permissions(&icons, permissions).unwrap();
    }

    #[test]
    fn files_and_missing_paths_are_not_directories() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("ic_launcher.png");
        fs::write(&file, b"png").unwrap();

        assert!(!is_writable_dir(&file));
        assert!(!is_writable_dir(&dir.path().join("missing")));
    }
}
