//! iOS projects: icons live in an asset catalog directory, the version and
//! bundle identifier come from `Info.plist`.

use std::path::{Path, PathBuf};

use log::debug;

use super::manifest::{self, Manifest};
use super::{IconSource, is_writable_dir};
use crate::error::{Error, Result};
use crate::options::{Options, expand_vars, keys};
use crate::version::{BundleContext, PlatformContext, manifest_keys};

/// Icon source for iOS project layouts.
#[derive(Debug, Clone)]
pub struct IosSource {
    pub info_plist_path: String,
    pub app_icons_path: String,
    pub dev_bundle_regexp: String,
    pub use_short_version: bool,
}

impl IosSource {
    pub fn from_options(options: &Options) -> Self {
        Self {
            info_plist_path: options.info_plist_path.clone(),
            app_icons_path: options.app_icons_path.clone(),
            dev_bundle_regexp: options.dev_bundle_regexp.clone(),
            use_short_version: options.use_short_version,
        }
    }

    fn manifest(&self) -> Result<Manifest> {
        if self.info_plist_path.is_empty() {
            return Err(Error::RequiredOptionMissing(keys::INFO_PLIST_PATH));
        }
        Manifest::from_file(Path::new(&self.info_plist_path))
    }

    fn icons_dir(&self) -> Result<PathBuf> {
        if self.app_icons_path.is_empty() {
            return Err(Error::RequiredOptionMissing(keys::APP_ICONS_PATH));
        }
        let dir = PathBuf::from(&self.app_icons_path);
        if !is_writable_dir(&dir) {
            return Err(Error::RequiredOptionInvalid {
                option: keys::APP_ICONS_PATH,
                value: self.app_icons_path.clone(),
            });
        }
        Ok(dir)
    }
}

impl IconSource for IosSource {
    /// Uses `CFBundleIconFiles` when the manifest lists icons, and the
    /// catalog's `Contents.json` otherwise.
    fn discover_icons(&self) -> Result<Vec<PathBuf>> {
        let dir = self.icons_dir()?;
        let manifest = self.manifest()?;

        let filenames = match manifest.string_list(manifest_keys::ICON_FILES) {
            Some(files) => {
                debug!("using {} icon(s) listed in Info.plist", files.len());
                files
            }
            None => manifest::read_catalog(&dir.join("Contents.json"))?,
        };

        Ok(filenames.into_iter().map(|name| dir.join(name)).collect())
    }

    fn version_context(&self) -> Result<PlatformContext> {
        let manifest = self.manifest()?;
        let read = |key: &str| -> Result<Option<String>> {
            manifest
                .string(key)
                .map(|value| expand_vars(value, |name| std::env::var(name).ok()))
                .transpose()
        };

        Ok(PlatformContext::Ios(BundleContext {
            bundle_identifier: read(manifest_keys::BUNDLE_IDENTIFIER)?,
            short_version: read(manifest_keys::SHORT_VERSION)?,
            full_version: read(manifest_keys::VERSION)?,
            use_short_version: self.use_short_version,
            dev_bundle_regexp: self.dev_bundle_regexp.clone(),
        }))
    }
}
