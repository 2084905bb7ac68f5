//! Android projects: one launcher icon per density directory under `res/`.
//! Nothing is read from the project for the version; it comes from options.

use std::fs;
use std::path::PathBuf;

use log::debug;

use super::{IconSource, is_writable_dir};
use crate::error::{Error, Result};
use crate::options::{Options, keys};
use crate::version::{AndroidContext, PlatformContext};

/// Icon source for Android resource trees.
#[derive(Debug, Clone)]
pub struct AndroidSource {
    pub resources_path: PathBuf,
    /// Only directories whose name starts with this are searched.
    pub icon_directory_prefix: String,
    pub icon_filename: String,
    pub application_version: Option<String>,
    pub need_version_info: Option<bool>,
}

impl AndroidSource {
    pub fn from_options(options: &Options) -> Self {
        Self {
            resources_path: PathBuf::from(&options.resources_path),
            icon_directory_prefix: options.icon_directory_prefix.clone(),
            icon_filename: options.icon_filename.clone(),
            application_version: options.application_version.clone(),
            need_version_info: options.need_version_info,
        }
    }
}

impl IconSource for AndroidSource {
    /// Scans the immediate children of the resources directory.
    ///
    /// The icon file itself is not checked here; a missing icon is
    /// reported when that icon is processed.
    fn discover_icons(&self) -> Result<Vec<PathBuf>> {
        if self.resources_path.as_os_str().is_empty() {
            return Err(Error::RequiredOptionMissing(keys::RESOURCES_PATH));
        }
        let entries = fs::read_dir(&self.resources_path).map_err(|e| {
            Error::cannot_read(
                &self.resources_path.display().to_string(),
                Some(&e.to_string()),
            )
        })?;

        let mut dirs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let matches_prefix = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with(&self.icon_directory_prefix));
            if matches_prefix && is_writable_dir(&path) {
                dirs.push(path);
            }
        }
        dirs.sort();
        debug!(
            "found {} icon director{} in {}",
            dirs.len(),
            if dirs.len() == 1 { "y" } else { "ies" },
            self.resources_path.display()
        );

        Ok(dirs
            .into_iter()
            .map(|dir| dir.join(&self.icon_filename))
            .collect())
    }

    fn version_context(&self) -> Result<PlatformContext> {
        Ok(PlatformContext::Android(AndroidContext {
            application_version: self.application_version.clone(),
            need_version_info: self.need_version_info,
        }))
    }
}
