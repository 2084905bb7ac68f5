//! Deciding whether the version banner is shown.
//!
//! The decision is made once per run from the override flag and the
//! platform context, then applied to every icon.
//!
//! Precedence:
//!
//! 1. `overrideShowVersion = false` always disables, without touching any
//!    platform metadata.
//! 2. `overrideShowVersion = true` enables with the platform's version
//!    label, which must be present.
//! 3. Otherwise the platform decides. iOS matches the bundle identifier
//!    against the development bundle pattern; Android has no implicit
//!    rule and reports the missing override.

use regex::Regex;

use crate::error::{Error, Result};
use crate::options::keys;

/// Manifest keys consulted on iOS.
pub mod manifest_keys {
    pub const SHORT_VERSION: &str = "CFBundleShortVersionString";
    pub const VERSION: &str = "CFBundleVersion";
    pub const BUNDLE_IDENTIFIER: &str = "CFBundleIdentifier";
    pub const ICON_FILES: &str = "CFBundleIconFiles";
}

// ============================================================================
// VersionDecision
// ============================================================================

/// Outcome of version resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionDecision {
    /// No banner; stamped icons are restored from their backups.
    Disabled,
    /// Stamp the given label.
    Enabled(String),
}

impl VersionDecision {
    /// Returns the label when enabled.
    pub fn label(&self) -> Option<&str> {
        match self {
            Self::Disabled => None,
            Self::Enabled(label) => Some(label),
        }
    }
}

// ============================================================================
// Platform contexts
// ============================================================================

/// Version inputs read from an iOS manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleContext {
    pub bundle_identifier: Option<String>,
    pub short_version: Option<String>,
    pub full_version: Option<String>,
    pub use_short_version: bool,
    /// Pattern identifying development bundle identifiers.
    pub dev_bundle_regexp: String,
}

impl BundleContext {
    /// The version string selected by [`use_short_version`](Self::use_short_version).
    pub fn version(&self) -> Result<&str> {
        let (key, value) = if self.use_short_version {
            (manifest_keys::SHORT_VERSION, &self.short_version)
        } else {
            (manifest_keys::VERSION, &self.full_version)
        };
        non_empty(value)
            .ok_or_else(|| Error::cannot_read("Info.plist", Some(&format!("{key} is missing"))))
    }

    fn is_development_bundle(&self) -> Result<bool> {
        if self.dev_bundle_regexp.is_empty() {
            return Err(Error::RequiredOptionMissing(keys::DEV_BUNDLE_REGEXP));
        }
        let pattern = Regex::new(&self.dev_bundle_regexp)?;

        let bundle_id = non_empty(&self.bundle_identifier).ok_or_else(|| {
            Error::cannot_read(
                "Info.plist",
                Some(&format!("{} is missing", manifest_keys::BUNDLE_IDENTIFIER)),
            )
        })?;
        Ok(pattern.is_match(bundle_id))
    }
}

/// Version inputs for Android, taken from options only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AndroidContext {
    pub application_version: Option<String>,
    /// The deprecated visibility flag, kept to report a migration error.
    pub need_version_info: Option<bool>,
}

/// Platform-specific inputs to [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformContext {
    Ios(BundleContext),
    Android(AndroidContext),
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolves the version decision.
///
/// `context` is only invoked when the override does not already disable
/// the banner, so an explicit `false` never needs readable metadata.
pub fn resolve(
    override_show_version: Option<bool>,
    context: impl FnOnce() -> Result<PlatformContext>,
) -> Result<VersionDecision> {
    if override_show_version == Some(false) {
        return Ok(VersionDecision::Disabled);
    }

    match context()? {
        PlatformContext::Ios(bundle) => resolve_ios(override_show_version, &bundle),
        PlatformContext::Android(android) => resolve_android(override_show_version, &android),
    }
}

fn resolve_ios(override_show_version: Option<bool>, bundle: &BundleContext) -> Result<VersionDecision> {
    let version = bundle.version()?;
    match override_show_version {
        Some(true) => return Ok(VersionDecision::Enabled(version.to_string())),
        Some(false) => return Ok(VersionDecision::Disabled),
        None => {}
    }

    if bundle.is_development_bundle()? {
        Ok(VersionDecision::Enabled(version.to_string()))
    } else {
        Ok(VersionDecision::Disabled)
    }
}

fn resolve_android(
    override_show_version: Option<bool>,
    android: &AndroidContext,
) -> Result<VersionDecision> {
    if android.need_version_info.is_some() {
        return Err(Error::OptionDeprecated {
            option: keys::NEED_VERSION_INFO,
            replacement: keys::OVERRIDE_SHOW_VERSION,
        });
    }
    let Some(show_version) = override_show_version else {
        return Err(Error::RequiredOptionMissing(keys::OVERRIDE_SHOW_VERSION));
    };
    let version = non_empty(&android.application_version)
        .ok_or(Error::RequiredOptionMissing(keys::APPLICATION_VERSION))?;

    if show_version {
        Ok(VersionDecision::Enabled(version.to_string()))
    } else {
        Ok(VersionDecision::Disabled)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
