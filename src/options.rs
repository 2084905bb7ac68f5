//! Run configuration.
//!
//! [`Options`] holds every setting the tool understands, each with a
//! default. It can be deserialized from a JSON config file; the command
//! line front end layers its flags on top.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "mode": "android",
//!   "overrideShowVersion": true,
//!   "applicationVersion": "2.4.0",
//!   "resourcesPath": "app/src/main/res",
//!   "versionBackgroundColor": "40000000"
//! }
//! ```

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::color::BannerColor;
use crate::error::{Error, Result};

/// Configuration keys, as used in config files and error messages.
pub mod keys {
    pub const OVERRIDE_SHOW_VERSION: &str = "overrideShowVersion";
    pub const INFO_PLIST_PATH: &str = "infoPlistPath";
    pub const DEV_BUNDLE_REGEXP: &str = "devBundleRegexp";
    pub const APP_ICONS_PATH: &str = "appIconsPath";
    pub const APPLICATION_VERSION: &str = "applicationVersion";
    pub const NEED_VERSION_INFO: &str = "needVersionInfo";
    pub const RESOURCES_PATH: &str = "resourcesPath";
    pub const ORIGINAL_ICON_SUFFIX: &str = "originalIconSuffix";
    pub const VERSION_BACKGROUND_COLOR: &str = "versionBackgroundColor";
    pub const VERSION_TEXT_COLOR: &str = "versionTextColor";
}

// ============================================================================
// Mode
// ============================================================================

/// Which project layout to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Ios,
    Android,
}

// ============================================================================
// Options
// ============================================================================

/// All settings for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    pub mode: Mode,

    /// `Some(true)` always stamps, `Some(false)` always restores, `None`
    /// falls back to the platform rule.
    pub override_show_version: Option<bool>,

    // iOS
    pub info_plist_path: String,
    pub dev_bundle_regexp: String,
    /// Stamp `CFBundleShortVersionString` instead of `CFBundleVersion`.
    pub use_short_version: bool,
    /// Directory holding the icons, usually an `.appiconset`.
    pub app_icons_path: String,

    // Android
    pub application_version: Option<String>,
    /// Replaced by `overrideShowVersion`; setting it is an error.
    pub need_version_info: Option<bool>,
    pub resources_path: String,
    pub icon_directory_prefix: String,
    pub icon_filename: String,

    // Drawing
    pub original_icon_prefix: String,
    /// Appended after the whole filename, extension included.
    pub original_icon_suffix: String,
    pub version_background_color: BannerColor,
    pub version_text_color: BannerColor,
    pub font_family: String,
    pub font_file: Option<PathBuf>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            mode: Mode::Ios,
            override_show_version: None,
            info_plist_path: "${SRCROOT}/${TARGET_NAME}/Supporting Files/Info.plist".into(),
            dev_bundle_regexp: r"\.debug$".into(),
            use_short_version: true,
            app_icons_path: "${SRCROOT}/${TARGET_NAME}/Resources/Assets.xcassets/${ASSETCATALOG_COMPILER_APPICON_NAME}.appiconset".into(),
            application_version: None,
            need_version_info: None,
            resources_path: "./res".into(),
            icon_directory_prefix: "mipmap-".into(),
            icon_filename: "ic_launcher.png".into(),
            original_icon_prefix: String::new(),
            original_icon_suffix: "-orig".into(),
            version_background_color: BannerColor::DEFAULT_BACKGROUND,
            version_text_color: BannerColor::DEFAULT_FOREGROUND,
            font_family: "sans-serif".into(),
            font_file: None,
        }
    }
}

impl Options {
    /// Deserializes options from a JSON string; missing keys keep defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads options from a JSON config file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::cannot_read(&path.display().to_string(), Some(&e.to_string())))?;
        Self::from_json(&json)
            .map_err(|e| Error::cannot_read(&path.display().to_string(), Some(&e.to_string())))
    }

    /// Checks cross-field rules that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.original_icon_prefix.is_empty() && self.original_icon_suffix.is_empty() {
            return Err(Error::RequiredOptionInvalid {
                option: keys::ORIGINAL_ICON_SUFFIX,
                value: String::new(),
            });
        }
        Ok(())
    }

    /// Expands environment variables in every path-like and text option.
    pub fn expand_from_env(&mut self) -> Result<()> {
        let lookup = |name: &str| std::env::var(name).ok();

        for value in [
            &mut self.info_plist_path,
            &mut self.app_icons_path,
            &mut self.resources_path,
            &mut self.icon_directory_prefix,
            &mut self.icon_filename,
            &mut self.original_icon_prefix,
            &mut self.original_icon_suffix,
        ] {
            *value = expand_vars(value, lookup)?;
        }
        if let Some(version) = self.application_version.as_mut() {
            *version = expand_vars(version, lookup)?;
        }
        Ok(())
    }
}

// ============================================================================
// Flag parsing
// ============================================================================

/// Parses the boolean spellings build scripts use: `YES`/`NO`,
/// `true`/`false` and `1`/`0`, case-insensitively.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Ok(true),
        "no" | "false" | "0" => Ok(false),
        other => Err(format!("expected YES or NO, got `{other}'")),
    }
}

// ============================================================================
// Variable expansion
// ============================================================================

const MAX_EXPANSION_DEPTH: usize = 100;

static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$(?:\{([a-z_][a-z0-9_]*)\}|\(([a-z_][a-z0-9_]*)\)|([a-z_][a-z0-9_]*))")
        .expect("variable pattern is valid")
});

/// Expands `$VAR`, `${VAR}` and `$(VAR)` references.
///
/// Unknown variables expand to the empty string. Expansion repeats until
/// nothing is left to replace, so values may refer to other variables.
pub fn expand_vars(input: &str, lookup: impl Fn(&str) -> Option<String>) -> Result<String> {
    let mut current = input.to_string();
    for _ in 0..MAX_EXPANSION_DEPTH {
        if !VARIABLE.is_match(&current) {
            return Ok(current);
        }
        current = VARIABLE
            .replace_all(&current, |caps: &Captures<'_>| {
                let name = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .or_else(|| caps.get(3))
                    .map_or("", |m| m.as_str());
                lookup(name).unwrap_or_default()
            })
            .into_owned();
    }
    Err(Error::ExpansionTooDeep(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn expands_all_three_syntaxes() {
        let lookup = env(&[("SRCROOT", "/src"), ("TARGET_NAME", "App"), ("V", "1.0")]);
        assert_eq!(
            expand_vars("${SRCROOT}/$(TARGET_NAME)/$V", &lookup).unwrap(),
            "/src/App/1.0"
        );
    }

    #[test]
    fn unknown_variables_become_empty() {
        let lookup = env(&[]);
        assert_eq!(expand_vars("a${MISSING}b", &lookup).unwrap(), "ab");
    }

    #[test]
    fn expansion_is_recursive() {
        let lookup = env(&[("OUTER", "$(INNER)-x"), ("INNER", "in")]);
        assert_eq!(expand_vars("${OUTER}", &lookup).unwrap(), "in-x");
    }

    #[test]
    fn self_reference_is_rejected() {
        let lookup = env(&[("LOOP", "$LOOP")]);
        assert!(matches!(
            expand_vars("$LOOP", &lookup),
            Err(Error::ExpansionTooDeep(_))
        ));
    }

    #[test]
    fn plain_text_is_untouched() {
        let lookup = env(&[]);
        assert_eq!(expand_vars("ic_launcher.png", &lookup).unwrap(), "ic_launcher.png");
    }

    #[test]
    fn parses_flag_spellings() {
        assert_eq!(parse_flag("YES"), Ok(true));
        assert_eq!(parse_flag("no"), Ok(false));
        assert_eq!(parse_flag("1"), Ok(true));
        assert_eq!(parse_flag("False"), Ok(false));
        assert!(parse_flag("maybe").is_err());
    }

    #[test]
    fn json_keeps_defaults_for_missing_keys() {
        let options = Options::from_json(
            r#"{ "mode": "android", "overrideShowVersion": true, "versionTextColor": "000000" }"#,
        )
        .unwrap();

        assert_eq!(options.mode, Mode::Android);
        assert_eq!(options.override_show_version, Some(true));
        assert_eq!(options.version_text_color.rgba(), [0, 0, 0, 255]);
        assert_eq!(options.icon_filename, "ic_launcher.png");
        assert_eq!(options.original_icon_suffix, "-orig");
        assert!(options.use_short_version);
    }

    #[test]
    fn empty_json_is_default() {
        assert_eq!(Options::from_json("{}").unwrap(), Options::default());
    }

    #[test]
    fn validate_rejects_empty_backup_affixes() {
        let options = Options {
            original_icon_suffix: String::new(),
            ..Options::default()
        };
        assert!(matches!(
            options.validate(),
            Err(Error::RequiredOptionInvalid { option: keys::ORIGINAL_ICON_SUFFIX, .. })
        ));
        assert!(Options::default().validate().is_ok());
    }
}
