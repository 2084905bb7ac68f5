//! Command-line front end.
//!
//! Typical Xcode run script phase:
//!
//! ```sh
//! icon-versioner \
//!     --info-plist-path "${INFOPLIST_FILE}" \
//!     --app-icons-path '${SRCROOT}/Resources/Images.xcassets/${ASSETCATALOG_COMPILER_APPICON_NAME}.appiconset' \
//!     --override-show-version "${SHOW_VERSION_ON_ICON}"
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use icon_versioner::{BannerColor, Mode, Options, Pipeline, parse_flag};
use log::{debug, error};

/// Exit status for any fatal error.
const FAILURE_STATUS: u8 = 132;

/// Draws the app version onto launcher icons of development builds and
/// restores the original icons otherwise.
#[derive(Debug, Parser)]
#[command(name = "icon-versioner", version)]
struct Cli {
    /// JSON file with options; flags given here take precedence.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Project layout to process.
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// YES to always draw the version, NO to never draw it; unset uses the
    /// bundle identifier rule (iOS only).
    #[arg(long, value_parser = parse_flag)]
    override_show_version: Option<bool>,

    /// [iOS] Path to the project's Info.plist.
    #[arg(long)]
    info_plist_path: Option<String>,

    /// [iOS] Regular expression matching development bundle identifiers.
    #[arg(long)]
    dev_bundle_regexp: Option<String>,

    /// [iOS] YES draws CFBundleShortVersionString, NO draws CFBundleVersion.
    #[arg(long, value_parser = parse_flag)]
    use_short_version: Option<bool>,

    /// [iOS] Directory containing the app icons (e.g. an .appiconset).
    #[arg(long)]
    app_icons_path: Option<String>,

    /// [Android] Version string to draw.
    #[arg(long)]
    application_version: Option<String>,

    /// [Android] Deprecated, use --override-show-version.
    #[arg(long, value_parser = parse_flag, hide = true)]
    need_version_info: Option<bool>,

    /// [Android] Root resources directory.
    #[arg(long)]
    resources_path: Option<String>,

    /// [Android] Prefix of resource subdirectories holding launcher icons.
    #[arg(long)]
    icon_directory_prefix: Option<String>,

    /// [Android] Launcher icon filename.
    #[arg(long)]
    icon_filename: Option<String>,

    /// Filename prefix for backed up original icons.
    #[arg(long)]
    original_icon_prefix: Option<String>,

    /// Filename suffix for backed up original icons, appended after the extension.
    #[arg(long)]
    original_icon_suffix: Option<String>,

    /// Banner color as RRGGBB or AARRGGBB, where AA is the transparency.
    #[arg(long)]
    version_background_color: Option<BannerColor>,

    /// Text color as RRGGBB or AARRGGBB, where AA is the transparency.
    #[arg(long)]
    version_text_color: Option<BannerColor>,

    /// Font family for the version text.
    #[arg(long)]
    font_family: Option<String>,

    /// Additional font file to load.
    #[arg(long)]
    font_file: Option<PathBuf>,
}

impl Cli {
    /// Layers the flags over the config file (or the defaults).
    fn into_options(self) -> icon_versioner::Result<Options> {
        let mut options = match &self.config {
            Some(path) => Options::from_file(path)?,
            None => Options::default(),
        };

        fn set<T>(target: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *target = value;
            }
        }
        set(&mut options.mode, self.mode);
        set(&mut options.info_plist_path, self.info_plist_path);
        set(&mut options.dev_bundle_regexp, self.dev_bundle_regexp);
        set(&mut options.use_short_version, self.use_short_version);
        set(&mut options.app_icons_path, self.app_icons_path);
        set(&mut options.resources_path, self.resources_path);
        set(&mut options.icon_directory_prefix, self.icon_directory_prefix);
        set(&mut options.icon_filename, self.icon_filename);
        set(&mut options.original_icon_prefix, self.original_icon_prefix);
        set(&mut options.original_icon_suffix, self.original_icon_suffix);
        set(&mut options.version_background_color, self.version_background_color);
        set(&mut options.version_text_color, self.version_text_color);
        set(&mut options.font_family, self.font_family);

        // Optional settings: a flag replaces the configured value only when given.
        set(&mut options.override_show_version, self.override_show_version.map(Some));
        set(&mut options.application_version, self.application_version.map(Some));
        set(&mut options.need_version_info, self.need_version_info.map(Some));
        set(&mut options.font_file, self.font_file.map(Some));

        options.expand_from_env()?;
        Ok(options)
    }
}

fn run(cli: Cli) -> icon_versioner::Result<()> {
    let options = cli.into_options()?;
    debug!("options: {options:?}");

    let report = Pipeline::from_options(&options)?.run()?;
    debug!("processed {} icon(s)", report.icons.len());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("fatal error: {err}");
            let program = std::env::args().next().unwrap_or_else(|| "icon-versioner".into());
            eprintln!("Usage: {program} [OPTIONS]");
            eprintln!("For a complete list of options use `--help'.");
            ExitCode::from(FAILURE_STATUS)
        }
    }
}
