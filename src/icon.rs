//! Working icons and their backups.
//!
//! Every icon the build ships (the *working* file) gets a sibling *backup*
//! holding the untouched original. Once the backup exists it is the only
//! source of truth: the working file is always regenerated from it, by
//! copying to restore or by rendering to stamp, and the backup itself is
//! never rewritten or deleted.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use log::debug;

use crate::error::{Error, Result};
use crate::options::{Options, keys};
use crate::render::BannerRenderer;

// ============================================================================
// BackupNaming
// ============================================================================

/// How backup filenames are derived: `prefix + filename + suffix`, in the
/// working file's directory. The suffix goes after the extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupNaming {
    prefix: String,
    suffix: String,
}

impl BackupNaming {
    /// Fails when both affixes are empty, since the backup would then be
    /// the working file itself.
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Result<Self> {
        let prefix = prefix.into();
        let suffix = suffix.into();
        if prefix.is_empty() && suffix.is_empty() {
            return Err(Error::RequiredOptionInvalid {
                option: keys::ORIGINAL_ICON_SUFFIX,
                value: suffix,
            });
        }
        Ok(Self { prefix, suffix })
    }

    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(&options.original_icon_prefix, &options.original_icon_suffix)
    }

    /// Returns the backup path for a working icon path.
    pub fn backup_path(&self, working: &Path) -> PathBuf {
        let name = working
            .file_name()
            .map(|name| name.to_string_lossy())
            .unwrap_or_default();
        working.with_file_name(format!("{}{name}{}", self.prefix, self.suffix))
    }
}

// ============================================================================
// IconFile
// ============================================================================

/// A working icon path paired with its backup path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconFile {
    working: PathBuf,
    backup: PathBuf,
}

impl IconFile {
    pub fn new(working: impl Into<PathBuf>, naming: &BackupNaming) -> Self {
        let working = working.into();
        let backup = naming.backup_path(&working);
        Self { working, backup }
    }

    pub fn working_path(&self) -> &Path {
        &self.working
    }

    pub fn backup_path(&self) -> &Path {
        &self.backup
    }

    /// Moves the working file to the backup location unless a backup
    /// already exists.
    pub fn ensure_backup(&self) -> Result<()> {
        if self.backup.is_file() {
            return Ok(());
        }
        self.require_working()?;
        fs::rename(&self.working, &self.backup)?;
        debug!("moved {} to {}", self.working.display(), self.backup.display());
        Ok(())
    }

    /// Copies the working file to the backup location unless a backup
    /// already exists. The working file is left in place.
    pub fn ensure_backup_copy(&self) -> Result<()> {
        if self.backup.is_file() {
            return Ok(());
        }
        self.require_working()?;
        fs::copy(&self.working, &self.backup)?;
        debug!("backed up {} to {}", self.working.display(), self.backup.display());
        Ok(())
    }

    /// Replaces the working file with a copy of the backup.
    pub fn restore(&self) -> Result<()> {
        self.ensure_backup_copy()?;
        remove_if_present(&self.working)?;
        fs::copy(&self.backup, &self.working)?;
        Ok(())
    }

    /// Rewrites the working file as the backup with `label` stamped on it.
    pub fn render(&self, label: &str, renderer: &BannerRenderer) -> Result<()> {
        self.ensure_backup_copy()?;

        let bytes = fs::read(&self.backup)?;
        let original = image::load_from_memory(&bytes)
            .map_err(|source| Error::ImageDecode {
                path: self.backup.clone(),
                source,
            })?
            .to_rgba8();

        let stamped = renderer.render(&original, label)?;

        let mut encoded = std::io::Cursor::new(Vec::new());
        stamped
            .write_to(&mut encoded, ImageFormat::Png)
            .map_err(|source| Error::ImageEncode {
                path: self.working.clone(),
                source,
            })?;
        fs::write(&self.working, encoded.into_inner())?;
        Ok(())
    }

    fn require_working(&self) -> Result<()> {
        if self.working.is_file() {
            Ok(())
        } else {
            Err(Error::FileMissing(self.working.clone()))
        }
    }
}

fn remove_if_present(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::BannerStyle;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn naming() -> BackupNaming {
        BackupNaming::new("", "-orig").unwrap()
    }

    fn write_icon(path: &Path, color: [u8; 4]) {
        RgbaImage::from_pixel(48, 48, Rgba(color)).save(path).unwrap();
    }

    fn renderer() -> BannerRenderer {
        BannerRenderer::new(BannerStyle::default()).unwrap()
    }

    #[test]
    fn backup_path_wraps_whole_filename() {
        let naming = BackupNaming::new("orig-", ".bak").unwrap();
        assert_eq!(
            naming.backup_path(Path::new("/res/mipmap-hdpi/ic_launcher.png")),
            PathBuf::from("/res/mipmap-hdpi/orig-ic_launcher.png.bak")
        );
    }

    #[test]
    fn backup_paths_are_distinct_per_icon() {
        let naming = naming();
        let a = naming.backup_path(Path::new("/icons/a.png"));
        let b = naming.backup_path(Path::new("/icons/b.png"));
        assert_ne!(a, b);
        assert_ne!(a, PathBuf::from("/icons/a.png"));
    }

    #[test]
    fn empty_affixes_are_rejected() {
        assert!(matches!(
            BackupNaming::new("", ""),
            Err(Error::RequiredOptionInvalid { .. })
        ));
    }

    #[test]
    fn ensure_backup_moves_once() {
        let dir = TempDir::new().unwrap();
        let icon = IconFile::new(dir.path().join("icon.png"), &naming());
        fs::write(icon.working_path(), b"pristine").unwrap();

        icon.ensure_backup().unwrap();
        assert!(!icon.working_path().exists());
        assert_eq!(fs::read(icon.backup_path()).unwrap(), b"pristine");

        fs::write(icon.working_path(), b"derived").unwrap();
        icon.ensure_backup().unwrap();
        assert_eq!(fs::read(icon.backup_path()).unwrap(), b"pristine");
    }

    #[test]
    fn ensure_backup_copy_keeps_working_file() {
        let dir = TempDir::new().unwrap();
        let icon = IconFile::new(dir.path().join("icon.png"), &naming());
        fs::write(icon.working_path(), b"pristine").unwrap();

        icon.ensure_backup_copy().unwrap();
        assert_eq!(fs::read(icon.working_path()).unwrap(), b"pristine");
        assert_eq!(fs::read(icon.backup_path()).unwrap(), b"pristine");
    }

    #[test]
    fn both_files_missing_is_file_missing() {
        let dir = TempDir::new().unwrap();
        let icon = IconFile::new(dir.path().join("icon.png"), &naming());

        assert!(matches!(icon.ensure_backup(), Err(Error::FileMissing(_))));
        assert!(matches!(icon.restore(), Err(Error::FileMissing(_))));
        assert!(matches!(icon.render("1.0", &renderer()), Err(Error::FileMissing(_))));
    }

    #[test]
    fn restore_works_from_backup_alone() {
        let dir = TempDir::new().unwrap();
        let icon = IconFile::new(dir.path().join("icon.png"), &naming());
        fs::write(icon.backup_path(), b"pristine").unwrap();

        icon.restore().unwrap();
        assert_eq!(fs::read(icon.working_path()).unwrap(), b"pristine");
    }

    #[test]
    fn restore_is_idempotent_and_never_touches_backup() {
        let dir = TempDir::new().unwrap();
        let icon = IconFile::new(dir.path().join("icon.png"), &naming());
        write_icon(icon.working_path(), [10, 20, 30, 255]);
        let pristine = fs::read(icon.working_path()).unwrap();

        icon.render("1.0", &renderer()).unwrap();
        assert_ne!(fs::read(icon.working_path()).unwrap(), pristine);

        icon.restore().unwrap();
        icon.restore().unwrap();
        assert_eq!(fs::read(icon.working_path()).unwrap(), pristine);
        assert_eq!(fs::read(icon.backup_path()).unwrap(), pristine);
    }

    #[test]
    fn render_is_repeatable() {
        let dir = TempDir::new().unwrap();
        let icon = IconFile::new(dir.path().join("icon.png"), &naming());
        write_icon(icon.working_path(), [250, 250, 250, 255]);
        let pristine = fs::read(icon.working_path()).unwrap();
        let renderer = renderer();

        icon.render("1.2.3", &renderer).unwrap();
        let first = fs::read(icon.working_path()).unwrap();
        icon.render("1.2.3", &renderer).unwrap();

        assert_eq!(fs::read(icon.working_path()).unwrap(), first);
        assert_eq!(fs::read(icon.backup_path()).unwrap(), pristine);

        let stamped = image::open(icon.working_path()).unwrap();
        assert_eq!((stamped.width(), stamped.height()), (48, 48));
    }

    #[test]
    fn undecodable_backup_is_reported() {
        let dir = TempDir::new().unwrap();
        let icon = IconFile::new(dir.path().join("icon.png"), &naming());
        fs::write(icon.working_path(), b"definitely not a png").unwrap();

        assert!(matches!(
            icon.render("1.0", &renderer()),
            Err(Error::ImageDecode { .. })
        ));
    }
}
