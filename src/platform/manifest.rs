//! Readers for iOS project metadata: the `Info.plist` manifest and the
//! asset catalog's `Contents.json`.

use std::path::Path;

use log::warn;
use serde_json::Value;

use crate::error::{Error, Result};

// ============================================================================
// Manifest
// ============================================================================

/// A flat, string-keyed view of a property list.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    entries: plist::Dictionary,
}

impl Manifest {
    /// Reads an XML or binary property list whose root is a dictionary.
    pub fn from_file(path: &Path) -> Result<Self> {
        let value = plist::Value::from_file(path)
            .map_err(|e| Error::cannot_read("Info.plist", Some(&e.to_string())))?;
        let entries = value.into_dictionary().ok_or_else(|| {
            Error::cannot_read("Info.plist", Some("root object is not a dictionary"))
        })?;
        Ok(Self { entries })
    }

    /// Builds a manifest from string pairs.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut entries = plist::Dictionary::new();
        for (key, value) in pairs {
            entries.insert(key.to_string(), plist::Value::String(value.to_string()));
        }
        Self { entries }
    }

    /// Returns a string entry; other value types read as absent.
    pub fn string(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(plist::Value::as_string)
    }

    /// Returns an array-of-strings entry.
    ///
    /// `None` unless the entry is an array made only of strings.
    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        self.entries
            .get(key)?
            .as_array()?
            .iter()
            .map(|item| item.as_string().map(str::to_string))
            .collect()
    }

    pub fn insert(&mut self, key: &str, value: plist::Value) {
        self.entries.insert(key.to_string(), value);
    }
}

// ============================================================================
// Icon catalog
// ============================================================================

/// Extracts the icon filenames listed in an asset catalog `Contents.json`.
///
/// The document must be an object with an `images` array; entries without
/// a string `filename` (slots left empty in Xcode) are skipped.
pub fn catalog_filenames(json: &str) -> Result<Vec<String>> {
    let document: Value = serde_json::from_str(json)
        .map_err(|e| Error::cannot_read("Contents.json", Some(&e.to_string())))?;

    let Some(object) = document.as_object() else {
        return Err(Error::cannot_read(
            "Contents.json",
            Some("unexpected top-level object (non-dict)"),
        ));
    };
    let Some(images) = object.get("images").and_then(Value::as_array) else {
        return Err(Error::cannot_read("Contents.json", Some("images array is not found")));
    };

    let filenames = images
        .iter()
        .enumerate()
        .filter_map(|(index, image)| {
            let filename = image.get("filename").and_then(Value::as_str);
            if filename.is_none() {
                warn!("Contents.json: image #{index} has no filename, skipping");
            }
            filename.map(str::to_string)
        })
        .collect();
    Ok(filenames)
}

/// Reads and parses a `Contents.json` file.
pub fn read_catalog(path: &Path) -> Result<Vec<String>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| Error::cannot_read("Contents.json", Some(&e.to_string())))?;
    catalog_filenames(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_skips_entries_without_filename() {
        let json = r#"{
            "images": [
                { "size": "60x60", "idiom": "iphone", "filename": "Icon-60@2x.png", "scale": "2x" },
                { "size": "60x60", "idiom": "iphone", "scale": "3x" },
                { "size": "1024x1024", "idiom": "ios-marketing", "filename": "Icon-1024.png" }
            ],
            "info": { "version": 1, "author": "xcode" }
        }"#;

        assert_eq!(
            catalog_filenames(json).unwrap(),
            vec!["Icon-60@2x.png".to_string(), "Icon-1024.png".to_string()]
        );
    }

    #[test]
    fn catalog_rejects_non_object() {
        let err = catalog_filenames("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("non-dict"));
    }

    #[test]
    fn catalog_requires_images_array() {
        let err = catalog_filenames(r#"{ "info": {} }"#).unwrap_err();
        assert!(err.to_string().contains("images array is not found"));
    }

    #[test]
    fn catalog_reports_malformed_json() {
        assert!(matches!(catalog_filenames("{"), Err(Error::CannotReadFile(_))));
    }

    #[test]
    fn manifest_reads_strings_and_lists() {
        let mut manifest = Manifest::from_pairs([("CFBundleVersion", "7")]);
        manifest.insert(
            "CFBundleIconFiles",
            plist::Value::Array(vec!["a.png".into(), "b.png".into()]),
        );
        manifest.insert("Mixed", plist::Value::Array(vec!["a.png".into(), true.into()]));

        assert_eq!(manifest.string("CFBundleVersion"), Some("7"));
        assert_eq!(manifest.string("CFBundleIconFiles"), None);
        assert_eq!(
            manifest.string_list("CFBundleIconFiles"),
            Some(vec!["a.png".to_string(), "b.png".to_string()])
        );
        assert_eq!(manifest.string_list("Mixed"), None);
        assert_eq!(manifest.string_list("Missing"), None);
    }

    #[test]
    fn manifest_round_trips_through_xml_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("Info.plist");

        let mut dict = plist::Dictionary::new();
        dict.insert("CFBundleIdentifier".into(), "com.example.debug".into());
        plist::Value::Dictionary(dict).to_file_xml(&path).unwrap();

        let manifest = Manifest::from_file(&path).unwrap();
        assert_eq!(manifest.string("CFBundleIdentifier"), Some("com.example.debug"));
    }

    #[test]
    fn manifest_missing_file_is_cannot_read() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Manifest::from_file(&dir.path().join("nope.plist")).unwrap_err();
        assert!(matches!(err, Error::CannotReadFile(_)));
    }
}
