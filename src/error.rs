//! Error types shared by every stage of a run.
//!
//! Every error is terminal: the pipeline stops at the first one and the
//! front end turns it into a fatal message and a non-zero exit code.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving the version, discovering icons or
/// rewriting icon files.
#[derive(Debug, Error)]
pub enum Error {
    /// A required option was unset or empty.
    #[error("required option `{0}' was not set")]
    RequiredOptionMissing(&'static str),

    /// A required option was set to a value that cannot be used.
    #[error("required option `{option}' has invalid value `{value}'")]
    RequiredOptionInvalid { option: &'static str, value: String },

    /// A deprecated option was set.
    #[error("`{option}' is deprecated, please use `{replacement}'")]
    OptionDeprecated {
        option: &'static str,
        replacement: &'static str,
    },

    /// A metadata file could not be opened, read or understood.
    #[error("cannot open or read {0}")]
    CannotReadFile(String),

    /// Neither the working icon nor its backup exists.
    #[error("file is missing: {}", .0.display())]
    FileMissing(PathBuf),

    /// The backup icon could not be decoded as an image.
    #[error("cannot decode image {}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The stamped icon could not be encoded.
    #[error("cannot encode image {}", path.display())]
    ImageEncode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// No installed font can draw the version label.
    #[error("no usable font for family `{family}'")]
    FontUnavailable { family: String },

    /// usvg rejected the generated text document.
    #[error("cannot render version text: {0}")]
    TextRender(String),

    /// The development bundle pattern is not a valid regular expression.
    #[error("invalid development bundle pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    /// Variable expansion did not settle.
    #[error("too many indirection levels while expanding `{0}'")]
    ExpansionTooDeep(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Builds a [`Error::CannotReadFile`] with an optional reason appended.
    pub fn cannot_read(file: &str, reason: Option<&str>) -> Self {
        match reason {
            Some(reason) => Self::CannotReadFile(format!("{file}: {reason}")),
            None => Self::CannotReadFile(file.to_string()),
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cannot_read_appends_reason() {
        let err = Error::cannot_read("Info.plist", Some("CFBundleVersion is missing"));
        assert_eq!(
            err.to_string(),
            "cannot open or read Info.plist: CFBundleVersion is missing"
        );
        assert_eq!(
            Error::cannot_read("Contents.json", None).to_string(),
            "cannot open or read Contents.json"
        );
    }

    #[test]
    fn option_errors_name_the_key() {
        let err = Error::OptionDeprecated {
            option: "needVersionInfo",
            replacement: "overrideShowVersion",
        };
        assert!(err.to_string().contains("needVersionInfo"));
        assert!(err.to_string().contains("overrideShowVersion"));
    }
}
