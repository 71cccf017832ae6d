//! Errors raised while reading or writing a bundle.

use std::path::PathBuf;

use thiserror::Error;

/// Bundle I/O and format errors.
#[derive(Debug, Error)]
pub enum BundleError {
    /// A file in the bundle could not be read, written or removed.
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The manifest was written by an incompatible version.
    #[error("unsupported bundle version: {0}")]
    UnsupportedVersion(u32),

    /// The manifest records an AEAD tag but the tag file is absent.
    #[error("manifest records a tag but {} is missing", path.display())]
    MissingTag { path: PathBuf },

    /// The tag file does not have the length the manifest records.
    #[error("tag length mismatch: manifest says {expected}, tag file has {actual}")]
    TagLengthMismatch { expected: usize, actual: usize },

    /// `manifest.json` is not valid JSON or is missing fields.
    #[error("malformed manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| BundleError::Io { path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_the_path() {
        let err = BundleError::io("/tmp/bundle/.iv")(std::io::Error::from(
            std::io::ErrorKind::PermissionDenied,
        ));
        assert!(err.to_string().contains("/tmp/bundle/.iv"));
    }

    #[test]
    fn display_includes_lengths() {
        let e = BundleError::TagLengthMismatch {
            expected: 16,
            actual: 4,
        };
        let msg = e.to_string();
        assert!(msg.contains("16") && msg.contains('4'));
    }
}
