//! Directory layout for a stored encryption result.
//!
//! A bundle directory holds:
//!
//! | file            | contents                                   |
//! |-----------------|--------------------------------------------|
//! | `.iv`           | raw IV bytes, empty for ECB                |
//! | `.mac`          | raw MAC bytes, only when a MAC was used    |
//! | `#`             | raw AEAD tag, only for AEAD ciphers        |
//! | `data`          | raw ciphertext                             |
//! | `manifest.json` | [`Manifest`]                               |

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::BundleError;

/// Only manifest version this crate reads and writes.
pub const MANIFEST_VERSION: u32 = 1;

pub const IV_FILE: &str = ".iv";
pub const MAC_FILE: &str = ".mac";
pub const TAG_FILE: &str = "#";
pub const DATA_FILE: &str = "data";
pub const MANIFEST_FILE: &str = "manifest.json";

// ---------------------------------------------------------------------------
// Manifest
// ---------------------------------------------------------------------------

/// Contents of `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: u32,
    /// Cipher name as accepted by `TwoWayCipher::set_cipher`.
    pub cipher: String,
    /// Tag length in bytes. Absent for plain ciphers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_length: Option<usize>,
    pub has_mac: bool,
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Everything needed to decrypt a stored ciphertext, apart from the password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub cipher: String,
    pub iv: Vec<u8>,
    pub mac: Option<Vec<u8>>,
    pub tag: Option<Vec<u8>>,
    pub ciphertext: Vec<u8>,
}

impl Bundle {
    /// Manifest describing this bundle.
    pub fn manifest(&self) -> Manifest {
        Manifest {
            version: MANIFEST_VERSION,
            cipher: self.cipher.clone(),
            tag_length: self.tag.as_ref().map(Vec::len),
            has_mac: self.mac.is_some(),
        }
    }

    /// Write the bundle into `dir`, creating it if needed.
    ///
    /// `.mac` and `#` left over from an earlier bundle are removed when this
    /// bundle has no MAC or tag. Returns the paths written, in write order.
    ///
    /// # Errors
    ///
    /// Returns [`BundleError::Io`] naming the path that failed.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, BundleError> {
        fs::create_dir_all(dir).map_err(BundleError::io(dir))?;

        let mut written = Vec::new();
        let mut put = |name: &str, bytes: &[u8]| -> Result<(), BundleError> {
            let path = dir.join(name);
            fs::write(&path, bytes).map_err(BundleError::io(&path))?;
            written.push(path);
            Ok(())
        };

        put(IV_FILE, &self.iv)?;
        match &self.mac {
            Some(mac) => put(MAC_FILE, mac)?,
            None => remove_stale(&dir.join(MAC_FILE))?,
        }
        match &self.tag {
            Some(tag) => put(TAG_FILE, tag)?,
            None => remove_stale(&dir.join(TAG_FILE))?,
        }
        put(DATA_FILE, &self.ciphertext)?;

        let manifest = serde_json::to_vec_pretty(&self.manifest())?;
        put(MANIFEST_FILE, &manifest)?;

        Ok(written)
    }

    /// Read a bundle previously written with [`Bundle::write_to`].
    ///
    /// # Errors
    ///
    /// - [`BundleError::Manifest`] if `manifest.json` does not parse.
    /// - [`BundleError::UnsupportedVersion`] for any version other than
    ///   [`MANIFEST_VERSION`].
    /// - [`BundleError::MissingTag`] / [`BundleError::TagLengthMismatch`] when
    ///   the tag file disagrees with the manifest.
    /// - [`BundleError::Io`] for any other unreadable file.
    pub fn read_from(dir: &Path) -> Result<Self, BundleError> {
        let manifest: Manifest = serde_json::from_slice(&read(&dir.join(MANIFEST_FILE))?)?;
        if manifest.version != MANIFEST_VERSION {
            return Err(BundleError::UnsupportedVersion(manifest.version));
        }

        let iv = read(&dir.join(IV_FILE))?;
        let ciphertext = read(&dir.join(DATA_FILE))?;
        let mac = if manifest.has_mac {
            Some(read(&dir.join(MAC_FILE))?)
        } else {
            None
        };

        let tag = match manifest.tag_length {
            Some(expected) => {
                let path = dir.join(TAG_FILE);
                let tag = match fs::read(&path) {
                    Ok(tag) => tag,
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        return Err(BundleError::MissingTag { path })
                    }
                    Err(e) => return Err(BundleError::io(path)(e)),
                };
                if tag.len() != expected {
                    return Err(BundleError::TagLengthMismatch {
                        expected,
                        actual: tag.len(),
                    });
                }
                Some(tag)
            }
            None => None,
        };

        Ok(Self {
            cipher: manifest.cipher,
            iv,
            mac,
            tag,
            ciphertext,
        })
    }
}

fn read(path: &Path) -> Result<Vec<u8>, BundleError> {
    fs::read(path).map_err(BundleError::io(path))
}

fn remove_stale(path: &Path) -> Result<(), BundleError> {
    match fs::remove_file(path) {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(BundleError::io(path)(e)),
        _ => Ok(()),
    }
}
