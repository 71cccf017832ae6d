//! The cryptographic primitive the facade delegates to.
//!
//! [`CipherPrimitive`] is the seam between the facade and the library doing the
//! block cipher and AEAD work. [`RustCryptoPrimitive`] is the default
//! implementation, backed by the RustCrypto AES crates.
//!
//! # Key material
//!
//! Keys are raw bytes. Implementations decide how to fit them to a cipher's key
//! length; the default primitive NUL-pads short keys and truncates long ones.

pub mod catalog;
pub mod rustcrypto;

use thiserror::Error;

pub use catalog::{CipherSpec, KeySize, Mode};
pub use rustcrypto::RustCryptoPrimitive;

/// Output of an encryption: the ciphertext and, for AEAD ciphers, the tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    /// Raw ciphertext bytes.
    pub ciphertext: Vec<u8>,
    /// Authentication tag. `None` for plain (non-AEAD) ciphers.
    pub tag: Option<Vec<u8>>,
}

impl Sealed {
    /// A plain-mode result with no tag.
    pub fn plain(ciphertext: Vec<u8>) -> Self {
        Self {
            ciphertext,
            tag: None,
        }
    }

    /// An AEAD result carrying its tag.
    pub fn authenticated(ciphertext: Vec<u8>, tag: Vec<u8>) -> Self {
        Self {
            ciphertext,
            tag: Some(tag),
        }
    }
}

/// Errors reported by a [`CipherPrimitive`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PrimitiveError {
    /// The cipher name is not known to the primitive.
    #[error("unknown cipher: {0}")]
    UnknownCipher(String),

    /// The key could not be used with the cipher.
    #[error("invalid key length")]
    InvalidKeyLength,

    /// The IV length does not match the cipher.
    #[error("invalid IV length: expected {expected}, got {actual}")]
    InvalidIvLength {
        /// Required IV length in bytes.
        expected: usize,
        /// Supplied IV length in bytes.
        actual: usize,
    },

    /// The requested tag length is outside what the mode accepts.
    #[error("unsupported tag length: {len}")]
    UnsupportedTagLength {
        /// Requested tag length in bytes.
        len: usize,
    },

    /// A plain operation was requested on an AEAD cipher.
    #[error("{0} is an AEAD cipher and needs a tag")]
    AeadRequired(String),

    /// An AEAD operation was requested on a plain cipher.
    #[error("{0} is not an AEAD cipher")]
    NotAead(String),

    /// Block padding was malformed after decryption.
    #[error("bad padding")]
    BadPadding,

    /// The AEAD rejected the input, e.g. a message too long for the mode.
    #[error("aead operation failed")]
    AeadFailure,

    /// Tag verification failed: wrong key, IV, AAD or tag, or tampered data.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// The OS random source failed.
    #[error("random source failure: {0}")]
    Random(String),
}

/// Operations the facade consumes from the underlying cryptography library.
///
/// Implementations must be deterministic for the encrypt/decrypt calls: the
/// same inputs always produce the same output.
#[cfg_attr(test, mockall::automock)]
pub trait CipherPrimitive {
    /// Every cipher name the primitive supports, in discovery order.
    fn cipher_names(&self) -> Vec<String>;

    /// IV length mandated for `cipher`, or `None` if the name is unknown.
    fn iv_length(&self, cipher: &str) -> Option<usize>;

    /// `len` bytes from a cryptographically secure source.
    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, PrimitiveError>;

    /// Plain (unauthenticated) encryption.
    fn encrypt(
        &self,
        plaintext: &[u8],
        cipher: &str,
        key: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError>;

    /// Plain (unauthenticated) decryption.
    fn decrypt(
        &self,
        ciphertext: &[u8],
        cipher: &str,
        key: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError>;

    /// AEAD encryption binding `aad`, producing a `tag_len`-byte tag.
    fn aead_encrypt(
        &self,
        plaintext: &[u8],
        cipher: &str,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        tag_len: usize,
    ) -> Result<Sealed, PrimitiveError>;

    /// AEAD decryption. Fails with [`PrimitiveError::AuthenticationFailed`]
    /// rather than returning unauthenticated plaintext.
    fn aead_decrypt(
        &self,
        ciphertext: &[u8],
        cipher: &str,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError>;
}
