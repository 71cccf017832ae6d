//! Error types for the two-way cipher facade.

use thiserror::Error;

use crate::primitive::PrimitiveError;

/// Errors produced by [`CipherContext`](crate::CipherContext) and
/// [`TwoWayCipher`](crate::TwoWayCipher).
///
/// Every variant is recoverable: the caller fixes the offending input and
/// tries again.
#[derive(Debug, Error)]
pub enum CipherError {
    /// No cipher name was given and the primitive reports no ciphers at all.
    #[error("no ciphers available")]
    NoCiphersAvailable,

    /// The requested cipher is not in the primitive's discovery list.
    #[error("cipher \"{0}\" is not available")]
    UnsupportedCipher(String),

    /// The IV does not have the length the current cipher requires.
    #[error("invalid IV length ({actual}) for cipher \"{cipher}\" (requires {expected})")]
    InvalidIvLength {
        /// Selected cipher name.
        cipher: String,
        /// Length required by the cipher.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// The cipher was changed and no new IV has been supplied yet.
    #[error("no IV set for cipher \"{0}\"")]
    IvNotSet(String),

    /// Decryption in AEAD mode was attempted without a tag.
    #[error("a tag should be provided when using AEAD mode")]
    MissingAuthenticationTag,

    /// The primitive rejected an encryption.
    #[error("encryption failed")]
    EncryptionFailed(#[source] PrimitiveError),

    /// The primitive rejected a decryption. Authentication failures land here.
    #[error("decryption failed")]
    DecryptionFailed(#[source] PrimitiveError),

    /// The random source could not produce an IV.
    #[error("unable to generate IV")]
    RandomSource(#[source] PrimitiveError),
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, CipherError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_includes_cipher_and_lengths() {
        let e = CipherError::InvalidIvLength {
            cipher: "AES-128-CBC".into(),
            expected: 16,
            actual: 4,
        };
        let msg = e.to_string();
        assert!(msg.contains("AES-128-CBC"));
        assert!(msg.contains("(4)"));
        assert!(msg.contains("requires 16"));
    }

    #[test]
    fn primitive_failure_is_kept_as_source() {
        let e = CipherError::DecryptionFailed(PrimitiveError::AuthenticationFailed);
        let source = e.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("authentication failed"));
    }
}
