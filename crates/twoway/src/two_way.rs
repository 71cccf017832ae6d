//! [`TwoWayCipher`]: password, MAC and the encrypt/decrypt operations.
//!
//! The cipher's AEAD flag picks the path:
//!
//! - **plain**: `(data, cipher, password, iv)`. The MAC is stored but unused
//!   and no tag is produced or checked.
//! - **AEAD**: `(data, cipher, password, iv, aad = mac, tag)`. Encryption
//!   returns a tag; decryption requires one and fails on mismatch.
//!
//! Every call is deterministic for fixed field values.

use std::fmt;

use zeroize::Zeroizing;

use crate::context::CipherContext;
use crate::error::{CipherError, Result};
use crate::primitive::{CipherPrimitive, RustCryptoPrimitive, Sealed};

/// Tag length used by [`TwoWayCipher::encrypt`].
pub const DEFAULT_TAG_LENGTH: usize = 16;

/// Symmetric encrypt/decrypt facade over a [`CipherContext`].
#[derive(Clone)]
pub struct TwoWayCipher<P = RustCryptoPrimitive> {
    context: CipherContext<P>,
    password: Zeroizing<Vec<u8>>,
    mac: Vec<u8>,
}

impl TwoWayCipher<RustCryptoPrimitive> {
    /// Build on the default primitive. Arguments as for [`CipherContext::new`].
    pub fn new(cipher: Option<&str>, iv: Option<&[u8]>) -> Result<Self> {
        Ok(Self::from_context(CipherContext::new(cipher, iv)?))
    }

    /// See [`CipherContext::supported_ciphers`].
    pub fn supported_ciphers() -> Vec<String> {
        CipherContext::supported_ciphers()
    }

    /// See [`CipherContext::supported_advanced_ciphers`].
    pub fn supported_advanced_ciphers() -> Vec<String> {
        CipherContext::supported_advanced_ciphers()
    }
}

impl<P: CipherPrimitive> TwoWayCipher<P> {
    /// Build on `primitive`. Arguments as for [`CipherContext::with_primitive`].
    pub fn with_primitive(primitive: P, cipher: Option<&str>, iv: Option<&[u8]>) -> Result<Self> {
        Ok(Self::from_context(CipherContext::with_primitive(
            primitive, cipher, iv,
        )?))
    }

    /// Wrap an existing context with an empty password and MAC.
    pub fn from_context(context: CipherContext<P>) -> Self {
        Self {
            context,
            password: Zeroizing::new(Vec::new()),
            mac: Vec::new(),
        }
    }

    /// The underlying cipher/IV state.
    pub fn context(&self) -> &CipherContext<P> {
        &self.context
    }

    /// Set the raw key bytes. No validation; the primitive fits them to the
    /// cipher's key length.
    pub fn set_password(&mut self, password: impl AsRef<[u8]>) {
        self.password = Zeroizing::new(password.as_ref().to_vec());
    }

    /// Set the MAC, used as additional authenticated data in AEAD mode.
    pub fn set_mac(&mut self, mac: impl AsRef<[u8]>) {
        self.mac = mac.as_ref().to_vec();
    }

    /// The current MAC.
    pub fn mac(&self) -> &[u8] {
        &self.mac
    }

    /// See [`CipherContext::available_ciphers`].
    pub fn available_ciphers(&self) -> Vec<String> {
        self.context.available_ciphers()
    }

    /// See [`CipherContext::available_advanced_ciphers`].
    pub fn available_advanced_ciphers(&self) -> Vec<String> {
        self.context.available_advanced_ciphers()
    }

    /// See [`CipherContext::set_cipher`]. Clears the IV.
    pub fn set_cipher(&mut self, name: &str) -> Result<()> {
        self.context.set_cipher(name)
    }

    /// See [`CipherContext::cipher`].
    pub fn cipher(&self) -> &str {
        self.context.cipher()
    }

    /// See [`CipherContext::is_advanced`].
    pub fn is_advanced(&self) -> bool {
        self.context.is_advanced()
    }

    /// See [`CipherContext::iv_length`].
    pub fn iv_length(&self) -> usize {
        self.context.iv_length()
    }

    /// See [`CipherContext::set_iv`].
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<()> {
        self.context.set_iv(iv)
    }

    /// See [`CipherContext::iv`].
    pub fn iv(&self) -> Option<&[u8]> {
        self.context.iv()
    }

    /// Encrypt with a [`DEFAULT_TAG_LENGTH`]-byte tag in AEAD mode.
    ///
    /// # Errors
    ///
    /// See [`encrypt_with_tag_length`](Self::encrypt_with_tag_length).
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Sealed> {
        self.encrypt_with_tag_length(plaintext, DEFAULT_TAG_LENGTH)
    }

    /// Encrypt `plaintext`. `tag_len` only matters in AEAD mode.
    ///
    /// # Errors
    ///
    /// - [`CipherError::IvNotSet`] if the cipher was changed without a new IV.
    /// - [`CipherError::EncryptionFailed`] if the primitive rejects the call,
    ///   for instance because `tag_len` is out of range for the mode.
    pub fn encrypt_with_tag_length(&self, plaintext: &[u8], tag_len: usize) -> Result<Sealed> {
        let iv = self.context.require_iv()?;
        let cipher = self.context.cipher();
        let primitive = self.context.primitive();

        if !self.context.is_advanced() {
            return primitive
                .encrypt(plaintext, cipher, &self.password, iv)
                .map(Sealed::plain)
                .map_err(CipherError::EncryptionFailed);
        }

        primitive
            .aead_encrypt(plaintext, cipher, &self.password, iv, &self.mac, tag_len)
            .map_err(CipherError::EncryptionFailed)
    }

    /// Decrypt `ciphertext`. `tag` is ignored in plain mode.
    ///
    /// # Errors
    ///
    /// - [`CipherError::MissingAuthenticationTag`] in AEAD mode without a tag.
    /// - [`CipherError::IvNotSet`] if the cipher was changed without a new IV.
    /// - [`CipherError::DecryptionFailed`] if the primitive rejects the data:
    ///   bad padding, a tag mismatch, or a wrong password, MAC or IV.
    pub fn decrypt(&self, ciphertext: &[u8], tag: Option<&[u8]>) -> Result<Vec<u8>> {
        let cipher = self.context.cipher();
        let primitive = self.context.primitive();

        if !self.context.is_advanced() {
            let iv = self.context.require_iv()?;
            return primitive
                .decrypt(ciphertext, cipher, &self.password, iv)
                .map_err(CipherError::DecryptionFailed);
        }

        let tag = tag.ok_or(CipherError::MissingAuthenticationTag)?;
        let iv = self.context.require_iv()?;
        primitive
            .aead_decrypt(ciphertext, cipher, &self.password, iv, &self.mac, tag)
            .map_err(CipherError::DecryptionFailed)
    }
}

impl<P> fmt::Debug for TwoWayCipher<P>
where
    P: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material and AAD stay out of logs and panic messages.
        f.debug_struct("TwoWayCipher")
            .field("context", &self.context)
            .field("password", &"[REDACTED]")
            .field("mac", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{MockCipherPrimitive, PrimitiveError};

    fn base_mock() -> MockCipherPrimitive {
        let mut mock = MockCipherPrimitive::new();
        mock.expect_cipher_names().returning(|| {
            vec!["AES-128-CBC".to_string(), "AES-128-CCM".to_string()]
        });
        mock.expect_iv_length()
            .returning(|name| Some(if name == "AES-128-CCM" { 12 } else { 16 }));
        mock
    }

    #[test]
    fn plain_encrypt_ignores_mac_and_returns_no_tag() {
        let mut mock = base_mock();
        mock.expect_encrypt()
            .withf(|pt, cipher, key, iv| {
                pt == b"test".as_slice()
                    && cipher == "AES-128-CBC"
                    && key == b"trustno1".as_slice()
                    && iv == [7u8; 16].as_slice()
            })
            .times(1)
            .returning(|_, _, _, _| Ok(vec![0xC0; 16]));
        mock.expect_aead_encrypt().never();

        let mut cipher =
            TwoWayCipher::with_primitive(mock, Some("AES-128-CBC"), Some(&[7u8; 16][..])).unwrap();
        cipher.set_password("trustno1");
        cipher.set_mac("ignored");

        let sealed = cipher.encrypt(b"test").unwrap();
        assert_eq!(sealed, Sealed::plain(vec![0xC0; 16]));
    }

    #[test]
    fn aead_encrypt_passes_mac_as_aad_and_tag_length() {
        let mut mock = base_mock();
        mock.expect_aead_encrypt()
            .withf(|_, cipher, _, iv, aad, tag_len| {
                cipher == "AES-128-CCM"
                    && iv == [1u8; 12].as_slice()
                    && aad == b"Picture of a tree".as_slice()
                    && *tag_len == 8
            })
            .times(1)
            .returning(|_, _, _, _, _, _| Ok(Sealed::authenticated(vec![1, 2], vec![3; 8])));
        mock.expect_encrypt().never();

        let mut cipher =
            TwoWayCipher::with_primitive(mock, Some("AES-128-CCM"), Some(&[1u8; 12][..])).unwrap();
        cipher.set_mac("Picture of a tree");

        let sealed = cipher.encrypt_with_tag_length(b"hi", 8).unwrap();
        assert_eq!(sealed.tag, Some(vec![3; 8]));
    }

    #[test]
    fn aead_decrypt_requires_tag() {
        let mut mock = base_mock();
        mock.expect_aead_decrypt().never();
        let cipher =
            TwoWayCipher::with_primitive(mock, Some("AES-128-CCM"), Some(&[0u8; 12][..])).unwrap();
        let err = cipher.decrypt(b"data", None).unwrap_err();
        assert!(matches!(err, CipherError::MissingAuthenticationTag));
    }

    #[test]
    fn aead_decrypt_forwards_tag_and_mac() {
        let mut mock = base_mock();
        mock.expect_aead_decrypt()
            .withf(|ct, _, _, _, aad, tag| {
                ct == b"data".as_slice() && aad == b"Byte".as_slice() && tag == [9u8; 4].as_slice()
            })
            .times(1)
            .returning(|_, _, _, _, _, _| Ok(b"plain".to_vec()));
        let mut cipher =
            TwoWayCipher::with_primitive(mock, Some("AES-128-CCM"), Some(&[0u8; 12][..])).unwrap();
        cipher.set_mac("Byte");
        assert_eq!(cipher.decrypt(b"data", Some([9u8; 4].as_slice())).unwrap(), b"plain");
    }

    #[test]
    fn plain_decrypt_ignores_tag() {
        let mut mock = base_mock();
        mock.expect_decrypt()
            .times(1)
            .returning(|_, _, _, _| Ok(b"test".to_vec()));
        mock.expect_aead_decrypt().never();
        let cipher =
            TwoWayCipher::with_primitive(mock, Some("AES-128-CBC"), Some(&[0u8; 16][..])).unwrap();
        assert_eq!(cipher.decrypt(b"xx", Some([0u8; 4].as_slice())).unwrap(), b"test");
    }

    #[test]
    fn authentication_failure_is_a_typed_error() {
        let mut mock = base_mock();
        mock.expect_aead_decrypt()
            .returning(|_, _, _, _, _, _| Err(PrimitiveError::AuthenticationFailed));
        let cipher =
            TwoWayCipher::with_primitive(mock, Some("AES-128-CCM"), Some(&[0u8; 12][..])).unwrap();
        let err = cipher.decrypt(b"data", Some([0u8; 4].as_slice())).unwrap_err();
        assert!(matches!(
            err,
            CipherError::DecryptionFailed(PrimitiveError::AuthenticationFailed)
        ));
    }

    #[test]
    fn rejected_tag_length_surfaces_as_encryption_failure() {
        let mut mock = base_mock();
        mock.expect_aead_encrypt()
            .returning(|_, _, _, _, _, len| Err(PrimitiveError::UnsupportedTagLength { len }));
        let cipher =
            TwoWayCipher::with_primitive(mock, Some("AES-128-CCM"), Some(&[0u8; 12][..])).unwrap();
        let err = cipher.encrypt_with_tag_length(b"x", 3).unwrap_err();
        assert!(matches!(
            err,
            CipherError::EncryptionFailed(PrimitiveError::UnsupportedTagLength { len: 3 })
        ));
    }

    #[test]
    fn encrypt_after_cipher_change_needs_new_iv() {
        let mut mock = base_mock();
        mock.expect_encrypt().never();
        mock.expect_aead_encrypt().never();
        let mut cipher =
            TwoWayCipher::with_primitive(mock, Some("AES-128-CBC"), Some(&[0u8; 16][..])).unwrap();
        cipher.set_cipher("AES-128-CCM").unwrap();
        assert!(matches!(
            cipher.encrypt(b"x").unwrap_err(),
            CipherError::IvNotSet(ref name) if name == "AES-128-CCM"
        ));
    }

    #[test]
    fn password_and_mac_accessors() {
        let mut cipher = TwoWayCipher::new(Some("AES-128-CBC"), None).unwrap();
        assert!(cipher.mac().is_empty());
        cipher.set_mac("qwertyazerty");
        assert_eq!(cipher.mac(), b"qwertyazerty");
        cipher.set_mac("");
        assert_eq!(cipher.mac(), b"");
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut cipher = TwoWayCipher::new(None, None).unwrap();
        cipher.set_password("hunter2");
        cipher.set_mac("secret-aad");
        let rendered = format!("{cipher:?}");
        assert!(rendered.contains("REDACTED"));
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("secret-aad"));
    }
}
