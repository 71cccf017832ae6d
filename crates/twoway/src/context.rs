//! [`CipherContext`]: cipher selection and IV lifecycle.
//!
//! The context owns the selected cipher name, whether that cipher is
//! AEAD-capable, and the current IV. Changing the cipher always clears the IV,
//! so an IV sized for one cipher is never silently reused with another.

use crate::error::{CipherError, Result};
use crate::primitive::{CipherPrimitive, RustCryptoPrimitive};

/// Substrings that mark a cipher name as AEAD-capable (case-insensitive).
///
/// The second marker is "GCM". The legacy PHP `TwoWayAES` tested for "CGM", a
/// typo that left GCM ciphers on the plain path.
pub const AEAD_MARKERS: [&str; 2] = ["CCM", "GCM"];

/// Whether `name` looks like an AEAD cipher.
///
/// This is a plain substring test against [`AEAD_MARKERS`], not a capability
/// table.
pub fn is_advanced_cipher(name: &str) -> bool {
    let upper = name.to_ascii_uppercase();
    AEAD_MARKERS.iter().any(|marker| upper.contains(marker))
}

/// Cipher name, AEAD flag and IV, bound to a [`CipherPrimitive`].
#[derive(Debug, Clone)]
pub struct CipherContext<P = RustCryptoPrimitive> {
    primitive: P,
    cipher: String,
    advanced: bool,
    iv: Option<Vec<u8>>,
}

impl CipherContext<RustCryptoPrimitive> {
    /// Build a context on the default primitive.
    ///
    /// See [`CipherContext::with_primitive`].
    pub fn new(cipher: Option<&str>, iv: Option<&[u8]>) -> Result<Self> {
        Self::with_primitive(RustCryptoPrimitive::new(), cipher, iv)
    }

    /// Cipher names of the default primitive, without building a context.
    pub fn supported_ciphers() -> Vec<String> {
        RustCryptoPrimitive::new().cipher_names()
    }

    /// AEAD-capable subset of [`supported_ciphers`](Self::supported_ciphers).
    pub fn supported_advanced_ciphers() -> Vec<String> {
        advanced_only(Self::supported_ciphers())
    }
}

impl<P: CipherPrimitive> CipherContext<P> {
    /// Build a context on `primitive`.
    ///
    /// With no `cipher`, the first AEAD-capable name is picked, falling back to
    /// the first name of any kind. With no `iv`, a random IV of the required
    /// length is generated.
    ///
    /// # Errors
    ///
    /// - [`CipherError::NoCiphersAvailable`] if no cipher was named and the
    ///   primitive lists none.
    /// - [`CipherError::UnsupportedCipher`] if `cipher` is not listed.
    /// - [`CipherError::InvalidIvLength`] if `iv` has the wrong length.
    /// - [`CipherError::RandomSource`] if a random IV cannot be produced.
    pub fn with_primitive(primitive: P, cipher: Option<&str>, iv: Option<&[u8]>) -> Result<Self> {
        let cipher = match cipher {
            Some(name) => name.to_owned(),
            None => default_cipher(&primitive)?,
        };

        let mut ctx = Self {
            primitive,
            cipher: String::new(),
            advanced: false,
            iv: None,
        };
        ctx.set_cipher(&cipher)?;

        let iv = match iv {
            Some(iv) => iv.to_vec(),
            None => ctx
                .primitive
                .random_bytes(ctx.iv_length())
                .map_err(CipherError::RandomSource)?,
        };
        ctx.set_iv(&iv)?;

        Ok(ctx)
    }

    /// Every cipher name the primitive supports.
    pub fn available_ciphers(&self) -> Vec<String> {
        self.primitive.cipher_names()
    }

    /// The subset of [`available_ciphers`](Self::available_ciphers) that is
    /// AEAD-capable according to [`is_advanced_cipher`].
    pub fn available_advanced_ciphers(&self) -> Vec<String> {
        advanced_only(self.primitive.cipher_names())
    }

    /// Select a cipher. Clears the IV.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::UnsupportedCipher`] if `name` is not listed by
    /// the primitive.
    pub fn set_cipher(&mut self, name: &str) -> Result<()> {
        if !self.primitive.cipher_names().iter().any(|c| c == name) {
            return Err(CipherError::UnsupportedCipher(name.to_owned()));
        }
        self.advanced = is_advanced_cipher(name);
        self.cipher = name.to_owned();
        self.iv = None;
        Ok(())
    }

    /// The selected cipher name.
    pub fn cipher(&self) -> &str {
        &self.cipher
    }

    /// Whether the selected cipher takes the AEAD path.
    pub fn is_advanced(&self) -> bool {
        self.advanced
    }

    /// IV length the selected cipher requires; 0 when nothing is selected.
    pub fn iv_length(&self) -> usize {
        if self.cipher.is_empty() {
            return 0;
        }
        self.primitive.iv_length(&self.cipher).unwrap_or(0)
    }

    /// Store a new IV.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError::InvalidIvLength`] if `iv` is not exactly
    /// [`iv_length`](Self::iv_length) bytes.
    pub fn set_iv(&mut self, iv: &[u8]) -> Result<()> {
        let expected = self.iv_length();
        if iv.len() != expected {
            return Err(CipherError::InvalidIvLength {
                cipher: self.cipher.clone(),
                expected,
                actual: iv.len(),
            });
        }
        self.iv = Some(iv.to_vec());
        Ok(())
    }

    /// The current IV, or `None` after a cipher change.
    pub fn iv(&self) -> Option<&[u8]> {
        self.iv.as_deref()
    }

    /// The IV to hand to the primitive.
    ///
    /// An unset IV is only acceptable for ciphers that take no IV.
    pub(crate) fn require_iv(&self) -> Result<&[u8]> {
        match self.iv.as_deref() {
            Some(iv) => Ok(iv),
            None if self.iv_length() == 0 => Ok(&[][..]),
            None => Err(CipherError::IvNotSet(self.cipher.clone())),
        }
    }

    pub(crate) fn primitive(&self) -> &P {
        &self.primitive
    }
}

fn advanced_only(names: Vec<String>) -> Vec<String> {
    names
        .into_iter()
        .filter(|name| is_advanced_cipher(name))
        .collect()
}

/// First AEAD name in discovery order, else the first name of any kind.
fn default_cipher<P: CipherPrimitive>(primitive: &P) -> Result<String> {
    let names = primitive.cipher_names();
    names
        .iter()
        .find(|name| is_advanced_cipher(name))
        .or_else(|| names.first())
        .cloned()
        .ok_or(CipherError::NoCiphersAvailable)
}
