//! [`CipherPrimitive`] backed by the RustCrypto AES crates.
//!
//! Plain modes go through the `cbc`, `ecb`, `cfb-mode`, `cfb8`, `ofb` and `ctr`
//! block-mode wrappers. AEAD modes go through `aes-gcm`, `ccm` and
//! `aes-gcm-siv`. Tag lengths are type parameters in those crates, so each
//! supported length is expanded to its own concrete type.

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::AesGcm;
use aes_gcm_siv::{
    aead::{
        consts::{U10, U12, U13, U14, U15, U16, U4, U6, U8},
        generic_array::{typenum::Unsigned, GenericArray},
        rand_core::RngCore,
        AeadCore, AeadInPlace, KeyInit, Nonce, OsRng, Tag,
    },
    Aes128GcmSiv, Aes256GcmSiv,
};
use cbc::cipher::{
    block_padding::Pkcs7, AsyncStreamCipher, BlockDecryptMut, BlockEncryptMut, KeyIvInit,
    StreamCipher,
};
use ccm::Ccm;
use subtle::ConstantTimeEq;
use tracing::trace;
use zeroize::Zeroizing;

use super::catalog::{self, CipherSpec, KeySize, Mode};
use super::{CipherPrimitive, PrimitiveError, Sealed};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Instantiate `$call` with `$wrapper<Aes128|Aes192|Aes256>` for the key size.
macro_rules! by_key_size {
    ($key:expr, $call:ident, $($wrapper:ident)::+, ($($arg:expr),*)) => {
        match $key {
            KeySize::Aes128 => $call::<$($wrapper)::+<Aes128>>($($arg),*),
            KeySize::Aes192 => $call::<$($wrapper)::+<Aes192>>($($arg),*),
            KeySize::Aes256 => $call::<$($wrapper)::+<Aes256>>($($arg),*),
        }
    };
}

/// GCM with a 96-bit nonce and a 4..=16 byte tag. Tags shorter than 12 bytes
/// go through `$short` on the full-tag type.
macro_rules! gcm {
    ($aes:ty, $tag_len:expr, $call:ident($($arg:expr),*), $short:ident) => {
        match $tag_len {
            4..=11 => $short::<AesGcm<$aes, U12, U16>>($($arg,)* $tag_len),
            12 => $call::<AesGcm<$aes, U12, U12>>($($arg),*),
            13 => $call::<AesGcm<$aes, U12, U13>>($($arg),*),
            14 => $call::<AesGcm<$aes, U12, U14>>($($arg),*),
            15 => $call::<AesGcm<$aes, U12, U15>>($($arg),*),
            16 => $call::<AesGcm<$aes, U12, U16>>($($arg),*),
            len => Err(PrimitiveError::UnsupportedTagLength { len }),
        }
    };
}

/// CCM with a 96-bit nonce and an even 4..=16 byte tag.
macro_rules! ccm {
    ($aes:ty, $tag_len:expr, $call:ident($($arg:expr),*)) => {
        match $tag_len {
            4 => $call::<Ccm<$aes, U4, U12>>($($arg),*),
            6 => $call::<Ccm<$aes, U6, U12>>($($arg),*),
            8 => $call::<Ccm<$aes, U8, U12>>($($arg),*),
            10 => $call::<Ccm<$aes, U10, U12>>($($arg),*),
            12 => $call::<Ccm<$aes, U12, U12>>($($arg),*),
            14 => $call::<Ccm<$aes, U14, U12>>($($arg),*),
            16 => $call::<Ccm<$aes, U16, U12>>($($arg),*),
            len => Err(PrimitiveError::UnsupportedTagLength { len }),
        }
    };
}

/// Default primitive: the AES catalogue in [`catalog::CATALOG`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoPrimitive;

impl RustCryptoPrimitive {
    /// Create the primitive.
    pub fn new() -> Self {
        Self
    }
}

impl CipherPrimitive for RustCryptoPrimitive {
    fn cipher_names(&self) -> Vec<String> {
        catalog::names()
    }

    fn iv_length(&self, cipher: &str) -> Option<usize> {
        CipherSpec::lookup(cipher).map(CipherSpec::iv_len)
    }

    fn random_bytes(&self, len: usize) -> Result<Vec<u8>, PrimitiveError> {
        let mut bytes = vec![0u8; len];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| PrimitiveError::Random(e.to_string()))?;
        Ok(bytes)
    }

    fn encrypt(
        &self,
        plaintext: &[u8],
        cipher: &str,
        key: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError> {
        let spec = resolve(cipher, iv)?;
        let key = fit_key(key, spec.key);
        match spec.mode {
            Mode::Ecb => by_key_size!(spec.key, ecb_encrypt, ecb::Encryptor, (&key, plaintext)),
            Mode::Cbc => by_key_size!(spec.key, cbc_encrypt, cbc::Encryptor, (&key, iv, plaintext)),
            Mode::Cfb => {
                by_key_size!(spec.key, cfb_encrypt, cfb_mode::Encryptor, (&key, iv, plaintext))
            }
            Mode::Cfb8 => {
                by_key_size!(spec.key, cfb_encrypt, cfb8::Encryptor, (&key, iv, plaintext))
            }
            Mode::Ofb => by_key_size!(spec.key, keystream, ofb::Ofb, (&key, iv, plaintext)),
            Mode::Ctr => by_key_size!(spec.key, keystream, ctr::Ctr128BE, (&key, iv, plaintext)),
            Mode::Gcm | Mode::Ccm | Mode::GcmSiv => {
                Err(PrimitiveError::AeadRequired(spec.name.to_owned()))
            }
        }
    }

    fn decrypt(
        &self,
        ciphertext: &[u8],
        cipher: &str,
        key: &[u8],
        iv: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError> {
        let spec = resolve(cipher, iv)?;
        let key = fit_key(key, spec.key);
        match spec.mode {
            Mode::Ecb => by_key_size!(spec.key, ecb_decrypt, ecb::Decryptor, (&key, ciphertext)),
            Mode::Cbc => {
                by_key_size!(spec.key, cbc_decrypt, cbc::Decryptor, (&key, iv, ciphertext))
            }
            Mode::Cfb => {
                by_key_size!(spec.key, cfb_decrypt, cfb_mode::Decryptor, (&key, iv, ciphertext))
            }
            Mode::Cfb8 => {
                by_key_size!(spec.key, cfb_decrypt, cfb8::Decryptor, (&key, iv, ciphertext))
            }
            Mode::Ofb => by_key_size!(spec.key, keystream, ofb::Ofb, (&key, iv, ciphertext)),
            Mode::Ctr => by_key_size!(spec.key, keystream, ctr::Ctr128BE, (&key, iv, ciphertext)),
            Mode::Gcm | Mode::Ccm | Mode::GcmSiv => {
                Err(PrimitiveError::AeadRequired(spec.name.to_owned()))
            }
        }
    }

    fn aead_encrypt(
        &self,
        plaintext: &[u8],
        cipher: &str,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        tag_len: usize,
    ) -> Result<Sealed, PrimitiveError> {
        let spec = resolve(cipher, iv)?;
        let key = fit_key(key, spec.key);
        match (spec.mode, spec.key) {
            (Mode::Gcm, KeySize::Aes128) => {
                gcm!(Aes128, tag_len, seal(&key, iv, aad, plaintext), seal_truncated)
            }
            (Mode::Gcm, KeySize::Aes192) => {
                gcm!(Aes192, tag_len, seal(&key, iv, aad, plaintext), seal_truncated)
            }
            (Mode::Gcm, KeySize::Aes256) => {
                gcm!(Aes256, tag_len, seal(&key, iv, aad, plaintext), seal_truncated)
            }
            (Mode::Ccm, KeySize::Aes128) => ccm!(Aes128, tag_len, seal(&key, iv, aad, plaintext)),
            (Mode::Ccm, KeySize::Aes192) => ccm!(Aes192, tag_len, seal(&key, iv, aad, plaintext)),
            (Mode::Ccm, KeySize::Aes256) => ccm!(Aes256, tag_len, seal(&key, iv, aad, plaintext)),
            (Mode::GcmSiv, KeySize::Aes192) => Err(PrimitiveError::UnknownCipher(cipher.to_owned())),
            (Mode::GcmSiv, _) if tag_len != 16 => {
                Err(PrimitiveError::UnsupportedTagLength { len: tag_len })
            }
            (Mode::GcmSiv, KeySize::Aes128) => seal::<Aes128GcmSiv>(&key, iv, aad, plaintext),
            (Mode::GcmSiv, KeySize::Aes256) => seal::<Aes256GcmSiv>(&key, iv, aad, plaintext),
            _ => Err(PrimitiveError::NotAead(spec.name.to_owned())),
        }
    }

    fn aead_decrypt(
        &self,
        ciphertext: &[u8],
        cipher: &str,
        key: &[u8],
        iv: &[u8],
        aad: &[u8],
        tag: &[u8],
    ) -> Result<Vec<u8>, PrimitiveError> {
        let spec = resolve(cipher, iv)?;
        let key = fit_key(key, spec.key);
        let tag_len = tag.len();
        match (spec.mode, spec.key) {
            (Mode::Gcm, KeySize::Aes128) => {
                gcm!(Aes128, tag_len, open(&key, iv, aad, ciphertext, tag), open_truncated)
            }
            (Mode::Gcm, KeySize::Aes192) => {
                gcm!(Aes192, tag_len, open(&key, iv, aad, ciphertext, tag), open_truncated)
            }
            (Mode::Gcm, KeySize::Aes256) => {
                gcm!(Aes256, tag_len, open(&key, iv, aad, ciphertext, tag), open_truncated)
            }
            (Mode::Ccm, KeySize::Aes128) => {
                ccm!(Aes128, tag_len, open(&key, iv, aad, ciphertext, tag))
            }
            (Mode::Ccm, KeySize::Aes192) => {
                ccm!(Aes192, tag_len, open(&key, iv, aad, ciphertext, tag))
            }
            (Mode::Ccm, KeySize::Aes256) => {
                ccm!(Aes256, tag_len, open(&key, iv, aad, ciphertext, tag))
            }
            (Mode::GcmSiv, KeySize::Aes192) => Err(PrimitiveError::UnknownCipher(cipher.to_owned())),
            (Mode::GcmSiv, _) if tag_len != 16 => {
                Err(PrimitiveError::UnsupportedTagLength { len: tag_len })
            }
            (Mode::GcmSiv, KeySize::Aes128) => {
                open::<Aes128GcmSiv>(&key, iv, aad, ciphertext, tag)
            }
            (Mode::GcmSiv, KeySize::Aes256) => {
                open::<Aes256GcmSiv>(&key, iv, aad, ciphertext, tag)
            }
            _ => Err(PrimitiveError::NotAead(spec.name.to_owned())),
        }
    }
}

/// Look up `cipher` and check `iv` against its required length.
fn resolve(cipher: &str, iv: &[u8]) -> Result<&'static CipherSpec, PrimitiveError> {
    let spec =
        CipherSpec::lookup(cipher).ok_or_else(|| PrimitiveError::UnknownCipher(cipher.to_owned()))?;
    trace!(cipher = spec.name, mode = ?spec.mode, "resolved cipher");

    let expected = spec.iv_len();
    if iv.len() != expected {
        return Err(PrimitiveError::InvalidIvLength {
            expected,
            actual: iv.len(),
        });
    }
    Ok(spec)
}

/// NUL-pad or truncate raw key bytes to the cipher's key length.
fn fit_key(key: &[u8], size: KeySize) -> Zeroizing<Vec<u8>> {
    let mut fitted = Zeroizing::new(vec![0u8; size.bytes()]);
    let n = key.len().min(fitted.len());
    fitted[..n].copy_from_slice(&key[..n]);
    fitted
}

// ---------------------------------------------------------------------------
// Plain modes
// ---------------------------------------------------------------------------

fn ecb_encrypt<E: KeyInit + BlockEncryptMut>(
    key: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = E::new_from_slice(key).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn ecb_decrypt<D: KeyInit + BlockDecryptMut>(
    key: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = D::new_from_slice(key).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| PrimitiveError::BadPadding)
}

fn cbc_encrypt<E: KeyIvInit + BlockEncryptMut>(
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = E::new_from_slices(key, iv).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
}

fn cbc_decrypt<D: KeyIvInit + BlockDecryptMut>(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = D::new_from_slices(key, iv).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| PrimitiveError::BadPadding)
}

fn cfb_encrypt<E: KeyIvInit + AsyncStreamCipher + BlockEncryptMut>(
    key: &[u8],
    iv: &[u8],
    plaintext: &[u8],
) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = E::new_from_slices(key, iv).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    let mut buffer = plaintext.to_vec();
    cipher.encrypt(&mut buffer);
    Ok(buffer)
}

fn cfb_decrypt<D: KeyIvInit + AsyncStreamCipher + BlockDecryptMut>(
    key: &[u8],
    iv: &[u8],
    ciphertext: &[u8],
) -> Result<Vec<u8>, PrimitiveError> {
    let cipher = D::new_from_slices(key, iv).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    let mut buffer = ciphertext.to_vec();
    cipher.decrypt(&mut buffer);
    Ok(buffer)
}

/// OFB and CTR: encryption and decryption are the same keystream XOR.
fn keystream<S: KeyIvInit + StreamCipher>(
    key: &[u8],
    iv: &[u8],
    data: &[u8],
) -> Result<Vec<u8>, PrimitiveError> {
    let mut cipher = S::new_from_slices(key, iv).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    let mut buffer = data.to_vec();
    cipher.apply_keystream(&mut buffer);
    Ok(buffer)
}

// ---------------------------------------------------------------------------
// AEAD modes
// ---------------------------------------------------------------------------

fn nonce_for<'a, A: AeadCore>(iv: &'a [u8]) -> Result<&'a Nonce<A>, PrimitiveError> {
    let expected = <A::NonceSize as Unsigned>::USIZE;
    if iv.len() != expected {
        return Err(PrimitiveError::InvalidIvLength {
            expected,
            actual: iv.len(),
        });
    }
    Ok(GenericArray::from_slice(iv))
}

fn seal<A: AeadInPlace + KeyInit>(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
) -> Result<Sealed, PrimitiveError> {
    let cipher = A::new_from_slice(key).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    let nonce = nonce_for::<A>(iv)?;

    let mut buffer = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(nonce, aad, &mut buffer)
        .map_err(|_| PrimitiveError::AeadFailure)?;

    Ok(Sealed::authenticated(buffer, tag.to_vec()))
}

fn open<A: AeadInPlace + KeyInit>(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
) -> Result<Vec<u8>, PrimitiveError> {
    if tag.len() != <A::TagSize as Unsigned>::USIZE {
        return Err(PrimitiveError::UnsupportedTagLength { len: tag.len() });
    }
    let cipher = A::new_from_slice(key).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    let nonce = nonce_for::<A>(iv)?;
    let tag: &Tag<A> = GenericArray::from_slice(tag);

    let mut buffer = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(nonce, aad, &mut buffer, tag)
        .map_err(|_| PrimitiveError::AuthenticationFailed)?;
    Ok(buffer)
}

/// Short GCM tag: the leftmost `tag_len` bytes of the full tag.
fn seal_truncated<A: AeadInPlace + KeyInit>(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    plaintext: &[u8],
    tag_len: usize,
) -> Result<Sealed, PrimitiveError> {
    let mut sealed = seal::<A>(key, iv, aad, plaintext)?;
    if let Some(tag) = sealed.tag.as_mut() {
        tag.truncate(tag_len);
    }
    Ok(sealed)
}

/// Verify a short GCM tag against the recomputed full tag.
///
/// GCM encryption is a keystream XOR, so sealing the ciphertext yields the
/// plaintext; sealing that again reproduces the ciphertext and its full tag.
fn open_truncated<A: AeadInPlace + KeyInit>(
    key: &[u8],
    iv: &[u8],
    aad: &[u8],
    ciphertext: &[u8],
    tag: &[u8],
    tag_len: usize,
) -> Result<Vec<u8>, PrimitiveError> {
    let full_len = <A::TagSize as Unsigned>::USIZE;
    if tag.len() != tag_len || tag_len > full_len {
        return Err(PrimitiveError::UnsupportedTagLength { len: tag.len() });
    }
    let cipher = A::new_from_slice(key).map_err(|_| PrimitiveError::InvalidKeyLength)?;
    let nonce = nonce_for::<A>(iv)?;

    let mut plaintext = ciphertext.to_vec();
    cipher
        .encrypt_in_place_detached(nonce, b"", &mut plaintext)
        .map_err(|_| PrimitiveError::AeadFailure)?;

    let mut resealed = Zeroizing::new(plaintext.clone());
    let expected = cipher
        .encrypt_in_place_detached(nonce, aad, &mut resealed)
        .map_err(|_| PrimitiveError::AeadFailure)?;

    if bool::from(expected[..tag_len].ct_eq(tag)) {
        Ok(plaintext)
    } else {
        Err(PrimitiveError::AuthenticationFailed)
    }
}
