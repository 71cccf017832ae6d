//! Two-way AES facade.
//!
//! Pick a cipher, manage its IV, optionally set a password (raw key bytes) and a
//! MAC (used as AEAD additional authenticated data), then encrypt or decrypt.
//!
//! ```no_run
//! use twoway::TwoWayCipher;
//!
//! # fn main() -> twoway::Result<()> {
//! let mut cipher = TwoWayCipher::new(Some("AES-128-CCM"), None)?;
//! cipher.set_password("trustno1");
//! cipher.set_mac("Picture of a tree");
//!
//! let sealed = cipher.encrypt(b"some words with spaces")?;
//! let plaintext = cipher.decrypt(&sealed.ciphertext, sealed.tag.as_deref())?;
//! assert_eq!(plaintext, b"some words with spaces");
//! # Ok(())
//! # }
//! ```
//!
//! The password is not hashed or stretched. Deriving a key from a passphrase
//! is the caller's job.

pub mod context;
pub mod error;
pub mod primitive;
pub mod two_way;

pub use context::{is_advanced_cipher, CipherContext, AEAD_MARKERS};
pub use error::{CipherError, Result};
pub use primitive::{CipherPrimitive, PrimitiveError, RustCryptoPrimitive, Sealed};
pub use two_way::{TwoWayCipher, DEFAULT_TAG_LENGTH};
