//! Static table of the AES ciphers the default primitive implements.
//!
//! Each entry carries an upper-case canonical name and a lower-case alias,
//! matching the legacy OpenSSL listing where both spellings are reported.
//! The table is kept in ASCII order so discovery is deterministic.

/// AES key size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    /// 128-bit key.
    Aes128,
    /// 192-bit key.
    Aes192,
    /// 256-bit key.
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    pub fn bytes(self) -> usize {
        match self {
            Self::Aes128 => 16,
            Self::Aes192 => 24,
            Self::Aes256 => 32,
        }
    }
}

/// Mode of operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Electronic codebook, PKCS#7 padded.
    Ecb,
    /// Cipher block chaining, PKCS#7 padded.
    Cbc,
    /// Full-block cipher feedback.
    Cfb,
    /// 8-bit cipher feedback.
    Cfb8,
    /// Output feedback.
    Ofb,
    /// Counter mode, 128-bit big-endian counter.
    Ctr,
    /// Galois/counter mode.
    Gcm,
    /// Counter with CBC-MAC.
    Ccm,
    /// Nonce-misuse-resistant GCM (RFC 8452).
    GcmSiv,
}

impl Mode {
    /// IV length in bytes.
    pub fn iv_len(self) -> usize {
        match self {
            Self::Ecb => 0,
            Self::Gcm | Self::Ccm | Self::GcmSiv => 12,
            Self::Cbc | Self::Cfb | Self::Cfb8 | Self::Ofb | Self::Ctr => 16,
        }
    }

    /// Whether the mode authenticates and produces a tag.
    pub fn is_aead(self) -> bool {
        matches!(self, Self::Gcm | Self::Ccm | Self::GcmSiv)
    }
}

/// One catalogue entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CipherSpec {
    /// Canonical upper-case name, e.g. `AES-128-CBC`.
    pub name: &'static str,
    /// Lower-case alias, e.g. `aes-128-cbc`.
    pub alias: &'static str,
    /// Key size.
    pub key: KeySize,
    /// Mode of operation.
    pub mode: Mode,
}

impl CipherSpec {
    const fn new(name: &'static str, alias: &'static str, key: KeySize, mode: Mode) -> Self {
        Self {
            name,
            alias,
            key,
            mode,
        }
    }

    /// Find an entry by canonical name or alias. Matching is exact.
    pub fn lookup(name: &str) -> Option<&'static CipherSpec> {
        CATALOG
            .iter()
            .find(|spec| spec.name == name || spec.alias == name)
    }

    /// IV length in bytes.
    pub fn iv_len(&self) -> usize {
        self.mode.iv_len()
    }
}

use KeySize::{Aes128, Aes192, Aes256};
use Mode::{Cbc, Ccm, Cfb, Cfb8, Ctr, Ecb, Gcm, GcmSiv, Ofb};

/// All supported ciphers, in ASCII order of canonical name.
pub static CATALOG: &[CipherSpec] = &[
    CipherSpec::new("AES-128-CBC", "aes-128-cbc", Aes128, Cbc),
    CipherSpec::new("AES-128-CCM", "aes-128-ccm", Aes128, Ccm),
    CipherSpec::new("AES-128-CFB", "aes-128-cfb", Aes128, Cfb),
    CipherSpec::new("AES-128-CFB8", "aes-128-cfb8", Aes128, Cfb8),
    CipherSpec::new("AES-128-CTR", "aes-128-ctr", Aes128, Ctr),
    CipherSpec::new("AES-128-ECB", "aes-128-ecb", Aes128, Ecb),
    CipherSpec::new("AES-128-GCM", "aes-128-gcm", Aes128, Gcm),
    CipherSpec::new("AES-128-GCM-SIV", "aes-128-gcm-siv", Aes128, GcmSiv),
    CipherSpec::new("AES-128-OFB", "aes-128-ofb", Aes128, Ofb),
    CipherSpec::new("AES-192-CBC", "aes-192-cbc", Aes192, Cbc),
    CipherSpec::new("AES-192-CCM", "aes-192-ccm", Aes192, Ccm),
    CipherSpec::new("AES-192-CFB", "aes-192-cfb", Aes192, Cfb),
    CipherSpec::new("AES-192-CFB8", "aes-192-cfb8", Aes192, Cfb8),
    CipherSpec::new("AES-192-CTR", "aes-192-ctr", Aes192, Ctr),
    CipherSpec::new("AES-192-ECB", "aes-192-ecb", Aes192, Ecb),
    CipherSpec::new("AES-192-GCM", "aes-192-gcm", Aes192, Gcm),
    CipherSpec::new("AES-192-OFB", "aes-192-ofb", Aes192, Ofb),
    CipherSpec::new("AES-256-CBC", "aes-256-cbc", Aes256, Cbc),
    CipherSpec::new("AES-256-CCM", "aes-256-ccm", Aes256, Ccm),
    CipherSpec::new("AES-256-CFB", "aes-256-cfb", Aes256, Cfb),
    CipherSpec::new("AES-256-CFB8", "aes-256-cfb8", Aes256, Cfb8),
    CipherSpec::new("AES-256-CTR", "aes-256-ctr", Aes256, Ctr),
    CipherSpec::new("AES-256-ECB", "aes-256-ecb", Aes256, Ecb),
    CipherSpec::new("AES-256-GCM", "aes-256-gcm", Aes256, Gcm),
    CipherSpec::new("AES-256-GCM-SIV", "aes-256-gcm-siv", Aes256, GcmSiv),
    CipherSpec::new("AES-256-OFB", "aes-256-ofb", Aes256, Ofb),
];

/// Canonical names followed by aliases.
pub fn names() -> Vec<String> {
    CATALOG
        .iter()
        .map(|spec| spec.name)
        .chain(CATALOG.iter().map(|spec| spec.alias))
        .map(str::to_owned)
        .collect()
}
