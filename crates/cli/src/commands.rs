//! Subcommand implementations.
//!
//! Each command writes its user-facing output to the supplied writer; logs go
//! through `tracing` to stderr.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use common::Bundle;
use tracing::{debug, info};
use twoway::TwoWayCipher;

use crate::config::Config;

/// Arguments for `twoway encrypt`.
#[derive(Debug, Args)]
pub struct EncryptArgs {
    /// Cipher to use [default: TWOWAY_CIPHER or aes-128-ccm]
    #[arg(long)]
    pub cipher: Option<String>,

    /// Password used as the raw key
    #[arg(long, env = "TWOWAY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Message authentication code bound to the ciphertext (AEAD ciphers)
    #[arg(long)]
    pub mac: Option<String>,

    /// AEAD tag length in bytes [default: TWOWAY_TAG_LENGTH or 16]
    #[arg(long)]
    pub tag_length: Option<usize>,

    /// Bundle directory [default: TWOWAY_OUTPUT_DIR or output/twoway]
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Text to encrypt
    pub input: String,
}

/// Arguments for `twoway decrypt`.
#[derive(Debug, Args)]
pub struct DecryptArgs {
    /// Password used at encryption time
    #[arg(long, env = "TWOWAY_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// MAC to verify with, instead of the bundle's `.mac` file
    #[arg(long)]
    pub mac: Option<String>,

    /// Bundle directory [default: TWOWAY_OUTPUT_DIR or output/twoway]
    #[arg(long)]
    pub dir: Option<PathBuf>,
}

/// `twoway ciphers`: list cipher names, one per line.
pub fn ciphers(advanced: bool, out: &mut impl Write) -> Result<()> {
    let names = if advanced {
        TwoWayCipher::supported_advanced_ciphers()
    } else {
        TwoWayCipher::supported_ciphers()
    };
    for name in names {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

/// `twoway encrypt`: encrypt `input` under a fresh random IV and store the bundle.
pub fn encrypt(args: EncryptArgs, cfg: &Config, out: &mut impl Write) -> Result<()> {
    let name = args.cipher.as_deref().unwrap_or(&cfg.cipher);
    let tag_length = args.tag_length.unwrap_or(cfg.tag_length);
    let dir = args.out.unwrap_or_else(|| cfg.output_dir.clone());

    let mut cipher = TwoWayCipher::new(Some(name), None)
        .with_context(|| format!("cannot use cipher {name}"))?;
    if let Some(password) = &args.password {
        cipher.set_password(password);
    }
    if let Some(mac) = &args.mac {
        cipher.set_mac(mac);
    }

    let sealed = cipher
        .encrypt_with_tag_length(args.input.as_bytes(), tag_length)
        .context("encryption failed")?;
    debug!(cipher = cipher.cipher(), advanced = cipher.is_advanced(), "encrypted input");

    let bundle = Bundle {
        cipher: cipher.cipher().to_owned(),
        iv: cipher.iv().unwrap_or_default().to_vec(),
        mac: args.mac.as_ref().map(|m| m.as_bytes().to_vec()),
        tag: sealed.tag,
        ciphertext: sealed.ciphertext,
    };
    let written = bundle
        .write_to(&dir)
        .with_context(|| format!("failed to write bundle to {}", dir.display()))?;
    info!(dir = %dir.display(), files = written.len(), "bundle written");

    let shown_dir = fs::canonicalize(&dir).unwrap_or_else(|_| dir.clone());

    writeln!(out, "Input..........: {}", args.input)?;
    writeln!(out, "Using password.: {}", yes_no(args.password.is_some()))?;
    writeln!(out, "Using mac......: {}", yes_no(args.mac.is_some()))?;
    writeln!(out, "Output.........: {}", hex::encode(&bundle.ciphertext))?;
    writeln!(out)?;
    for path in &written {
        let file = path.file_name().unwrap_or_default().to_string_lossy();
        writeln!(out, "Wrote \"{file}\" to {}", shown_dir.display())?;
    }
    Ok(())
}

/// `twoway decrypt`: read a bundle and print the recovered plaintext.
///
/// Plaintext that is not UTF-8 is printed as hex.
pub fn decrypt(args: DecryptArgs, cfg: &Config, out: &mut impl Write) -> Result<()> {
    let dir = args.dir.unwrap_or_else(|| cfg.output_dir.clone());
    let bundle = Bundle::read_from(&dir)
        .with_context(|| format!("failed to read bundle from {}", dir.display()))?;

    let mut cipher = TwoWayCipher::new(Some(bundle.cipher.as_str()), Some(bundle.iv.as_slice()))
        .with_context(|| format!("bundle cipher {} is not usable", bundle.cipher))?;
    if let Some(password) = &args.password {
        cipher.set_password(password);
    }
    if let Some(mac) = args.mac.map(String::into_bytes).or(bundle.mac) {
        cipher.set_mac(mac);
    }

    let plaintext = cipher
        .decrypt(&bundle.ciphertext, bundle.tag.as_deref())
        .context("decryption failed")?;
    debug!(cipher = cipher.cipher(), bytes = plaintext.len(), "decrypted bundle");

    match String::from_utf8(plaintext) {
        Ok(text) => writeln!(out, "{text}")?,
        Err(e) => writeln!(out, "{}", hex::encode(e.as_bytes()))?,
    }
    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}
