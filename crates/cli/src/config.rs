//! Configuration loading and validation for the `twoway` binary.
//!
//! Values come from `TWOWAY_`-prefixed environment variables; command-line
//! flags override them per invocation.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Validated CLI configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Directory holding the bundle written by `encrypt` and read by `decrypt`.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Cipher used by `encrypt` when `--cipher` is not given.
    #[serde(default = "default_cipher")]
    pub cipher: String,

    /// AEAD tag length in bytes.
    #[serde(default = "default_tag_length")]
    pub tag_length: usize,

    /// Tracing log level, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output/twoway")
}
fn default_cipher() -> String {
    "aes-128-ccm".into()
}
fn default_tag_length() -> usize {
    16
}
fn default_log_level() -> String {
    "warn".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_source(environment())
    }

    fn from_source(env: config::Environment) -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(env)
            .build()
            .context("failed to build twoway configuration")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise twoway configuration")?;

        c.validate()?;
        Ok(c)
    }

    fn validate(&self) -> Result<()> {
        if self.output_dir.as_os_str().is_empty() {
            anyhow::bail!("TWOWAY_OUTPUT_DIR must not be empty");
        }
        if self.cipher.trim().is_empty() {
            anyhow::bail!("TWOWAY_CIPHER must not be empty");
        }
        if !(1..=16).contains(&self.tag_length) {
            anyhow::bail!(
                "TWOWAY_TAG_LENGTH must be between 1 and 16, got {}",
                self.tag_length
            );
        }
        Ok(())
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("TWOWAY").try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> Config {
        Config {
            output_dir: default_output_dir(),
            cipher: default_cipher(),
            tag_length: default_tag_length(),
            log_level: default_log_level(),
            log_json: false,
        }
    }

    fn from_vars(vars: &[(&str, &str)]) -> Result<Config> {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_source(environment().source(Some(map)))
    }

    #[test]
    fn defaults() {
        assert_eq!(default_output_dir(), PathBuf::from("output/twoway"));
        assert_eq!(default_cipher(), "aes-128-ccm");
        assert_eq!(default_tag_length(), 16);
        assert_eq!(default_log_level(), "warn");
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let cfg = from_vars(&[]).unwrap();
        assert_eq!(cfg.output_dir, default_output_dir());
        assert_eq!(cfg.cipher, "aes-128-ccm");
        assert_eq!(cfg.tag_length, 16);
        assert!(!cfg.log_json);
    }

    #[test]
    fn reads_prefixed_variables() {
        let cfg = from_vars(&[
            ("TWOWAY_OUTPUT_DIR", "/tmp/bundle"),
            ("TWOWAY_CIPHER", "AES-256-GCM"),
            ("TWOWAY_TAG_LENGTH", "12"),
            ("TWOWAY_LOG_JSON", "true"),
            ("CIPHER", "ignored"),
        ])
        .unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/bundle"));
        assert_eq!(cfg.cipher, "AES-256-GCM");
        assert_eq!(cfg.tag_length, 12);
        assert!(cfg.log_json);
    }

    #[test]
    fn rejects_bad_tag_length_from_environment() {
        assert!(from_vars(&[("TWOWAY_TAG_LENGTH", "17")]).is_err());
    }

    #[test]
    fn validate_rejects_zero_tag_length() {
        let cfg = Config {
            tag_length: 0,
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_cipher() {
        let cfg = Config {
            cipher: "  ".into(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_empty_output_dir() {
        let cfg = Config {
            output_dir: PathBuf::new(),
            ..valid()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_accepts_valid_config() {
        assert!(valid().validate().is_ok());
    }
}
