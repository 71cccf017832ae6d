//! `twoway`: encrypt a string into an on-disk bundle and decrypt it again.
//!
//! Startup sequence:
//! 1. Parse command-line arguments.
//! 2. Load and validate [`config::Config`] from `TWOWAY_*` environment variables.
//! 3. Initialise logging to stderr.
//! 4. Run the selected subcommand, writing its output to stdout.

mod commands;
mod config;
mod telemetry;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "twoway", version, about = "Two-way AES encryption with a stored bundle")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level when RUST_LOG is unset [default: TWOWAY_LOG_LEVEL or warn]
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// List available cipher names
    Ciphers {
        /// Only list AEAD ciphers (CCM and GCM modes)
        #[arg(long)]
        advanced: bool,
    },
    /// Encrypt INPUT and write the bundle
    Encrypt(commands::EncryptArgs),
    /// Decrypt a bundle and print the plaintext
    Decrypt(commands::DecryptArgs),
}

fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Arguments
    // -----------------------------------------------------------------------
    let cli = Cli::parse();

    // -----------------------------------------------------------------------
    // 2. Configuration
    // -----------------------------------------------------------------------
    let cfg = config::Config::from_env().map_err(|e| {
        eprintln!("ERROR: twoway configuration invalid: {e:#}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 3. Telemetry
    // -----------------------------------------------------------------------
    let log_level = cli.log_level.as_deref().unwrap_or(&cfg.log_level);
    telemetry::init(log_level, cfg.log_json)?;

    // -----------------------------------------------------------------------
    // 4. Command
    // -----------------------------------------------------------------------
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Ciphers { advanced } => commands::ciphers(advanced, &mut stdout),
        Command::Encrypt(args) => commands::encrypt(args, &cfg, &mut stdout),
        Command::Decrypt(args) => commands::decrypt(args, &cfg, &mut stdout),
    }
}
