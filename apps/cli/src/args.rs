//! # CLI Argument Definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// The main CLI structure parsing command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "skc-cli")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Offline encryption tools for SkillChain Passport credentials")]
pub struct Cli {
    /// Shared secret the credential key is derived from
    #[arg(long, global = true, env = "SKC_SHARED_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Enumeration of available subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Encrypt a JSON document and print the blob
    Encrypt {
        /// Read the document from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Use authenticated AES-256-GCM instead of AES-256-CBC
        #[arg(long)]
        gcm: bool,
        /// Print the legacy concatenated hex form instead of the JSON record
        #[arg(long, conflicts_with = "gcm")]
        legacy_hex: bool,
    },
    /// Decrypt a blob or a pinned credential document and print the JSON
    Decrypt {
        /// Read the blob from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
    /// Rewrite a blob in another wire form; no secret needed
    Convert {
        /// Read the blob from a file instead of stdin
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Target wire form
        #[arg(long, value_enum, default_value_t = WireForm::Record)]
        to: WireForm,
    },
}

/// Output wire forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum WireForm {
    /// `{"v":1,"alg":"aes-256-cbc","iv":"..","data":".."}`
    Record,
    /// `hex(iv) || hex(ciphertext)`, CBC only
    Hex,
}
