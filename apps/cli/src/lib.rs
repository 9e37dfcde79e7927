//! # SkillChain Passport CLI
//!
//! Offline counterpart of the server's vault: encrypts credential documents,
//! decrypts blobs and pinned documents, and rewrites blobs between wire forms.
//! Results go to stdout so the tool composes with pipes.

mod args;

pub use args::{Cli, Command, WireForm};

use anyhow::{Context, Result, bail};
use serde_json::Value;
use skc_vault::{CipherMode, CiphertextBlob, Vault};
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

/// Executes a parsed command, reading input from `stdin` unless a file is given.
///
/// # Errors
/// Returns an error if the input cannot be read or parsed, the secret is missing,
/// or the vault rejects the operation.
pub fn run<R: Read, W: Write>(cli: Cli, stdin: R, out: &mut W) -> Result<()> {
    match cli.command {
        Command::Encrypt { input, gcm, legacy_hex } => {
            let text = read_input(input.as_deref(), stdin)?;
            let document: Value =
                serde_json::from_str(&text).context("Input is not a JSON document")?;

            let mode = if gcm { CipherMode::Gcm } else { CipherMode::Cbc };
            let vault = vault(cli.secret, mode)?;
            let blob = vault.encrypt(&document).context("Encryption failed")?;

            let rendered = if legacy_hex { blob.to_concatenated_hex()? } else { blob.to_json() };
            writeln!(out, "{rendered}")?;
        },
        Command::Decrypt { input } => {
            let text = read_input(input.as_deref(), stdin)?;
            let blob = parse_blob(&text)?;
            let vault = vault(cli.secret, CipherMode::default())?;
            let plaintext = vault.decrypt(&blob).context("Decryption failed")?;
            writeln!(out, "{}", serde_json::to_string_pretty(&plaintext)?)?;
        },
        Command::Convert { input, to } => {
            let text = read_input(input.as_deref(), stdin)?;
            let blob = parse_blob(&text)?;
            let rendered = match to {
                WireForm::Record => blob.to_json(),
                WireForm::Hex => blob.to_concatenated_hex()?,
            };
            writeln!(out, "{rendered}")?;
        },
    }
    Ok(())
}

fn vault(secret: Option<String>, mode: CipherMode) -> Result<Vault> {
    let Some(secret) = secret else {
        bail!("no shared secret: pass --secret or set SKC_SHARED_SECRET");
    };
    Ok(Vault::builder().secret(secret)?.mode(mode).build())
}

fn read_input<R: Read>(path: Option<&Path>, mut stdin: R) -> Result<String> {
    let text = match path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            stdin.read_to_string(&mut buf).context("Failed to read stdin")?;
            buf
        },
    };
    if text.trim().is_empty() {
        bail!("input is empty");
    }
    Ok(text)
}

/// Accepts a bare blob in any wire form, or a whole pinned document.
fn parse_blob(text: &str) -> Result<CiphertextBlob> {
    if let Ok(Value::Object(mut doc)) = serde_json::from_str::<Value>(text) {
        if let Some(encrypted) = doc.remove("encrypted") {
            return serde_json::from_value(encrypted)
                .context("The document's `encrypted` field is not a valid blob");
        }
    }
    CiphertextBlob::parse(text).context("Input is not a valid ciphertext blob")
}
