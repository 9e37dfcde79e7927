//! Ciphertext blobs and their wire forms.
//!
//! Two textual encodings exist:
//!
//! * **Record** (canonical): `{"v":1,"alg":"aes-256-cbc","iv":"<hex>","data":"<hex>"}`.
//!   Records without `v`/`alg` are read as version 1.
//! * **Concatenated** (legacy, read-only for new code): `hex(iv) ‖ hex(ciphertext)`,
//!   always AES-256-CBC with a 16-byte IV.

use crate::error::VaultError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const CBC_BLOCK_LEN: usize = 16;
const GCM_TAG_LEN: usize = 16;

/// Cipher and framing version of a blob.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
pub enum CipherMode {
    /// AES-256-CBC with PKCS#7 padding. Blob version 1.
    #[default]
    #[serde(rename = "aes-256-cbc")]
    #[strum(serialize = "aes-256-cbc")]
    Cbc,
    /// AES-256-GCM with a 96-bit nonce. Blob version 2.
    #[serde(rename = "aes-256-gcm")]
    #[strum(serialize = "aes-256-gcm")]
    Gcm,
}

impl CipherMode {
    #[must_use]
    pub const fn version(self) -> u8 {
        match self {
            Self::Cbc => 1,
            Self::Gcm => 2,
        }
    }

    #[must_use]
    pub const fn from_version(version: u8) -> Option<Self> {
        match version {
            1 => Some(Self::Cbc),
            2 => Some(Self::Gcm),
            _ => None,
        }
    }

    /// Length in bytes of the IV (CBC) or nonce (GCM).
    #[must_use]
    pub const fn iv_len(self) -> usize {
        match self {
            Self::Cbc => 16,
            Self::Gcm => 12,
        }
    }

    #[must_use]
    pub fn algorithm(self) -> &'static str {
        self.into()
    }
}

/// An encrypted payload: the mode, the IV and the ciphertext.
///
/// A value of this type has already passed framing validation, so decryption
/// only has cryptographic failure modes left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CiphertextBlob {
    mode: CipherMode,
    iv: Vec<u8>,
    data: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct BlobRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    v: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    alg: Option<String>,
    iv: String,
    data: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BlobRepr {
    Record(BlobRecord),
    Concatenated(String),
}

impl CiphertextBlob {
    /// Builds a blob from raw parts, validating the framing for `mode`.
    ///
    /// # Errors
    /// Returns [`VaultError::MalformedBlob`] if the IV length does not match the mode,
    /// the ciphertext is empty, or its length is impossible for the mode.
    pub fn from_parts(mode: CipherMode, iv: Vec<u8>, data: Vec<u8>) -> Result<Self, VaultError> {
        if iv.len() != mode.iv_len() {
            return Err(VaultError::malformed(format!(
                "iv must be {} bytes for {mode}, got {}",
                mode.iv_len(),
                iv.len()
            )));
        }
        if data.is_empty() {
            return Err(VaultError::malformed("ciphertext is empty"));
        }
        match mode {
            CipherMode::Cbc if data.len() % CBC_BLOCK_LEN != 0 => {
                return Err(VaultError::malformed(format!(
                    "ciphertext length {} is not a multiple of the block size",
                    data.len()
                )));
            },
            CipherMode::Gcm if data.len() < GCM_TAG_LEN => {
                return Err(VaultError::malformed("ciphertext is shorter than the GCM tag"));
            },
            _ => {},
        }
        Ok(Self { mode, iv, data })
    }

    /// Parses any accepted textual form: a record object, a JSON string, or bare hex.
    ///
    /// # Errors
    /// Returns [`VaultError::MalformedBlob`] if the input matches no form.
    pub fn parse(input: &str) -> Result<Self, VaultError> {
        let input = input.trim();
        match input.as_bytes().first() {
            None => Err(VaultError::malformed("blob is empty")),
            Some(b'{') => {
                let record: BlobRecord = serde_json::from_str(input)
                    .map_err(|e| VaultError::malformed(format!("invalid blob record: {e}")))?;
                Self::try_from(record)
            },
            Some(b'"') => {
                let hex_str: String = serde_json::from_str(input)
                    .map_err(|e| VaultError::malformed(format!("invalid blob string: {e}")))?;
                Self::from_concatenated_hex(&hex_str)
            },
            Some(_) => Self::from_concatenated_hex(input),
        }
    }

    /// Parses the legacy `hex(iv) ‖ hex(ciphertext)` form.
    ///
    /// # Errors
    /// Returns [`VaultError::MalformedBlob`] on invalid hex or impossible lengths.
    pub fn from_concatenated_hex(input: &str) -> Result<Self, VaultError> {
        let bytes = decode_hex(input.trim(), "blob")?;
        let iv_len = CipherMode::Cbc.iv_len();
        if bytes.len() <= iv_len {
            return Err(VaultError::malformed(format!(
                "concatenated blob has {} bytes, needs more than the {iv_len}-byte iv",
                bytes.len()
            )));
        }
        let (iv, data) = bytes.split_at(iv_len);
        Self::from_parts(CipherMode::Cbc, iv.to_vec(), data.to_vec())
    }

    /// Renders the legacy concatenated form.
    ///
    /// # Errors
    /// Returns [`VaultError::MalformedBlob`] for GCM blobs, which have no such form.
    pub fn to_concatenated_hex(&self) -> Result<String, VaultError> {
        if self.mode != CipherMode::Cbc {
            return Err(VaultError::malformed(format!(
                "{} blobs cannot be written in concatenated form",
                self.mode
            )));
        }
        let mut out = String::with_capacity((self.iv.len() + self.data.len()) * 2);
        out.push_str(&hex::encode(&self.iv));
        out.push_str(&hex::encode(&self.data));
        Ok(out)
    }

    /// Renders the canonical record form.
    #[must_use]
    pub fn to_json(&self) -> String {
        self.to_string()
    }

    #[must_use]
    pub const fn mode(&self) -> CipherMode {
        self.mode
    }

    #[must_use]
    pub const fn version(&self) -> u8 {
        self.mode.version()
    }

    #[must_use]
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    #[must_use]
    pub fn ciphertext(&self) -> &[u8] {
        &self.data
    }

    fn record(&self) -> BlobRecord {
        BlobRecord {
            v: Some(self.mode.version()),
            alg: Some(self.mode.algorithm().to_owned()),
            iv: hex::encode(&self.iv),
            data: hex::encode(&self.data),
        }
    }
}

impl TryFrom<BlobRecord> for CiphertextBlob {
    type Error = VaultError;

    fn try_from(record: BlobRecord) -> Result<Self, Self::Error> {
        let mode = match (record.v, record.alg.as_deref()) {
            (None, None) => CipherMode::Cbc,
            (Some(v), None) => CipherMode::from_version(v)
                .ok_or_else(|| VaultError::malformed(format!("unsupported blob version {v}")))?,
            (v, Some(alg)) => {
                let mode = CipherMode::from_str(alg)
                    .map_err(|_| VaultError::malformed(format!("unsupported algorithm '{alg}'")))?;
                if let Some(v) = v
                    && v != mode.version()
                {
                    return Err(VaultError::malformed(format!(
                        "blob version {v} does not match algorithm {alg}"
                    )));
                }
                mode
            },
        };
        let iv = decode_hex(&record.iv, "iv")?;
        let data = decode_hex(&record.data, "data")?;
        Self::from_parts(mode, iv, data)
    }
}

impl TryFrom<BlobRepr> for CiphertextBlob {
    type Error = VaultError;

    fn try_from(repr: BlobRepr) -> Result<Self, Self::Error> {
        match repr {
            BlobRepr::Record(record) => Self::try_from(record),
            BlobRepr::Concatenated(hex_str) => Self::from_concatenated_hex(&hex_str),
        }
    }
}

impl Serialize for CiphertextBlob {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.record().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CiphertextBlob {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = BlobRepr::deserialize(deserializer)?;
        Self::try_from(repr).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for CiphertextBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.record()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

impl FromStr for CiphertextBlob {
    type Err = VaultError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn decode_hex(value: &str, field: &'static str) -> Result<Vec<u8>, VaultError> {
    hex::decode(value).map_err(|e| VaultError::malformed(format!("{field} is not valid hex: {e}")))
}
