#![allow(dead_code)]

use serde_json::{Value, json};
use skc_vault::prelude::*;

pub const SECRET: &str = "test-secret-value";

/// `SHA-256("test-secret-value")`.
pub const DERIVED_KEY: [u8; 32] =
    hex_literal::hex!("afbb9b6c7c26d7b5ce487d7eed36223352f315eadc14e39bdd30fe08fb7c8555");

pub const FIXED_IV: [u8; 16] = hex_literal::hex!("000102030405060708090a0b0c0d0e0f");

/// `openssl enc -aes-256-cbc -K <DERIVED_KEY> -iv <FIXED_IV>` over the compact degree payload.
pub const DEGREE_CIPHERTEXT_HEX: &str = "19def57dc697719f00d29c4fac612bdbc8e3181902eac712ee312d6522dfe8090be1f451f5f79da4986405cd77cba93df543f478067a610a75abf4258b81e13b4200f5d9832f25bf4e479530e48c5305499e862ad794dbc39ab9dab131539e26";

/// The same tool over `{}`.
pub const EMPTY_OBJECT_CIPHERTEXT_HEX: &str = "4988e3fc328685d82e266e02816e0afa";

#[must_use]
pub fn degree_payload() -> Value {
    json!({
        "holder": "0xABC",
        "issuer": "0xDEF",
        "credential": { "type": "degree", "title": "B.Tech" }
    })
}

/// A vault over [`SECRET`] in the given mode.
/// # Panics
/// * If the secret is rejected.
#[must_use]
pub fn setup_vault(mode: CipherMode) -> Vault {
    Vault::builder().secret(SECRET).expect("Vault setup failed").mode(mode).build()
}

#[derive(Debug)]
pub struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn fill(&self, _dest: &mut [u8]) -> Result<(), VaultError> {
        Err(VaultError::RandomnessUnavailable { message: "entropy pool drained".into(), context: None })
    }
}
