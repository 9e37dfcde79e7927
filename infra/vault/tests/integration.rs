pub mod fixtures;

use fixtures::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use skc_vault::prelude::*;
use skc_vault::{SharedSecret, derive_key};
use std::collections::HashMap;

#[test]
fn test_degree_payload_round_trips_with_hex_iv() {
    let payload = degree_payload();
    let blob = skc_vault::encrypt(&payload, SECRET).expect("Encryption failed");

    let wire: serde_json::Value = serde_json::from_str(&blob.to_json()).unwrap();
    let iv = wire["iv"].as_str().unwrap();
    assert_eq!(iv.len(), 32);
    assert!(iv.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

    let parsed = CiphertextBlob::parse(&blob.to_json()).unwrap();
    assert_eq!(skc_vault::decrypt(&parsed, SECRET).unwrap(), payload);
}

#[test]
fn test_short_iv_is_malformed() {
    let record = json!({ "iv": "00".repeat(15), "data": DEGREE_CIPHERTEXT_HEX }).to_string();

    let err = setup_vault(CipherMode::Cbc).decrypt_str(&record).unwrap_err();
    assert!(matches!(err, VaultError::MalformedBlob { .. }), "got {err}");
    assert_eq!(err.public_message(), "could not decrypt credential");
}

#[test]
fn test_derived_key_known_answer() {
    let secret = SharedSecret::new(SECRET).unwrap();
    assert_eq!(derive_key(&secret).as_bytes(), &DERIVED_KEY);
    assert_eq!(derive_key(&secret).as_bytes(), derive_key(&secret).as_bytes());
}

#[test]
fn test_decrypts_independently_produced_concatenated_blob() {
    let legacy = format!("{}{DEGREE_CIPHERTEXT_HEX}", hex::encode(FIXED_IV));
    let vault = setup_vault(CipherMode::Cbc);

    assert_eq!(vault.decrypt_str(&legacy).unwrap(), degree_payload());

    let blob = CiphertextBlob::parse(&legacy).unwrap();
    assert_eq!(blob.iv(), FIXED_IV.as_slice());
    assert_eq!(blob.to_concatenated_hex().unwrap(), legacy);

    let empty = format!("{}{EMPTY_OBJECT_CIPHERTEXT_HEX}", hex::encode(FIXED_IV));
    assert_eq!(vault.decrypt_str(&empty).unwrap(), json!({}));
}

#[test]
fn test_legacy_record_without_version_is_read_as_cbc() {
    let record = json!({ "iv": hex::encode(FIXED_IV), "data": DEGREE_CIPHERTEXT_HEX });
    let blob: CiphertextBlob = serde_json::from_value(record).unwrap();
    assert_eq!(blob.mode(), CipherMode::Cbc);
    assert_eq!(setup_vault(CipherMode::Gcm).decrypt(&blob).unwrap(), degree_payload());
}

#[test]
fn test_encryption_is_not_deterministic() {
    let vault = setup_vault(CipherMode::Cbc);
    let a = vault.encrypt(&degree_payload()).unwrap();
    let b = vault.encrypt(&degree_payload()).unwrap();

    assert_ne!(a.iv(), b.iv());
    assert_ne!(a, b);
    assert_eq!(vault.decrypt(&a).unwrap(), vault.decrypt(&b).unwrap());
}

#[test]
fn test_wrong_secret_never_yields_the_plaintext() {
    let blob = CiphertextBlob::parse(&format!("{}{DEGREE_CIPHERTEXT_HEX}", hex::encode(FIXED_IV)))
        .unwrap();

    for wrong in ["wrong-secret", "test-secret-valuE"] {
        let err = skc_vault::decrypt(&blob, wrong).unwrap_err();
        assert!(matches!(err, VaultError::Authentication { .. }), "{wrong}: {err}");
        assert!(err.is_decryption_failure());
    }

    let fresh = setup_vault(CipherMode::Cbc).encrypt(&degree_payload()).unwrap();
    match skc_vault::decrypt(&fresh, "another-secret") {
        Err(err) => assert!(err.is_decryption_failure(), "{err}"),
        Ok(value) => assert_ne!(value, degree_payload()),
    }
}

#[test]
fn test_cbc_tampering_fails_or_changes_plaintext() {
    let vault = setup_vault(CipherMode::Cbc);
    let blob = vault.encrypt(&degree_payload()).unwrap();

    for (flip_iv, index) in [(true, 0), (false, 0), (false, blob.ciphertext().len() - 1)] {
        let mut iv = blob.iv().to_vec();
        let mut data = blob.ciphertext().to_vec();
        if flip_iv {
            iv[index] ^= 0x01;
        } else {
            data[index] ^= 0x01;
        }
        let tampered = CiphertextBlob::from_parts(CipherMode::Cbc, iv, data).unwrap();

        match vault.decrypt(&tampered) {
            Err(err) => assert!(err.is_decryption_failure(), "{err}"),
            Ok(value) => assert_ne!(value, degree_payload()),
        }
    }
}

#[test]
fn test_gcm_tampering_is_always_detected() {
    let vault = setup_vault(CipherMode::Gcm);
    let blob = vault.encrypt(&degree_payload()).unwrap();
    assert_eq!(blob.version(), 2);
    assert_eq!(blob.iv().len(), 12);

    for index in 0..blob.ciphertext().len() {
        let mut data = blob.ciphertext().to_vec();
        data[index] ^= 0x80;
        let tampered = CiphertextBlob::from_parts(CipherMode::Gcm, blob.iv().to_vec(), data).unwrap();
        assert!(matches!(vault.decrypt(&tampered), Err(VaultError::Authentication { .. })));
    }

    let mut iv = blob.iv().to_vec();
    iv[0] ^= 0x01;
    let tampered = CiphertextBlob::from_parts(CipherMode::Gcm, iv, blob.ciphertext().to_vec()).unwrap();
    assert!(matches!(vault.decrypt(&tampered), Err(VaultError::Authentication { .. })));
}

#[test]
fn test_edge_payloads_round_trip() {
    let vault = setup_vault(CipherMode::Cbc);

    let empty = vault.encrypt(&json!({})).unwrap();
    assert_eq!(empty.ciphertext().len(), 16);
    assert_eq!(vault.decrypt(&empty).unwrap(), json!({}));

    let large = json!("x".repeat(1024 * 1024));
    let blob = vault.encrypt(&large).unwrap();
    assert_eq!(vault.decrypt(&blob).unwrap(), large);
}

#[test]
fn test_typed_decryption() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Credential {
        r#type: String,
        title: String,
    }
    #[derive(Debug, Deserialize)]
    struct Envelope {
        holder: String,
        credential: Credential,
    }

    let vault = setup_vault(CipherMode::Cbc);
    let blob = vault.encrypt(&degree_payload()).unwrap();
    let envelope: Envelope = vault.decrypt_as(&blob).unwrap();
    assert_eq!(envelope.holder, "0xABC");
    assert_eq!(envelope.credential, Credential { r#type: "degree".into(), title: "B.Tech".into() });

    let wrong_shape = vault.decrypt_as::<Vec<u8>>(&blob).unwrap_err();
    assert!(matches!(wrong_shape, VaultError::Decode { .. }));
}

#[test]
fn test_unserializable_payload_is_serialization_error() {
    let mut map = HashMap::new();
    map.insert((1, 2), 3);

    let err = setup_vault(CipherMode::Cbc).encrypt(&map).unwrap_err();
    assert!(matches!(err, VaultError::Serialization { .. }), "got {err}");
    assert_eq!(err.kind(), "serialization");
}

#[derive(Serialize)]
struct Grade {
    gpa: f64,
}

#[test]
fn test_non_finite_numbers_are_serialization_errors() {
    let vault = setup_vault(CipherMode::Cbc);

    for gpa in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let err = vault.encrypt(&Grade { gpa }).unwrap_err();
        assert!(matches!(err, VaultError::Serialization { .. }), "got {err}");
    }

    let nested = json!({ "credential": { "scores": [1.0, 2.5] } });
    assert!(vault.encrypt(&nested).is_ok());
    assert!(matches!(
        setup_vault(CipherMode::Gcm).encrypt(&vec![1.0_f32, f32::NAN]),
        Err(VaultError::Serialization { .. })
    ));
}

#[test]
fn test_entropy_failure_aborts_encryption() {
    let vault = Vault::builder().secret(SECRET).unwrap().entropy(FailingEntropy).build();
    let err = vault.encrypt(&degree_payload()).unwrap_err();

    assert!(matches!(err, VaultError::RandomnessUnavailable { .. }));
    assert!(err.to_string().contains("Drawing initialization vector"));
}

#[test]
fn test_empty_secret_is_configuration_error() {
    for secret in ["", "   "] {
        assert!(matches!(
            skc_vault::encrypt(&degree_payload(), secret),
            Err(VaultError::Configuration { .. })
        ));
        assert!(matches!(Vault::builder().secret(secret), Err(VaultError::Configuration { .. })));
    }
}
