use skc_domain::constants::{AES_256_CBC, AES_256_GCM, APP_NAME};

#[test]
fn constants_match_wire_strings() {
    assert_eq!(APP_NAME, "SkillChain Passport");
    assert_eq!(AES_256_CBC, "aes-256-cbc");
    assert_eq!(AES_256_GCM, "aes-256-gcm");
}
