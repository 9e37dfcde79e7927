/// Product name stamped into published credential metadata.
pub const APP_NAME: &str = "SkillChain Passport";

/// Header carrying the operator token for admin-only endpoints.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const CREDENTIALS_TAG: &str = "Credentials";
pub const VERIFICATION_TAG: &str = "Verification";

// Wire identifiers of the supported ciphers
pub const AES_256_CBC: &str = "aes-256-cbc";
pub const AES_256_GCM: &str = "aes-256-gcm";
