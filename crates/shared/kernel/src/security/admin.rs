use axum::http::HeaderMap;
use sha2::{Digest, Sha256};
use skc_domain::constants::ADMIN_TOKEN_HEADER;
use std::borrow::Cow;
use std::fmt;

#[skc_derive::skc_error]
pub enum AdminGuardError {
    #[public = "admin endpoint is disabled"]
    #[error("Admin token not configured{}: {message}", format_context(.context))]
    NotConfigured { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
    #[public = "unauthorized"]
    #[error("Admin authorization failed{}: {message}", format_context(.context))]
    Unauthorized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Checks the operator token presented in the `x-admin-token` header.
///
/// Only the SHA-256 digest of the configured token is kept. Presented tokens are hashed
/// and compared in constant time over the digest bytes.
#[derive(Clone, Default)]
pub struct AdminGuard {
    digest: Option<[u8; 32]>,
}

impl AdminGuard {
    /// Builds a guard; a missing or blank token disables admin access.
    #[must_use]
    pub fn new(token: Option<&str>) -> Self {
        let digest = token.map(str::trim).filter(|t| !t.is_empty()).map(|t| hash(t.as_bytes()));
        Self { digest }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.digest.is_some()
    }

    /// Verifies a presented token.
    ///
    /// # Errors
    /// * [`AdminGuardError::NotConfigured`] If no admin token is configured.
    /// * [`AdminGuardError::Unauthorized`] If the token is missing or wrong.
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AdminGuardError> {
        let Some(expected) = &self.digest else {
            return Err(AdminGuardError::NotConfigured {
                message: "security.admin_token is unset".into(),
                context: None,
            });
        };
        let presented = presented.ok_or_else(|| AdminGuardError::Unauthorized {
            message: "missing admin token".into(),
            context: None,
        })?;

        let actual = hash(presented.trim().as_bytes());
        let diff = expected.iter().zip(actual.iter()).fold(0u8, |acc, (a, b)| acc | (a ^ b));
        if diff == 0 {
            Ok(())
        } else {
            Err(AdminGuardError::Unauthorized { message: "admin token mismatch".into(), context: None })
        }
    }

    /// Verifies the token carried in the request headers.
    ///
    /// # Errors
    /// See [`AdminGuard::verify`].
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), AdminGuardError> {
        let presented = headers.get(ADMIN_TOKEN_HEADER).and_then(|v| v.to_str().ok());
        self.verify(presented)
    }
}

impl fmt::Debug for AdminGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminGuard").field("enabled", &self.is_enabled()).finish()
    }
}

fn hash(bytes: &[u8]) -> [u8; 32] {
    Sha256::digest(bytes).into()
}
