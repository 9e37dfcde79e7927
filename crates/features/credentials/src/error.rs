use axum::http::StatusCode;
use skc_kernel::server::ApiError;
use skc_storage::StorageError;
use skc_vault::VaultError;
use std::borrow::Cow;

/// A specialized [`CredentialError`] enum of this crate.
#[skc_derive::skc_error]
pub enum CredentialError {
    /// The issue request is incomplete.
    #[public = "invalid credential request"]
    #[error("Invalid credential request{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Vault error{}: {source}", format_context(.context))]
    Vault { source: VaultError, context: Option<Cow<'static, str>> },

    #[error("Storage error{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    /// A stored document is not a pinned credential.
    #[public = "stored credential is malformed"]
    #[error("Malformed credential document{}: {source}", format_context(.context))]
    Document { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal credential error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl CredentialError {
    pub(crate) fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }

    /// Status code and caller-safe message for the HTTP boundary.
    ///
    /// Nested vault and storage errors report their own public message; every decryption
    /// failure collapses to the same 422.
    #[must_use]
    pub fn public_parts(&self) -> (StatusCode, &'static str, &'static str) {
        match self {
            Self::Validation { .. } => {
                (StatusCode::BAD_REQUEST, self.kind(), self.public_message())
            }
            Self::Document { .. } => {
                (StatusCode::UNPROCESSABLE_ENTITY, self.kind(), self.public_message())
            }
            Self::Vault { source, .. } => {
                let status = if source.is_decryption_failure() {
                    StatusCode::UNPROCESSABLE_ENTITY
                } else if matches!(source, VaultError::Serialization { .. }) {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, source.kind(), source.public_message())
            }
            Self::Storage { source, .. } => {
                let status = match source {
                    StorageError::NotFound { .. } => StatusCode::NOT_FOUND,
                    StorageError::InvalidAddress { .. } => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, source.kind(), source.public_message())
            }
            Self::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.kind(), self.public_message())
            }
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        let (status, kind, public) = err.public_parts();
        Self::reported(status, kind, public, &err)
    }
}
