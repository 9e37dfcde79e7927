use axum::http::StatusCode;
use skc_credentials::CredentialError;
use skc_kernel::server::ApiError;
use skc_storage::StorageError;
use std::borrow::Cow;

/// A specialized [`VerificationError`] enum of this crate.
#[skc_derive::skc_error]
pub enum VerificationError {
    /// The proof or proof request is incomplete.
    #[public = "invalid proof request"]
    #[error("Invalid proof request{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The credential behind a proof request could not be opened.
    #[error("Credential error{}: {source}", format_context(.context))]
    Credential { source: CredentialError, context: Option<Cow<'static, str>> },

    /// The revocation record could not be read or written.
    #[error("Revocation storage error{}: {source}", format_context(.context))]
    Storage { source: StorageError, context: Option<Cow<'static, str>> },

    /// The stored revocation record is not valid JSON.
    #[error("Malformed revocation record{}: {source}", format_context(.context))]
    Record { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// Internal fallback for unexpected issues or logic errors.
    #[error("Internal verification error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl VerificationError {
    pub(crate) fn validation(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation { message: message.into(), context: None }
    }
}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        let (status, kind, public) = match &err {
            VerificationError::Validation { .. } => {
                (StatusCode::BAD_REQUEST, err.kind(), err.public_message())
            }
            VerificationError::Credential { source, .. } => source.public_parts(),
            VerificationError::Storage { .. }
            | VerificationError::Record { .. }
            | VerificationError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, err.kind(), err.public_message())
            }
        };
        Self::reported(status, kind, public, &err)
    }
}
