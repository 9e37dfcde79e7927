use std::borrow::Cow;

/// A specialized [`StorageError`] enum of this crate.
#[skc_derive::skc_error]
pub enum StorageError {
    #[public = "credential not found"]
    #[error("Content not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[public = "invalid credential address"]
    #[error("Invalid content address{}: {message}", format_context(.context))]
    InvalidAddress { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Stored bytes no longer hash to their address.
    #[public = "stored credential failed its integrity check"]
    #[error("Corrupted content{}: {message}", format_context(.context))]
    Corrupted { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Path traversal security violation{}: {message}", format_context(.context))]
    PathTraversalAttempt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid storage configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
