use skc_derive::skc_error;
use std::borrow::Cow;

#[skc_error]
pub enum DemoError {
    #[public = "demo resource not found"]
    #[error("Not found{}: {message}", format_context(.context))]
    NotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<Vec<u8>, DemoError> {
    std::fs::read("/definitely/missing").context("reading demo file")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.kind(), "io");
    assert_eq!(DemoError::from("boom").public_message(), "internal error");
}
