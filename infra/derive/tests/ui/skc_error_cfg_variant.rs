use skc_derive::skc_error;
use std::borrow::Cow;

#[skc_error]
pub enum GatedError {
    #[cfg(any())]
    #[public = "never compiled"]
    #[error("Gated{}: {message}", format_context(.context))]
    Gated { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn main() {
    assert_eq!(GatedError::from(String::from("x")).kind(), "internal");
}
