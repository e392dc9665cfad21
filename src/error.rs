use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagesortError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("illegal state: {0}")]
    IllegalState(&'static str),

    #[error("not an integer: {0}")]
    BadInteger(String),
}

pub type Result<T> = std::result::Result<T, PagesortError>;
