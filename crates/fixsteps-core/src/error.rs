use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Document error: {0}")]
    Document(String),

    #[error("No steps found")]
    EmptyRegistry,

    #[error("Duplicate step id: {0}")]
    DuplicateStep(String),

    #[error("Layout does not match registered steps: expected {expected:?}, found {found:?}")]
    LayoutMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
