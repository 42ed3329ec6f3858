use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FormError {
    #[error("element not found: #{0}")]
    MissingElement(String),

    #[error("element #{id} is not {expected}")]
    WrongKind { id: String, expected: &'static str },

    #[error("expected {expected} output slots, found {found}")]
    SlotCount { expected: usize, found: usize },
}

#[derive(Debug, Error)]
pub enum DrawError {
    #[error("random source unavailable: {0}")]
    RandomSource(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Form(#[from] FormError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: this field is required")]
    Required { field: String },

    #[error("{field}: not a valid integer value: {value:?}")]
    NotANumber { field: String, value: String },

    #[error("{field}: number must be between {min} and {max}")]
    OutOfRange { field: String, min: u32, max: u32 },

    #[error("each number must be unique ({0} repeated)")]
    Duplicate(u32),

    #[error("expected {expected} numbers, got {found}")]
    WrongCount { expected: usize, found: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("password must be at least {0} characters")]
    TooShort(usize),

    #[error("password must be at most {0} characters")]
    TooLong(usize),

    #[error("password must contain at least one digit")]
    MissingDigit,

    #[error("password must contain at least one lowercase character")]
    MissingLowercase,

    #[error("password must contain at least one uppercase character")]
    MissingUppercase,

    #[error("password must contain at least one special character")]
    MissingSpecial,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Io { path: String, source: io::Error },

    #[error("could not parse config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Everything the command line front end can fail with.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Draw(#[from] DrawError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Policy(#[from] PolicyViolation),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not encode output: {0}")]
    Output(#[from] serde_json::Error),
}
