//! Crate-wide error type.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DictError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("dictionary image is truncated or not in the expected compact format")]
    MalformedImage,
    #[error("word {word:?} has frequency 0, which is reserved to mean \"not a word\"; pass --lenient to coerce it to 1")]
    ZeroFrequency { word: Vec<u8> },
}
