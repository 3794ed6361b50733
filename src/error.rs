use std::fmt;
use std::io;
use thiserror::Error;

/// Why a file failed signature validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Fewer bytes than the magic signature.
    TooShort { len: u64 },
    /// First four bytes are not the magic signature.
    BadMagic { found: [u8; 4] },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::TooShort { len } => write!(f, "file is only {len} byte(s) long"),
            InvalidReason::BadMagic { found } => {
                write!(f, "bad signature {}", hex::encode(found))
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid or not a Vectorworks script plug-in ({0})")]
    InvalidFile(InvalidReason),
    #[error("Attribute '{0}' does not exist")]
    FieldNotFound(String),
    #[error("Too many attributes match '{query}': {}", candidates.join(", "))]
    FieldAmbiguous {
        query:      String,
        candidates: Vec<&'static str>,
    },
    #[error("Attribute '{0}' is read only and can't be changed")]
    ReadOnlyField(&'static str),
    #[error("Unsupported plug-in format version: {0}")]
    UnsupportedVersion(u8),
    #[error("Value '{value}' is not valid for attribute '{field}'")]
    InvalidValue {
        field: &'static str,
        value: String,
    },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
