use std::fmt;

/// Result type for typist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced while setting up a typing session
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// Config file could not be encoded or decoded
    Config(serde_json::Error),

    /// Sentence pack or sentences file is unusable
    Sentences(String),

    /// A custom prompt was given but contains nothing to type
    EmptyPrompt,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Config(err) => write!(f, "Configuration error: {}", err),
            Error::Sentences(msg) => write!(f, "Sentence source error: {}", msg),
            Error::EmptyPrompt => write!(f, "Prompt must contain at least one character"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Config(err) => Some(err),
            Error::Sentences(_) | Error::EmptyPrompt => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Config(err)
    }
}
