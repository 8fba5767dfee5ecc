use std::path::PathBuf;
use std::process::ExitCode;

use thiserror::Error;

/// Top-level failure categories. Each one ends the run with its own exit code.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Usage(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl Error {
    pub fn code(&self) -> u8 {
        match self {
            Error::Usage(_) => 2,
            Error::Configuration(_) => 3,
            Error::Extraction(_) => 4,
            Error::Api(_) => 5,
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Failures while turning a document into plain text
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file type for {path:?}: {kind}")]
    Unsupported { path: PathBuf, kind: String },

    #[error("could not parse {path:?} as {format}: {reason}")]
    Corrupt {
        path: PathBuf,
        format: &'static str,
        reason: String,
    },

    #[error("no text could be extracted from {path:?}")]
    Empty { path: PathBuf },
}

/// Failures talking to the summarization service
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("failed to send request to Groq: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Groq API error ({status}): {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("failed to parse Groq response: {0}")]
    Malformed(String),

    #[error("Groq returned no completion")]
    EmptyCompletion,
}
