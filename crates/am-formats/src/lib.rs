//! Audio file formats for ambimix.
//!
//! Only 16-bit integer PCM WAV is read; everything else is rejected so the
//! caller can fall back to synthesis.

mod wav_format;

pub use wav_format::{decode_wav, load_wav, write_wav};

use std::fmt;

/// Error type for format parsing.
#[derive(Debug)]
pub enum FormatError {
    /// Not a RIFF/WAVE stream, or a malformed one
    InvalidHeader(String),
    /// Valid WAV in a sample format we do not play
    Unsupported { bits: u16, float: bool },
    /// Header promised more sample data than the stream held
    UnexpectedEof,
    /// I/O error
    Io(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::InvalidHeader(msg) => write!(f, "invalid WAV header: {}", msg),
            FormatError::Unsupported { bits, float } => write!(
                f,
                "unsupported sample format: {}-bit {}",
                bits,
                if *float { "float" } else { "integer" }
            ),
            FormatError::UnexpectedEof => write!(f, "unexpected end of sample data"),
            FormatError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<hound::Error> for FormatError {
    fn from(err: hound::Error) -> Self {
        match err {
            hound::Error::IoError(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                FormatError::UnexpectedEof
            }
            hound::Error::IoError(e) => FormatError::Io(e.to_string()),
            hound::Error::FormatError(msg) => FormatError::InvalidHeader(msg.to_string()),
            other => FormatError::InvalidHeader(other.to_string()),
        }
    }
}
