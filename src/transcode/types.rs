use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Text encodings the bot can convert to and from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingScheme {
    Binary,
    Hex,
    Morse,
    Caesar,
}

impl EncodingScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binary => "binary",
            Self::Hex => "hex",
            Self::Morse => "morse",
            Self::Caesar => "caesar",
        }
    }

    /// Caesar replies are always inline; everything else goes through the relay policy
    pub fn is_relayed(&self) -> bool {
        !matches!(self, Self::Caesar)
    }
}

impl fmt::Display for EncodingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EncodingScheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binary" => Ok(Self::Binary),
            "hex" => Ok(Self::Hex),
            "morse" => Ok(Self::Morse),
            "caesar" => Ok(Self::Caesar),
            other => Err(format!("unknown encoding scheme: {}", other)),
        }
    }
}

/// Which way a conversion runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encode,
    Decode,
}

/// Result of inspecting user input before converting it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classified<'a> {
    /// Human-readable text that should be encoded
    PlainText(&'a str),
    /// Input that already looks like the encoded form
    Encoded(&'a str),
}

impl<'a> Classified<'a> {
    pub fn direction(&self) -> Direction {
        match self {
            Self::PlainText(_) => Direction::Encode,
            Self::Encoded(_) => Direction::Decode,
        }
    }

    pub fn text(&self) -> &'a str {
        match *self {
            Self::PlainText(text) | Self::Encoded(text) => text,
        }
    }
}

/// Why an encoded-looking input could not be decoded
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("input is empty")]
    Empty,

    #[error("length {0} is not a multiple of {1}")]
    Length(usize, usize),

    #[error("invalid chunk '{0}'")]
    InvalidChunk(String),

    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Converted text plus the relay decision for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeResult {
    pub text: String,
    pub too_long_for_inline: bool,
}

impl TranscodeResult {
    pub fn inline(text: String) -> Self {
        Self {
            text,
            too_long_for_inline: false,
        }
    }
}
