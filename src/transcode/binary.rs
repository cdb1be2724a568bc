//! Text <-> space-separated 8-bit binary groups

use super::types::{Classified, DecodeError};
use regex::Regex;
use std::sync::LazyLock;

const CHUNK_WIDTH: usize = 8;

static CHUNK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[01]{8}$").expect("binary chunk pattern is valid"));

/// Split input into 8-character chunks.
///
/// Any whitespace (including line breaks) separates chunks. A single unbroken
/// run of digits is cut into 8-character pieces instead.
fn chunks(input: &str) -> Vec<&str> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if let [run] = parts[..] {
        if run.len() > CHUNK_WIDTH && run.is_ascii() && run.len() % CHUNK_WIDTH == 0 {
            return (0..run.len())
                .step_by(CHUNK_WIDTH)
                .map(|i| &run[i..i + CHUNK_WIDTH])
                .collect();
        }
    }

    parts
}

pub fn classify(input: &str) -> Classified<'_> {
    let chunks = chunks(input);
    let digits: usize = chunks.iter().map(|c| c.len()).sum();

    if !chunks.is_empty()
        && digits % CHUNK_WIDTH == 0
        && chunks.iter().all(|c| CHUNK_RE.is_match(c))
    {
        Classified::Encoded(input)
    } else {
        Classified::PlainText(input)
    }
}

pub fn encode(text: &str) -> String {
    text.chars()
        .map(|c| format!("{:08b}", c as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn try_decode(input: &str) -> Result<String, DecodeError> {
    let chunks = chunks(input);
    if chunks.is_empty() {
        return Err(DecodeError::Empty);
    }

    let digits: usize = chunks.iter().map(|c| c.len()).sum();
    if digits % CHUNK_WIDTH != 0 {
        return Err(DecodeError::Length(digits, CHUNK_WIDTH));
    }

    chunks
        .iter()
        .map(|chunk| {
            if !CHUNK_RE.is_match(chunk) {
                return Err(DecodeError::InvalidChunk(chunk.to_string()));
            }
            u8::from_str_radix(chunk, 2)
                .map(char::from)
                .map_err(|_| DecodeError::InvalidChunk(chunk.to_string()))
        })
        .collect()
}
