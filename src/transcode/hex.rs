//! Text <-> contiguous lowercase hex pairs of UTF-8 bytes

use super::types::{Classified, DecodeError};
use hex::FromHexError;

pub fn classify(input: &str) -> Classified<'_> {
    match try_decode(input) {
        Ok(_) => Classified::Encoded(input),
        Err(_) => Classified::PlainText(input),
    }
}

pub fn encode(text: &str) -> String {
    hex::encode(text.as_bytes())
}

/// Strictly decode hex pairs. No separators are allowed inside the input.
pub fn try_decode(input: &str) -> Result<String, DecodeError> {
    let digits = input.trim();
    if digits.is_empty() {
        return Err(DecodeError::Empty);
    }

    let bytes = hex::decode(digits).map_err(|err| match err {
        FromHexError::OddLength | FromHexError::InvalidStringLength => {
            DecodeError::Length(digits.len(), 2)
        }
        FromHexError::InvalidHexCharacter { c, .. } => DecodeError::InvalidChunk(c.to_string()),
    })?;

    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode("Hello"), "48656c6c6f");
        assert_eq!(encode("é"), "c3a9");
    }

    #[test]
    fn test_decode() {
        assert_eq!(try_decode("48656c6c6f").unwrap(), "Hello");
        assert_eq!(try_decode("48656C6C6F").unwrap(), "Hello");
        assert_eq!(try_decode(" c3a9\n").unwrap(), "é");
    }

    #[test]
    fn test_decode_failures_fall_back_to_plain() {
        assert_eq!(try_decode("486"), Err(DecodeError::Length(3, 2)));
        assert_eq!(
            try_decode("48 6"),
            Err(DecodeError::InvalidChunk(" ".to_string()))
        );
        assert_eq!(try_decode("+f"), Err(DecodeError::InvalidChunk("+".to_string())));
        assert_eq!(try_decode("cafe"), Err(DecodeError::InvalidUtf8));
        assert_eq!(classify("Hello"), Classified::PlainText("Hello"));
        assert_eq!(classify("cafe"), Classified::PlainText("cafe"));
    }

    #[test]
    fn test_non_ascii_input_is_plain_text() {
        assert!(matches!(try_decode("éé"), Err(DecodeError::InvalidChunk(_))));
        assert_eq!(classify("éé"), Classified::PlainText("éé"));
        assert_eq!(encode("éé"), "c3a9c3a9");
    }

    #[test]
    fn test_classify_hex() {
        assert_eq!(classify("48656c6c6f"), Classified::Encoded("48656c6c6f"));
    }

    #[test]
    fn test_round_trip_printable_ascii() {
        let text: String = (0x20u8..0x7f).map(char::from).collect();
        assert_eq!(try_decode(&encode(&text)).unwrap(), text);
    }
}
