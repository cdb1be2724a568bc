//! Morse code direction detection and the built-in lookup table

use super::types::{Classified, Direction};
use crate::error::{FunBotError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Lookup service that converts between text and Morse symbols
pub trait MorseTable: Send + Sync {
    fn translate(&self, text: &str, direction: Direction) -> String;
}

const LETTER_GAP: &str = " ";
const WORD_GAP: &str = "   ";

const CODES: &[(char, &str)] = &[
    ('A', ".-"),
    ('B', "-..."),
    ('C', "-.-."),
    ('D', "-.."),
    ('E', "."),
    ('F', "..-."),
    ('G', "--."),
    ('H', "...."),
    ('I', ".."),
    ('J', ".---"),
    ('K', "-.-"),
    ('L', ".-.."),
    ('M', "--"),
    ('N', "-."),
    ('O', "---"),
    ('P', ".--."),
    ('Q', "--.-"),
    ('R', ".-."),
    ('S', "..."),
    ('T', "-"),
    ('U', "..-"),
    ('V', "...-"),
    ('W', ".--"),
    ('X', "-..-"),
    ('Y', "-.--"),
    ('Z', "--.."),
    ('0', "-----"),
    ('1', ".----"),
    ('2', "..---"),
    ('3', "...--"),
    ('4', "....-"),
    ('5', "....."),
    ('6', "-...."),
    ('7', "--..."),
    ('8', "---.."),
    ('9', "----."),
    ('.', ".-.-.-"),
    (',', "--..--"),
    ('?', "..--.."),
    ('\'', ".----."),
    ('!', "-.-.--"),
    ('/', "-..-."),
    ('(', "-.--."),
    (')', "-.--.-"),
    ('&', ".-..."),
    (':', "---..."),
    (';', "-.-.-."),
    ('=', "-...-"),
    ('+', ".-.-."),
    ('-', "-....-"),
    ('_', "..--.-"),
    ('"', ".-..-."),
    ('$', "...-..-"),
    ('@', ".--.-."),
];

static WORD_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("word gap pattern is valid"));

/// International Morse code table: one space between letters, three between words.
pub struct ItuMorseTable {
    to_code: HashMap<char, &'static str>,
    to_char: HashMap<&'static str, char>,
}

impl ItuMorseTable {
    pub fn new() -> Self {
        Self {
            to_code: CODES.iter().copied().collect(),
            to_char: CODES.iter().map(|&(c, code)| (code, c)).collect(),
        }
    }

    fn encode(&self, text: &str) -> String {
        text.split_whitespace()
            .map(|word| {
                word.chars()
                    .filter_map(|c| self.to_code.get(&c.to_ascii_uppercase()).copied())
                    .collect::<Vec<_>>()
                    .join(LETTER_GAP)
            })
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(WORD_GAP)
    }

    fn decode(&self, code: &str) -> String {
        WORD_SPLIT_RE
            .split(code.trim())
            .map(|word| {
                word.split_whitespace()
                    .filter_map(|symbol| self.to_char.get(symbol).copied())
                    .collect::<String>()
            })
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for ItuMorseTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MorseTable for ItuMorseTable {
    fn translate(&self, text: &str, direction: Direction) -> String {
        match direction {
            Direction::Encode => self.encode(text),
            Direction::Decode => self.decode(text),
        }
    }
}

/// Input made only of dots, dashes and spaces is treated as Morse.
///
/// Line breaks count as spaces, since attachment text arrives with its
/// spaces normalized to line breaks.
pub fn classify(input: &str) -> Classified<'_> {
    let trimmed = input.trim();
    if !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|c| matches!(c, '.' | '-' | ' ' | '\n' | '\r'))
    {
        Classified::Encoded(input)
    } else {
        Classified::PlainText(input)
    }
}

/// Run the lookup in the detected direction and reject degenerate output
pub fn transcode(table: &impl MorseTable, input: &str) -> Result<String> {
    let classified = classify(input);
    let direction = classified.direction();
    let output = table.translate(classified.text(), direction);

    if output.chars().count() <= 1 {
        tracing::debug!(
            direction = ?direction,
            output_len = output.len(),
            "Morse lookup produced degenerate output"
        );
        return Err(FunBotError::ConversionFailed(
            "that input could not be converted to or from Morse code".to_string(),
        ));
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_examples() {
        assert_eq!(
            classify(".... . .-.. .-.. ---"),
            Classified::Encoded(".... . .-.. .-.. ---")
        );
        assert_eq!(classify("HELLO"), Classified::PlainText("HELLO"));
        assert_eq!(classify("   "), Classified::PlainText("   "));
        assert_eq!(classify("... / ..."), Classified::PlainText("... / ..."));
    }

    #[test]
    fn test_decode_hello() {
        let table = ItuMorseTable::new();
        assert_eq!(transcode(&table, ".... . .-.. .-.. ---").unwrap(), "HELLO");
    }

    #[test]
    fn test_encode_words() {
        let table = ItuMorseTable::new();
        assert_eq!(
            transcode(&table, "Hi there").unwrap(),
            ".... ..   - .... . .-. ."
        );
    }

    #[test]
    fn test_word_gap_round_trip() {
        let table = ItuMorseTable::new();
        let encoded = transcode(&table, "SOS at 9").unwrap();
        assert_eq!(transcode(&table, &encoded).unwrap(), "SOS AT 9");
    }

    #[test]
    fn test_line_breaks_act_as_gaps() {
        let table = ItuMorseTable::new();
        let input = "....\n..\n\n\n-\n....\n.\n.-.\n.";
        assert_eq!(classify(input), Classified::Encoded(input));
        assert_eq!(transcode(&table, input).unwrap(), "HI THERE");
    }

    #[test]
    fn test_degenerate_output_is_conversion_failure() {
        let table = ItuMorseTable::new();
        // "E" is a single dot
        assert!(matches!(
            transcode(&table, "E"),
            Err(FunBotError::ConversionFailed(_))
        ));
        assert!(matches!(
            transcode(&table, "~~~"),
            Err(FunBotError::ConversionFailed(_))
        ));
        assert!(matches!(
            transcode(&table, "........"),
            Err(FunBotError::ConversionFailed(_))
        ));
    }

    struct EchoTable;

    impl MorseTable for EchoTable {
        fn translate(&self, text: &str, direction: Direction) -> String {
            format!("{:?}:{}", direction, text)
        }
    }

    #[test]
    fn test_direction_passed_to_lookup() {
        assert_eq!(transcode(&EchoTable, "-.-").unwrap(), "Decode:-.-");
        assert_eq!(transcode(&EchoTable, "abc").unwrap(), "Encode:abc");
    }
}
