//! Caesar shift over the mixed-case 52-letter alphabet

const ALPHABET: &[u8; 52] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const DEFAULT_OFFSET: usize = 4;

fn position(c: char) -> Option<usize> {
    match c {
        'a'..='z' => Some(c as usize - 'a' as usize),
        'A'..='Z' => Some(26 + c as usize - 'A' as usize),
        _ => None,
    }
}

/// Shift every letter forward by `offset` positions, wrapping from `Z` back to `a`.
pub fn shift(text: &str, offset: usize) -> String {
    let offset = offset % ALPHABET.len();
    text.chars()
        .map(|c| match position(c) {
            Some(idx) => ALPHABET[(idx + offset) % ALPHABET.len()] as char,
            None => c,
        })
        .collect()
}

/// Offset that undoes `shift(_, offset)`
pub fn inverse_offset(offset: usize) -> usize {
    (ALPHABET.len() - offset % ALPHABET.len()) % ALPHABET.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_shift() {
        assert_eq!(shift("abc", 4), "efg");
        assert_eq!(shift("xyz", 4), "BCD");
        assert_eq!(shift("XYZ", 4), "bcd");
        assert_eq!(shift("Hello, World!", 4), "Lipps, asvph!");
    }

    #[test]
    fn test_complementary_offset_restores_text() {
        let alphabet = std::str::from_utf8(ALPHABET).unwrap();
        assert_eq!(inverse_offset(4), 48);
        assert_eq!(shift(&shift(alphabet, 4), 48), alphabet);
        assert_eq!(
            shift(&shift("The Quick Brown Fox", 17), inverse_offset(17)),
            "The Quick Brown Fox"
        );
    }

    #[test]
    fn test_shift_is_bijection() {
        let alphabet = std::str::from_utf8(ALPHABET).unwrap();
        let mut shifted: Vec<char> = shift(alphabet, 4).chars().collect();
        shifted.sort_unstable();
        let mut expected: Vec<char> = alphabet.chars().collect();
        expected.sort_unstable();
        assert_eq!(shifted, expected);
    }

    #[test]
    fn test_non_letters_unchanged() {
        let text = "123 !?-_ éß 🦀";
        assert_eq!(shift(text, 4), text);
        assert_eq!(shift(text, 48), text);
    }

    #[test]
    fn test_zero_and_full_offsets() {
        assert_eq!(shift("Hello", 0), "Hello");
        assert_eq!(shift("Hello", 52), "Hello");
        assert_eq!(inverse_offset(0), 0);
    }
}
