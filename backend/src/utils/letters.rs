use rand::Rng;

/// Letters used to fill cells no word occupies
pub const ALPHABET: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pick a filler letter uniformly from A-Z
pub fn random_letter<R: Rng + ?Sized>(rng: &mut R) -> char {
    ALPHABET[rng.random_range(0..ALPHABET.len())] as char
}

/// True for a non-empty word made only of uppercase A-Z
pub fn is_puzzle_word(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_uppercase())
}

/// Trim and uppercase a word read from configuration
pub fn normalize_word(word: &str) -> String {
    word.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_random_letter_is_uppercase() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let letter = random_letter(&mut rng);
            assert!(letter.is_ascii_uppercase(), "unexpected filler '{}'", letter);
        }
    }

    #[test]
    fn test_random_letter_covers_alphabet() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 26];
        for _ in 0..5_000 {
            seen[(random_letter(&mut rng) as u8 - b'A') as usize] = true;
        }
        assert!(seen.iter().all(|s| *s), "every letter should eventually appear");
    }

    #[test]
    fn test_is_puzzle_word() {
        assert!(is_puzzle_word("TREX"));
        assert!(is_puzzle_word("A"));
        assert!(!is_puzzle_word(""));
        assert!(!is_puzzle_word("trex"));
        assert!(!is_puzzle_word("T-REX"));
        assert!(!is_puzzle_word("ÉCLAIR"));
    }

    #[test]
    fn test_normalize_word() {
        assert_eq!(normalize_word("  shark "), "SHARK");
        assert_eq!(normalize_word("Coral"), "CORAL");
    }
}
