// ============================================================
// Layer 3 — Symbol Vocabulary
// ============================================================
// Maps every character to a small integer "pixel value".
//
// The alphabet is closed and has exactly 96 symbols:
//
//   ID 0        → PAD (padding and every character we don't know)
//   ID 1..=95   → printable ASCII, space (32) through tilde (126)
//
//   id = code_point - 31
//
//   ' ' (32) →  1
//   'A' (65) → 34
//   '~' (126) → 95
//   '\n'     →  0   (control characters are not printable)
//   'é'      →  0   (anything outside ASCII)
//
// The mapping is a const fn, so there is no table to initialise
// and nothing to share between threads.

/// One cell of a grid. Always in `0..VOCAB_SIZE`.
pub type SymbolId = u8;

/// Padding symbol, also used for out-of-vocabulary characters.
pub const PAD_ID: SymbolId = 0;

/// PAD plus the 95 printable ASCII characters.
pub const VOCAB_SIZE: usize = 96;

const FIRST_PRINTABLE: u32 = 32;
const LAST_PRINTABLE: u32 = 126;
const PRINTABLE_OFFSET: u32 = 31;

/// True for code points in the printable ASCII range (space to `~`).
pub const fn is_printable(code: u32) -> bool {
    code >= FIRST_PRINTABLE && code <= LAST_PRINTABLE
}

/// Map a character to its symbol ID. Never fails.
pub const fn char_to_id(c: char) -> SymbolId {
    let code = c as u32;
    if is_printable(code) {
        (code - PRINTABLE_OFFSET) as SymbolId
    } else {
        PAD_ID
    }
}

/// Inverse of [`char_to_id`] for the printable range.
/// PAD and IDs outside the vocabulary have no character.
pub fn id_to_char(id: SymbolId) -> Option<char> {
    if id == PAD_ID || id as usize >= VOCAB_SIZE {
        return None;
    }
    char::from_u32(id as u32 + PRINTABLE_OFFSET)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_boundaries() {
        assert!(!is_printable(31));
        assert!(is_printable(32));
        assert!(is_printable(65));
        assert!(is_printable(126));
        assert!(!is_printable(127));
    }

    #[test]
    fn test_known_characters() {
        assert_eq!(char_to_id(' '), 1);
        assert_eq!(char_to_id('A'), 34);
        assert_eq!(char_to_id('~'), 95);
        assert_eq!(char_to_id('H'), 41);
        assert_eq!(char_to_id('i'), 74);
        assert_eq!(char_to_id('!'), 2);
    }

    #[test]
    fn test_non_printable_maps_to_pad() {
        for c in ['\n', '\t', '\r', '\0', '\u{7f}', 'é', '€', '你', '🦀'] {
            assert_eq!(char_to_id(c), PAD_ID, "{c:?} should be PAD");
        }
    }

    #[test]
    fn test_printable_follows_offset_rule() {
        for code in 32u32..=126 {
            let c = char::from_u32(code).unwrap();
            assert_eq!(char_to_id(c) as u32, code - 31);
        }
    }

    #[test]
    fn test_every_id_is_reachable() {
        let mut seen = [false; VOCAB_SIZE];
        seen[char_to_id('\n') as usize] = true;
        for code in 32u32..=126 {
            seen[char_to_id(char::from_u32(code).unwrap()) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_id_to_char_inverts_printable_range() {
        for id in 1..VOCAB_SIZE as SymbolId {
            let c = id_to_char(id).unwrap();
            assert_eq!(char_to_id(c), id);
        }
        assert_eq!(id_to_char(PAD_ID), None);
        assert_eq!(id_to_char(96), None);
    }
}
