//! Invisible Unicode control characters left behind by scraped text.

/// Inclusive codepoint ranges flagged in addresses.
pub const INVISIBLE_RANGES: &[(char, char)] = &[
    // LEFT-TO-RIGHT MARK, RIGHT-TO-LEFT MARK
    ('\u{200E}', '\u{200F}'),
    // LRE, RLE, PDF, LRO, RLO
    ('\u{202A}', '\u{202E}'),
    // LRI, RLI, FSI, PDI
    ('\u{2066}', '\u{2069}'),
    // BYTE ORDER MARK / ZERO WIDTH NO-BREAK SPACE
    ('\u{FEFF}', '\u{FEFF}'),
];

pub fn is_invisible(c: char) -> bool {
    INVISIBLE_RANGES
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&c))
}

/// Whether any character of `text` is in [`INVISIBLE_RANGES`].
pub fn contains_invisible(text: &str) -> bool {
    text.chars().any(is_invisible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_listed_codepoint_detected() {
        let listed = [
            0x200E, 0x200F, 0x202A, 0x202B, 0x202C, 0x202D, 0x202E, 0x2066, 0x2067, 0x2068,
            0x2069, 0xFEFF,
        ];
        for cp in listed {
            let c = char::from_u32(cp).unwrap();
            assert!(is_invisible(c), "U+{cp:04X} not detected");
        }
    }

    #[test]
    fn test_neighbours_not_detected() {
        // Zero-width space/joiners and the range neighbours are out of scope.
        for cp in [0x200B, 0x200C, 0x200D, 0x2029, 0x202F, 0x2065, 0x206A, 0xFEFE] {
            let c = char::from_u32(cp).unwrap();
            assert!(!is_invisible(c), "U+{cp:04X} wrongly detected");
        }
    }

    #[test]
    fn test_contains_invisible() {
        assert!(contains_invisible("Av. Paulista, 1000\u{200E}"));
        assert!(!contains_invisible("Rua Augusta, 500 - São Paulo"));
        assert!(!contains_invisible(""));
    }
}
