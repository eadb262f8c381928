use unicode_normalization::UnicodeNormalization;

/// Normalize text scraped from a table cell.
///
/// Listing cells mix `&nbsp;`, line breaks and decomposed accents. The
/// result is NFC with every whitespace run (non-breaking included) turned
/// into one space, trimmed at both ends.
pub fn normalize_cell_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    nfc.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_nfc() {
        // n + combining tilde -> ñ (precomposed)
        assert_eq!(normalize_cell_text("Nun\u{0303}ez"), "Nuñez");
    }

    #[test]
    fn test_collapses_whitespace() {
        let input = "\n   State\u{a0}v.\t\tSmith \r\n ";
        assert_eq!(normalize_cell_text(input), "State v. Smith");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_cell_text(" \u{a0} "), "");
    }
}
