//! Small helpers for title text.

/// Collapse runs of whitespace into single spaces and trim the ends.
pub fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key for a title: trimmed and lower-cased.
pub fn title_key(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Whether the text contains at least one CJK unified ideograph.
pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(|c| ('\u{4e00}'..='\u{9fff}').contains(&c))
}

/// Whether the text is mostly Latin: fewer than 30% of its characters are
/// outside ASCII. Empty text is not.
pub fn is_mostly_latin(text: &str) -> bool {
    let total = text.chars().count();
    if total == 0 {
        return false;
    }
    let non_ascii = text.chars().filter(|c| !c.is_ascii()).count();
    (non_ascii as f64) < (total as f64) * 0.3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_title() {
        assert_eq!(normalize_title("  Elden\t Ring \n"), "Elden Ring");
        assert_eq!(normalize_title(""), "");
    }

    #[test]
    fn test_title_key() {
        assert_eq!(title_key("  Elden Ring "), "elden ring");
        assert_eq!(title_key("艾尔登法环\n"), "艾尔登法环");
    }

    #[test]
    fn test_contains_cjk() {
        assert!(contains_cjk("艾尔登法环"));
        assert!(contains_cjk("FF7 重制版"));
        assert!(!contains_cjk("Elden Ring"));
        assert!(!contains_cjk("ゼルダ"));
    }

    #[test]
    fn test_is_mostly_latin() {
        assert!(is_mostly_latin("Elden Ring"));
        assert!(is_mostly_latin("Pokémon Legends"));
        assert!(!is_mostly_latin("艾尔登法环"));
        assert!(!is_mostly_latin(""));
    }
}
