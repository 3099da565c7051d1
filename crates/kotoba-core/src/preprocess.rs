use unicode_normalization::UnicodeNormalization;

/// Canonical form of a user query before it hits the scrape target.
///
/// NFKC folds half-width katakana and full-width ASCII; line breaks from
/// pasted text are dropped.
pub fn normalize_query(text: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    text.nfkc()
        .filter(|c| *c != '\n' && *c != '\r')
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize_query;

    #[test]
    fn folds_width_variants() {
        assert_eq!(normalize_query("ｶﾀｶﾅ"), "カタカナ");
        assert_eq!(normalize_query("ＡＢＣ"), "ABC");
    }

    #[test]
    fn drops_surrounding_space_and_newlines() {
        assert_eq!(normalize_query("\u{3000}猫\r\n"), "猫");
        assert_eq!(normalize_query("食べ\nる"), "食べる");
        assert_eq!(normalize_query("   "), "");
    }
}
