//! Script classification for deciding which fallback a query deserves

/// Hiragana or katakana
pub fn is_kana(c: char) -> bool {
    matches!(c, '\u{3040}'..='\u{309F}' | '\u{30A0}'..='\u{30FF}')
}

/// Common CJK unified ideographs
pub fn is_cjk_ideograph(c: char) -> bool {
    matches!(c, '\u{4E00}'..='\u{9FA5}')
}

pub fn contains_kana(text: &str) -> bool {
    text.chars().any(is_kana)
}

/// Ideographs without any kana: likely Chinese rather than Japanese
pub fn looks_chinese(text: &str) -> bool {
    text.chars().any(is_cjk_ideograph) && !contains_kana(text)
}
