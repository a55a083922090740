use std::sync::LazyLock;

use regex::Regex;

/// Two to four letters (`en`, `fil`), or two two-letter segments (`pt-BR`).
static LOCALE_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z]{2,4}|[A-Za-z]{2}-[A-Za-z]{2})$").expect("locale pattern is valid")
});

/// Whether a directory name looks like a locale code.
pub fn is_locale_code(name: &str) -> bool {
    LOCALE_CODE.is_match(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_locale_codes() {
        for code in ["en", "fr", "fil", "zh-CN", "pt-br", "Hant"] {
            assert!(is_locale_code(code), "{} should be a locale code", code);
        }
    }

    #[test]
    fn test_rejects_other_names() {
        for name in ["e", "english", "zh_CN", "zh-Hant", "en-", "", "node_modules", ".git", "12"] {
            assert!(!is_locale_code(name), "{} should not be a locale code", name);
        }
    }
}
