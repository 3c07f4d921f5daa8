// src/utils/slug.rs

//! URL-safe handle generation.

use std::sync::OnceLock;

use regex::Regex;

/// Maximum handle length accepted by the storefront.
const MAX_HANDLE_LEN: usize = 200;

fn strip_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^\w\s-]").unwrap())
}

fn collapse_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[-\s]+").unwrap())
}

/// Convert text to a URL-safe handle.
///
/// Lowercases and trims, strips everything outside word characters,
/// whitespace, and hyphens, collapses runs of whitespace and hyphens to
/// a single hyphen, and truncates to the storefront's 200-character
/// handle limit. Pure: the same input always yields the same handle.
pub fn slugify(text: &str) -> String {
    let lowered = text.to_lowercase();
    let trimmed = lowered.trim();
    let stripped = strip_pattern().replace_all(trimmed, "");
    let collapsed = collapse_pattern().replace_all(&stripped, "-");
    collapsed.chars().take(MAX_HANDLE_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slug() {
        assert_eq!(slugify("Hammer-ABC1"), "hammer-abc1");
        assert_eq!(slugify("Claw Hammer 16oz-XYZ9"), "claw-hammer-16oz-xyz9");
    }

    #[test]
    fn test_strips_punctuation() {
        assert_eq!(slugify("Drill (18V, 2Ah)-D18"), "drill-18v-2ah-d18");
        assert_eq!(slugify("Saw & Blade Set-SB1"), "saw-blade-set-sb1");
    }

    #[test]
    fn test_collapses_separator_runs() {
        assert_eq!(slugify("A  -  B-C1"), "a-b-c1");
        assert_eq!(slugify("A --- B-C1"), "a-b-c1");
    }

    #[test]
    fn test_deterministic() {
        let a = slugify("Hammer-ABC1");
        let b = slugify("Hammer-ABC1");
        assert_eq!(a, b);
    }

    #[test]
    fn test_truncates_to_limit() {
        let long = "x".repeat(500);
        assert_eq!(slugify(&long).len(), MAX_HANDLE_LEN);
    }

    #[test]
    fn test_ascii_charset() {
        let slug = slugify("Premium Hammer! (Deluxe)-ABC1");
        assert!(slug.chars().all(|c| c.is_ascii_lowercase()
            || c.is_ascii_digit()
            || c == '-'));
    }
}
