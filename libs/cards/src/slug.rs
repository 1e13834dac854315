//! Slugs for public card URLs

use rand::Rng;
use regex::Regex;
use std::sync::OnceLock;

/// Width of the `cards.slug` column
pub const SLUG_MAX_LEN: usize = 191;

const SUFFIX_LEN: usize = 4;
const BASE_MAX_LEN: usize = 60;
const SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Lowercase, drop punctuation and join words with single hyphens
pub fn slugify(value: &str) -> String {
    static STRIP: OnceLock<Regex> = OnceLock::new();
    static SEPARATORS: OnceLock<Regex> = OnceLock::new();

    let strip = STRIP
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("Failed to compile slug regex"));
    let separators = SEPARATORS
        .get_or_init(|| Regex::new(r"[\s_-]+").expect("Failed to compile slug regex"));

    let lowered = value.trim().to_lowercase();
    let stripped = strip.replace_all(&lowered, "");
    let joined = separators.replace_all(&stripped, "-");
    joined.trim_matches('-').to_string()
}

pub fn random_suffix() -> String {
    let mut rng = rand::thread_rng();
    (0..SUFFIX_LEN)
        .map(|_| SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())] as char)
        .collect()
}

/// `<slugified name>-<4 base36 chars>`; an empty base becomes `card`
pub fn generate_slug(display_name: &str) -> String {
    let mut base = slugify(display_name);
    if base.len() > BASE_MAX_LEN {
        base.truncate(BASE_MAX_LEN);
        base = base.trim_end_matches('-').to_string();
    }
    if base.is_empty() {
        base = "card".to_string();
    }

    format!("{base}-{}", random_suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Alex Doe"), "alex-doe");
        assert_eq!(slugify("  Acme  Studio, Inc.  "), "acme-studio-inc");
        assert_eq!(slugify("snake_case -- words"), "snake-case-words");
        assert_eq!(slugify("---edge---"), "edge");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn test_generate_slug_shape() {
        let slug = generate_slug("Alex Doe");
        let (base, suffix) = slug.rsplit_once('-').unwrap();

        assert_eq!(base, "alex-doe");
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.bytes().all(|b| SUFFIX_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_generate_slug_empty_base() {
        assert!(generate_slug("???").starts_with("card-"));
        assert!(generate_slug("").starts_with("card-"));
    }

    #[test]
    fn test_generate_slug_truncates_long_names() {
        let slug = generate_slug(&"word ".repeat(40));
        assert!(slug.len() <= BASE_MAX_LEN + 1 + SUFFIX_LEN);
        assert!(!slug.contains("--"));
    }
}
