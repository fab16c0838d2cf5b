//! URL slug generation for posts and categories.

/// Convert a title into a URL slug.
///
/// Lowercases the input, keeps ASCII letters, digits and underscores, turns
/// whitespace and hyphen runs into a single hyphen and drops every other
/// character. The result never starts or ends with a hyphen.
///
/// Slugs are not checked for uniqueness; two posts with the same title get
/// the same slug.
pub fn create_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        } else if c == '-' || c.is_whitespace() {
            pending_hyphen = true;
        }
    }

    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation() {
        assert_eq!(create_slug("Hello, World!"), "hello-world");
    }

    #[test]
    fn collapses_whitespace_and_hyphens() {
        assert_eq!(create_slug("  a  --  b\t\nc "), "a-b-c");
    }

    #[test]
    fn removed_characters_do_not_separate_words() {
        assert_eq!(create_slug("don't"), "dont");
        assert_eq!(create_slug("C++ & Rust"), "c-rust");
    }

    #[test]
    fn non_ascii_letters_are_dropped() {
        assert_eq!(create_slug("Café au lait"), "caf-au-lait");
    }

    #[test]
    fn underscores_are_word_characters() {
        assert_eq!(create_slug("snake_case_title"), "snake_case_title");
        assert_eq!(create_slug("_private notes_"), "_private-notes_");
        assert_eq!(create_slug("my_post - draft"), "my_post-draft");
    }

    #[test]
    fn empty_and_symbol_only_titles() {
        assert_eq!(create_slug(""), "");
        assert_eq!(create_slug("!!! ---"), "");
    }

    #[test]
    fn idempotent() {
        for title in [
            "Hello, World!",
            "Is WX Eclipse powerful?",
            "  leading and trailing  ",
            "multi---hyphen",
            "Ünïcödé -- mix_42",
        ] {
            let once = create_slug(title);
            assert_eq!(create_slug(&once), once, "title: {title:?}");
        }
    }

    #[test]
    fn output_alphabet() {
        let slug = create_slug("-- The Quick (brown) fox_2: 100% done! --");
        assert_eq!(slug, "the-quick-brown-fox_2-100-done");
        assert!(
            slug.chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
        );
        assert!(!slug.starts_with('-') && !slug.ends_with('-'));
        assert!(!slug.contains("--"));
    }
}
