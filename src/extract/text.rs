//! Text cleanup applied to every extracted title and description.

/// The HTML parser decodes every entity exactly once, turning `&#8217;`,
/// `&hellip;` and `&#8211;` into typographic characters. These fold to the
/// ASCII forms the bookmark UI shows.
const TYPOGRAPHIC: &[(char, &str)] = &[
    ('\u{2019}', "'"),
    ('\u{2026}', "..."),
    ('\u{2013}', "-"),
];

/// Replace right single quotes, ellipses and en dashes with ASCII.
pub fn fold_typographic(text: &str) -> String {
    text.chars().fold(String::with_capacity(text.len()), |mut acc, c| {
        match TYPOGRAPHIC.iter().find(|(t, _)| *t == c) {
            Some(&(_, ascii)) => acc.push_str(ascii),
            None => acc.push(c),
        }
        acc
    })
}

/// Collapse every run of whitespace (newlines and tabs included) into a
/// single space and trim both ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Clean parser-decoded text for display.
///
/// Literal U+2019, U+2026 and U+2013 in the page are folded too, since after
/// parsing they cannot be told apart from their entity forms. No further
/// entity decoding happens here, so text escaped twice in the page (`&amp;amp;`)
/// keeps its single remaining escape.
pub fn normalize(text: &str) -> String {
    collapse_whitespace(&fold_typographic(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_typographic_punctuation() {
        assert_eq!(fold_typographic("It\u{2019}s 1\u{2013}2\u{2026}"), "It's 1-2...");
    }

    #[test]
    fn leaves_plain_text_alone() {
        assert_eq!(fold_typographic("nothing to see"), "nothing to see");
    }

    #[test]
    fn does_not_decode_entity_text() {
        assert_eq!(normalize("Use &amp; and &lt;div&gt;"), "Use &amp; and &lt;div&gt;");
    }

    #[test]
    fn collapses_newlines_tabs_and_runs() {
        assert_eq!(collapse_whitespace("Line1\n\n  Line2"), "Line1 Line2");
        assert_eq!(collapse_whitespace("\t a \t b \r\n"), "a b");
    }

    #[test]
    fn non_breaking_space_counts_as_whitespace() {
        assert_eq!(collapse_whitespace("a\u{a0}\u{a0}b"), "a b");
    }

    #[test]
    fn normalize_folds_then_collapses() {
        assert_eq!(normalize("  Post \u{2013}\n Site  "), "Post - Site");
    }

    #[test]
    fn whitespace_only_normalizes_to_empty() {
        assert_eq!(normalize(" \n\t "), "");
    }
}
