//! HTML text helpers

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>").expect("tag pattern is valid");
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    TAG.replace_all(s, "").into_owned()
}

/// Estimated minutes needed to read rendered HTML, rounded up
pub fn reading_time(html: &str, words_per_minute: usize) -> usize {
    let text = strip_html(html);
    let words = text.split_whitespace().count().max(1);
    words.div_ceil(words_per_minute.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <strong>world</strong></p>"),
            "Hello world"
        );
        assert_eq!(strip_html("no tags"), "no tags");
    }

    #[test]
    fn test_reading_time() {
        let words = vec!["word"; 450].join(" ");
        let html = format!("<p>{}</p>", words);
        assert_eq!(reading_time(&html, 200), 3);
        assert_eq!(reading_time("<p>short</p>", 200), 1);
    }

    #[test]
    fn test_reading_time_empty_counts_one_word() {
        assert_eq!(reading_time("", 200), 1);
        assert_eq!(reading_time("<br/>", 0), 1);
    }
}
