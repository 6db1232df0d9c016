//! Plain-text rendering helpers for showing embed source.

use super::EmbedDocument;
use super::limits::TEXT_PAGE_LIMIT;

const FENCE_OPEN: &str = "```json\n";
const FENCE_CLOSE: &str = "\n```";

/// Splits `text` into chunks of at most `limit` characters, breaking on line
/// boundaries where possible.
///
/// The newline at each line break between pages is dropped, so joining the
/// pages with `\n` gives back `text` unless a line had to be hard-split.
/// Lines longer than `limit` are hard-split. Returns at least one chunk,
/// possibly empty.
pub fn paginate_text(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut pages = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    // Blank lines count, so a page holding only "" is still a started page.
    let mut lines_in_page = 0;

    for line in text.split('\n') {
        let mut rest: Vec<char> = line.chars().collect();

        // Hard-split lines that can never fit.
        while rest.len() > limit {
            if lines_in_page > 0 {
                pages.push(std::mem::take(&mut current));
                current_len = 0;
                lines_in_page = 0;
            }
            let tail = rest.split_off(limit);
            pages.push(rest.into_iter().collect());
            rest = tail;
        }

        if lines_in_page > 0 && current_len + 1 + rest.len() > limit {
            pages.push(std::mem::take(&mut current));
            current_len = 0;
            lines_in_page = 0;
        }
        if lines_in_page > 0 {
            current.push('\n');
            current_len += 1;
        }
        current_len += rest.len();
        current.extend(rest);
        lines_in_page += 1;
    }

    if lines_in_page > 0 || pages.is_empty() {
        pages.push(current);
    }
    pages
}

/// Pretty JSON of `document` split into code-fenced pages that each fit in a
/// single plain message.
pub fn source_pages(document: &EmbedDocument) -> serde_json::Result<Vec<String>> {
    let json = document.to_json_pretty()?;
    let budget = TEXT_PAGE_LIMIT - FENCE_OPEN.len() - FENCE_CLOSE.len();

    Ok(paginate_text(&json, budget)
        .into_iter()
        .map(|chunk| format!("{FENCE_OPEN}{chunk}{FENCE_CLOSE}"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::EmbedDraft;

    #[test]
    fn test_short_text_is_one_page() {
        assert_eq!(paginate_text("a\nb", 10), vec!["a\nb".to_string()]);
    }

    #[test]
    fn test_breaks_on_lines() {
        let pages = paginate_text("aaaa\nbbbb\ncccc", 9);
        assert_eq!(pages, vec!["aaaa\nbbbb".to_string(), "cccc".to_string()]);
    }

    #[test]
    fn test_hard_splits_long_line() {
        let pages = paginate_text("abcdefghij", 4);
        assert_eq!(pages, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_blank_lines_survive_page_breaks() {
        let text = "aaa\n\n\nbb\n\n";
        let pages = paginate_text(text, 3);
        assert_eq!(pages, vec!["aaa", "\n", "bb\n", ""]);
        assert_eq!(pages.join("\n"), text);

        let text = "\n\nlead";
        assert_eq!(paginate_text(text, 10), vec![text.to_string()]);
    }

    #[test]
    fn test_empty_text_yields_one_page() {
        assert_eq!(paginate_text("", 5), vec![String::new()]);
    }

    #[test]
    fn test_source_pages_fit_message_limit() {
        let mut draft = EmbedDraft::new().with_title("Long");
        for i in 0..25 {
            draft = draft.with_field(format!("field {i}"), "v".repeat(200), false);
        }
        let document = draft.build().unwrap();

        let pages = source_pages(&document).unwrap();
        assert!(pages.len() > 1);
        for page in &pages {
            assert!(page.len() <= TEXT_PAGE_LIMIT);
            assert!(page.starts_with("```json\n"));
            assert!(page.ends_with("\n```"));
        }
    }
}
