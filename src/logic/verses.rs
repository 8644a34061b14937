use crate::error::{CatalogError, CatalogResult};
use crate::model::{Pagination, VersePage};

pub const VERSE_DELIMITER: &str = "\n\n";

/// Split lyrics into verses on blank lines, keeping their order.
pub fn split_verses(text: &str) -> Vec<&str> {
    text.split(VERSE_DELIMITER).collect()
}

/// Return the requested page of verses.
///
/// A page starting past the last verse is `NotFound`, not an empty page.
pub fn paginate_verses(text: &str, pagination: Pagination) -> CatalogResult<VersePage> {
    let verses = split_verses(text);
    let total = verses.len();

    let start = usize::try_from(pagination.offset()).unwrap_or(usize::MAX);
    if start >= total {
        return Err(CatalogError::not_found("No verses on this page"));
    }

    let limit = usize::try_from(pagination.limit()).unwrap_or(usize::MAX);
    let end = start.saturating_add(limit).min(total);

    Ok(VersePage {
        page: pagination.page(),
        limit: pagination.limit(),
        verses: verses[start..end].iter().map(|v| v.to_string()).collect(),
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(page: i64, limit: i64) -> Pagination {
        Pagination::new(page, limit).unwrap()
    }

    #[test]
    fn test_split_verses_on_blank_lines() {
        assert_eq!(split_verses("A\n\nB\n\nC"), vec!["A", "B", "C"]);
        assert_eq!(
            split_verses("line one\nline two\n\nchorus"),
            vec!["line one\nline two", "chorus"]
        );
        assert_eq!(split_verses(""), vec![""]);
    }

    #[test]
    fn test_paginate_three_verses() {
        let text = "A\n\nB\n\nC";

        let first = paginate_verses(text, page(1, 2)).unwrap();
        assert_eq!(first.verses, vec!["A", "B"]);
        assert_eq!(first.total, 3);

        let second = paginate_verses(text, page(2, 2)).unwrap();
        assert_eq!(second.verses, vec!["C"]);
        assert_eq!(second.total, 3);
        assert_eq!(second.page, 2);
        assert_eq!(second.limit, 2);

        let third = paginate_verses(text, page(3, 2)).unwrap_err();
        assert!(third.is_not_found());
    }

    #[test]
    fn test_limit_larger_than_song() {
        let result = paginate_verses("A\n\nB", page(1, 50)).unwrap();
        assert_eq!(result.verses, vec!["A", "B"]);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_empty_text_has_a_single_empty_verse() {
        let result = paginate_verses("", page(1, 2)).unwrap();
        assert_eq!(result.verses, vec![""]);
        assert_eq!(result.total, 1);

        assert!(paginate_verses("", page(2, 1)).unwrap_err().is_not_found());
    }

    #[test]
    fn test_split_is_deterministic() {
        let text = "Ooh baby\n\nYou set my soul alight\n\nGlaciers melting";
        assert_eq!(split_verses(text), split_verses(text));
    }
}
