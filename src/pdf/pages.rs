//! Page selection parsing
//!
//! Both parsers accept comma-separated items of the form `N` or `N-M`
//! (1-indexed, whitespace allowed) and reject anything outside
//! `1..=max_pages` instead of clamping it.

use crate::error::{Error, Result};

fn invalid(range: &str) -> Error {
    Error::InvalidPageRange {
        range: range.to_string(),
    }
}

fn parse_page(s: &str, range: &str, max_pages: u32) -> Result<u32> {
    let page: u32 = s.trim().parse().map_err(|_| invalid(range))?;
    if page < 1 || page > max_pages {
        return Err(Error::InvalidPageRange {
            range: format!("page {} out of range (1-{}) in \"{}\"", page, max_pages, range),
        });
    }
    Ok(page)
}

/// Split `range` into items, yielding each as a (start, end) pair
fn parse_items(range: &str, max_pages: u32) -> Result<Vec<(u32, u32)>> {
    let mut items = Vec::new();

    for part in range.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            let start = parse_page(start, range, max_pages)?;
            let end = parse_page(end, range, max_pages)?;
            items.push((start, end));
        } else {
            let page = parse_page(part, range, max_pages)?;
            items.push((page, page));
        }
    }

    if items.is_empty() {
        return Err(invalid(range));
    }
    Ok(items)
}

/// Parse a page set (e.g., "1-5,10,15-20") into sorted, deduplicated pages.
///
/// Ranges must be ascending.
pub fn parse_page_ranges(range: &str, max_pages: u32) -> Result<Vec<u32>> {
    let mut pages = Vec::new();

    for (start, end) in parse_items(range, max_pages)? {
        if start > end {
            return Err(invalid(range));
        }
        pages.extend(start..=end);
    }

    pages.sort_unstable();
    pages.dedup();
    Ok(pages)
}

/// Parse a page order (e.g., "3,1-2,5-4") keeping the given order.
///
/// Descending ranges expand backwards and repeated pages are kept.
pub fn parse_page_order(order: &str, max_pages: u32) -> Result<Vec<u32>> {
    let mut pages = Vec::new();

    for (start, end) in parse_items(order, max_pages)? {
        if start <= end {
            pages.extend(start..=end);
        } else {
            pages.extend((end..=start).rev());
        }
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1-3", vec![1, 2, 3])]
    #[case("1,3,5", vec![1, 3, 5])]
    #[case("1-3,5,7-9", vec![1, 2, 3, 5, 7, 8, 9])]
    #[case("1,1,2,2", vec![1, 2])]
    #[case("5, 2-3 ,", vec![2, 3, 5])]
    #[case("10", vec![10])]
    fn test_parse_page_ranges(#[case] range: &str, #[case] expected: Vec<u32>) {
        assert_eq!(parse_page_ranges(range, 10).unwrap(), expected);
    }

    #[rstest]
    #[case("0-3")]
    #[case("1-15")]
    #[case("11")]
    #[case("5-3")]
    #[case("abc")]
    #[case("1-")]
    #[case("")]
    #[case(" , ")]
    fn test_parse_page_ranges_invalid(#[case] range: &str) {
        assert!(matches!(
            parse_page_ranges(range, 10),
            Err(Error::InvalidPageRange { .. })
        ));
    }

    #[rstest]
    #[case("3,1,2", vec![3, 1, 2])]
    #[case("4-2", vec![4, 3, 2])]
    #[case("2,1-3", vec![2, 1, 2, 3])]
    #[case("5-5,1", vec![5, 1])]
    fn test_parse_page_order(#[case] order: &str, #[case] expected: Vec<u32>) {
        assert_eq!(parse_page_order(order, 5).unwrap(), expected);
    }

    #[test]
    fn test_parse_page_order_rejects_out_of_range() {
        assert!(parse_page_order("1,6", 5).is_err());
        assert!(parse_page_order("0", 5).is_err());
        assert!(parse_page_order("6-1", 5).is_err());
    }

    #[test]
    fn test_out_of_range_message_names_page() {
        let err = parse_page_ranges("2,12", 10).unwrap_err();
        assert!(err.to_string().contains("page 12 out of range (1-10)"));
    }
}
