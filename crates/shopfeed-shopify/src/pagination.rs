//! Cursor pagination via the Admin API `Link` response header.
//!
//! Each listing response carries URLs for adjacent pages in the `Link`
//! header, with the cursor encoded as a `page_info` query parameter:
//!
//! ```text
//! <https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=PREV>; rel="previous",
//! <https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=NEXT>; rel="next"
//! ```

/// Extracts the `page_info` cursor for the next page from a `Link` header.
///
/// Returns `None` when no header was present, when there is no
/// `rel="next"` segment (last page), or when the next URL carries no
/// `page_info` parameter.
#[must_use]
pub fn extract_next_cursor(link_header: Option<&str>) -> Option<String> {
    let header = link_header?;

    for segment in header.split(',') {
        let segment = segment.trim();
        if !segment.contains(r#"rel="next""#) {
            continue;
        }

        let url = segment.get(segment.find('<')? + 1..segment.find('>')?)?;
        return page_info_param(url);
    }

    None
}

/// Pulls the `page_info` value out of a URL's query string.
///
/// Cursors are base64url-encoded, so no percent-decoding is needed.
fn page_info_param(url: &str) -> Option<String> {
    let query = url.split_once('?')?.1;
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("page_info="))
        .map(|value| value.split('#').next().unwrap_or(value))
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn returns_none_without_header() {
        assert!(extract_next_cursor(None).is_none());
        assert!(extract_next_cursor(Some("")).is_none());
    }

    #[test]
    fn extracts_cursor_from_single_next_link() {
        let header = r#"<https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=eyJsYXN0X2lkIjo2fQ>; rel="next""#;
        assert_eq!(
            extract_next_cursor(Some(header)).as_deref(),
            Some("eyJsYXN0X2lkIjo2fQ")
        );
    }

    #[test]
    fn extracts_cursor_from_combined_prev_next_link() {
        let header = concat!(
            r#"<https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=PREV>; rel="previous", "#,
            r#"<https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=NEXT>; rel="next""#
        );
        assert_eq!(extract_next_cursor(Some(header)).as_deref(), Some("NEXT"));
    }

    #[test]
    fn returns_none_on_last_page() {
        let header = r#"<https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&page_info=PREV>; rel="previous""#;
        assert!(extract_next_cursor(Some(header)).is_none());
    }

    #[test]
    fn returns_none_when_next_url_has_no_cursor() {
        let header = r#"<https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250>; rel="next""#;
        assert!(extract_next_cursor(Some(header)).is_none());
    }

    #[test]
    fn cursor_may_follow_other_query_params() {
        let header = r#"<https://shop.myshopify.com/admin/api/2024-01/products.json?limit=250&fields=id&page_info=CURSOR123>; rel="next""#;
        assert_eq!(
            extract_next_cursor(Some(header)).as_deref(),
            Some("CURSOR123")
        );
    }
}
