//! HTML/XHTML child-reference extraction, producing a lazy sequence of
//! `(raw_ref, line, column, base_override?)` records.
//!
//! `scraper` doesn't expose source spans through its simple selector API,
//! so line/column are recovered by locating the reference's first byte
//! offset in the original document text. This is a best-effort diagnostic,
//! not a guarantee of uniqueness.

use linkchecker_types::ChildRef;
use scraper::{Html, Selector};

use crate::position::line_column_at;

/// `(selector, attribute)` pairs naming every element/attribute combination
/// that carries a followable reference.
const REFERENCE_ATTRIBUTES: &[(&str, &str)] = &[
    ("a[href]", "href"),
    ("area[href]", "href"),
    ("link[href]", "href"),
    ("img[src]", "src"),
    ("script[src]", "src"),
    ("iframe[src]", "src"),
    ("frame[src]", "src"),
];

/// A document-level `<base href>` overrides the page URL as the resolution
/// base for every reference that follows it.
const BASE_SELECTOR: &str = "base[href]";

/// Extract every followable reference from an HTML (or XHTML) document.
///
/// Returns references in document order. A `<base href>` element, if
/// present, is applied as `base_override` on every reference — matching
/// HTML's actual base-resolution semantics, where one `<base>` affects the
/// whole document, not just references after it in source order, since
/// base resolution happens at render/link-time rather than parse order.
#[must_use]
pub fn extract(html: &str) -> Vec<ChildRef> {
    let document = Html::parse_document(html);

    let base_override = Selector::parse(BASE_SELECTOR)
        .ok()
        .and_then(|selector| document.select(&selector).next())
        .and_then(|el| el.value().attr("href"))
        .map(str::to_string);

    let mut refs = Vec::new();
    for (selector_str, attr) in REFERENCE_ATTRIBUTES {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        for element in document.select(&selector) {
            let Some(value) = element.value().attr(attr) else {
                continue;
            };
            if value.trim().is_empty() {
                continue;
            }
            let offset = html.find(value).unwrap_or(0);
            let (line, column) = line_column_at(html, offset);
            refs.push(ChildRef {
                raw_ref: value.to_string(),
                line: Some(line),
                column: Some(column),
                base_override: base_override.clone(),
            });
        }
    }
    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_anchor_and_image_references() {
        let html = r#"<html><body><a href="b.html">b</a><img src="pic.png"></body></html>"#;
        let refs = extract(html);
        let raw: Vec<_> = refs.iter().map(|r| r.raw_ref.as_str()).collect();
        assert!(raw.contains(&"b.html"));
        assert!(raw.contains(&"pic.png"));
    }

    #[test]
    fn empty_href_is_skipped() {
        let html = r#"<a href="">empty</a>"#;
        assert!(extract(html).is_empty());
    }

    #[test]
    fn base_href_overrides_every_reference() {
        let html = r#"<html><head><base href="https://example.com/sub/"></head>
<body><a href="page.html">p</a></body></html>"#;
        let refs = extract(html);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].base_override.as_deref(), Some("https://example.com/sub/"));
    }

    #[test]
    fn line_numbers_advance_with_document_position() {
        let html = "<html>\n<body>\n<a href=\"first\">1</a>\n<a href=\"second\">2</a>\n</body></html>";
        let refs = extract(html);
        assert_eq!(refs.len(), 2);
        assert!(refs[1].line.unwrap() > refs[0].line.unwrap());
    }
}
