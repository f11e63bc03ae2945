//! HTML/CSS content extractors behind one input/output contract: feed in a
//! content-type and a body, get back a lazy sequence of
//! [`linkchecker_types::ChildRef`]s (`raw_ref`, `line`, `column`,
//! `base_override?`).

mod css;
mod html;
mod position;

use linkchecker_types::ChildRef;

/// Extract child references from `content`, dispatching on `content_type`.
/// Returns an empty `Vec` for any content-type other than text/html,
/// application/xhtml+xml, or text/css.
#[must_use]
pub fn extract(content_type: &str, content: &str) -> Vec<ChildRef> {
    let base = content_type.split(';').next().unwrap_or(content_type).trim();
    match base {
        "text/html" | "application/xhtml+xml" => html::extract(content),
        "text/css" => css::extract(content),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatches_html_content_type() {
        let refs = extract("text/html; charset=utf-8", r#"<a href="x">x</a>"#);
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn dispatches_css_content_type() {
        let refs = extract("text/css", "body { background: url(x.png); }");
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn unknown_content_type_yields_nothing() {
        assert!(extract("application/octet-stream", "whatever").is_empty());
    }
}
