//! CSS child-reference extraction: `@import` and `url(...)` references,
//! producing the same `(raw_ref, line, column, base_override?)` records as
//! the HTML extractor. The grammar needed here is one function-call
//! syntax, not worth a full CSS-parsing dependency, so it's matched with a
//! regex instead.

use regex::Regex;
use std::sync::OnceLock;

use linkchecker_types::ChildRef;

use crate::position::line_column_at;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"url\(\s*(['"]?)([^'")]+)\1\s*\)"#).expect("static CSS url() pattern is valid")
    })
}

/// Matches only the bare-string `@import "x";` form. `@import url(...)` is
/// already covered by [`url_pattern`], so this pattern deliberately does
/// not match it — matching both would double-count the same reference.
fn import_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#"@import\s+['"]([^'"]+)['"]"#).expect("static CSS @import pattern is valid"))
}

/// Extract every `url(...)` and `@import` reference from a CSS document.
#[must_use]
pub fn extract(css: &str) -> Vec<ChildRef> {
    let mut refs = Vec::new();

    for capture in url_pattern().captures_iter(css) {
        let Some(m) = capture.get(2) else { continue };
        push_ref(&mut refs, css, m.as_str(), m.start());
    }

    for capture in import_pattern().captures_iter(css) {
        let Some(m) = capture.get(1) else { continue };
        push_ref(&mut refs, css, m.as_str(), m.start());
    }

    refs
}

fn push_ref(refs: &mut Vec<ChildRef>, css: &str, raw_ref: &str, offset: usize) {
    if raw_ref.is_empty() {
        return;
    }
    let (line, column) = line_column_at(css, offset);
    refs.push(ChildRef {
        raw_ref: raw_ref.to_string(),
        line: Some(line),
        column: Some(column),
        base_override: None,
    });
}
