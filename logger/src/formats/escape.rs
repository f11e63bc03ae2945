//! Escaping helpers shared by the markup/data formatters.

#[must_use]
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

#[must_use]
pub fn html_escape(text: &str) -> String {
    xml_escape(text)
}

#[must_use]
pub fn csv_field(text: &str, separator: char, quote: char) -> String {
    if text.contains(separator) || text.contains(quote) || text.contains('\n') {
        let doubled = text.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{doubled}{quote}")
    } else {
        text.to_string()
    }
}

#[must_use]
pub fn sql_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('\'', "''")
}

#[must_use]
pub fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
