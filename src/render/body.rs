//! Plain-text to HTML promotion.

/// Returns true when a text body already carries HTML markup and can be
/// rendered as-is.
pub fn looks_like_html(text: &str) -> bool {
    let lower = text.to_ascii_lowercase();
    ["<html", "<body", "<div", "<p", "<br", "<table"]
        .iter()
        .any(|tag| lower.contains(tag))
}

/// Converts a plain-text body to minimal HTML: escape, auto-link
/// `http(s)://` URLs, then turn newlines into `<br>`.
///
/// Linkification runs before the newline pass so a URL at end of line
/// never swallows the `<br>` tag.
pub fn text_to_html(text: &str) -> String {
    let escaped = escape_html(text);
    let linked = linkify(&escaped);
    linked.replace('\n', "<br>\n")
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps bare `http://` / `https://` URLs in anchor tags. Operates on
/// already-escaped text, so a URL run ends at whitespace or a raw `<`.
fn linkify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = find_url_start(rest) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let end = tail
            .find(|c: char| c.is_whitespace() || c == '<')
            .unwrap_or(tail.len());
        let url = &tail[..end];
        out.push_str("<a href=\"");
        out.push_str(url);
        out.push_str("\">");
        out.push_str(url);
        out.push_str("</a>");
        rest = &tail[end..];
    }
    out.push_str(rest);
    out
}

fn find_url_start(s: &str) -> Option<usize> {
    match (s.find("http://"), s.find("https://")) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>\"a\" & 'b'</b>"),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_text_to_html_newlines() {
        assert_eq!(text_to_html("one\ntwo"), "one<br>\ntwo");
    }

    #[test]
    fn test_text_to_html_links() {
        let html = text_to_html("see https://example.com/x for details");
        assert_eq!(
            html,
            "see <a href=\"https://example.com/x\">https://example.com/x</a> for details"
        );
    }

    #[test]
    fn test_url_at_end_of_line_keeps_break() {
        let html = text_to_html("go to http://example.com\nnext line");
        assert_eq!(
            html,
            "go to <a href=\"http://example.com\">http://example.com</a><br>\nnext line"
        );
    }

    #[test]
    fn test_text_with_markup_is_escaped_not_rendered() {
        let html = text_to_html("a < b > c");
        assert_eq!(html, "a &lt; b &gt; c");
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<HTML><body>x</body></HTML>"));
        assert!(looks_like_html("line one<br>line two"));
        assert!(!looks_like_html("plain text with a < sign"));
    }
}
