//! Rich-text to HTML conversion
//!
//! Turns the rich-text fragment lists carried by post bodies into HTML.
//! The output of this module is the trusted markup the renderer embeds
//! directly into pages: text is escaped here and nowhere downstream.

use crate::api::{FormatSpan, RichTextFragment};

/// Convert a fragment sequence into an HTML string.
///
/// Adjacent list items are folded into a single `<ul>`; unknown fragment
/// types render as paragraphs.
pub fn as_html(fragments: &[RichTextFragment]) -> String {
    let mut html = String::new();
    let mut open_list = false;

    for fragment in fragments {
        let is_list_item = fragment.fragment_type == "list-item";
        if open_list && !is_list_item {
            html.push_str("</ul>\n");
            open_list = false;
        }

        let inner = spanned_text(&fragment.text, &fragment.spans);
        match fragment.fragment_type.as_str() {
            "heading2" => {
                html.push_str("<h2>");
                html.push_str(&inner);
                html.push_str("</h2>\n");
            }
            "heading3" => {
                html.push_str("<h3>");
                html.push_str(&inner);
                html.push_str("</h3>\n");
            }
            "preformatted" => {
                html.push_str("<pre>");
                html.push_str(&inner);
                html.push_str("</pre>\n");
            }
            "list-item" => {
                if !open_list {
                    html.push_str("<ul>\n");
                    open_list = true;
                }
                html.push_str("<li>");
                html.push_str(&inner);
                html.push_str("</li>\n");
            }
            _ => {
                html.push_str("<p>");
                html.push_str(&inner);
                html.push_str("</p>\n");
            }
        }
    }

    if open_list {
        html.push_str("</ul>\n");
    }

    html
}

/// Apply formatting spans to a fragment's text, escaping as it goes.
///
/// Span offsets are character positions in the source text. Spans that run
/// out of range, overlap an earlier span, or carry an unknown type are
/// dropped.
fn spanned_text(text: &str, spans: &[FormatSpan]) -> String {
    let chars: Vec<char> = text.chars().collect();

    let mut candidates: Vec<&FormatSpan> = spans
        .iter()
        .filter(|s| s.start < s.end && s.end <= chars.len() && is_known_span(s))
        .collect();
    candidates.sort_by_key(|s| (s.start, s.end));

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in candidates {
        if span.start < cursor {
            continue;
        }
        push_escaped(&mut out, &chars[cursor..span.start]);
        let (open, close) = span_tags(span);
        out.push_str(&open);
        push_escaped(&mut out, &chars[span.start..span.end]);
        out.push_str(close);
        cursor = span.end;
    }
    push_escaped(&mut out, &chars[cursor..]);

    out
}

fn is_known_span(span: &FormatSpan) -> bool {
    matches!(span.span_type.as_str(), "strong" | "em" | "hyperlink")
}

fn span_tags(span: &FormatSpan) -> (String, &'static str) {
    match span.span_type.as_str() {
        "strong" => ("<strong>".to_string(), "</strong>"),
        "em" => ("<em>".to_string(), "</em>"),
        "hyperlink" => {
            let url = span.url.as_deref().unwrap_or("");
            (format!(r#"<a href="{}">"#, escape(url)), "</a>")
        }
        _ => (String::new(), ""),
    }
}

fn push_escaped(out: &mut String, chars: &[char]) {
    for &c in chars {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}

/// Escape HTML special characters
fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(fragment_type: &str, text: &str, spans: Vec<FormatSpan>) -> RichTextFragment {
        RichTextFragment {
            fragment_type: fragment_type.to_string(),
            text: text.to_string(),
            spans,
        }
    }

    fn span(start: usize, end: usize, span_type: &str) -> FormatSpan {
        FormatSpan {
            start,
            end,
            span_type: span_type.to_string(),
            url: None,
        }
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(as_html(&[]), "");
    }

    #[test]
    fn test_paragraph() {
        let html = as_html(&[RichTextFragment::paragraph("hello world")]);
        assert_eq!(html, "<p>hello world</p>\n");
    }

    #[test]
    fn test_unknown_type_falls_back_to_paragraph() {
        let html = as_html(&[fragment("image-caption", "hi", vec![])]);
        assert_eq!(html, "<p>hi</p>\n");
    }

    #[test]
    fn test_text_is_escaped() {
        let html = as_html(&[RichTextFragment::paragraph("a < b & c > d")]);
        assert_eq!(html, "<p>a &lt; b &amp; c &gt; d</p>\n");
    }

    #[test]
    fn test_headings_and_preformatted() {
        let html = as_html(&[
            fragment("heading2", "Section", vec![]),
            fragment("preformatted", "let x = 1;", vec![]),
        ]);
        assert_eq!(html, "<h2>Section</h2>\n<pre>let x = 1;</pre>\n");
    }

    #[test]
    fn test_list_items_fold_into_one_list() {
        let html = as_html(&[
            fragment("list-item", "one", vec![]),
            fragment("list-item", "two", vec![]),
            fragment("paragraph", "after", vec![]),
        ]);
        assert_eq!(
            html,
            "<ul>\n<li>one</li>\n<li>two</li>\n</ul>\n<p>after</p>\n"
        );
    }

    #[test]
    fn test_trailing_list_is_closed() {
        let html = as_html(&[fragment("list-item", "only", vec![])]);
        assert_eq!(html, "<ul>\n<li>only</li>\n</ul>\n");
    }

    #[test]
    fn test_strong_span() {
        let html = as_html(&[fragment("paragraph", "bold text", vec![span(0, 4, "strong")])]);
        assert_eq!(html, "<p><strong>bold</strong> text</p>\n");
    }

    #[test]
    fn test_hyperlink_span_escapes_url() {
        let mut link = span(0, 4, "hyperlink");
        link.url = Some("https://example.com/?a=1&b=\"2\"".to_string());
        let html = as_html(&[fragment("paragraph", "link here", vec![link])]);
        assert_eq!(
            html,
            "<p><a href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\">link</a> here</p>\n"
        );
    }

    #[test]
    fn test_span_over_escaped_text() {
        let html = as_html(&[fragment("paragraph", "a&b c", vec![span(0, 3, "strong")])]);
        assert_eq!(html, "<p><strong>a&amp;b</strong> c</p>\n");
    }

    #[test]
    fn test_out_of_range_span_is_dropped() {
        let html = as_html(&[fragment("paragraph", "short", vec![span(0, 99, "strong")])]);
        assert_eq!(html, "<p>short</p>\n");
    }

    #[test]
    fn test_overlapping_span_is_dropped() {
        let html = as_html(&[fragment(
            "paragraph",
            "abcdef",
            vec![span(0, 4, "strong"), span(2, 6, "em")],
        )]);
        assert_eq!(html, "<p><strong>abcd</strong>ef</p>\n");
    }

    #[test]
    fn test_span_offsets_are_character_based() {
        // "é" is two bytes but one character
        let html = as_html(&[fragment("paragraph", "ébold rest", vec![span(1, 5, "strong")])]);
        assert_eq!(html, "<p>é<strong>bold</strong> rest</p>\n");
    }
}
