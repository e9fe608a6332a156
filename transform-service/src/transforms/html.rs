//! Markdown to HTML transform

use pulldown_cmark::{html, Options, Parser};

use super::{DocumentTransform, TransformedPayload};

/// Renders the full Markdown feature set to semantic HTML.
pub struct HtmlTransform;

impl HtmlTransform {
    fn parser_options() -> Options {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options
    }
}

impl DocumentTransform for HtmlTransform {
    fn name(&self) -> &'static str {
        "markdown-to-html"
    }

    fn convert(&self, source: &str) -> TransformedPayload {
        let parser = Parser::new_ext(source, Self::parser_options());
        let mut body = String::with_capacity(source.len() * 3 / 2);
        html::push_html(&mut body, parser);

        TransformedPayload {
            body,
            content_type: "text/html",
        }
    }

    fn extension(&self) -> &'static str {
        ".html"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_heading_renders_as_h1() {
        let payload = HtmlTransform.convert("# Hi");
        assert_eq!(payload.body, "<h1>Hi</h1>\n");
        assert_eq!(payload.content_type, "text/html");
    }

    #[test]
    fn test_plain_ascii_is_identity_in_a_paragraph() {
        let payload = HtmlTransform.convert("hello world");
        assert_eq!(payload.body, "<p>hello world</p>\n");
    }

    #[test]
    fn test_emphasis_and_lists() {
        let payload = HtmlTransform.convert("- **bold** item\n- plain item\n");
        assert!(payload.body.contains("<ul>"));
        assert!(payload.body.contains("<strong>bold</strong>"));
        assert!(payload.body.contains("<li>plain item</li>"));
    }

    #[test]
    fn test_links_and_code_blocks() {
        let payload = HtmlTransform.convert("[site](https://example.com)\n\n```\nlet x = 1;\n```\n");
        assert!(payload.body.contains(r#"<a href="https://example.com">site</a>"#));
        assert!(payload.body.contains("<pre><code>let x = 1;\n</code></pre>"));
    }

    #[test]
    fn test_tables_are_rendered() {
        let payload = HtmlTransform.convert("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(payload.body.contains("<table>"));
        assert!(payload.body.contains("<td>1</td>"));
    }

    #[test]
    fn test_malformed_markdown_degrades_gracefully() {
        // Unclosed emphasis is still legal input; the renderer emits text.
        let payload = HtmlTransform.convert("**unclosed");
        assert!(payload.body.contains("unclosed"));
    }
}
