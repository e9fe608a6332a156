//! Markdown to plain text transform

use pulldown_cmark::{Event, Options, Parser, TagEnd};

use super::{DocumentTransform, TransformedPayload};

/// Strips Markdown syntax markers, leaving prose with block boundaries
/// preserved as newlines.
pub struct PlainTextTransform;

impl DocumentTransform for PlainTextTransform {
    fn name(&self) -> &'static str {
        "markdown-to-plaintext"
    }

    fn convert(&self, source: &str) -> TransformedPayload {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let parser = Parser::new_ext(source, options);
        let mut body = String::with_capacity(source.len());

        for event in parser {
            match event {
                Event::Text(text) | Event::Code(text) => body.push_str(&text),
                Event::SoftBreak | Event::HardBreak => body.push(' '),
                Event::End(TagEnd::Paragraph)
                | Event::End(TagEnd::Heading(_))
                | Event::End(TagEnd::Item)
                | Event::End(TagEnd::CodeBlock)
                | Event::End(TagEnd::TableRow) => body.push('\n'),
                Event::End(TagEnd::TableCell) => body.push(' '),
                // Raw HTML and structural markers carry no prose.
                _ => {}
            }
        }

        TransformedPayload {
            body,
            content_type: "text/plain",
        }
    }

    fn extension(&self) -> &'static str {
        ".txt"
    }
}
