// SPDX-License-Identifier: MPL-2.0
//! Text extraction from (X)HTML documents.
//!
//! Rendered items are shown on the stage as readable text: headings,
//! paragraphs and list items in document order. Scripts, styles and the
//! `<head>` are skipped. The reader is lenient about unclosed tags since most
//! HTML is not well-formed XML.

use crate::error::RenderError;
use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading(u8),
    Paragraph,
    ListItem,
    Preformatted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub text: String,
}

/// Renderable text content of a markup document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedDocument {
    pub title: Option<String>,
    pub blocks: Vec<TextBlock>,
}

impl RenderedDocument {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Total characters of block text.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.blocks.iter().map(|block| block.text.chars().count()).sum()
    }
}

fn block_kind(name: &[u8]) -> Option<BlockKind> {
    match name.to_ascii_lowercase().as_slice() {
        b"h1" => Some(BlockKind::Heading(1)),
        b"h2" => Some(BlockKind::Heading(2)),
        b"h3" => Some(BlockKind::Heading(3)),
        b"h4" => Some(BlockKind::Heading(4)),
        b"h5" => Some(BlockKind::Heading(5)),
        b"h6" => Some(BlockKind::Heading(6)),
        b"p" | b"div" | b"blockquote" | b"td" | b"th" | b"figcaption" => {
            Some(BlockKind::Paragraph)
        }
        b"li" | b"dt" | b"dd" => Some(BlockKind::ListItem),
        b"pre" => Some(BlockKind::Preformatted),
        _ => None,
    }
}

fn is_skipped(name: &[u8]) -> bool {
    matches!(
        name.to_ascii_lowercase().as_slice(),
        b"script" | b"style" | b"head" | b"noscript" | b"template"
    )
}

struct Builder {
    document: RenderedDocument,
    current: Option<BlockKind>,
    buffer: String,
    in_title: bool,
    skip_depth: usize,
}

impl Builder {
    fn new() -> Self {
        Self {
            document: RenderedDocument::default(),
            current: None,
            buffer: String::new(),
            in_title: false,
            skip_depth: 0,
        }
    }

    fn open(&mut self, kind: BlockKind) {
        self.flush();
        self.current = Some(kind);
    }

    fn flush(&mut self) {
        let text = if self.current == Some(BlockKind::Preformatted) {
            self.buffer.trim_matches('\n').to_string()
        } else {
            self.buffer.split_whitespace().collect::<Vec<_>>().join(" ")
        };
        self.buffer.clear();
        if text.is_empty() {
            return;
        }
        let kind = self.current.unwrap_or(BlockKind::Paragraph);
        self.document.blocks.push(TextBlock { kind, text });
    }

    fn text(&mut self, text: &str) {
        if self.in_title {
            let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !title.is_empty() {
                self.document.title = Some(title);
            }
        } else if self.skip_depth == 0 {
            if !self.buffer.is_empty() && self.current != Some(BlockKind::Preformatted) {
                self.buffer.push(' ');
            }
            self.buffer.push_str(text);
        }
    }

    fn finish(mut self) -> RenderedDocument {
        self.flush();
        self.document
    }
}

/// Extracts the readable text of an (X)HTML document.
///
/// # Errors
///
/// Returns [`RenderError::Malformed`] if the markup cannot be tokenized.
pub fn extract_text(markup: &str) -> Result<RenderedDocument, RenderError> {
    let mut reader = Reader::from_str(markup);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;

    let mut builder = Builder::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if name.eq_ignore_ascii_case(b"title") {
                    builder.in_title = true;
                } else if is_skipped(name) {
                    builder.skip_depth += 1;
                } else if let Some(kind) = block_kind(name) {
                    builder.open(kind);
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                let name = name.as_ref();
                if name.eq_ignore_ascii_case(b"title") {
                    builder.in_title = false;
                } else if is_skipped(name) {
                    builder.skip_depth = builder.skip_depth.saturating_sub(1);
                } else if block_kind(name).is_some() {
                    builder.flush();
                    builder.current = None;
                }
            }
            Ok(Event::Empty(e)) if e.local_name().as_ref().eq_ignore_ascii_case(b"br") => {
                builder.flush();
            }
            Ok(Event::Text(t)) => {
                // Named HTML entities such as `&nbsp;` are unknown to XML.
                let text = match t.unescape() {
                    Ok(text) => text.into_owned(),
                    Err(_) => String::from_utf8_lossy(&t).into_owned(),
                };
                builder.text(&text);
            }
            Ok(Event::CData(t)) => {
                builder.text(&String::from_utf8_lossy(&t));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(RenderError::Malformed(format!(
                    "markup error at byte {}: {e}",
                    reader.error_position()
                )))
            }
        }
    }

    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_title_and_blocks_in_order() {
        let html = r"<html><head><title> Field notes </title><style>p{}</style></head>
            <body><h1>Day one</h1><p>We walked  to the
            river.</p><ul><li>Boots</li><li>Map</li></ul></body></html>";
        let doc = extract_text(html).expect("valid markup");

        assert_eq!(doc.title.as_deref(), Some("Field notes"));
        assert_eq!(
            doc.blocks,
            vec![
                TextBlock {
                    kind: BlockKind::Heading(1),
                    text: "Day one".into()
                },
                TextBlock {
                    kind: BlockKind::Paragraph,
                    text: "We walked to the river.".into()
                },
                TextBlock {
                    kind: BlockKind::ListItem,
                    text: "Boots".into()
                },
                TextBlock {
                    kind: BlockKind::ListItem,
                    text: "Map".into()
                },
            ]
        );
    }

    #[test]
    fn skips_scripts() {
        let doc = extract_text("<body><script>var x = 1;</script><p>shown</p></body>")
            .expect("valid markup");
        assert_eq!(doc.blocks.len(), 1);
        assert_eq!(doc.blocks[0].text, "shown");
    }

    #[test]
    fn tolerates_unclosed_and_entity_text() {
        let doc = extract_text("<p>one<p>two&nbsp;three</body>").expect("lenient");
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[0].text, "one");
        assert!(doc.blocks[1].text.starts_with("two"));
    }

    #[test]
    fn plain_text_becomes_paragraph() {
        let doc = extract_text("just words").expect("text");
        assert_eq!(doc.blocks[0].kind, BlockKind::Paragraph);
        assert_eq!(doc.text_len(), "just words".len());
    }

    #[test]
    fn empty_markup_is_empty_document() {
        assert!(extract_text("").expect("empty").is_empty());
    }
}
