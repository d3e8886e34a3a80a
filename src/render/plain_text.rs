use super::*;

use crate::list::ListMarker;

/// Plain text e-mail body, or the flattened text used for a preheader.
///
/// Blocks are separated by a blank line and level 1 headings get one more. Headings are
/// underlined and thematic breaks drawn with a rule, both `column_width` wide. Body text is
/// never wrapped.
#[derive(Debug)]
pub struct PlainTextRenderer {
    column_width: usize,
    preheader: bool,
}

impl PlainTextRenderer {
    /// Full plain text rendering.
    pub fn new(config: &Config) -> Self {
        Self {
            column_width: config.column_width,
            preheader: false,
        }
    }

    /// Text only: no markers, no rules, links reduced to their text.
    pub fn preheader(config: &Config) -> Self {
        Self {
            column_width: config.column_width,
            preheader: true,
        }
    }

    fn separator(&self, block: &Block) -> &'static str {
        match block {
            _ if self.preheader => "\n",
            Block::Heading { level: 1, .. } => "\n\n\n",
            _ => "\n\n",
        }
    }

    fn joined(
        &mut self,
        blocks: &[Block],
        tight: bool,
    ) -> std::result::Result<String, fmt::Error> {
        let mut out = String::new();
        for block in blocks {
            let mut rendered = String::new();
            self.block(&mut rendered, block)?;
            if rendered.is_empty() {
                continue;
            }
            if !out.is_empty() {
                out.push_str(if tight { "\n" } else { self.separator(block) });
            }
            out.push_str(&rendered);
        }
        Ok(out)
    }

    fn list(&mut self, out: &mut String, list: &List) -> fmt::Result {
        let mut marker = ListMarker::new(list);
        let mut items = Vec::with_capacity(list.items.len());
        for item in &list.items {
            let content = self.joined(&item.children, list.tight)?;
            items.push(if self.preheader {
                content
            } else {
                marker.apply(&content)
            });
            marker.increment_count();
        }
        let separator = if list.tight || self.preheader { "\n" } else { "\n\n" };
        out.write_str(&items.join(separator))
    }

    fn rule(&self, c: char) -> String {
        std::iter::repeat(c).take(self.column_width).collect()
    }
}

impl Renderer for PlainTextRenderer {
    fn blocks(&mut self, out: &mut String, blocks: &[Block]) -> fmt::Result {
        let joined = self.joined(blocks, false)?;
        out.write_str(&joined)
    }

    fn block(&mut self, out: &mut String, block: &Block) -> fmt::Result {
        match block {
            Block::Paragraph(children) => self.inlines(out, children),
            Block::Heading { level, children } if *level > 3 || self.preheader => {
                tracing::trace!(level, "heading written as a paragraph");
                self.inlines(out, children)
            }
            Block::Heading { children, .. } => {
                self.inlines(out, children)?;
                write!(out, "\n{}", self.rule('-'))
            }
            Block::List(list) => self.list(out, list),
            Block::BlockQuote(blocks) => self.blocks(out, blocks),
            Block::ThematicBreak if self.preheader => Ok(()),
            Block::ThematicBreak => out.write_str(&self.rule('=')),
            Block::ActionLink { text, .. } if self.preheader => out.write_str(text),
            Block::ActionLink { text, url } => write!(out, "{text}: {url}"),
            Block::CodeBlock { code, .. } => out.write_str(code.trim_end_matches('\n')),
            Block::Html(html) => out.write_str(html.trim_end_matches('\n')),
            Block::Table => {
                tracing::debug!("table deleted");
                Ok(())
            }
        }
    }

    fn inline(&mut self, out: &mut String, inline: &Inline) -> fmt::Result {
        match inline {
            Inline::Text(text) | Inline::Html(text) => out.write_str(text),
            Inline::Code(code) if self.preheader => out.write_str(code),
            Inline::Code(code) => write!(out, "`{code}`"),
            Inline::Emphasis(children) | Inline::Strong(children) if self.preheader => {
                self.inlines(out, children)
            }
            Inline::Emphasis(children) => {
                out.push('*');
                self.inlines(out, children)?;
                out.write_char('*')
            }
            Inline::Strong(children) => {
                out.push_str("**");
                self.inlines(out, children)?;
                out.write_str("**")
            }
            Inline::Strikethrough(children) => {
                out.push_str("\n\n");
                self.inlines(out, children)
            }
            Inline::Link { children, .. } if self.preheader => self.inlines(out, children),
            Inline::Link {
                url,
                children,
                autolink,
                ..
            } => {
                let mut text = String::new();
                self.inlines(&mut text, children)?;
                if *autolink || text == *url {
                    out.write_str(url)
                } else {
                    write!(out, "{text}: {url}")
                }
            }
            Inline::Image { url, .. } => {
                tracing::debug!(%url, "image deleted");
                Ok(())
            }
            Inline::SoftBreak | Inline::HardBreak if self.preheader => out.write_char(' '),
            Inline::SoftBreak | Inline::HardBreak => out.write_char('\n'),
        }
    }
}
