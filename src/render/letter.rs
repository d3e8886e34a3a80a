use super::*;

/// Letter body markup for the print and preview pipeline.
///
/// Letters have one heading level, so `#` becomes `<h2>` and every deeper heading is a
/// paragraph. A thematic break starts a new page. Links cannot be followed on paper and are
/// spelled out instead.
#[derive(Debug, Default)]
pub struct LetterRenderer {
    /// Inside an item of a tight list, where paragraphs are not wrapped.
    tight: bool,
}

impl LetterRenderer {
    /// A fresh renderer.
    pub fn new() -> Self {
        Self::default()
    }
}

fn strip_scheme(url: &str) -> &str {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url)
}

impl Renderer for LetterRenderer {
    fn blocks(&mut self, out: &mut String, blocks: &[Block]) -> fmt::Result {
        for block in blocks {
            let start = out.len();
            self.block(out, block)?;
            if out.len() > start && !self.tight {
                out.push('\n');
            }
        }
        Ok(())
    }

    fn block(&mut self, out: &mut String, block: &Block) -> fmt::Result {
        match block {
            Block::Paragraph(children) if self.tight => self.inlines(out, children),
            Block::Paragraph(children) | Block::Heading { children, .. } => {
                let mut inner = String::new();
                self.inlines(&mut inner, children)?;
                let tag = match block {
                    Block::Heading { level: 1, .. } => "h2",
                    _ => "p",
                };
                if inner.trim().is_empty() {
                    return Ok(());
                }
                write!(out, "<{tag}>{inner}</{tag}>")
            }
            Block::List(list) => {
                let tag = if list.ordered { "ol" } else { "ul" };
                writeln!(out, "<{tag}>")?;
                let outer = std::mem::replace(&mut self.tight, list.tight);
                for item in &list.items {
                    out.push_str("<li>");
                    self.blocks(out, &item.children)?;
                    out.push_str("</li>\n");
                }
                self.tight = outer;
                write!(out, "</{tag}>")
            }
            Block::BlockQuote(blocks) => {
                let outer = std::mem::replace(&mut self.tight, false);
                let mut inner = String::new();
                self.blocks(&mut inner, blocks)?;
                self.tight = outer;
                out.write_str(inner.trim_end_matches('\n'))
            }
            Block::ThematicBreak => out.write_str("<div class=\"page-break\">&nbsp;</div>"),
            Block::ActionLink { text, url } => write!(
                out,
                "<p>{}: <strong>{}</strong></p>",
                escape_text(text),
                escape_text(strip_scheme(url))
            ),
            Block::CodeBlock { code, .. } => write!(
                out,
                "<p>{}</p>",
                escape_text(code.trim_end_matches('\n')).replace('\n', "<br>")
            ),
            Block::Html(html) => out.write_str(html.trim_end_matches('\n')),
            Block::Table => {
                tracing::debug!("table deleted");
                Ok(())
            }
        }
    }

    fn inline(&mut self, out: &mut String, inline: &Inline) -> fmt::Result {
        match inline {
            Inline::Text(text) | Inline::Code(text) => out.write_str(&escape_text(text)),
            Inline::Emphasis(children) => {
                out.push_str("<em>");
                self.inlines(out, children)?;
                out.write_str("</em>")
            }
            Inline::Strong(children) => {
                out.push_str("<strong>");
                self.inlines(out, children)?;
                out.write_str("</strong>")
            }
            Inline::Strikethrough(children) => self.inlines(out, children),
            Inline::Link { url, children, .. } => {
                let mut text = String::new();
                self.inlines(&mut text, children)?;
                let url = escape_text(strip_scheme(url));
                if text.is_empty() || text == url {
                    write!(out, "<strong>{url}</strong>")
                } else {
                    write!(out, "{text}: <strong>{url}</strong>")
                }
            }
            Inline::Image { url, .. } => {
                tracing::debug!(%url, "image deleted");
                Ok(())
            }
            Inline::SoftBreak | Inline::HardBreak => out.write_str("<br>"),
            Inline::Html(html) => out.write_str(html),
        }
    }
}
