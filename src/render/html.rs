use super::*;

/// Inline style of `<blockquote>`.
pub const BLOCK_QUOTE_STYLE: &str = "background: #F1F1F1; padding: 24px 24px 0.1px 24px; \
    font-family: Helvetica, Arial, sans-serif; font-size: 16px; line-height: 25px;";
/// Inline style of `<a>`.
pub const LINK_STYLE: &str = "word-wrap: break-word; color: #004795;";
/// Inline style of `<ol>`.
pub const ORDERED_LIST_STYLE: &str = "Margin: 0 0 0 20px; padding: 0 0 20px 0; \
    list-style-type: decimal; font-family: Helvetica, Arial, sans-serif;";
/// Inline style of `<li>`.
pub const LIST_ITEM_STYLE: &str =
    "Margin: 5px 0 5px; padding: 0 0 0 5px; font-size: 16px; line-height: 25px; color: #323A45;";
/// Inline style of `<p>`.
pub const PARAGRAPH_STYLE: &str =
    "Margin: 0 0 20px 0; font-size: 16px; line-height: 25px; color: #323A45;";
/// Inline style of `<hr>`.
pub const THEMATIC_BREAK_STYLE: &str =
    "border: 0; height: 1px; background: #BFC1C3; Margin: 30px 0 30px 0;";
/// Inline style of `<ul>`.
pub const UNORDERED_LIST_STYLE: &str = "Margin: 0 0 0 20px; padding: 0 0 20px 0; \
    list-style-type: disk; font-family: Helvetica, Arial, sans-serif;";

fn heading_style(level: u8) -> &'static str {
    match level {
        1 => "Margin: 0 0 20px 0; padding: 0; font-size: 32px; line-height: 35px; \
              font-weight: bold; color: #323A45;",
        2 => "Margin: 0 0 15px 0; padding: 0; line-height: 26px; color: #323A45;\
              font-size: 24px; font-weight: bold; font-family: Helvetica, Arial, sans-serif;",
        _ => "Margin: 0 0 15px 0; padding: 0; line-height: 26px; color: #323A45;\
              font-size: 20.8px; font-weight: bold; font-family: Helvetica, Arial, sans-serif;",
    }
}

/// Opening tag of a styled link.
pub(crate) fn link_open(url: &str, title: &str, new_tab: bool) -> String {
    let mut open = format!(
        "<a style=\"{LINK_STYLE}\" href=\"{}\"",
        escape_attribute(url)
    );
    if !title.is_empty() {
        open.push_str(&format!(" title=\"{}\"", escape_attribute(title)));
    }
    if new_tab {
        open.push_str(" target=\"_blank\"");
    }
    open.push('>');
    open
}

/// E-mail HTML with every presentational style inlined.
///
/// Blocks are written back to back with no separating newline, images and tables are
/// dropped, and headings deeper than level 3 are written as paragraphs.
#[derive(Debug)]
pub struct HtmlRenderer<'c> {
    config: &'c Config,
    /// Inside an item of a tight list, where paragraphs are not wrapped.
    tight: bool,
}

impl<'c> HtmlRenderer<'c> {
    /// Renderer reading the action link image from `config`.
    pub fn new(config: &'c Config) -> Self {
        Self {
            config,
            tight: false,
        }
    }

    fn paragraph(&mut self, out: &mut String, children: &[Inline]) -> fmt::Result {
        let mut inner = String::new();
        self.inlines(&mut inner, children)?;
        if inner.is_empty() {
            // Everything inside was deleted.
            tracing::debug!("empty paragraph dropped");
            return Ok(());
        }
        write!(out, "<p style=\"{PARAGRAPH_STYLE}\">{inner}</p>")
    }

    fn list(&mut self, out: &mut String, list: &List) -> fmt::Result {
        let (tag, style) = if list.ordered {
            ("ol", ORDERED_LIST_STYLE)
        } else {
            ("ul", UNORDERED_LIST_STYLE)
        };
        write!(out, "<{tag} role=\"presentation\" style=\"{style}\"")?;
        if list.ordered && list.start != 1 {
            write!(out, " start=\"{}\"", list.start)?;
        }
        out.push('>');

        let outer = std::mem::replace(&mut self.tight, list.tight);
        for item in &list.items {
            write!(out, "<li style=\"{LIST_ITEM_STYLE}\">")?;
            self.blocks(out, &item.children)?;
            out.push_str("</li>");
        }
        self.tight = outer;

        write!(out, "</{tag}>")
    }
}

impl Renderer for HtmlRenderer<'_> {
    fn block(&mut self, out: &mut String, block: &Block) -> fmt::Result {
        match block {
            Block::Paragraph(children) if self.tight => self.inlines(out, children),
            Block::Paragraph(children) => self.paragraph(out, children),
            Block::Heading { level, children } if *level <= 3 => {
                write!(out, "<h{level} style=\"{}\">", heading_style(*level))?;
                self.inlines(out, children)?;
                write!(out, "</h{level}>")
            }
            Block::Heading { level, children } => {
                tracing::debug!(level, "heading written as a paragraph");
                self.paragraph(out, children)
            }
            Block::List(list) => self.list(out, list),
            Block::BlockQuote(blocks) => {
                write!(out, "<blockquote style=\"{BLOCK_QUOTE_STYLE}\">")?;
                let outer = std::mem::replace(&mut self.tight, false);
                self.blocks(out, blocks)?;
                self.tight = outer;
                out.push_str("</blockquote>");
                Ok(())
            }
            Block::ThematicBreak => write!(out, "<hr style=\"{THEMATIC_BREAK_STYLE}\" />"),
            Block::ActionLink { text, url } => out.write_str(&action_link::action_link_paragraph(
                &link_open(url, "", true),
                &escape_text(text),
                &self.config.action_link_image_url(),
            )),
            Block::CodeBlock { info, code } => {
                let language = info.split_whitespace().next().unwrap_or_default();
                if language.is_empty() {
                    out.push_str("<pre><code>");
                } else {
                    write!(
                        out,
                        "<pre><code class=\"language-{}\">",
                        escape_attribute(language)
                    )?;
                }
                write!(out, "{}</code></pre>", escape_text(code))
            }
            Block::Html(html) => out.write_str(html),
            Block::Table => {
                tracing::debug!("table deleted");
                Ok(())
            }
        }
    }

    fn inline(&mut self, out: &mut String, inline: &Inline) -> fmt::Result {
        match inline {
            Inline::Text(text) => out.write_str(&escape_text(text)),
            Inline::Code(code) => write!(out, "<code>{}</code>", escape_text(code)),
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
            Inline::Strikethrough(children) => {
                out.push_str("<del>");
                self.inlines(out, children)?;
                out.write_str("</del>")
            }
            Inline::Link {
                url,
                title,
                children,
                autolink,
            } => {
                out.push_str(&link_open(url, title, !autolink));
                self.inlines(out, children)?;
                out.write_str("</a>")
            }
            Inline::Image { url, .. } => {
                tracing::debug!(%url, "image deleted");
                Ok(())
            }
            Inline::SoftBreak | Inline::HardBreak => out.write_str("<br />"),
            Inline::Html(html) => out.write_str(html),
        }
    }
}
