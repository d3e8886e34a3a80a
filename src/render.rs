//! Output strategies over the markdown [`Block`] tree.
//!
//! Every channel walks the same tree. A [`Renderer`] writes one node at a time into a
//! `String` and chooses how children are visited, so nesting never needs a separate pass.

use super::*;

mod html;
mod letter;
mod plain_text;
#[cfg(test)]
mod test;

pub use html::{
    HtmlRenderer, BLOCK_QUOTE_STYLE, LINK_STYLE, LIST_ITEM_STYLE, ORDERED_LIST_STYLE,
    PARAGRAPH_STYLE, THEMATIC_BREAK_STYLE, UNORDERED_LIST_STYLE,
};
pub use letter::LetterRenderer;
pub use plain_text::PlainTextRenderer;

/// Writes markdown nodes for one output channel.
pub trait Renderer {
    /// Write a single block.
    fn block(&mut self, out: &mut String, block: &Block) -> fmt::Result;

    /// Write a single inline node.
    fn inline(&mut self, out: &mut String, inline: &Inline) -> fmt::Result;

    /// Write a sequence of blocks. Most renderers simply concatenate.
    fn blocks(&mut self, out: &mut String, blocks: &[Block]) -> fmt::Result {
        blocks.iter().try_for_each(|block| self.block(out, block))
    }

    /// Write a sequence of inline nodes.
    fn inlines(&mut self, out: &mut String, inlines: &[Inline]) -> fmt::Result {
        inlines.iter().try_for_each(|inline| self.inline(out, inline))
    }

    /// Render a whole document to a new string.
    fn render(&mut self, blocks: &[Block]) -> std::result::Result<String, fmt::Error> {
        let mut out = String::new();
        self.blocks(&mut out, blocks)?;
        Ok(out)
    }
}

/// Escape text for an HTML text node. Non-breaking spaces are written as `&nbsp;` so they
/// survive clients that normalise whitespace.
pub(crate) fn escape_text(text: &str) -> String {
    html_escape::encode_text(text).replace('\u{A0}', "&nbsp;")
}

/// Escape a value for a double-quoted attribute.
pub(crate) fn escape_attribute(value: &str) -> Cow<'_, str> {
    html_escape::encode_double_quoted_attribute(value)
}
