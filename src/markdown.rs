//! Notify-flavoured markdown.
//!
//! On top of CommonMark with strikethrough and tables, the dialect understands:
//!
//! * action links, `>>[text](url)` on a line of their own, optionally quoted;
//! * `^` as a block quote marker, alongside `>` and the escaped `&gt;`;
//! * `•` as a bullet.
//!
//! ```rust
//! # use notify_fmt::{markdown::{self, Flavour}, Config};
//! let text = "^ Quoted\n\n• first\n• second\n";
//! let plain = markdown::render(text, Flavour::PlainText, &Config::default())?;
//! assert_eq!(plain, "Quoted\n\n• first\n• second");
//! # Ok::<(), std::fmt::Error>(())
//! ```

use super::*;

mod ast;
mod autolink;
mod dialect;
#[cfg(test)]
mod test;

pub use ast::{Block, Inline, List, ListItem};

use ast::TreeBuilder;
use pulldown_cmark::{CodeBlockKind, LinkType};

/// The output a markdown document is rendered to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flavour {
    /// Styled e-mail HTML. Bare URLs are linked.
    Html,
    /// Plain text e-mail.
    PlainText,
    /// The single run of text shown as an e-mail preview line.
    Preheader,
    /// Letter body markup.
    Letter,
}

/// Parse Notify markdown into blocks.
pub fn parse(text: &str, config: &Config) -> Vec<Block> {
    let rewritten = dialect::rewrite(text);
    let parser = Parser::new_ext(
        &rewritten.text,
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TABLES,
    );
    let blocks = TreeBuilder::new(config.max_nested_level).build(parser.merged_text());
    tracing::trace!(
        blocks = blocks.len(),
        action_links = rewritten.action_links.len(),
        "parsed markdown"
    );
    rewritten.resolve(blocks)
}

/// Parse and render `text` for one channel.
///
/// Empty input gives empty output for every flavour.
pub fn render(
    text: &str,
    flavour: Flavour,
    config: &Config,
) -> std::result::Result<String, fmt::Error> {
    let mut blocks = parse(text, config);
    let rendered = match flavour {
        Flavour::Html => {
            autolink::link_bare_urls(&mut blocks);
            HtmlRenderer::new(config).render(&blocks)?
        }
        Flavour::PlainText => PlainTextRenderer::new(config).render(&blocks)?,
        Flavour::Preheader => PlainTextRenderer::preheader(config).render(&blocks)?,
        Flavour::Letter => LetterRenderer::new().render(&blocks)?,
    };
    tracing::trace!(
        ?flavour,
        input = text.len(),
        output = rendered.len(),
        "rendered markdown"
    );
    Ok(rendered)
}
