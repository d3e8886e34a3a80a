//! The closed set of nodes the renderers understand.

use super::*;

/// Block-level node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Block {
    /// A paragraph of inline content.
    Paragraph(Vec<Inline>),
    /// An ATX or setext heading.
    Heading {
        /// 1 to 6.
        level: u8,
        /// Heading content.
        children: Vec<Inline>,
    },
    /// An ordered or unordered list.
    List(List),
    /// A `>` (or `^`) quoted section.
    BlockQuote(Vec<Block>),
    /// A horizontal rule.
    ThematicBreak,
    /// A `>>[text](url)` call to action.
    ActionLink {
        /// Visible link text.
        text: String,
        /// Percent-escaped destination.
        url: String,
    },
    /// Fenced or indented code.
    CodeBlock {
        /// Fence info string, empty for indented code.
        info: String,
        /// Code, verbatim.
        code: String,
    },
    /// Raw HTML block.
    Html(String),
    /// A table. Every renderer drops tables, so their content is not kept.
    Table,
}

/// A list and its items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct List {
    /// Numbered list.
    pub ordered: bool,
    /// First number of an ordered list. Always 1 for bullets.
    pub start: u64,
    /// No blank lines between items, so item paragraphs are not wrapped.
    pub tight: bool,
    /// Items in order.
    pub items: Vec<ListItem>,
}

/// One list item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListItem {
    /// Item content. Inline content of tight items is held in a [`Block::Paragraph`].
    pub children: Vec<Block>,
}

/// Inline node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inline {
    /// Literal text, entities already decoded.
    Text(String),
    /// Inline code span.
    Code(String),
    /// `*emphasis*`.
    Emphasis(Vec<Inline>),
    /// `**strong**`.
    Strong(Vec<Inline>),
    /// `~~strikethrough~~`.
    Strikethrough(Vec<Inline>),
    /// A hyperlink.
    Link {
        /// Destination.
        url: String,
        /// Optional title, empty when absent.
        title: String,
        /// Link text.
        children: Vec<Inline>,
        /// Written as a bare URL or `<url>` rather than `[text](url)`.
        autolink: bool,
    },
    /// An image.
    Image {
        /// Source.
        url: String,
        /// Alternative text.
        alt: String,
    },
    /// A line ending inside a paragraph.
    SoftBreak,
    /// A backslash or double-space line break.
    HardBreak,
    /// Raw inline HTML.
    Html(String),
}

impl Inline {
    /// Concatenated text of this node and its children, without markup.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        self.collect_text(&mut text);
        text
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children)
            | Inline::Link { children, .. } => {
                children.iter().for_each(|child| child.collect_text(out))
            }
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            Inline::Html(_) => {}
        }
    }
}

enum Frame {
    /// Root, block quote or list item: holds blocks plus a run of loose inline content.
    Blocks {
        kind: BlocksKind,
        blocks: Vec<Block>,
        pending: Vec<Inline>,
        saw_paragraph: bool,
    },
    List {
        ordered: bool,
        start: u64,
        items: Vec<ListItem>,
        loose: bool,
    },
    Inlines {
        kind: InlinesKind,
        children: Vec<Inline>,
    },
    Literal {
        info: Option<String>,
        text: String,
    },
    /// Tables and their rows and cells. Everything inside is dropped.
    Swallow {
        table: bool,
    },
    /// A container past the nesting guard, or a tag with no node of its own.
    Transparent,
    /// A span past the nesting guard. Its content joins the enclosing span unstyled.
    FlatSpan,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum BlocksKind {
    Root,
    BlockQuote,
    Item,
}

enum InlinesKind {
    Paragraph,
    Heading(u8),
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        url: String,
        title: String,
        autolink: bool,
    },
    Image {
        url: String,
    },
}

/// Folds parser events into a [`Block`] tree without recursion.
pub(crate) struct TreeBuilder {
    stack: Vec<Frame>,
    max_nested_level: usize,
}

impl TreeBuilder {
    pub(crate) fn new(max_nested_level: usize) -> Self {
        Self {
            stack: vec![Frame::Blocks {
                kind: BlocksKind::Root,
                blocks: Vec::new(),
                pending: Vec::new(),
                saw_paragraph: false,
            }],
            max_nested_level,
        }
    }

    pub(crate) fn build<'i>(mut self, events: impl Iterator<Item = Event<'i>>) -> Vec<Block> {
        for event in events {
            self.push_event(event);
        }
        while self.stack.len() > 1 {
            self.end();
        }
        match self.stack.pop() {
            Some(Frame::Blocks {
                mut blocks,
                pending,
                ..
            }) => {
                flush(&mut blocks, pending);
                blocks
            }
            _ => Vec::new(),
        }
    }

    fn push_event(&mut self, event: Event<'_>) {
        if let Some(Frame::Swallow { .. }) = self.stack.last() {
            match event {
                Event::Start(_) => self.stack.push(Frame::Swallow { table: false }),
                Event::End(_) => self.end(),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.push_text(&text),
            Event::Code(code) => self.push_inline(Inline::Code(code.into_string())),
            Event::InlineMath(math) | Event::DisplayMath(math) => {
                self.push_inline(Inline::Text(math.into_string()))
            }
            Event::Html(html) => self.push_html(&html),
            Event::InlineHtml(html) => self.push_inline(Inline::Html(html.into_string())),
            Event::FootnoteReference(label) => self.push_inline(Inline::Text(format!("[^{label}]"))),
            Event::SoftBreak => self.push_inline(Inline::SoftBreak),
            Event::HardBreak => self.push_inline(Inline::HardBreak),
            Event::Rule => self.push_block(Block::ThematicBreak),
            Event::TaskListMarker(checked) => {
                self.push_inline(Inline::Text(if checked { "[x] " } else { "[ ] " }.to_owned()))
            }
        }
    }

    fn container_depth(&self) -> usize {
        self.stack
            .iter()
            .filter(|frame| {
                matches!(
                    frame,
                    Frame::List { .. }
                        | Frame::Blocks {
                            kind: BlocksKind::BlockQuote,
                            ..
                        }
                )
            })
            .count()
    }

    fn span_depth(&self) -> usize {
        self.stack
            .iter()
            .filter(|frame| {
                matches!(
                    frame,
                    Frame::FlatSpan
                        | Frame::Inlines {
                            kind: InlinesKind::Emphasis
                                | InlinesKind::Strong
                                | InlinesKind::Strikethrough
                                | InlinesKind::Link { .. }
                                | InlinesKind::Image { .. },
                            ..
                        }
                )
            })
            .count()
    }

    fn start(&mut self, tag: Tag<'_>) {
        let frame = match tag {
            Tag::Paragraph => {
                if let Some(Frame::Blocks { saw_paragraph, .. }) = self.nearest_mut() {
                    *saw_paragraph = true;
                }
                Frame::Inlines {
                    kind: InlinesKind::Paragraph,
                    children: Vec::new(),
                }
            }
            Tag::Heading { level, .. } => Frame::Inlines {
                kind: InlinesKind::Heading(level as u8),
                children: Vec::new(),
            },
            Tag::BlockQuote(..) | Tag::List(_) if self.container_depth() >= self.max_nested_level => {
                tracing::debug!(
                    max_nested_level = self.max_nested_level,
                    "nesting guard flattened a container"
                );
                Frame::Transparent
            }
            Tag::BlockQuote(..) => Frame::Blocks {
                kind: BlocksKind::BlockQuote,
                blocks: Vec::new(),
                pending: Vec::new(),
                saw_paragraph: false,
            },
            Tag::List(start) => Frame::List {
                ordered: start.is_some(),
                start: start.unwrap_or(1),
                items: Vec::new(),
                loose: false,
            },
            Tag::Item => match self.stack.last() {
                Some(Frame::List { .. }) => Frame::Blocks {
                    kind: BlocksKind::Item,
                    blocks: Vec::new(),
                    pending: Vec::new(),
                    saw_paragraph: false,
                },
                _ => Frame::Transparent,
            },
            Tag::CodeBlock(kind) => Frame::Literal {
                info: Some(match kind {
                    CodeBlockKind::Fenced(info) => info.into_string(),
                    CodeBlockKind::Indented => String::new(),
                }),
                text: String::new(),
            },
            Tag::HtmlBlock => Frame::Literal {
                info: None,
                text: String::new(),
            },
            Tag::Table(_) => Frame::Swallow { table: true },
            Tag::Emphasis
            | Tag::Strong
            | Tag::Strikethrough
            | Tag::Link { .. }
            | Tag::Image { .. }
                if self.span_depth() >= self.max_nested_level =>
            {
                tracing::debug!(
                    max_nested_level = self.max_nested_level,
                    "nesting guard flattened a span"
                );
                Frame::FlatSpan
            }
            Tag::Emphasis => Frame::Inlines {
                kind: InlinesKind::Emphasis,
                children: Vec::new(),
            },
            Tag::Strong => Frame::Inlines {
                kind: InlinesKind::Strong,
                children: Vec::new(),
            },
            Tag::Strikethrough => Frame::Inlines {
                kind: InlinesKind::Strikethrough,
                children: Vec::new(),
            },
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let url = match link_type {
                    LinkType::Email => format!("mailto:{dest_url}"),
                    _ => dest_url.into_string(),
                };
                Frame::Inlines {
                    kind: InlinesKind::Link {
                        url,
                        title: title.into_string(),
                        autolink: matches!(link_type, LinkType::Autolink | LinkType::Email),
                    },
                    children: Vec::new(),
                }
            }
            Tag::Image { dest_url, .. } => Frame::Inlines {
                kind: InlinesKind::Image {
                    url: dest_url.into_string(),
                },
                children: Vec::new(),
            },
            _ => Frame::Transparent,
        };
        if let Frame::Transparent = frame {
            self.flush_pending();
        }
        self.stack.push(frame);
    }

    fn end(&mut self) {
        let Some(frame) = self.stack.pop() else {
            return;
        };
        match frame {
            Frame::Blocks {
                kind: BlocksKind::Root,
                ..
            } => self.stack.push(frame),
            Frame::Blocks {
                kind: BlocksKind::BlockQuote,
                mut blocks,
                pending,
                ..
            } => {
                flush(&mut blocks, pending);
                self.push_block(Block::BlockQuote(blocks));
            }
            Frame::Blocks {
                kind: BlocksKind::Item,
                mut blocks,
                pending,
                saw_paragraph,
            } => {
                flush(&mut blocks, pending);
                if let Some(Frame::List { items, loose, .. }) = self.stack.last_mut() {
                    items.push(ListItem { children: blocks });
                    *loose |= saw_paragraph;
                }
            }
            Frame::List {
                ordered,
                start,
                items,
                loose,
            } => self.push_block(Block::List(List {
                ordered,
                start,
                tight: !loose,
                items,
            })),
            Frame::Inlines { kind, children } => match kind {
                InlinesKind::Paragraph => self.push_block(Block::Paragraph(children)),
                InlinesKind::Heading(level) => self.push_block(Block::Heading { level, children }),
                InlinesKind::Emphasis => self.push_inline(Inline::Emphasis(children)),
                InlinesKind::Strong => self.push_inline(Inline::Strong(children)),
                InlinesKind::Strikethrough => self.push_inline(Inline::Strikethrough(children)),
                InlinesKind::Link {
                    url,
                    title,
                    autolink,
                } => self.push_inline(Inline::Link {
                    url,
                    title,
                    children,
                    autolink,
                }),
                InlinesKind::Image { url } => {
                    let alt = children.iter().map(Inline::plain_text).collect();
                    self.push_inline(Inline::Image { url, alt });
                }
            },
            Frame::Literal {
                info: Some(info),
                text,
            } => self.push_block(Block::CodeBlock { info, code: text }),
            Frame::Literal { info: None, text } => self.push_block(Block::Html(text)),
            Frame::Swallow { table: true } => {
                tracing::debug!("table dropped");
                self.push_block(Block::Table);
            }
            Frame::Swallow { table: false } => {}
            // Keep the content of a flattened container apart from what follows it.
            Frame::Transparent => self.flush_pending(),
            Frame::FlatSpan => {}
        }
    }

    fn flush_pending(&mut self) {
        if let Some(Frame::Blocks {
            blocks, pending, ..
        }) = self.nearest_mut()
        {
            flush(blocks, std::mem::take(pending));
        }
    }

    /// The innermost frame that is not [`Frame::Transparent`] or [`Frame::FlatSpan`].
    fn nearest_mut(&mut self) -> Option<&mut Frame> {
        self.stack
            .iter_mut()
            .rev()
            .find(|frame| !matches!(frame, Frame::Transparent | Frame::FlatSpan))
    }

    fn push_block(&mut self, block: Block) {
        match self.nearest_mut() {
            Some(Frame::Blocks {
                blocks, pending, ..
            }) => {
                flush(blocks, std::mem::take(pending));
                blocks.push(block);
            }
            Some(Frame::List { items, .. }) => items.push(ListItem {
                children: vec![block],
            }),
            _ => tracing::debug!(?block, "block outside any container dropped"),
        }
    }

    fn push_inline(&mut self, inline: Inline) {
        match self.nearest_mut() {
            Some(Frame::Inlines { children, .. }) => children.push(inline),
            Some(Frame::Blocks { pending, .. }) => pending.push(inline),
            Some(Frame::Literal { text, .. }) => text.push_str(&inline.plain_text()),
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        match self.nearest_mut() {
            Some(Frame::Literal { text: literal, .. }) => literal.push_str(text),
            _ => self.push_inline(Inline::Text(text.to_owned())),
        }
    }

    fn push_html(&mut self, html: &str) {
        match self.nearest_mut() {
            Some(Frame::Literal { text, .. }) => text.push_str(html),
            _ => self.push_block(Block::Html(html.to_owned())),
        }
    }
}

/// Turn a run of loose inline content into a paragraph.
fn flush(blocks: &mut Vec<Block>, pending: Vec<Inline>) {
    if !pending.is_empty() {
        blocks.push(Block::Paragraph(pending));
    }
}
