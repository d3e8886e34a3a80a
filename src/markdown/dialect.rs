//! Line rewrites that teach CommonMark the Notify extensions.
//!
//! pulldown-cmark has no grammar hooks, so the extensions are applied to the source before it
//! is parsed. Each [`Rule`] rewrites one line at a time, in table order. Fenced code is left
//! alone.

use super::*;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

/// Characters escaped in action link destinations. Everything a URL may legitimately
/// contain, including `%`, is kept.
const URL_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'\\')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

static ACTION_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<quote> {0,3}(?:>|\^|&gt;)[ \t]+)?(?:>|&gt;){2}\[(?P<text>[^\]]+)\]\((?P<url>\S+)\)(?P<extra>.+?)?$",
    )
    .expect("valid action link pattern")
});

static QUOTE_MARKERS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?: {0,3}(?:>|\^|&gt;)[ \t]?)+").expect("valid quote pattern")
});

static QUOTE_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r">|\^|&gt;").expect("valid quote marker pattern"));

static BULLET: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^(?P<lead>(?:[ \t]*>)*[ \t]*)•(?P<rest>[ \t]+\S)")
        .expect("valid bullet pattern")
});

static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").expect("valid fence pattern"));

static ACTION_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("\u{E000}ACTION_LINK::([0-9]+)\u{E001}").expect("valid action token pattern")
});

static SENTINEL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new("\u{E000}[^\u{E001}]*\u{E001}").expect("valid sentinel pattern"));

/// One line rewrite.
struct Rule {
    name: &'static str,
    apply: fn(&str, &mut Rewritten) -> Option<String>,
}

const RULES: &[Rule] = &[
    Rule {
        name: "action link",
        apply: action_link,
    },
    Rule {
        name: "quote marker",
        apply: quote_markers,
    },
    Rule {
        name: "bullet",
        apply: bullets,
    },
];

/// A `>>[text](url)` lifted out of the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ActionLinkTarget {
    pub(crate) text: String,
    pub(crate) url: String,
}

/// Source ready for CommonMark, plus the action links it refers to by token.
#[derive(Debug, Default)]
pub(crate) struct Rewritten {
    pub(crate) text: String,
    pub(crate) action_links: Vec<ActionLinkTarget>,
}

/// Apply every rule to every line outside fenced code.
pub(crate) fn rewrite(source: &str) -> Rewritten {
    let mut rewritten = Rewritten::default();
    let mut text = String::with_capacity(source.len());
    let mut fence: Option<(char, usize)> = None;

    for line in source.split_inclusive('\n') {
        let (body, ending) = match line.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (line, ""),
        };

        if let Some(captures) = FENCE.captures(body) {
            let run = &captures[1];
            let (c, len) = (run.chars().next().unwrap_or('`'), run.len());
            fence = match fence {
                None => Some((c, len)),
                Some((open, open_len)) if open == c && len >= open_len => None,
                still_open => still_open,
            };
            text.push_str(line);
            continue;
        }
        if fence.is_some() {
            text.push_str(line);
            continue;
        }

        let mut current = Cow::Borrowed(body);
        for rule in RULES {
            if let Some(replaced) = (rule.apply)(&current, &mut rewritten) {
                tracing::trace!(rule = rule.name, line = %body, "dialect rewrite");
                current = Cow::Owned(replaced);
            }
        }
        text.push_str(&current);
        text.push_str(ending);
    }

    rewritten.text = text;
    rewritten
}

fn action_link(line: &str, rewritten: &mut Rewritten) -> Option<String> {
    let captures = ACTION_LINK.captures(line)?;
    rewritten.action_links.push(ActionLinkTarget {
        text: html_escape::decode_html_entities(&captures["text"]).into_owned(),
        url: escape_url(&captures["url"]),
    });
    let token = format!("{OPEN}ACTION_LINK::{}{CLOSE}", rewritten.action_links.len());

    let mut lines = vec![String::new(), token, String::new()];
    if let Some(extra) = captures.name("extra") {
        lines.push(extra.as_str().to_owned());
    }
    if captures.name("quote").is_some() {
        for line in &mut lines {
            line.insert_str(0, if line.is_empty() { ">" } else { "> " });
        }
    }
    Some(lines.join("\n"))
}

fn quote_markers(line: &str, _: &mut Rewritten) -> Option<String> {
    let prefix = QUOTE_MARKERS.find(line)?;
    if !prefix.as_str().contains(['^', '&']) {
        return None;
    }
    let depth = QUOTE_MARKER.find_iter(prefix.as_str()).count();
    Some(format!("{}{}", "> ".repeat(depth), &line[prefix.end()..]))
}

fn bullets(line: &str, _: &mut Rewritten) -> Option<String> {
    match BULLET.replace_all(line, "${lead}-${rest}") {
        Cow::Borrowed(_) => None,
        Cow::Owned(replaced) => Some(replaced),
    }
}

/// Entity-decode, then percent-escape. Masking tokens inside the URL are kept intact.
fn escape_url(url: &str) -> String {
    let url = html_escape::decode_html_entities(url);
    let mut escaped = String::with_capacity(url.len());
    let mut last = 0;
    for token in SENTINEL_TOKEN.find_iter(&url) {
        escaped.extend(utf8_percent_encode(&url[last..token.start()], URL_UNSAFE));
        escaped.push_str(token.as_str());
        last = token.end();
    }
    escaped.extend(utf8_percent_encode(&url[last..], URL_UNSAFE));
    escaped
}

impl Rewritten {
    /// Swap action link token paragraphs for [`Block::ActionLink`].
    pub(crate) fn resolve(&self, blocks: Vec<Block>) -> Vec<Block> {
        if self.action_links.is_empty() {
            return blocks;
        }
        blocks.into_iter().map(|block| self.resolve_block(block)).collect()
    }

    fn target(&self, token: &str) -> Option<&ActionLinkTarget> {
        let captures = ACTION_TOKEN.captures(token)?;
        let index = captures[1].parse::<usize>().ok()?;
        self.action_links.get(index.checked_sub(1)?)
    }

    /// The target when `text` is nothing but one action link token.
    fn whole_token_target(&self, text: &str) -> Option<&ActionLinkTarget> {
        let token = text.trim();
        ACTION_TOKEN
            .find(token)
            .filter(|found| found.as_str() == token)?;
        self.target(token)
    }

    fn resolve_block(&self, block: Block) -> Block {
        match block {
            Block::Paragraph(inlines) => {
                let target = match inlines.as_slice() {
                    [Inline::Text(text)] => self.whole_token_target(text),
                    _ => None,
                };
                match target {
                    Some(target) => Block::ActionLink {
                        text: target.text.clone(),
                        url: target.url.clone(),
                    },
                    None => Block::Paragraph(self.resolve_inlines(inlines)),
                }
            }
            Block::BlockQuote(blocks) => {
                Block::BlockQuote(blocks.into_iter().map(|b| self.resolve_block(b)).collect())
            }
            Block::List(mut list) => {
                for item in &mut list.items {
                    item.children = std::mem::take(&mut item.children)
                        .into_iter()
                        .map(|b| self.resolve_block(b))
                        .collect();
                }
                Block::List(list)
            }
            Block::Heading { level, children } => Block::Heading {
                level,
                children: self.resolve_inlines(children),
            },
            other => other,
        }
    }

    /// A token that shares its paragraph with other content becomes an ordinary link.
    fn resolve_inlines(&self, inlines: Vec<Inline>) -> Vec<Inline> {
        let mut resolved = Vec::with_capacity(inlines.len());
        for inline in inlines {
            let Inline::Text(text) = inline else {
                resolved.push(inline);
                continue;
            };
            let mut last = 0;
            for token in ACTION_TOKEN.find_iter(&text) {
                let Some(target) = self.target(token.as_str()) else {
                    continue;
                };
                if token.start() > last {
                    resolved.push(Inline::Text(text[last..token.start()].to_owned()));
                }
                resolved.push(Inline::Link {
                    url: target.url.clone(),
                    title: String::new(),
                    children: vec![Inline::Text(target.text.clone())],
                    autolink: false,
                });
                last = token.end();
            }
            if last < text.len() {
                resolved.push(Inline::Text(text[last..].to_owned()));
            }
        }
        resolved
    }
}
