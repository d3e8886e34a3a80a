//! Shields placeholder and link syntax from the markdown parser.
//!
//! Placeholders and link destinations are swapped for positional tokens before parsing and
//! swapped back afterwards. Tokens are wrapped in private-use characters so markdown leaves
//! them alone and a digit that follows cannot be read as part of the index.

use super::*;

const OPEN: char = '\u{E000}';
const CLOSE: char = '\u{E001}';

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new("\u{E000}(PLACEHOLDER|URL)::([0-9]+)\u{E001}").expect("valid token pattern")
});

/// The destination of an inline markdown link: `[text](destination)`.
static LINK_DESTINATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[.*?\]\(([^\[\]\(\)]+)\)").expect("valid link pattern")
});

static DESTINATION_WITH_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\S+)(\s+"[^"]*")$"#).expect("valid title pattern")
});

/// How tokens are turned back into text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RestoreMode {
    /// Every token becomes exactly the text it replaced.
    Raw,
    /// HTML output: placeholders in text become their marker spans, anything inside a tag
    /// (such as an `href`) is restored raw and made attribute-safe.
    Markup,
}

#[derive(Debug)]
struct MaskedPlaceholder {
    raw: String,
    marker: String,
}

/// Per-call record of everything masked. Never shared between renders.
#[derive(Debug, Default)]
pub(crate) struct MaskContext {
    placeholders: Vec<MaskedPlaceholder>,
    urls: Vec<String>,
}

impl MaskContext {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn placeholder_count(&self) -> usize {
        self.placeholders.len()
    }

    pub(crate) fn url_count(&self) -> usize {
        self.urls.len()
    }

    /// Record a placeholder and return its 1-based token.
    pub(crate) fn mask_placeholder(&mut self, raw: &str, marker: String) -> String {
        self.placeholders.push(MaskedPlaceholder {
            raw: raw.to_owned(),
            marker,
        });
        format!("{OPEN}PLACEHOLDER::{}{CLOSE}", self.placeholders.len())
    }

    /// Mask every `((placeholder))` in `text`, using the raw token as its own marker.
    pub(crate) fn mask_placeholders(&mut self, text: &str) -> String {
        PLACEHOLDER_PATTERN
            .replace_all(text, |captures: &Captures<'_>| {
                let raw = &captures[0];
                self.mask_placeholder(raw, raw.to_owned())
            })
            .into_owned()
    }

    /// Replace the destination of every inline link with a URL token.
    ///
    /// A trailing `"title"` stays visible to the parser.
    pub(crate) fn mask_urls(&mut self, text: &str) -> String {
        LINK_DESTINATION
            .replace_all(text, |captures: &Captures<'_>| {
                let (Some(whole), Some(destination)) = (captures.get(0), captures.get(1)) else {
                    return captures[0].to_owned();
                };
                let (url, title) = match DESTINATION_WITH_TITLE.captures(destination.as_str()) {
                    Some(parts) => (parts[1].to_owned(), parts[2].to_owned()),
                    None => (destination.as_str().to_owned(), String::new()),
                };
                self.urls.push(url);
                let prefix_len = destination.start() - whole.start();
                format!(
                    "{}{OPEN}URL::{}{CLOSE}{title})",
                    &whole.as_str()[..prefix_len],
                    self.urls.len()
                )
            })
            .into_owned()
    }

    /// Mask placeholders, then link destinations.
    pub(crate) fn mask(&mut self, text: &str) -> String {
        let text = self.mask_placeholders(text);
        self.mask_urls(&text)
    }

    /// Put every token back. Unknown indices render as a visible `((KIND::n))` marker.
    pub(crate) fn restore(&self, text: &str, mode: RestoreMode) -> String {
        let mut restored = String::with_capacity(text.len());
        let mut in_tag = false;
        let mut last = 0;

        for captures in TOKEN.captures_iter(text) {
            let Some(token) = captures.get(0) else {
                continue;
            };
            let between = &text[last..token.start()];
            in_tag = tag_state_after(between, in_tag);
            restored.push_str(between);
            last = token.end();

            let index = captures[2].parse::<usize>().unwrap_or(0);
            match &captures[1] {
                "URL" => restored.push_str(&self.restore_url(index, mode)),
                _ => restored.push_str(&self.restore_placeholder(index, mode, in_tag)),
            }
        }
        restored.push_str(&text[last..]);
        restored
    }

    fn restore_placeholder(&self, index: usize, mode: RestoreMode, in_tag: bool) -> String {
        let Some(placeholder) = index
            .checked_sub(1)
            .and_then(|index| self.placeholders.get(index))
        else {
            tracing::warn!(index, "unresolvable placeholder token");
            return format!("((PLACEHOLDER::{index}))");
        };
        match mode {
            RestoreMode::Markup if !in_tag => placeholder.marker.clone(),
            _ => placeholder.raw.clone(),
        }
    }

    fn restore_url(&self, index: usize, mode: RestoreMode) -> String {
        let Some(url) = index.checked_sub(1).and_then(|index| self.urls.get(index)) else {
            tracing::warn!(index, "unresolvable url token");
            return format!("((URL::{index}))");
        };
        // Placeholders inside a destination always come back raw.
        let url = self.restore(url, RestoreMode::Raw);
        match mode {
            RestoreMode::Raw => url,
            RestoreMode::Markup => url
                .replace(' ', "%20")
                .replace('\t', "%09")
                .replace('"', "&quot;"),
        }
    }
}

/// Whether the cursor is inside an HTML tag after reading `segment`.
fn tag_state_after(segment: &str, mut in_tag: bool) -> bool {
    for c in segment.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ => {}
        }
    }
    in_tag
}
