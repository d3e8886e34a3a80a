//! Text clean-up and typography shared by every channel.
//!
//! Each function is a standalone `&str -> String` transform. Channels chain them with a
//! [`Pipeline`].

use super::*;

#[cfg(test)]
mod test;

/// Invisible characters that sneak in from copy and paste.
pub const OBSCURE_WHITESPACE: &[char] = &[
    '\u{180E}', // Mongolian vowel separator
    '\u{200B}', // zero width space
    '\u{200C}', // zero width non-joiner
    '\u{200D}', // zero width joiner
    '\u{2060}', // word joiner
    '\u{FEFF}', // zero width non-breaking space
];

const ASCII_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0b', '\x0c'];

static GOVUK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(gov)\.(uk)").expect("valid gov.uk pattern"));

static WHITESPACE_BEFORE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]+([,.])").expect("valid punctuation pattern"));

static HYPHENS_SURROUNDED_BY_SPACES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+[-\u{2013}\u{2014}]{1,3}\s+").expect("valid dash pattern"));

static EMAIL_WITH_SMART_QUOTES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)(^|\s)\S+@\S+(\s|$)").expect("valid e-mail pattern"));

static SMS_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s<]+[^<.,:"')\]\s]"#).expect("valid sms url pattern")
});

static TAG_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<(/?)([A-Za-z][A-Za-z0-9]*)").expect("valid tag name pattern"));

/// An ordered chain of named string transforms.
///
/// ```rust
/// # use notify_fmt::typography::{self, Pipeline};
/// let text = Pipeline::new()
///     .then("strip_pipes", |text| typography::strip_pipes(&text))
///     .then("add_trailing_newline", |text| typography::add_trailing_newline(&text))
///     .run("a | b".to_owned())?;
/// assert_eq!(text, "a  b\n");
/// # Ok::<(), notify_fmt::Error>(())
/// ```
#[derive(Default)]
pub struct Pipeline<'a> {
    steps: Vec<(&'static str, Step<'a>)>,
}

type Step<'a> = Box<dyn FnOnce(String) -> Result<String> + 'a>;

impl<'a> Pipeline<'a> {
    /// An empty pipeline. Running it returns its input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an infallible step.
    pub fn then(self, name: &'static str, step: impl FnOnce(String) -> String + 'a) -> Self {
        self.try_then(name, move |text| Ok(step(text)))
    }

    /// Append a step that may fail. The first failure stops the pipeline.
    pub fn try_then(
        mut self,
        name: &'static str,
        step: impl FnOnce(String) -> Result<String> + 'a,
    ) -> Self {
        self.steps.push((name, Box::new(step)));
        self
    }

    /// Append a step only when `condition` holds.
    pub fn then_if(
        self,
        condition: bool,
        name: &'static str,
        step: impl FnOnce(String) -> String + 'a,
    ) -> Self {
        if condition {
            self.then(name, step)
        } else {
            self
        }
    }

    /// Feed `input` through every step in order.
    pub fn run(self, input: String) -> Result<String> {
        self.steps.into_iter().try_fold(input, |text, (name, step)| {
            let before = text.len();
            let text = step(text)?;
            tracing::trace!(step = name, before, after = text.len(), "pipeline step");
            Ok(text)
        })
    }
}

impl fmt::Debug for Pipeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.steps.iter().map(|(name, _)| name))
            .finish()
    }
}

/// Break `GOV.UK` with a zero width space so mail clients do not link it.
///
/// Mentions that are part of a host name or followed by a path or query are left alone.
///
/// ```rust
/// # use notify_fmt::typography::unlink_govuk;
/// assert_eq!(unlink_govuk("GOV.UK"), "GOV.\u{200B}UK");
/// assert_eq!(unlink_govuk("https://gov.uk"), "https://gov.uk");
/// ```
pub fn unlink_govuk(text: &str) -> String {
    let mut unlinked = String::with_capacity(text.len());
    let mut last = 0;
    for captures in GOVUK.captures_iter(text) {
        let (Some(whole), Some(gov), Some(uk)) = (captures.get(0), captures.get(1), captures.get(2))
        else {
            continue;
        };
        let preceded = text[..whole.start()].ends_with(['.', '/']);
        let followed = text[whole.end()..].starts_with(['/', '?']);
        if preceded || followed {
            continue;
        }
        unlinked.push_str(&text[last..whole.start()]);
        unlinked.push_str(gov.as_str());
        unlinked.push_str(".\u{200B}");
        unlinked.push_str(uk.as_str());
        last = whole.end();
    }
    unlinked.push_str(&text[last..]);
    unlinked
}

/// Trim, then turn every line break into `<br>`.
pub fn nl2br(text: &str) -> String {
    text.trim().replace(['\n', '\r'], "<br>")
}

/// One list item per line.
pub fn nl2li(text: &str) -> String {
    format!("<ul><li>{}</li></ul>", text.trim().split('\n').join("</li><li>"))
}

/// `prefix: body`, or the body alone when there is no prefix.
pub fn add_prefix(body: &str, prefix: Option<&str>) -> String {
    match prefix.filter(|prefix| !prefix.is_empty()) {
        Some(prefix) => format!("{}: {body}", prefix.trim()),
        None => body.to_owned(),
    }
}

/// Prepend the subject as a level one heading.
pub fn prepend_subject(body: &str, subject: &str) -> String {
    format!("# {subject}\n\n{body}")
}

/// Drop empty lines.
pub fn remove_empty_lines(text: &str) -> String {
    text.split('\n').filter(|line| !line.is_empty()).join("\n")
}

/// Remove every `|`, which letter markup reserves.
pub fn strip_pipes(text: &str) -> String {
    text.replace('|', "")
}

/// Drop the line separator character, which breaks some mail clients.
pub fn strip_unsupported_characters(text: &str) -> String {
    text.replace('\u{2028}', "")
}

/// Trim ASCII whitespace and the [obscure whitespace](OBSCURE_WHITESPACE) from both ends,
/// plus any `extra` characters.
pub fn strip_whitespace(text: &str, extra: &[char]) -> String {
    text.trim_matches(|c| {
        ASCII_WHITESPACE.contains(&c) || OBSCURE_WHITESPACE.contains(&c) || extra.contains(&c)
    })
    .to_owned()
}

/// Remove obscure whitespace everywhere, then trim ASCII whitespace from the ends.
pub fn strip_and_remove_obscure_whitespace(text: &str) -> String {
    text.replace(OBSCURE_WHITESPACE, "")
        .trim_matches(ASCII_WHITESPACE)
        .to_owned()
}

/// Collapse every run of whitespace to a single space and trim.
pub fn normalise_whitespace(text: &str) -> String {
    strip_and_remove_obscure_whitespace(text)
        .split_whitespace()
        .join(" ")
}

/// Rejoin lines split on any line boundary with `\n`.
pub fn normalise_newlines(text: &str) -> String {
    let mut lines = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        match rest.find(is_line_boundary) {
            Some(at) => {
                lines.push(&rest[..at]);
                rest = &rest[at..];
                let width = if rest.starts_with("\r\n") {
                    2
                } else {
                    rest.chars().next().map_or(1, char::len_utf8)
                };
                rest = &rest[width..];
            }
            None => {
                lines.push(rest);
                rest = "";
            }
        }
    }
    lines.join("\n")
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\x0b'
            | '\x0c'
            | '\x1c'
            | '\x1d'
            | '\x1e'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

/// Trim the start.
pub fn strip_leading_whitespace(text: &str) -> String {
    text.trim_start().to_owned()
}

/// Append `\n`.
pub fn add_trailing_newline(text: &str) -> String {
    format!("{text}\n")
}

/// Remove the blank lines letter list markup leaves behind.
pub fn tweak_dvla_list_markup(text: &str) -> String {
    text.replace("<cr><cr><np>", "<cr><np>")
        .replace("<p><cr><p><cr>", "<p><cr>")
}

/// Link every URL in an SMS preview.
pub fn autolink_sms(text: &str) -> String {
    SMS_URL
        .replace_all(text, |captures: &Captures<'_>| {
            let url = &captures[0];
            format!("<a style=\"{LINK_STYLE}\" target=\"_blank\" href=\"{url}\">{url}</a>")
        })
        .into_owned()
}

/// Apply `transform` to the text between tags, leaving the tags themselves alone.
fn map_text_outside_tags(html: &str, mut transform: impl FnMut(&str) -> String) -> String {
    let mut mapped = String::with_capacity(html.len());
    let mut last = 0;
    for tag in sanitize::HTML_TAG.find_iter(html) {
        mapped.push_str(&transform(&html[last..tag.start()]));
        mapped.push_str(tag.as_str());
        last = tag.end();
    }
    mapped.push_str(&transform(&html[last..]));
    mapped
}

/// Hyphens become non-breaking hyphens, except inside tags.
pub fn replace_hyphens_with_non_breaking_hyphens(html: &str) -> String {
    map_text_outside_tags(html, |text| text.replace('-', "\u{2011}"))
}

/// Spaced hyphens and dashes (one to three of them) become a spaced en dash.
///
/// ```rust
/// # use notify_fmt::typography::replace_hyphens_with_en_dashes;
/// assert_eq!(replace_hyphens_with_en_dashes("double -- dash"), "double \u{2013} dash");
/// assert_eq!(replace_hyphens_with_en_dashes("quadruple ---- dash"), "quadruple ---- dash");
/// assert_eq!(replace_hyphens_with_en_dashes("2004-2008"), "2004-2008");
/// ```
pub fn replace_hyphens_with_en_dashes(text: &str) -> String {
    HYPHENS_SURROUNDED_BY_SPACES
        .replace_all(text, " \u{2013} ")
        .into_owned()
}

/// Remove spaces and tabs directly before a comma or full stop.
pub fn remove_whitespace_before_punctuation(text: &str) -> String {
    WHITESPACE_BEFORE_PUNCTUATION
        .replace_all(text, "$1")
        .into_owned()
}

/// Turn straight quotes into curly ones outside tags and outside the configured skip tags.
pub fn make_quotes_smart(html: &str, config: &TypographyConfig) -> String {
    let mut smart = String::with_capacity(html.len());
    let mut skipping: Vec<String> = Vec::new();
    let mut previous = None;
    let mut last = 0;

    for tag in sanitize::HTML_TAG.find_iter(html) {
        push_quoted(&html[last..tag.start()], !skipping.is_empty(), &mut previous, &mut smart);
        smart.push_str(tag.as_str());
        last = tag.end();

        let Some(captures) = TAG_NAME.captures(tag.as_str()) else {
            continue;
        };
        let name = captures[2].to_ascii_lowercase();
        let closing = !captures[1].is_empty();
        if closing {
            if skipping.last() == Some(&name) {
                skipping.pop();
            }
        } else if !tag.as_str().ends_with("/>")
            && config.skip_tags.iter().any(|skip| skip.eq_ignore_ascii_case(&name))
        {
            skipping.push(name);
        }
    }
    push_quoted(&html[last..], !skipping.is_empty(), &mut previous, &mut smart);
    smart
}

fn push_quoted(segment: &str, skip: bool, previous: &mut Option<char>, out: &mut String) {
    if skip {
        out.push_str(segment);
    } else {
        educate_quotes(segment, *previous, out);
    }
    if let Some(c) = segment.chars().last() {
        *previous = Some(c);
    }
}

fn opens_quote(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => c.is_whitespace() || "([{-\u{2013}\u{2014}\"'\u{201C}\u{2018}".contains(c),
    }
}

fn educate_quotes(text: &str, previous: Option<char>, out: &mut String) {
    let chars = text.chars().collect_vec();
    for (index, &c) in chars.iter().enumerate() {
        let before = index.checked_sub(1).map(|i| chars[i]).or(previous);
        let after = chars.get(index + 1).copied();
        let after_is_space = after.map_or(true, char::is_whitespace);
        let educated = match c {
            '\'' => {
                let decade = chars.get(index + 1..index + 4).is_some_and(|next| {
                    next[0].is_ascii_digit() && next[1].is_ascii_digit() && next[2] == 's'
                });
                if before.is_some_and(char::is_alphanumeric) || decade {
                    '\u{2019}'
                } else if opens_quote(before) && !after_is_space {
                    '\u{2018}'
                } else {
                    '\u{2019}'
                }
            }
            '"' => {
                if !opens_quote(before) || after_is_space {
                    '\u{201D}'
                } else {
                    '\u{201C}'
                }
            }
            c => c,
        };
        out.push(educated);
    }
}

/// Straighten curly single quotes inside anything that looks like an e-mail address.
pub fn remove_smart_quotes_from_email_addresses(text: &str) -> String {
    EMAIL_WITH_SMART_QUOTES
        .replace_all(text, |captures: &Captures<'_>| {
            captures[0].replace(['\u{2018}', '\u{2019}'], "'")
        })
        .into_owned()
}

/// Whitespace before punctuation, smart quotes, e-mail quote repair, then en dashes.
pub fn do_nice_typography(text: &str, config: &TypographyConfig) -> String {
    let text = remove_whitespace_before_punctuation(text);
    let text = make_quotes_smart(&text, config);
    let text = remove_smart_quotes_from_email_addresses(&text);
    replace_hyphens_with_en_dashes(&text)
}

/// Decode HTML entities.
pub fn unescape(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
