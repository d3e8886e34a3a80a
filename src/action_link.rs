//! Call-to-action links: a styled anchor holding an arrow image and bold text, always in a
//! paragraph of its own.
//!
//! Action links written at the start of a line are found before parsing (see
//! [`markdown`](crate::markdown)). This module also upgrades the ones written mid-line, which
//! reach the HTML as `&gt;&gt;` followed by an ordinary link, and splits the surrounding
//! paragraph so the call to action still stands alone.

use super::*;

static INLINE_ACTION_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?:>|&gt;){2}(<a style="[^"]*" href="[^"]*"(?: title="[^"]*")? target="_blank">)(.*?)</a>"#,
    )
    .expect("valid inline action link pattern")
});

/// The anchor for one action link. `link_open` is the styled `<a …>` tag and `text` is
/// already escaped.
fn action_link_anchor(link_open: &str, text: &str, image_url: &str) -> String {
    format!(
        "{link_open}<img src=\"{image_url}\" alt=\"call to action img\" \
         style=\"vertical-align: middle;\"> <b>{text}</b></a>"
    )
}

/// The action link anchor alone in a styled paragraph.
pub(crate) fn action_link_paragraph(link_open: &str, text: &str, image_url: &str) -> String {
    format!(
        "<p style=\"{PARAGRAPH_STYLE}\">{}</p>",
        action_link_anchor(link_open, text, image_url)
    )
}

/// Upgrade every `&gt;&gt;<a …>text</a>` in rendered HTML to an action link paragraph.
///
/// Where the link sat decides how the enclosing paragraph is split:
///
/// | before the link        | after the link        | result                                   |
/// |------------------------|-----------------------|------------------------------------------|
/// | just the `<p>` opening | just the `</p>`       | the link takes over the paragraph        |
/// | a `<p>` opening        | a `</p>`              | the link replaces the paragraph content  |
/// | a `<p>` opening        | more text             | the link, then a new paragraph           |
/// | text                   | just the `</p>`       | close the paragraph, then the link       |
/// | text                   | more text             | close, link, and reopen for the rest     |
///
/// ```rust
/// # use notify_fmt::{action_link::insert_action_links, render::{LINK_STYLE, PARAGRAPH_STYLE}, Config};
/// let html = format!(
///     "<p style=\"{PARAGRAPH_STYLE}\">go &gt;&gt;<a style=\"{LINK_STYLE}\" href=\"#\" \
///      target=\"_blank\">now</a> please</p>"
/// );
/// let upgraded = insert_action_links(&html, &Config::default());
/// assert!(upgraded.starts_with(&format!("<p style=\"{PARAGRAPH_STYLE}\">go </p>")));
/// assert!(upgraded.contains("<b>now</b></a></p>"));
/// assert!(upgraded.ends_with(&format!("<p style=\"{PARAGRAPH_STYLE}\"> please</p>")));
/// ```
pub fn insert_action_links(html: &str, config: &Config) -> String {
    let p_start = format!("<p style=\"{PARAGRAPH_STYLE}\">");
    let p_end = "</p>";
    let image_url = config.action_link_image_url();

    let mut html = html.to_owned();
    let mut cursor = 0;
    while let Some(captures) = INLINE_ACTION_LINK.captures_at(&html, cursor) {
        let (Some(whole), Some(link_open), Some(text)) =
            (captures.get(0), captures.get(1), captures.get(2))
        else {
            break;
        };
        let anchor = action_link_anchor(link_open.as_str(), text.as_str(), &image_url);
        let (before, after) = (&html[..whole.start()], &html[whole.end()..]);
        let in_paragraph = before
            .rfind("<p ")
            .max(before.rfind("<p>"))
            .is_some_and(|open| before.rfind(p_end).map_or(true, |close| close < open));
        let (close, reopen) = if in_paragraph {
            (p_end, p_start.as_str())
        } else {
            ("", "")
        };

        let replacement = match (before.ends_with(p_start.as_str()), after.starts_with(p_end)) {
            (true, true) => anchor,
            (true, false) => format!("{anchor}{p_end}{p_start}"),
            // The paragraph end that follows now closes the action link paragraph.
            (false, true) => format!("{close}{p_start}{anchor}"),
            (false, false) => format!("{close}{p_start}{anchor}{p_end}{reopen}"),
        };
        tracing::debug!(
            at_start = before.ends_with(p_start.as_str()),
            at_end = after.starts_with(p_end),
            "action link split into its own paragraph"
        );

        cursor = whole.start() + replacement.len();
        html.replace_range(whole.range(), &replacement);
    }
    html
}
