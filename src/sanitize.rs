use super::*;

pub(crate) static HTML_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[A-Za-z][A-Za-z0-9:-]*(?:\s[^<>]*)?/?>")
        .expect("valid tag pattern")
});

static ENTITY_OR_SPECIAL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(?:[A-Za-z][A-Za-z0-9]*|#[0-9]+|#[xX][0-9A-Fa-f]+);|[&<>]")
        .expect("valid entity pattern")
});

static DVLA_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<(?:cr|h1|h2|p|normal|op|np|bul|tab)>").expect("valid dvla pattern")
});

/// How literal text and substituted values are cleaned for a channel.
///
/// The same sanitizer is applied to the template text and to every value substituted into
/// it, so personalisation cannot smuggle in markup the channel would not otherwise allow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Sanitizer {
    /// Remove HTML tags and comments, leave everything else alone.
    #[default]
    Strip,
    /// Turn `<`, `>` and bare `&` into entities. Existing entities are kept.
    Escape,
    /// Leave text untouched.
    Passthrough,
    /// Remove the letter-printing control tags (`<cr>`, `<h1>`, `<bul>` and friends).
    StripDvlaMarkup,
}

impl Sanitizer {
    /// Apply the strategy to `text`.
    ///
    /// ```rust
    /// # use notify_fmt::Sanitizer;
    /// assert_eq!(Sanitizer::Escape.apply("<b>Tom &amp; Jerry & co</b>"),
    ///     "&lt;b&gt;Tom &amp; Jerry &amp; co&lt;/b&gt;");
    /// assert_eq!(Sanitizer::Strip.apply("<b>bold</b> text"), "bold text");
    /// ```
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Sanitizer::Strip => HTML_TAG.replace_all(text, ""),
            Sanitizer::Escape => escape_html(text),
            Sanitizer::Passthrough => Cow::Borrowed(text),
            Sanitizer::StripDvlaMarkup => DVLA_MARKUP.replace_all(text, ""),
        }
    }
}

/// Entity-escape `<`, `>` and any `&` that does not already start an entity.
pub(crate) fn escape_html(text: &str) -> Cow<'_, str> {
    ENTITY_OR_SPECIAL.replace_all(text, |captures: &Captures<'_>| {
        match &captures[0] {
            "&" => "&amp;".to_owned(),
            "<" => "&lt;".to_owned(),
            ">" => "&gt;".to_owned(),
            entity => entity.to_owned(),
        }
    })
}

/// Error returned when a sanitizer name is not recognised.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownSanitizer(pub String);

impl fmt::Display for UnknownSanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sanitizer `{}`", self.0)
    }
}

impl std::error::Error for UnknownSanitizer {}

impl FromStr for Sanitizer {
    type Err = UnknownSanitizer;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "strip" => Ok(Sanitizer::Strip),
            "escape" => Ok(Sanitizer::Escape),
            "passthrough" => Ok(Sanitizer::Passthrough),
            "strip_dvla_markup" => Ok(Sanitizer::StripDvlaMarkup),
            other => Err(UnknownSanitizer(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_keeps_entities() {
        assert_eq!(
            Sanitizer::Escape.apply("a &nbsp; b &#8217; c &#x2019; && <em>"),
            "a &nbsp; b &#8217; c &#x2019; &amp;&amp; &lt;em&gt;"
        );
    }

    #[test]
    fn escape_leaves_quotes() {
        assert_eq!(Sanitizer::Escape.apply(r#"say "hi" it's"#), r#"say "hi" it's"#);
    }

    #[test]
    fn strip_removes_tags_only() {
        assert_eq!(
            Sanitizer::Strip.apply("<script>x</script> 1 < 2 & <!-- gone --> <a href='x'>y</a>"),
            "x 1 < 2 &  y"
        );
    }

    #[test]
    fn dvla_markup_is_case_insensitive() {
        assert_eq!(
            Sanitizer::StripDvlaMarkup.apply("<CR>line<h1>title<np><b>kept</b>"),
            "linetitle<b>kept</b>"
        );
    }

    #[test]
    fn passthrough() {
        assert_eq!(Sanitizer::Passthrough.apply("<b>&</b>"), "<b>&</b>");
    }

    #[test]
    fn parses_names() {
        assert_eq!("escape".parse(), Ok(Sanitizer::Escape));
        assert_eq!(
            "bleach".parse::<Sanitizer>(),
            Err(UnknownSanitizer("bleach".to_owned()))
        );
    }
}
