use super::*;

mod masking;
#[cfg(test)]
mod test;

pub(crate) use masking::{MaskContext, RestoreMode};

/// Matches `((name))` and `((name??conditional text))`.
pub(crate) static PLACEHOLDER_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\(\(([\w \-]+(?:\?\?.*?)?)\)\)").expect("valid placeholder pattern")
});

const PLACEHOLDER_TAG: &str = "<span class='placeholder'>(({}))</span>";
const PLACEHOLDER_TAG_WITH_HIGHLIGHT: &str = "<span class='placeholder'><mark>(({}))</mark></span>";
const PLACEHOLDER_TAG_NO_BRACKETS: &str = "<span class='placeholder-no-brackets'>{}</span>";
const PLACEHOLDER_TAG_REDACTED: &str = "<span class='placeholder-redacted'>hidden</span>";

/// Options that decide how a [`Field`] treats its placeholders.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldOptions {
    /// Applied to the content and to every substituted value.
    pub sanitizer: Sanitizer,
    /// Keep the `((` `))` around highlighted placeholder names.
    pub with_brackets: bool,
    /// Render list values as a markdown bullet list instead of an inline phrase.
    pub markdown_lists: bool,
    /// Replace every unresolved placeholder with a fixed "hidden" marker.
    pub redact_missing: bool,
    /// Highlight plain placeholders instead of substituting them.
    pub preview_mode: bool,
}

impl Default for FieldOptions {
    fn default() -> Self {
        Self {
            sanitizer: Sanitizer::Strip,
            with_brackets: true,
            markdown_lists: false,
            redact_missing: false,
            preview_mode: false,
        }
    }
}

/// Template text paired with the personalisation that fills it.
///
/// A field renders two ways. [`formatted`](Field::formatted) highlights every placeholder
/// and [`replaced`](Field::replaced) substitutes values. [`render`](Field::render) picks
/// between them based on whether any values were supplied.
///
/// ```rust
/// # use notify_fmt::{Columns, Field, Sanitizer};
/// let values = Columns::from([("name", "World")]);
/// let field = Field::new("Hello ((name))")
///     .values(&values)
///     .sanitizer(Sanitizer::Passthrough);
/// assert_eq!(field.render(), "Hello World");
///
/// let preview = Field::new("Hello ((name))");
/// assert_eq!(preview.render(), "Hello <span class='placeholder'>((name))</span>");
/// ```
#[derive(Clone, Debug)]
pub struct Field<'a> {
    content: &'a str,
    values: Option<&'a Columns>,
    options: FieldOptions,
}

impl<'a> Field<'a> {
    /// A field with default options and no values.
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            values: None,
            options: FieldOptions::default(),
        }
    }

    /// Attach personalisation.
    pub fn values(mut self, values: &'a Columns) -> Self {
        self.values = Some(values);
        self
    }

    /// Replace all options at once.
    pub fn options(mut self, options: FieldOptions) -> Self {
        self.options = options;
        self
    }

    /// Choose the sanitizer.
    pub fn sanitizer(mut self, sanitizer: Sanitizer) -> Self {
        self.options.sanitizer = sanitizer;
        self
    }

    /// Keep or drop the brackets around highlighted names.
    pub fn with_brackets(mut self, with_brackets: bool) -> Self {
        self.options.with_brackets = with_brackets;
        self
    }

    /// Render list values as markdown bullets.
    pub fn markdown_lists(mut self, markdown_lists: bool) -> Self {
        self.options.markdown_lists = markdown_lists;
        self
    }

    /// Hide unresolved placeholders behind the redaction marker.
    pub fn redact_missing(mut self, redact_missing: bool) -> Self {
        self.options.redact_missing = redact_missing;
        self
    }

    /// Highlight instead of substituting plain placeholders.
    pub fn preview_mode(mut self, preview_mode: bool) -> Self {
        self.options.preview_mode = preview_mode;
        self
    }

    /// Every distinct placeholder in the raw content.
    pub fn placeholders(&self) -> BTreeSet<Placeholder> {
        PLACEHOLDER_PATTERN
            .captures_iter(self.content)
            .map(|captures| Placeholder::from_match(&captures))
            .collect()
    }

    /// Names of every placeholder in the raw content.
    pub fn placeholder_names(&self) -> BTreeSet<String> {
        self.placeholders()
            .iter()
            .map(|placeholder| placeholder.name().to_owned())
            .collect()
    }

    /// Names of plain placeholders with no usable value, sorted.
    ///
    /// Redaction and preview both render something for every placeholder, so nothing is
    /// missing in either mode.
    pub fn missing_required(&self) -> Vec<String> {
        if self.options.redact_missing || self.options.preview_mode {
            return Vec::new();
        }
        self.placeholders()
            .iter()
            .filter(|placeholder| !placeholder.is_conditional())
            .filter(|placeholder| {
                self.values
                    .and_then(|values| values.get_present(placeholder.name()))
                    .is_none()
            })
            .map(|placeholder| placeholder.name().to_owned())
            .sorted()
            .dedup()
            .collect()
    }

    /// Fails with [`Error::MissingPersonalisation`] when values were supplied but some plain
    /// placeholder has none. An empty mapping is a preview and always passes.
    pub(crate) fn require_values(&self) -> Result<()> {
        if !self.has_values() {
            return Ok(());
        }
        let missing = self.missing_required();
        if missing.is_empty() {
            Ok(())
        } else {
            tracing::debug!(?missing, "values missing");
            Err(Error::MissingPersonalisation(missing))
        }
    }

    fn has_values(&self) -> bool {
        self.values.is_some_and(|values| !values.is_empty())
    }

    /// Values are substituted when any were supplied, otherwise placeholders are highlighted.
    pub fn render(&self) -> String {
        if self.has_values() {
            self.replaced()
        } else {
            self.formatted()
        }
    }

    /// Sanitized content with every placeholder swapped for its marker span.
    pub fn formatted(&self) -> String {
        self.substitute(None, |_, marker| marker)
    }

    /// Sanitized content with values substituted.
    ///
    /// A placeholder that cannot be filled falls back to its marker span.
    /// [`missing_required`](Field::missing_required) tells callers whether that happened
    /// for a placeholder that needed a value.
    pub fn replaced(&self) -> String {
        self.substitute(self.values, |_, marker| marker)
    }

    /// Render for a markdown pass: markers become masking tokens and link destinations
    /// are masked too, all recorded in `context`.
    pub(crate) fn masked(&self, context: &mut MaskContext) -> String {
        let values = self.values.filter(|values| !values.is_empty());
        let substituted = self.substitute(values, |raw, marker| {
            context.mask_placeholder(raw, marker)
        });
        let masked = context.mask_urls(&substituted);
        tracing::trace!(
            placeholders = context.placeholder_count(),
            urls = context.url_count(),
            "masked field"
        );
        masked
    }

    fn substitute<F>(&self, values: Option<&Columns>, mut on_marker: F) -> String
    where
        F: FnMut(&str, String) -> String,
    {
        let sanitized = self.options.sanitizer.apply(self.content);
        PLACEHOLDER_PATTERN
            .replace_all(&sanitized, |captures: &Captures<'_>| {
                let placeholder = Placeholder::from_match(captures);
                match values.and_then(|values| self.replacement(&placeholder, values)) {
                    Some(replacement) => replacement,
                    None => on_marker(&captures[0], self.marker(&placeholder)),
                }
            })
            .into_owned()
    }

    fn replacement(&self, placeholder: &Placeholder, values: &Columns) -> Option<String> {
        let value = values.get(placeholder.name());

        if placeholder.is_conditional() {
            if let Some(value) = value.filter(|value| **value != Value::Null) {
                let text = value.to_text();
                let body = placeholder.conditional_body(&text).ok()?;
                return Some(body.replace("{}", &self.options.sanitizer.apply(&text)));
            }
        }

        if self.options.preview_mode {
            return None;
        }

        match value? {
            Value::Text(text) => Some(self.options.sanitizer.apply(text).into_owned()),
            Value::List(items) if !items.is_empty() => {
                let joined = if self.options.markdown_lists {
                    format!(
                        "\n\n{}",
                        items.iter().map(|item| format!("* {item}")).join("\n")
                    )
                } else {
                    formatted_list(items.as_slice())
                };
                Some(self.options.sanitizer.apply(&joined).into_owned())
            }
            _ => None,
        }
    }

    /// The styled span for a placeholder. Redaction wins over every other option.
    fn marker(&self, placeholder: &Placeholder) -> String {
        if self.options.redact_missing {
            return PLACEHOLDER_TAG_REDACTED.to_owned();
        }

        let sanitizer = self.options.sanitizer;
        let name = sanitizer.apply(placeholder.name());
        if let Ok(text) = placeholder.conditional_text() {
            return format!(
                "<span class='placeholder-conditional'>(({name}??</span>{}))",
                sanitizer.apply(text)
            );
        }

        let tag = if self.options.preview_mode {
            PLACEHOLDER_TAG_WITH_HIGHLIGHT
        } else if self.options.with_brackets {
            PLACEHOLDER_TAG
        } else {
            PLACEHOLDER_TAG_NO_BRACKETS
        };
        tag.replacen("{}", &name, 1)
    }
}
