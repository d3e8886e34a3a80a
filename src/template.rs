//! Channel templates.
//!
//! A [`Template`] pairs a [`TemplateRecord`] with personalisation. Each channel wraps one and
//! renders it with a [`Pipeline`](typography::Pipeline) of text steps chosen for that channel.

use super::*;

mod email;
mod letter;
mod sms;

pub use email::{
    html_email_body, EmailPreview, EmailPreviewOptions, HtmlEmail, PlainTextEmail, WithSubject,
};
pub use letter::{LetterImage, LetterImageOptions, LetterOptions, LetterPreview};
pub use sms::{SmsMessage, SmsOptions, SmsPreview, SmsPreviewOptions};

pub(crate) use email::{plain_text_email_body, preheader};
pub(crate) use letter::letter_message;

/// Notification channel a template is written for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateType {
    /// Text message.
    Sms,
    /// E-mail.
    Email,
    /// Printed letter.
    Letter,
}

impl FromStr for TemplateType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sms" => Ok(TemplateType::Sms),
            "email" => Ok(TemplateType::Email),
            "letter" => Ok(TemplateType::Letter),
            other => Err(Error::MalformedTemplate(format!(
                "unknown template type {other}"
            ))),
        }
    }
}

/// A stored template.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TemplateRecord {
    /// Identifier, kept for callers.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Template body.
    pub content: String,
    /// Subject line of e-mails and letters.
    pub subject: Option<String>,
    /// Channel, when the record says.
    pub template_type: Option<TemplateType>,
}

impl TemplateRecord {
    /// A record holding only `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// The same record with a subject line.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Validate and decode a JSON template record.
    ///
    /// ```rust
    /// # use notify_fmt::template::TemplateRecord;
    /// let record = TemplateRecord::from_json(serde_json::json!({
    ///     "content": "Hi ((name))",
    ///     "subject": "Welcome",
    ///     "template_type": "email",
    /// }))?;
    /// assert_eq!(record.subject.as_deref(), Some("Welcome"));
    /// assert!(TemplateRecord::from_json(serde_json::json!(["content"])).is_err());
    /// # Ok::<(), notify_fmt::Error>(())
    /// ```
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let serde_json::Value::Object(mut map) = value else {
            return Err(Error::MalformedTemplate("template must be an object".to_owned()));
        };
        let content = match map.remove("content") {
            Some(serde_json::Value::String(content)) => content,
            _ => return Err(Error::MalformedTemplate("content must be a string".to_owned())),
        };
        let subject = match map.remove("subject") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(subject)) => Some(subject),
            Some(_) => return Err(Error::MalformedTemplate("subject must be a string".to_owned())),
        };
        let template_type = match map.remove("template_type") {
            Some(serde_json::Value::String(name)) => Some(name.parse()?),
            _ => None,
        };
        let text = |value: Option<serde_json::Value>| match value {
            Some(serde_json::Value::String(text)) => Some(text),
            Some(serde_json::Value::Number(number)) => Some(number.to_string()),
            _ => None,
        };
        Ok(Self {
            id: text(map.remove("id")),
            name: text(map.remove("name")),
            content,
            subject,
            template_type,
        })
    }

    /// Decode a JSON document holding a template record.
    pub fn from_json_str(input: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(input)?)
    }
}

/// A template and the personalisation to render it with.
///
/// ```rust
/// # use notify_fmt::{template::{Template, TemplateRecord}, Columns};
/// let template = Template::new(TemplateRecord::new("Dear ((First Name)), <b>hi</b>"))
///     .with_values(Columns::from([("first_name", "Ada"), ("ref", "1")]));
/// assert_eq!(template.render(), "Dear Ada, &lt;b&gt;hi&lt;/b&gt;");
/// assert_eq!(template.additional_data().into_iter().collect::<Vec<_>>(), ["ref"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Template {
    record: TemplateRecord,
    values: Columns,
    redact_missing: bool,
}

impl Template {
    /// A template with no values.
    pub fn new(record: TemplateRecord) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    /// Decode the record from JSON.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        TemplateRecord::from_json(value).map(Self::new)
    }

    /// The same template with `values`.
    pub fn with_values(mut self, values: Columns) -> Self {
        self.set_values(values);
        self
    }

    /// Hide unresolved placeholders instead of highlighting them.
    pub fn redact_missing(mut self, redact_missing: bool) -> Self {
        self.redact_missing = redact_missing;
        self
    }

    /// Replace the values, re-keyed to the spelling the placeholders use.
    pub fn set_values(&mut self, values: Columns) {
        let names = self.placeholders();
        self.values = values.with_keys(names.iter().map(String::as_str));
    }

    /// The stored record.
    pub fn record(&self) -> &TemplateRecord {
        &self.record
    }

    /// Raw template content.
    pub fn content(&self) -> &str {
        &self.record.content
    }

    /// Values, keyed as the placeholders spell them.
    pub fn values(&self) -> &Columns {
        &self.values
    }

    pub(crate) fn redacting(&self) -> bool {
        self.redact_missing
    }

    /// The subject line, which e-mails and letters need.
    pub(crate) fn subject_source(&self) -> Result<&str> {
        self.record
            .subject
            .as_deref()
            .ok_or_else(|| Error::MalformedTemplate("subject is required".to_owned()))
    }

    /// Placeholder names in the content and subject.
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut names = Field::new(&self.record.content).placeholder_names();
        if let Some(subject) = &self.record.subject {
            names.extend(Field::new(subject).placeholder_names());
        }
        names
    }

    /// Placeholder names with no usable value, sorted.
    pub fn missing_data(&self) -> Vec<String> {
        self.placeholders()
            .into_iter()
            .filter(|name| self.values.get_present(name).is_none())
            .collect()
    }

    /// Value keys no placeholder asks for.
    pub fn additional_data(&self) -> BTreeSet<String> {
        let wanted: BTreeSet<_> = self
            .placeholders()
            .iter()
            .map(|name| Columns::make_key(name))
            .collect();
        self.values
            .keys()
            .filter(|key| !wanted.contains(&Columns::make_key(key)))
            .map(str::to_owned)
            .collect()
    }

    /// The content with values substituted and HTML escaped.
    pub fn render(&self) -> String {
        self.field(&self.record.content)
            .sanitizer(Sanitizer::Escape)
            .render()
    }

    /// A field over `content` with this template's values and redaction.
    pub(crate) fn field<'a>(&'a self, content: &'a str) -> Field<'a> {
        Field::new(content)
            .values(&self.values)
            .redact_missing(self.redact_missing)
    }
}

/// Substitute `values` into Notify markdown and render it for `flavour`.
///
/// Values are required only when some are supplied: an empty mapping renders with
/// highlighted placeholders, as does `preview_mode`.
///
/// ```rust
/// # use notify_fmt::{render_notify_markdown, Columns, Config, Error, Flavour};
/// let values = Columns::from([("test", "some"), ("extra", "extra")]);
/// let plain = render_notify_markdown(
///     "This is ((test)) markdown.", &values, Flavour::PlainText, false, &Config::default())?;
/// assert_eq!(plain, "This is some markdown.\n");
///
/// let partial = Columns::from([("test1", "test")]);
/// let missing = render_notify_markdown(
///     "This is ((test1)) markdown ((test2)).", &partial, Flavour::Html, false, &Config::default());
/// assert_eq!(missing.unwrap_err().to_string(), "Missing required personalization: test2");
/// # Ok::<(), Error>(())
/// ```
pub fn render_notify_markdown(
    markdown: &str,
    values: &Columns,
    flavour: Flavour,
    preview_mode: bool,
    config: &Config,
) -> Result<String> {
    Field::new(markdown)
        .values(values)
        .preview_mode(preview_mode)
        .require_values()?;
    match flavour {
        Flavour::Html => html_email_body(markdown, values, false, preview_mode, config),
        Flavour::PlainText => plain_text_email_body(markdown, values, config),
        Flavour::Preheader => preheader(markdown, values, config),
        Flavour::Letter => letter_message(markdown, values, false, config),
    }
}

/// Substitute `values` into a subject line. Every placeholder needs a value.
///
/// ```rust
/// # use notify_fmt::{make_substitutions_in_subject, Columns, Value};
/// let values = Columns::from([
///     ("name", Value::from("Bob")),
///     ("other", Value::list(["one", "two"])),
/// ]);
/// assert_eq!(make_substitutions_in_subject("Hello, ((name))!", &values)?, "Hello, Bob!");
/// # Ok::<(), notify_fmt::Error>(())
/// ```
pub fn make_substitutions_in_subject(subject: &str, values: &Columns) -> Result<String> {
    let field = Field::new(subject)
        .values(values)
        .sanitizer(Sanitizer::Passthrough);
    let missing = field.missing_required();
    if !missing.is_empty() {
        return Err(Error::MissingSubjectPersonalisation(missing));
    }
    Ok(field.replaced())
}
