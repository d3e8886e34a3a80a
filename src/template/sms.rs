use super::*;

use page::{Page, PageRenderer, SmsPreviewPage};
use typography::Pipeline;

/// Sender options for a text message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmsOptions {
    /// Service name put in front of the message, as `prefix: body`.
    pub prefix: Option<String>,
    /// Whether the prefix is used at all.
    pub show_prefix: bool,
    /// Sender name or number.
    pub sender: Option<String>,
}

impl Default for SmsOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            show_prefix: true,
            sender: None,
        }
    }
}

impl SmsOptions {
    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref().filter(|_| self.show_prefix)
    }
}

/// A text message as it will be sent.
///
/// ```rust
/// # use notify_fmt::{template::{SmsMessage, SmsOptions, Template, TemplateRecord}, Columns};
/// let template = Template::new(TemplateRecord::new("Your code is ((code)) .\r\n\u{2013}Bye"))
///     .with_values(Columns::from([("code", "1234")]));
/// let sms = SmsMessage::new(template).options(SmsOptions {
///     prefix: Some("Service".to_owned()),
///     ..SmsOptions::default()
/// });
/// assert_eq!(sms.render()?, "Service: Your code is 1234.\n-Bye");
/// assert_eq!(sms.content_count()?, 32);
/// assert_eq!(sms.fragment_count()?, 1);
/// # Ok::<(), notify_fmt::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct SmsMessage {
    template: Template,
    config: Config,
    options: SmsOptions,
}

impl SmsMessage {
    /// Wrap `template`.
    pub fn new(template: Template) -> Self {
        Self {
            template,
            config: Config::default(),
            options: SmsOptions::default(),
        }
    }

    /// Render with `config` instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Prefix and sender options.
    pub fn options(mut self, options: SmsOptions) -> Self {
        self.options = options;
        self
    }

    /// The wrapped template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The message text, GSM encoded and trimmed.
    pub fn render(&self) -> Result<String> {
        let field = Field::new(self.template.content())
            .values(self.template.values())
            .sanitizer(Sanitizer::Passthrough);
        field.require_values()?;
        let rendered = field.render();
        let prefix = self.options.prefix();
        Pipeline::new()
            .then("add_prefix", |text| typography::add_prefix(&text, prefix))
            .then("sms_encode", |text| crate::sms::encode(&text))
            .then("remove_whitespace_before_punctuation", |text| {
                typography::remove_whitespace_before_punctuation(&text)
            })
            .then("normalise_newlines", |text| {
                typography::normalise_newlines(&text)
            })
            .then("trim", |text| text.trim().to_owned())
            .run(rendered)
    }

    /// Length of the message in bytes.
    ///
    /// Without values the raw content is counted, placeholders and all.
    pub fn content_count(&self) -> Result<usize> {
        if self.template.values().is_empty() {
            let prefixed =
                typography::add_prefix(self.template.content().trim(), self.options.prefix());
            return Ok(crate::sms::encode(&prefixed).len());
        }
        Ok(self.render()?.len())
    }

    /// How many fragments the message is billed as.
    pub fn fragment_count(&self) -> Result<usize> {
        let unicode = crate::sms::is_unicode(&self.render()?);
        Ok(crate::sms::fragment_count(self.content_count()?, unicode))
    }

    /// Whether the message is over the sending limit.
    pub fn is_message_too_long(&self) -> Result<bool> {
        Ok(self.content_count()? > self.config.sms_char_count_limit)
    }
}

/// What an SMS preview shows besides the body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmsPreviewOptions {
    /// Show the recipient line.
    pub show_recipient: bool,
    /// Show the sender line.
    pub show_sender: bool,
    /// Show the message as GSM will carry it.
    pub downgrade_non_sms_characters: bool,
}

impl Default for SmsPreviewOptions {
    fn default() -> Self {
        Self {
            show_recipient: false,
            show_sender: false,
            downgrade_non_sms_characters: true,
        }
    }
}

/// A text message drawn as a phone screen.
#[derive(Clone, Debug, Default)]
pub struct SmsPreview {
    message: SmsMessage,
    options: SmsPreviewOptions,
}

impl SmsPreview {
    /// Wrap `template`.
    pub fn new(template: Template) -> Self {
        Self {
            message: SmsMessage::new(template),
            options: SmsPreviewOptions::default(),
        }
    }

    /// Render with `config` instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.message = self.message.config(config);
        self
    }

    /// Prefix and sender options.
    pub fn sms_options(mut self, options: SmsOptions) -> Self {
        self.message = self.message.options(options);
        self
    }

    /// What to show around the body.
    pub fn options(mut self, options: SmsPreviewOptions) -> Self {
        self.options = options;
        self
    }

    /// The message being previewed, for its counts.
    pub fn message(&self) -> &SmsMessage {
        &self.message
    }

    /// Escaped body with line breaks and links as HTML.
    pub fn body(&self) -> Result<String> {
        let template = &self.message.template;
        let field = template
            .field(template.content())
            .sanitizer(Sanitizer::Escape);
        field.require_values()?;
        let rendered = field.render();
        let prefix = self
            .message
            .options
            .prefix()
            .map(|prefix| sanitize::escape_html(prefix).into_owned());
        Pipeline::new()
            .then("add_prefix", |text| {
                typography::add_prefix(&text, prefix.as_deref())
            })
            .then_if(
                self.options.downgrade_non_sms_characters,
                "sms_encode",
                |text| crate::sms::encode(&text),
            )
            .then("remove_whitespace_before_punctuation", |text| {
                typography::remove_whitespace_before_punctuation(&text)
            })
            .then("nl2br", |text| typography::nl2br(&text))
            .then("autolink_sms", |text| typography::autolink_sms(&text))
            .run(rendered)
    }

    /// The `((phone number))` value, or an unbracketed marker without one.
    pub fn recipient(&self) -> String {
        Field::new("((phone number))")
            .values(self.message.template.values())
            .with_brackets(false)
            .sanitizer(Sanitizer::Escape)
            .render()
    }

    /// Everything the phone layout needs.
    pub fn page(&self) -> Result<Page> {
        Ok(Page::SmsPreview(SmsPreviewPage {
            body: self.body()?,
            sender: self.message.options.sender.clone(),
            show_sender: self.options.show_sender,
            recipient: self.recipient(),
            show_recipient: self.options.show_recipient,
        }))
    }

    /// Hand the page to `renderer`.
    pub fn render_page(&self, renderer: &impl PageRenderer) -> Result<String> {
        renderer.render(&self.page()?)
    }
}
