use super::*;

use page::{Branding, EmailPage, EmailPreviewPage, Page, PageRenderer};
use typography::Pipeline;
use unicode_segmentation::UnicodeSegmentation;

/// The HTML body of an e-mail.
///
/// Personalisation is escaped and list values become markdown bullets before the markdown is
/// rendered. Placeholders left unfilled are shielded from the parser and come back as marker
/// spans.
///
/// ```rust
/// # use notify_fmt::{template::html_email_body, Columns, Config};
/// let values = Columns::from([("name", "Jo & Co")]);
/// let body = html_email_body("Hi ((name))", &values, false, false, &Config::default())?;
/// assert!(body.contains(">Hi Jo &amp; Co</p>"));
/// # Ok::<(), notify_fmt::Error>(())
/// ```
pub fn html_email_body(
    content: &str,
    values: &Columns,
    redact_missing: bool,
    preview_mode: bool,
    config: &Config,
) -> Result<String> {
    let field = Field::new(content)
        .values(values)
        .sanitizer(Sanitizer::Escape)
        .markdown_lists(true)
        .redact_missing(redact_missing)
        .preview_mode(preview_mode);
    field.require_values()?;
    let mut context = MaskContext::new();
    let masked = field.masked(&mut context);
    let context = context;

    Pipeline::new()
        .then("unlink_govuk", |text| typography::unlink_govuk(&text))
        .then("strip_unsupported_characters", |text| {
            typography::strip_unsupported_characters(&text)
        })
        .then("add_trailing_newline", |text| {
            typography::add_trailing_newline(&text)
        })
        .try_then("markdown", |text| {
            Ok(markdown::render(&text, Flavour::Html, config)?)
        })
        .then("restore", |text| context.restore(&text, RestoreMode::Markup))
        .then("nice_typography", |text| {
            typography::do_nice_typography(&text, &config.typography)
        })
        .then("insert_action_links", |text| {
            action_link::insert_action_links(&text, config)
        })
        .run(masked)
}

pub(crate) fn plain_text_email_body(
    content: &str,
    values: &Columns,
    config: &Config,
) -> Result<String> {
    let mut context = MaskContext::new();
    let masked = Field::new(content)
        .values(values)
        .sanitizer(Sanitizer::Passthrough)
        .markdown_lists(true)
        .masked(&mut context);
    let context = context;

    Pipeline::new()
        .then("unlink_govuk", |text| typography::unlink_govuk(&text))
        .then("strip_unsupported_characters", |text| {
            typography::strip_unsupported_characters(&text)
        })
        .then("add_trailing_newline", |text| {
            typography::add_trailing_newline(&text)
        })
        .try_then("markdown", |text| {
            Ok(markdown::render(&text, Flavour::PlainText, config)?)
        })
        .then("restore", |text| context.restore(&text, RestoreMode::Raw))
        .then("nice_typography", |text| {
            typography::do_nice_typography(&text, &config.typography)
        })
        .then("unescape", |text| typography::unescape(&text))
        .then("strip_leading_whitespace", |text| {
            typography::strip_leading_whitespace(&text)
        })
        .then("add_trailing_newline", |text| {
            typography::add_trailing_newline(&text)
        })
        .run(masked)
}

/// The line mail clients show after the subject: the body as one run of words, cut to
/// `config.preheader_length` characters. The cut never splits a grapheme cluster.
pub(crate) fn preheader(content: &str, values: &Columns, config: &Config) -> Result<String> {
    let mut context = MaskContext::new();
    let masked = Field::new(content)
        .values(values)
        .sanitizer(Sanitizer::Escape)
        .markdown_lists(true)
        .masked(&mut context);
    let context = context;

    Pipeline::new()
        .then("unlink_govuk", |text| typography::unlink_govuk(&text))
        .then("strip_unsupported_characters", |text| {
            typography::strip_unsupported_characters(&text)
        })
        .then("add_trailing_newline", |text| {
            typography::add_trailing_newline(&text)
        })
        .try_then("markdown", |text| {
            Ok(markdown::render(&text, Flavour::Preheader, config)?)
        })
        .then("restore", |text| context.restore(&text, RestoreMode::Raw))
        .then("nice_typography", |text| {
            typography::do_nice_typography(&text, &config.typography)
        })
        .then("truncate", |text| {
            let joined = text.split_whitespace().join(" ");
            joined
                .graphemes(true)
                .take(config.preheader_length)
                .collect::<String>()
                .trim()
                .to_owned()
        })
        .run(masked)
}

/// Subject line with typography applied and whitespace collapsed.
fn subject_line(template: &Template, sanitizer: Sanitizer, config: &Config) -> Result<String> {
    let rendered = template
        .field(template.subject_source()?)
        .sanitizer(sanitizer)
        .render();
    Pipeline::new()
        .then("nice_typography", |text| {
            typography::do_nice_typography(&text, &config.typography)
        })
        .then("normalise_whitespace", |text| {
            typography::normalise_whitespace(&text)
        })
        .run(rendered)
}

/// A template with a subject line, rendered without markdown.
///
/// ```rust
/// # use notify_fmt::{template::{Template, TemplateRecord, WithSubject}, Columns};
/// let record = TemplateRecord::new("Dear ((name)),\n\n((items))").with_subject("Re: \"((ref))\"");
/// let values = Columns::from([
///     ("name", notify_fmt::Value::from("Sam")),
///     ("ref", "A1".into()),
///     ("items", notify_fmt::Value::list(["one", "two"])),
/// ]);
/// let email = WithSubject::new(Template::new(record).with_values(values));
/// assert_eq!(email.body(), "Dear Sam,\n\n\n\n* one\n* two");
/// assert_eq!(email.subject()?, "Re: \u{201C}A1\u{201D}");
/// # Ok::<(), notify_fmt::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct WithSubject {
    template: Template,
    config: Config,
}

impl WithSubject {
    /// Wrap `template`, which needs a subject.
    pub fn new(template: Template) -> Self {
        Self {
            template,
            config: Config::default(),
        }
    }

    /// Render with `config` instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// The wrapped template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Content with values substituted. Lists become markdown bullets.
    pub fn body(&self) -> String {
        self.template
            .field(self.template.content())
            .sanitizer(Sanitizer::Passthrough)
            .markdown_lists(true)
            .render()
    }

    /// Escaped subject line.
    pub fn subject(&self) -> Result<String> {
        subject_line(&self.template, Sanitizer::Escape, &self.config)
    }
}

/// The plain text part of an e-mail.
#[derive(Clone, Debug, Default)]
pub struct PlainTextEmail {
    template: Template,
    config: Config,
}

impl PlainTextEmail {
    /// Wrap `template`, which needs a subject.
    pub fn new(template: Template) -> Self {
        Self {
            template,
            config: Config::default(),
        }
    }

    /// Render with `config` instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// The wrapped template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Markdown rendered to plain text, ending in a newline.
    pub fn body(&self) -> Result<String> {
        Field::new(self.template.content())
            .values(self.template.values())
            .require_values()?;
        plain_text_email_body(self.template.content(), self.template.values(), &self.config)
    }

    /// Subject line. Nothing is escaped.
    pub fn subject(&self) -> Result<String> {
        subject_line(&self.template, Sanitizer::Passthrough, &self.config)
    }
}

/// The HTML part of an e-mail.
#[derive(Clone, Debug, Default)]
pub struct HtmlEmail {
    template: Template,
    config: Config,
    branding: Branding,
    preview_mode: bool,
}

impl HtmlEmail {
    /// Wrap `template`, which needs a subject.
    pub fn new(template: Template) -> Self {
        Self {
            template,
            config: Config::default(),
            branding: Branding::default(),
            preview_mode: false,
        }
    }

    /// Render with `config` instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Brand options passed through to the page.
    pub fn branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    /// Highlight placeholders instead of filling them, and leave out the preheader.
    pub fn preview_mode(mut self, preview_mode: bool) -> Self {
        self.preview_mode = preview_mode;
        self
    }

    /// The wrapped template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// HTML body.
    pub fn body(&self) -> Result<String> {
        html_email_body(
            self.template.content(),
            self.template.values(),
            false,
            self.preview_mode,
            &self.config,
        )
    }

    /// Preheader, whether or not the page will show it.
    pub fn preheader(&self) -> Result<String> {
        Field::new(self.template.content())
            .values(self.template.values())
            .require_values()?;
        preheader(self.template.content(), self.template.values(), &self.config)
    }

    /// Escaped subject line.
    pub fn subject(&self) -> Result<String> {
        subject_line(&self.template, Sanitizer::Escape, &self.config)
    }

    /// Everything the outer e-mail layout needs.
    pub fn page(&self) -> Result<Page> {
        let preheader = if self.preview_mode {
            String::new()
        } else {
            self.preheader()?
        };
        Ok(Page::Email(EmailPage {
            body: self.body()?,
            preheader,
            preview_mode: self.preview_mode,
            branding: self.branding.clone(),
        }))
    }

    /// Hand the page to `renderer`.
    pub fn render_page(&self, renderer: &impl PageRenderer) -> Result<String> {
        renderer.render(&self.page()?)
    }
}

/// Sender and recipient details shown around an e-mail preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailPreviewOptions {
    /// Sender display name. Escaped before it reaches the page.
    pub from_name: Option<String>,
    /// Sender address.
    pub from_address: Option<String>,
    /// Reply-to address.
    pub reply_to: Option<String>,
    /// Show the recipient line.
    pub show_recipient: bool,
}

impl Default for EmailPreviewOptions {
    fn default() -> Self {
        Self {
            from_name: None,
            from_address: None,
            reply_to: None,
            show_recipient: true,
        }
    }
}

/// An e-mail as shown to the people writing it.
#[derive(Clone, Debug, Default)]
pub struct EmailPreview {
    template: Template,
    config: Config,
    options: EmailPreviewOptions,
}

impl EmailPreview {
    /// Wrap `template`, which needs a subject.
    pub fn new(template: Template) -> Self {
        Self {
            template,
            config: Config::default(),
            options: EmailPreviewOptions::default(),
        }
    }

    /// Render with `config` instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sender and recipient options.
    pub fn options(mut self, options: EmailPreviewOptions) -> Self {
        self.options = options;
        self
    }

    /// The wrapped template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// HTML body, honouring the template's redaction.
    pub fn body(&self) -> Result<String> {
        html_email_body(
            self.template.content(),
            self.template.values(),
            self.template.redacting(),
            false,
            &self.config,
        )
    }

    /// Escaped subject line.
    pub fn subject(&self) -> Result<String> {
        subject_line(&self.template, Sanitizer::Escape, &self.config)
    }

    /// The `((email address))` value, or an unbracketed marker without one.
    pub fn recipient(&self) -> String {
        Field::new("((email address))")
            .values(self.template.values())
            .with_brackets(false)
            .render()
    }

    /// Everything the preview layout needs.
    pub fn page(&self) -> Result<Page> {
        Ok(Page::EmailPreview(EmailPreviewPage {
            body: self.body()?,
            subject: self.subject()?,
            from_name: self
                .options
                .from_name
                .as_deref()
                .map(|name| sanitize::escape_html(name).into_owned()),
            from_address: self.options.from_address.clone(),
            reply_to: self.options.reply_to.clone(),
            recipient: self.recipient(),
            show_recipient: self.options.show_recipient,
        }))
    }

    /// Hand the page to `renderer`.
    pub fn render_page(&self, renderer: &impl PageRenderer) -> Result<String> {
        renderer.render(&self.page()?)
    }
}
