//! The seam to whatever wraps a rendered body in a complete document.
//!
//! Templates never build page chrome themselves. They fill one of the page structs below
//! and hand it to a [`PageRenderer`].

use super::*;

/// A finished notification ready for an outer template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Page {
    /// An HTML e-mail as sent.
    Email(EmailPage),
    /// An HTML e-mail shown inside an admin preview.
    EmailPreview(EmailPreviewPage),
    /// An SMS shown as a phone screen.
    SmsPreview(SmsPreviewPage),
    /// A letter laid out for preview or print.
    Letter(LetterPage),
    /// A letter shown as pre-rendered page images.
    LetterImage(LetterImagePage),
}

impl Page {
    /// The rendered notification body.
    pub fn body(&self) -> &str {
        match self {
            Page::Email(page) => &page.body,
            Page::EmailPreview(page) => &page.body,
            Page::SmsPreview(page) => &page.body,
            Page::Letter(page) => &page.message,
            Page::LetterImage(page) => &page.message,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Page::Email(_) => "email",
            Page::EmailPreview(_) => "email preview",
            Page::SmsPreview(_) => "sms preview",
            Page::Letter(_) => "letter",
            Page::LetterImage(_) => "letter image",
        }
    }
}

/// Brand options for the HTML e-mail layout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Branding {
    /// Show the service banner when no brand banner is set.
    pub default_banner: bool,
    /// Emit a full document rather than a fragment.
    pub complete_html: bool,
    /// Logo image URL.
    pub brand_logo: Option<String>,
    /// Text beside the logo.
    pub brand_text: Option<String>,
    /// Banner colour.
    pub brand_colour: Option<String>,
    /// Show the brand as a full-width banner.
    pub brand_banner: bool,
    /// Organisation name for the alt text.
    pub brand_name: Option<String>,
    /// Tracking pixel.
    pub ga_pixel_url: Option<String>,
    /// Open event beacon.
    pub ga4_open_email_event_url: Option<String>,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            default_banner: true,
            complete_html: true,
            brand_logo: None,
            brand_text: None,
            brand_colour: None,
            brand_banner: false,
            brand_name: None,
            ga_pixel_url: None,
            ga4_open_email_event_url: None,
        }
    }
}

/// Content of an HTML e-mail.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailPage {
    /// Rendered HTML body.
    pub body: String,
    /// Preview line shown by mail clients. Empty in preview mode.
    pub preheader: String,
    /// The body was rendered with highlighted placeholders.
    pub preview_mode: bool,
    /// Brand options.
    pub branding: Branding,
}

/// Content of an e-mail preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmailPreviewPage {
    /// Rendered HTML body.
    pub body: String,
    /// Rendered subject line.
    pub subject: String,
    /// Sender display name, HTML-escaped.
    pub from_name: Option<String>,
    /// Sender address.
    pub from_address: Option<String>,
    /// Reply-to address.
    pub reply_to: Option<String>,
    /// The `((email address))` value or its marker.
    pub recipient: String,
    /// Show the recipient line.
    pub show_recipient: bool,
}

/// Content of an SMS preview.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SmsPreviewPage {
    /// Message body with line breaks and links as HTML.
    pub body: String,
    /// Sender name or number.
    pub sender: Option<String>,
    /// Show the sender line.
    pub show_sender: bool,
    /// The `((phone number))` value or its marker.
    pub recipient: String,
    /// Show the recipient line.
    pub show_recipient: bool,
}

/// Whether a letter is laid out for the screen or for the printer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LetterKind {
    /// On-screen preview.
    #[default]
    Preview,
    /// Print-ready output.
    Print,
}

/// Content of a letter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterPage {
    /// Preview or print layout.
    pub kind: LetterKind,
    /// Base URL for static assets.
    pub admin_base_url: String,
    /// Logo file under the asset path.
    pub logo_file_name: Option<String>,
    /// Extension of the logo file, used to pick its layout.
    pub logo_class: Option<String>,
    /// Rendered subject line.
    pub subject: String,
    /// Rendered letter body.
    pub message: String,
    /// Address lines as a list.
    pub address: String,
    /// Sender contact details.
    pub contact_block: String,
    /// Formatted letter date.
    pub date: String,
}

/// Postage class of a printed letter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Postage {
    /// First class.
    First,
    /// Second class.
    #[default]
    Second,
}

impl FromStr for Postage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "first" => Ok(Postage::First),
            "second" => Ok(Postage::Second),
            _ => Err(Error::InvalidLetterImage(
                "postage must be first or second".to_owned(),
            )),
        }
    }
}

/// Content of a letter shown as page images.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterImagePage {
    /// Base URL of the page images.
    pub image_url: String,
    /// The pages to show, starting at one.
    pub page_numbers: Vec<usize>,
    /// The letter has more pages than can be shown.
    pub too_many_pages: bool,
    /// Postage class.
    pub postage: Postage,
    /// Rendered subject line.
    pub subject: String,
    /// Rendered letter body.
    pub message: String,
    /// Address lines as a list.
    pub address: String,
    /// Sender contact details.
    pub contact_block: String,
    /// Formatted letter date.
    pub date: String,
}

/// Turns a [`Page`] into a complete document.
pub trait PageRenderer {
    /// Render the page.
    fn render(&self, page: &Page) -> Result<String>;
}

/// A [`PageRenderer`] that returns the body and ignores everything else.
#[derive(Clone, Copy, Debug, Default)]
pub struct BodyOnly;

impl PageRenderer for BodyOnly {
    fn render(&self, page: &Page) -> Result<String> {
        tracing::trace!(kind = page.kind(), "body only page");
        Ok(page.body().to_owned())
    }
}

/// Any function from a page to a document is a renderer.
///
/// ```rust
/// # use notify_fmt::{page::{Page, PageRenderer}, Result};
/// let wrap = |page: &Page| -> Result<String> { Ok(format!("<main>{}</main>", page.body())) };
/// # let _: &dyn PageRenderer = &wrap;
/// ```
impl<F> PageRenderer for F
where
    F: Fn(&Page) -> Result<String>,
{
    fn render(&self, page: &Page) -> Result<String> {
        tracing::trace!(kind = page.kind(), "function page renderer");
        self(page)
    }
}
