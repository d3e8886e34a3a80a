use super::*;

use chrono::{NaiveDate, Utc};
use page::{LetterImagePage, LetterKind, LetterPage, Page, PageRenderer, Postage};
use typography::Pipeline;

const ADDRESS_BLOCK: &str = "((address line 1))\n\
                             ((address line 2))\n\
                             ((address line 3))\n\
                             ((address line 4))\n\
                             ((address line 5))\n\
                             ((address line 6))\n\
                             ((postcode))";

const REQUIRED_ADDRESS_LINES: [&str; 3] = ["address line 1", "address line 2", "postcode"];

const OPTIONAL_ADDRESS_LINES: [&str; 4] = [
    "address line 3",
    "address line 4",
    "address line 5",
    "address line 6",
];

/// The body of a letter as print markup.
///
/// Letter-printing control tags are removed from the content before anything else happens.
pub(crate) fn letter_message(
    content: &str,
    values: &Columns,
    redact_missing: bool,
    config: &Config,
) -> Result<String> {
    let content = Sanitizer::StripDvlaMarkup.apply(content);
    let rendered = Field::new(&content)
        .values(values)
        .sanitizer(Sanitizer::Escape)
        .markdown_lists(true)
        .redact_missing(redact_missing)
        .render();

    Pipeline::new()
        .then("strip_pipes", |text| typography::strip_pipes(&text))
        .then("add_trailing_newline", |text| {
            typography::add_trailing_newline(&text)
        })
        .try_then("markdown", |text| {
            Ok(markdown::render(&text, Flavour::Letter, config)?)
        })
        .then("nice_typography", |text| {
            typography::do_nice_typography(&text, &config.typography)
        })
        .then("non_breaking_hyphens", |text| {
            typography::replace_hyphens_with_non_breaking_hyphens(&text)
        })
        .then("tweak_dvla_list_markup", |text| {
            typography::tweak_dvla_list_markup(&text)
        })
        .run(rendered)
}

/// Layout options for a letter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterOptions {
    /// Sender contact details, one per line. May hold placeholders.
    pub contact_block: Option<String>,
    /// Base URL for static assets.
    pub admin_base_url: String,
    /// Logo file under the asset path.
    pub logo_file_name: Option<String>,
    /// Date printed on the letter. Today, when not set.
    pub date: Option<NaiveDate>,
    /// Preview or print layout.
    pub kind: LetterKind,
}

impl Default for LetterOptions {
    fn default() -> Self {
        Self {
            contact_block: None,
            admin_base_url: "http://localhost:6012".to_owned(),
            logo_file_name: None,
            date: None,
            kind: LetterKind::default(),
        }
    }
}

/// A letter laid out for preview or print.
///
/// ```rust
/// # use notify_fmt::{template::{LetterOptions, LetterPreview, Template, TemplateRecord}, Columns};
/// let template = Template::new(TemplateRecord::new("Pay by 1-2 May").with_subject("Your bill"))
///     .with_values(Columns::from([
///         ("address line 1", "A Person"),
///         ("address line 2", "1 Street"),
///         ("postcode", "SW1 1AA"),
///     ]));
/// let letter = LetterPreview::new(template);
/// assert_eq!(
///     letter.address_block()?,
///     "<ul><li>A Person</li><li>1 Street</li><li>SW1 1AA</li></ul>"
/// );
/// assert_eq!(letter.message()?, "<p>Pay by 1\u{2011}2 May</p>\n");
/// # Ok::<(), notify_fmt::Error>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct LetterPreview {
    template: Template,
    config: Config,
    options: LetterOptions,
}

impl LetterPreview {
    /// Wrap `template`, which needs a subject.
    pub fn new(template: Template) -> Self {
        Self {
            template,
            config: Config::default(),
            options: LetterOptions::default(),
        }
    }

    /// Render with `config` instead of the defaults.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Layout options.
    pub fn options(mut self, options: LetterOptions) -> Self {
        self.options = options;
        self
    }

    /// The wrapped template.
    pub fn template(&self) -> &Template {
        &self.template
    }

    /// The contact block with surrounding whitespace removed.
    pub fn contact_block(&self) -> &str {
        self.options.contact_block.as_deref().unwrap_or_default().trim()
    }

    /// Placeholder names in the content, subject and contact block.
    pub fn placeholders(&self) -> BTreeSet<String> {
        let mut names = self.template.placeholders();
        names.extend(Field::new(self.contact_block()).placeholder_names());
        names
    }

    /// Subject line without pipes or print control tags.
    pub fn subject(&self) -> Result<String> {
        let rendered = self
            .template
            .field(self.template.subject_source()?)
            .sanitizer(Sanitizer::Escape)
            .render();
        Pipeline::new()
            .then("nice_typography", |text| {
                typography::do_nice_typography(&text, &self.config.typography)
            })
            .then("strip_pipes", |text| typography::strip_pipes(&text))
            .then("strip_dvla_markup", |text| {
                Sanitizer::StripDvlaMarkup.apply(&text).into_owned()
            })
            .then("normalise_whitespace", |text| {
                typography::normalise_whitespace(&text)
            })
            .run(rendered)
    }

    /// Values for the address block.
    ///
    /// Once the first two lines and the postcode are known, the optional lines are filled
    /// with nothing so they disappear rather than showing as placeholders.
    fn address_values(&self) -> Cow<'_, Columns> {
        let values = self.template.values();
        let filled = |key: &str| values.get(key).is_some_and(|value| !value.to_text().is_empty());
        if !REQUIRED_ADDRESS_LINES.into_iter().all(filled) {
            return Cow::Borrowed(values);
        }
        let mut values = values.clone();
        for line in OPTIONAL_ADDRESS_LINES {
            if !filled(line) {
                values.insert(line, "");
            }
        }
        Cow::Owned(values)
    }

    /// Address lines as a list, with empty lines dropped.
    pub fn address_block(&self) -> Result<String> {
        let values = self.address_values();
        let rendered = Field::new(ADDRESS_BLOCK)
            .values(&values)
            .sanitizer(Sanitizer::Escape)
            .with_brackets(false)
            .render();
        Pipeline::new()
            .then("strip_pipes", |text| typography::strip_pipes(&text))
            .then("remove_empty_lines", |text| {
                typography::remove_empty_lines(&text)
            })
            .then("remove_whitespace_before_punctuation", |text| {
                typography::remove_whitespace_before_punctuation(&text)
            })
            .then("nl2li", |text| typography::nl2li(&text))
            .run(rendered)
    }

    /// Contact details with each line trimmed and line breaks as `<br>`.
    pub fn contact_block_html(&self) -> Result<String> {
        let lines = self.contact_block().lines().map(str::trim).join("\n");
        let rendered = self
            .template
            .field(&lines)
            .sanitizer(Sanitizer::Escape)
            .render();
        Pipeline::new()
            .then("remove_whitespace_before_punctuation", |text| {
                typography::remove_whitespace_before_punctuation(&text)
            })
            .then("nl2br", |text| typography::nl2br(&text))
            .then("strip_pipes", |text| typography::strip_pipes(&text))
            .run(rendered)
    }

    /// The letter body.
    pub fn message(&self) -> Result<String> {
        self.template
            .field(self.template.content())
            .require_values()?;
        letter_message(
            self.template.content(),
            self.template.values(),
            self.template.redacting(),
            &self.config,
        )
    }

    /// The date, as `1 January 2024`.
    pub fn date(&self) -> String {
        self.options
            .date
            .unwrap_or_else(|| Utc::now().date_naive())
            .format("%-d %B %Y")
            .to_string()
    }

    /// Last three letters of the logo file name, which pick its layout.
    fn logo_class(&self) -> Option<String> {
        self.options.logo_file_name.as_deref().map(|name| {
            let name = name.to_lowercase();
            let skip = name.chars().count().saturating_sub(3);
            name.chars().skip(skip).collect()
        })
    }

    /// Everything the letter layout needs.
    pub fn page(&self) -> Result<Page> {
        Ok(Page::Letter(LetterPage {
            kind: self.options.kind,
            admin_base_url: self.options.admin_base_url.clone(),
            logo_file_name: self.options.logo_file_name.clone(),
            logo_class: self.logo_class(),
            subject: self.subject()?,
            message: self.message()?,
            address: self.address_block()?,
            contact_block: self.contact_block_html()?,
            date: self.date(),
        }))
    }

    /// Hand the page to `renderer`.
    pub fn render_page(&self, renderer: &impl PageRenderer) -> Result<String> {
        renderer.render(&self.page()?)
    }
}

/// Where the page images of a letter come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LetterImageOptions {
    /// Base URL of the page images. Required.
    pub image_url: String,
    /// Pages in the letter. Must be at least one.
    pub page_count: usize,
    /// `first` or `second`.
    pub postage: String,
}

impl Default for LetterImageOptions {
    fn default() -> Self {
        Self {
            image_url: String::new(),
            page_count: 0,
            postage: "second".to_owned(),
        }
    }
}

/// A letter shown as images of its printed pages.
///
/// ```rust
/// # use notify_fmt::template::{LetterImage, LetterImageOptions, LetterPreview, Template, TemplateRecord};
/// let letter = LetterPreview::new(Template::new(TemplateRecord::new("Hi").with_subject("Hi")));
/// let image = LetterImage::new(letter.clone(), LetterImageOptions {
///     image_url: "https://img.example/letter".to_owned(),
///     page_count: 12,
///     ..LetterImageOptions::default()
/// })?;
/// assert_eq!(image.page_numbers(), (1..=10).collect::<Vec<_>>());
/// assert!(image.too_many_pages());
///
/// let bad_postage = LetterImageOptions {
///     image_url: "https://img.example/letter".to_owned(),
///     page_count: 1,
///     postage: "third".to_owned(),
/// };
/// assert!(LetterImage::new(letter, bad_postage).is_err());
/// # Ok::<(), notify_fmt::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct LetterImage {
    letter: LetterPreview,
    image_url: String,
    page_count: usize,
    postage: Postage,
}

impl LetterImage {
    /// Check the options and wrap `letter`.
    pub fn new(letter: LetterPreview, options: LetterImageOptions) -> Result<Self> {
        if options.image_url.is_empty() {
            return Err(Error::InvalidLetterImage("image_url is required".to_owned()));
        }
        if options.page_count == 0 {
            return Err(Error::InvalidLetterImage("page_count is required".to_owned()));
        }
        let postage = options.postage.parse()?;
        Ok(Self {
            letter,
            image_url: options.image_url,
            page_count: options.page_count,
            postage,
        })
    }

    /// The letter behind the images.
    pub fn letter(&self) -> &LetterPreview {
        &self.letter
    }

    /// The pages shown, starting at one and capped at the page limit.
    pub fn page_numbers(&self) -> Vec<usize> {
        let last = self
            .page_count
            .min(self.letter.config.letter_max_page_count);
        (1..=last).collect()
    }

    /// Whether the letter is longer than can be shown.
    pub fn too_many_pages(&self) -> bool {
        self.page_count > self.letter.config.letter_max_page_count
    }

    /// Postage class.
    pub fn postage(&self) -> Postage {
        self.postage
    }

    /// Everything the image layout needs.
    pub fn page(&self) -> Result<Page> {
        Ok(Page::LetterImage(LetterImagePage {
            image_url: self.image_url.clone(),
            page_numbers: self.page_numbers(),
            too_many_pages: self.too_many_pages(),
            postage: self.postage,
            subject: self.letter.subject()?,
            message: self.letter.message()?,
            address: self.letter.address_block()?,
            contact_block: self.letter.contact_block_html()?,
            date: self.letter.date(),
        }))
    }

    /// Hand the page to `renderer`.
    pub fn render_page(&self, renderer: &impl PageRenderer) -> Result<String> {
        renderer.render(&self.page()?)
    }
}
