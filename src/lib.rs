//! Render personalised notification templates. [notify_fmt] fills `((placeholders))` in a
//! template and turns [Notify markdown](markdown) into text messages, e-mail HTML, plain text
//! and letter markup.
//!
//! [notify_fmt]: index.html
//!
//! # Getting Started
//!
//! ```rust
//! use notify_fmt::{render_notify_markdown, Columns, Config, Flavour};
//!
//! let values = Columns::from([("name", "World")]);
//! let output = render_notify_markdown(
//!     "Hello ((name))",
//!     &values,
//!     Flavour::PlainText,
//!     false,
//!     &Config::default(),
//! )?;
//! # assert_eq!(output, "Hello World\n");
//! # Ok::<(), notify_fmt::Error>(())
//! ```
//!
//! # Using the [templates](template)
//!
//! Each channel wraps a [`Template`](template::Template) and knows which steps its output
//! goes through.
//!
//! ```rust
//! use notify_fmt::template::{SmsMessage, Template, TemplateRecord};
//! use notify_fmt::Columns;
//!
//! let template = Template::new(TemplateRecord::new("Your ((thing)) is ready"))
//!     .with_values(Columns::from([("thing", "passport")]));
//! let sms = SmsMessage::new(template);
//! # assert_eq!(sms.render()?, "Your passport is ready");
//! # assert_eq!(sms.fragment_count()?, 1);
//! # Ok::<(), notify_fmt::Error>(())
//! ```

pub mod action_link;
mod adapters;
mod columns;
mod config;
mod error;
mod field;
mod list;
pub mod markdown;
pub mod page;
mod placeholder;
pub mod render;
mod sanitize;
pub mod sms;
pub mod template;
pub mod typography;

pub use columns::{Columns, Value};
pub use config::{Config, Environment, TypographyConfig};
pub use error::{Error, Result};
pub use field::{Field, FieldOptions};
pub use markdown::Flavour;
pub use placeholder::Placeholder;
pub use sanitize::{Sanitizer, UnknownSanitizer};
pub use template::{make_substitutions_in_subject, render_notify_markdown};

use std::{
    borrow::Cow,
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Write},
    iter::Peekable,
    str::FromStr,
};

use adapters::MergedTextExt;
use columns::formatted_list;
use field::{MaskContext, RestoreMode};
use itertools::Itertools;
use markdown::{Block, Inline, List};
use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use regex::{Captures, Regex};
use render::{
    HtmlRenderer, LetterRenderer, PlainTextRenderer, Renderer, LINK_STYLE, PARAGRAPH_STYLE,
};
use serde::Deserialize;
