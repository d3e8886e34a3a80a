//! notify-fmt - render a notification template from the command line

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use notify_fmt::{
    template::{HtmlEmail, LetterPreview, PlainTextEmail, SmsMessage, Template, TemplateRecord},
    Columns, Config,
};

#[derive(Parser)]
#[command(name = "notify-fmt")]
#[command(version, about = "Render a notification template", long_about = None)]
#[command(after_help = "EXAMPLES:
    notify-fmt sms template.json -v values.json     Print the text message
    notify-fmt html email.json --preview            Print the e-mail body with placeholders shown")]
struct Cli {
    /// Output to render
    #[arg(value_enum)]
    channel: Channel,

    /// Template record as JSON, with `content` and optionally `subject`
    #[arg(value_name = "TEMPLATE")]
    template: PathBuf,

    /// Personalisation as a JSON object
    #[arg(short, long, value_name = "VALUES")]
    values: Option<PathBuf>,

    /// Highlight placeholders instead of filling them
    #[arg(short, long)]
    preview: bool,

    /// Hide missing values instead of highlighting them
    #[arg(short, long)]
    redact: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Channel {
    /// GSM text message
    Sms,
    /// Plain text e-mail body
    PlainText,
    /// HTML e-mail body
    Html,
    /// E-mail preview line
    Preheader,
    /// Letter body markup
    Letter,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let input = fs::read_to_string(&cli.template)
        .with_context(|| format!("reading {}", cli.template.display()))?;
    let record = TemplateRecord::from_json_str(&input)
        .with_context(|| format!("parsing {}", cli.template.display()))?;
    let values = match &cli.values {
        Some(path) => {
            let input = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            Columns::from_json_str(&input)
                .with_context(|| format!("parsing {}", path.display()))?
        }
        None => Columns::new(),
    };
    tracing::debug!(values = values.len(), "rendering");

    let template = Template::new(record)
        .with_values(values)
        .redact_missing(cli.redact);
    let output = match cli.channel {
        Channel::Sms => SmsMessage::new(template).config(config).render()?,
        Channel::PlainText => PlainTextEmail::new(template).config(config).body()?,
        Channel::Html => HtmlEmail::new(template)
            .config(config)
            .preview_mode(cli.preview)
            .body()?,
        Channel::Preheader => HtmlEmail::new(template).config(config).preheader()?,
        Channel::Letter => LetterPreview::new(template).config(config).message()?,
    };
    print!("{output}");
    if !output.ends_with('\n') {
        println!();
    }
    Ok(())
}
