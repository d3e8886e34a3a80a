use super::*;

/// Deployment environment, used to pick asset hosts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Environment {
    /// Live service.
    Production,
    /// Pre-production.
    Staging,
    /// Load testing; shares staging assets.
    Performance,
    /// Local and development deployments.
    #[default]
    Development,
}

impl Environment {
    fn asset_prefix(self) -> &'static str {
        match self {
            Environment::Production => "prod",
            Environment::Staging | Environment::Performance => "staging",
            Environment::Development => "dev",
        }
    }
}

impl FromStr for Environment {
    type Err = std::convert::Infallible;

    /// Unknown names fall back to [`Environment::Development`].
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(match s {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            "performance" => Environment::Performance,
            _ => Environment::Development,
        })
    }
}

/// Options for the typography pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypographyConfig {
    /// Tags whose content smart quotes must not touch.
    pub skip_tags: Vec<Cow<'static, str>>,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            skip_tags: ["pre", "code", "kbd", "script", "style", "math", "a"]
                .into_iter()
                .map(Cow::Borrowed)
                .collect(),
        }
    }
}

/// Everything a render call needs beyond its content and values.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Picks the action link image host.
    pub environment: Environment,
    /// Overrides the action link image derived from `environment`.
    pub action_link_image_url: Option<String>,
    /// Smart quote settings.
    pub typography: TypographyConfig,
    /// Containers nested deeper than this are flattened into their parent.
    pub max_nested_level: usize,
    /// Width of plain text heading underlines and rules.
    pub column_width: usize,
    /// Maximum characters of an e-mail preheader.
    pub preheader_length: usize,
    /// Longest SMS, in bytes, before it is rejected as too long.
    pub sms_char_count_limit: usize,
    /// Pages shown for a letter before it counts as too long.
    pub letter_max_page_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            action_link_image_url: None,
            typography: TypographyConfig::default(),
            max_nested_level: 6,
            column_width: 65,
            preheader_length: 256,
            sms_char_count_limit: 612,
            letter_max_page_count: 10,
        }
    }
}

impl Config {
    /// Defaults, with the environment read from `NOTIFY_ENVIRONMENT`.
    pub fn from_env() -> Self {
        let environment = std::env::var("NOTIFY_ENVIRONMENT")
            .ok()
            .and_then(|name| name.parse().ok())
            .unwrap_or_default();
        tracing::debug!(?environment, "configuration from environment");
        Self {
            environment,
            ..Self::default()
        }
    }

    /// Image shown inside action links.
    ///
    /// ```rust
    /// # use notify_fmt::{Config, Environment};
    /// let config = Config { environment: Environment::Staging, ..Config::default() };
    /// assert_eq!(
    ///     config.action_link_image_url(),
    ///     "https://staging-va-gov-assets.s3-us-gov-west-1.amazonaws.com/img/vanotify-action-link.png"
    /// );
    /// ```
    pub fn action_link_image_url(&self) -> Cow<'_, str> {
        match &self.action_link_image_url {
            Some(url) => Cow::Borrowed(url),
            None => Cow::Owned(format!(
                "https://{}-va-gov-assets.s3-us-gov-west-1.amazonaws.com/img/vanotify-action-link.png",
                self.environment.asset_prefix()
            )),
        }
    }

    /// Internal setter for config options. Used for testing
    #[cfg(test)]
    pub(crate) fn set(&mut self, field: &str, value: &str) {
        match field {
            "environment" => self.environment = value.parse().unwrap(),
            "max_nested_level" => self.max_nested_level = value.parse().unwrap(),
            "column_width" => self.column_width = value.parse().unwrap(),
            _ => panic!("unknown configuration {field}"),
        }
    }
}
