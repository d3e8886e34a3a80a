use super::*;

/// A single `((name))` or `((name??conditional text))` token.
///
/// The body is stored without its surrounding parentheses. Equality, ordering and hashing
/// all go through the body, so a set of placeholders collapses repeated tokens.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Placeholder {
    body: String,
}

impl Placeholder {
    /// Build a placeholder from a token body.
    ///
    /// Every leading `(` and trailing `)` is trimmed, not just one pair, so
    /// `"((name))"` and `"name"` produce the same placeholder.
    ///
    /// ```rust
    /// # use notify_fmt::Placeholder;
    /// let placeholder = Placeholder::new("((colour??It is {}))");
    /// assert_eq!(placeholder.name(), "colour");
    /// assert!(placeholder.is_conditional());
    /// ```
    pub fn new(body: impl AsRef<str>) -> Self {
        let body = body
            .as_ref()
            .trim_start_matches('(')
            .trim_end_matches(')')
            .to_owned();
        Self { body }
    }

    pub(crate) fn from_match(captures: &Captures<'_>) -> Self {
        Self::new(&captures[0])
    }

    /// The token interior.
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Text before the first `??`, or the whole body for a plain placeholder.
    pub fn name(&self) -> &str {
        match self.body.split_once("??") {
            Some((name, _)) => name,
            None => &self.body,
        }
    }

    /// Whether the body contains a `??` separator.
    pub fn is_conditional(&self) -> bool {
        self.body.contains("??")
    }

    /// Literal string comparison: only `""` and `"False"` suppress a conditional.
    pub fn should_render_conditional(value: &str) -> bool {
        !matches!(value, "" | "False")
    }

    /// Everything after the first `??`. `((a?? b??c))` yields `" b??c"`.
    pub fn conditional_text(&self) -> Result<&str> {
        match self.body.split_once("??") {
            Some((_, text)) => Ok(text),
            None => Err(Error::NotConditional {
                body: self.body.clone(),
            }),
        }
    }

    /// The conditional text when `value` allows it, otherwise an empty string.
    ///
    /// The `{}` slot is left untouched; substitution belongs to the caller.
    pub fn conditional_body(&self, value: &str) -> Result<&str> {
        let text = self.conditional_text()?;
        Ok(if Self::should_render_conditional(value) {
            text
        } else {
            ""
        })
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Placeholder({})", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_brackets() {
        assert_eq!(Placeholder::new("((name))").body(), "name");
        assert_eq!(Placeholder::new("name").body(), "name");
    }

    #[test]
    fn trims_every_surrounding_paren() {
        // A name that itself ends in a bracket loses it along with the token syntax.
        assert_eq!(Placeholder::new("(((name)))").body(), "name");
        assert_eq!(Placeholder::new("((a??b (c)))").body(), "a??b (c");
    }

    #[test]
    fn name_of_conditional() {
        let placeholder = Placeholder::new("((is_important??This is important))");
        assert_eq!(placeholder.name(), "is_important");
        assert!(placeholder.is_conditional());
        assert!(!Placeholder::new("((name))").is_conditional());
    }

    #[test]
    fn conditional_text_keeps_later_separators() {
        let placeholder = Placeholder::new("((a?? b??c))");
        assert_eq!(placeholder.conditional_text().unwrap(), " b??c");
    }

    #[test]
    fn conditional_accessors_fail_on_plain_placeholder() {
        let placeholder = Placeholder::new("((name))");
        let err = placeholder.conditional_text().unwrap_err();
        assert_eq!(err.to_string(), "Placeholder(name) not conditional");
        assert!(matches!(
            placeholder.conditional_body("True"),
            Err(Error::NotConditional { .. })
        ));
    }

    #[test]
    fn should_render_is_a_string_comparison() {
        assert!(!Placeholder::should_render_conditional(""));
        assert!(!Placeholder::should_render_conditional("False"));
        assert!(Placeholder::should_render_conditional("false"));
        assert!(Placeholder::should_render_conditional("0"));
        assert!(Placeholder::should_render_conditional("True"));
    }

    #[test]
    fn conditional_body_follows_value() {
        let placeholder = Placeholder::new("((warning?? Careful))");
        assert_eq!(placeholder.conditional_body("yes").unwrap(), " Careful");
        assert_eq!(placeholder.conditional_body("False").unwrap(), "");
    }

    #[test]
    fn display() {
        assert_eq!(
            Placeholder::new("((a??b))").to_string(),
            "Placeholder(a??b)"
        );
    }
}
