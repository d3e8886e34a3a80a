use proptest::prelude::*;

use super::*;

fn init_tracing() {
    _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn formatted_marks_placeholders() {
    init_tracing();
    let field = Field::new("Hello ((name)), your code is ((code))");
    assert_eq!(
        field.formatted(),
        "Hello <span class='placeholder'>((name))</span>, \
         your code is <span class='placeholder'>((code))</span>"
    );
}

#[test]
fn formatted_variants() {
    assert_eq!(
        Field::new("((phone number))").with_brackets(false).formatted(),
        "<span class='placeholder-no-brackets'>phone number</span>"
    );
    assert_eq!(
        Field::new("((name))").preview_mode(true).formatted(),
        "<span class='placeholder'><mark>((name))</mark></span>"
    );
    // Preview highlighting wins over dropping the brackets.
    assert_eq!(
        Field::new("((name))")
            .with_brackets(false)
            .preview_mode(true)
            .formatted(),
        "<span class='placeholder'><mark>((name))</mark></span>"
    );
    assert_eq!(
        Field::new("((warn?? Take care))").formatted(),
        "<span class='placeholder-conditional'>((warn??</span> Take care))"
    );
}

#[test]
fn redaction_short_circuits_everything() {
    let field = Field::new("((name)) ((flag??shown))")
        .redact_missing(true)
        .preview_mode(true);
    assert_eq!(
        field.formatted(),
        "<span class='placeholder-redacted'>hidden</span> \
         <span class='placeholder-redacted'>hidden</span>"
    );
}

#[test]
fn formatted_sanitizes_around_markers() {
    let field = Field::new("<em>((name))</em> ((x??<b>y</b>))").sanitizer(Sanitizer::Escape);
    assert_eq!(
        field.formatted(),
        "&lt;em&gt;<span class='placeholder'>((name))</span>&lt;/em&gt; \
         <span class='placeholder-conditional'>((x??</span>&lt;b&gt;y&lt;/b&gt;))"
    );
}

#[test]
fn replaced_substitutes_sanitized_values() {
    let values = Columns::from([("name", "<b>Jo</b>")]);
    let field = Field::new("Hi ((Name))").values(&values);
    assert_eq!(field.replaced(), "Hi Jo");
    let field = field.sanitizer(Sanitizer::Escape);
    assert_eq!(field.replaced(), "Hi &lt;b&gt;Jo&lt;/b&gt;");
}

#[test]
fn replaced_falls_back_to_marker_for_missing_values() {
    let values = Columns::from([("name", "Jo")]);
    let field = Field::new("((name)) ((day))").values(&values);
    assert_eq!(
        field.replaced(),
        "Jo <span class='placeholder'>((day))</span>"
    );
    assert_eq!(field.missing_required(), ["day"]);
}

#[test]
fn preview_mode_highlights_even_with_values() {
    let values = Columns::from([("name", "Jo")]);
    let field = Field::new("((name))").values(&values).preview_mode(true);
    assert_eq!(
        field.render(),
        "<span class='placeholder'><mark>((name))</mark></span>"
    );
    assert!(field.missing_required().is_empty());
}

#[test]
fn conditional_rendering() {
    let content = "Hello((name?? shown)).";
    for (value, expected) in [
        ("True", "Hello shown."),
        ("yes", "Hello shown."),
        ("", "Hello."),
        ("False", "Hello."),
    ] {
        let values = Columns::from([("name", value)]);
        let field = Field::new(content)
            .values(&values)
            .sanitizer(Sanitizer::Passthrough);
        assert_eq!(field.render(), expected, "value {value:?}");
    }
}

#[test]
fn conditional_fills_slot() {
    let values = Columns::from([("colour", "<i>blue</i>")]);
    let field = Field::new("((colour??Your favourite is {}. {}!))")
        .values(&values)
        .sanitizer(Sanitizer::Escape);
    assert_eq!(
        field.render(),
        "Your favourite is &lt;i&gt;blue&lt;/i&gt;. &lt;i&gt;blue&lt;/i&gt;!"
    );
}

#[test]
fn conditionals_are_never_required() {
    let values = Columns::from([("other", "x")]);
    let field = Field::new("((flag??text)) ((b)) ((a)) ((b))").values(&values);
    assert_eq!(field.missing_required(), ["a", "b"]);
    assert!(field.clone().redact_missing(true).missing_required().is_empty());
}

#[test]
fn list_values() {
    let values = Columns::from([("items", Value::list(["one", "", "two", "three"]))]);
    let field = Field::new("You need: ((items))")
        .values(&values)
        .sanitizer(Sanitizer::Passthrough);
    assert_eq!(field.render(), "You need: one, two and three");
    assert_eq!(
        field.markdown_lists(true).render(),
        "You need: \n\n* one\n* two\n* three"
    );
}

#[test]
fn empty_list_is_missing() {
    let values = Columns::from([("items", Value::list(Vec::<String>::new()))]);
    let field = Field::new("((items))").values(&values);
    assert_eq!(field.missing_required(), ["items"]);
    assert_eq!(
        field.render(),
        "<span class='placeholder'>((items))</span>"
    );
}

#[test]
fn placeholders_collapse_duplicates() {
    let field = Field::new("((a)) ((A)) ((a)) ((b??x)) ((b??y)) ((no way)) (( bad! ))");
    let bodies = field
        .placeholders()
        .into_iter()
        .map(|placeholder| placeholder.body().to_owned())
        .collect::<Vec<_>>();
    assert_eq!(bodies, ["A", "a", "b??x", "b??y", "no way"]);
    assert_eq!(
        field.placeholder_names(),
        BTreeSet::from(["A".to_owned(), "a".to_owned(), "b".to_owned(), "no way".to_owned()])
    );
}

#[test]
fn nested_conditional_is_a_single_token() {
    let field = Field::new("((a??((b)) text))");
    let placeholders = field.placeholders();
    assert_eq!(placeholders.len(), 1);
    assert_eq!(placeholders.first().map(Placeholder::name), Some("a"));
}

#[test]
fn masking_keeps_placeholders_in_urls_raw() {
    init_tracing();
    let field = Field::new("[((name))](https://example.com/?q=((name))&x=1)")
        .sanitizer(Sanitizer::Escape)
        .preview_mode(true);
    let mut context = MaskContext::new();
    let masked = field.masked(&mut context);
    assert!(!masked.contains("(("));
    assert_eq!(context.placeholder_count(), 2);
    assert_eq!(context.url_count(), 1);

    let html = format!(
        "<a href=\"{}\">{}</a>",
        &masked[masked.find("](").unwrap() + 2..masked.len() - 1],
        &masked[1..masked.find("](").unwrap()],
    );
    assert_eq!(
        context.restore(&html, RestoreMode::Markup),
        "<a href=\"https://example.com/?q=((name))&amp;x=1\">\
         <span class='placeholder'><mark>((name))</mark></span></a>"
    );
}

#[test]
fn restored_urls_are_attribute_safe() {
    let mut context = MaskContext::new();
    let masked = context.mask("[a](https://x.com/a b\"c)");
    let url_token = &masked["[a](".len()..masked.len() - 1];
    assert_eq!(
        context.restore(url_token, RestoreMode::Markup),
        "https://x.com/a%20b&quot;c"
    );
    assert_eq!(
        context.restore(url_token, RestoreMode::Raw),
        "https://x.com/a b\"c"
    );
}

#[test]
fn link_titles_stay_visible() {
    let mut context = MaskContext::new();
    let masked = context.mask(r#"[a](https://x.com "Title")"#);
    assert!(masked.ends_with(r#" "Title")"#));
    assert_eq!(context.url_count(), 1);
}

#[test]
fn unknown_tokens_fail_closed() {
    let context = MaskContext::new();
    assert_eq!(
        context.restore("a \u{E000}PLACEHOLDER::3\u{E001} b \u{E000}URL::1\u{E001}", RestoreMode::Raw),
        "a ((PLACEHOLDER::3)) b ((URL::1))"
    );
}

#[test]
fn digits_after_a_token_are_not_an_index() {
    let mut context = MaskContext::new();
    let masked = context.mask("((a))5 and ((b))");
    assert_eq!(context.restore(&masked, RestoreMode::Raw), "((a))5 and ((b))");
}

fn content_strategy() -> impl Strategy<Value = String> {
    let piece = prop_oneof![
        "[a-zA-Z .,!?-]{0,12}",
        "[a-z ]{1,8}".prop_map(|name| format!("(({name}))")),
        ("[a-z]{1,6}", "[a-z ]{0,8}").prop_map(|(name, text)| format!("(({name}??{text}))")),
        ("[a-z ]{1,8}", "[a-z/.]{1,10}")
            .prop_map(|(text, path)| format!("[{text}](https://example.com/{path})")),
        ("[a-z]{1,6}", "[a-z]{1,6}")
            .prop_map(|(text, name)| format!("[{text}](https://example.com/(({name})))")),
    ];
    proptest::collection::vec(piece, 0..8).prop_map(|pieces| pieces.concat())
}

proptest! {
    #[test]
    fn mask_then_restore_is_identity(content in content_strategy()) {
        let mut context = MaskContext::new();
        let masked = context.mask(&content);
        prop_assert_eq!(context.restore(&masked, RestoreMode::Raw), content);
    }

    #[test]
    fn no_placeholders_means_no_change(content in "[a-zA-Z0-9 .,:;!?'\"\\-\n]{0,64}") {
        let values = Columns::from([("name", "value")]);
        let field = Field::new(&content).sanitizer(Sanitizer::Passthrough);
        prop_assert_eq!(field.formatted(), content.clone());
        prop_assert_eq!(field.values(&values).replaced(), content);
    }

    #[test]
    fn present_values_replace_tokens(name in "[a-z]{1,10}", value in "[a-zA-Z0-9 ]{1,20}") {
        let content = format!("Dear (({name})), thanks");
        let values = Columns::from([(name.as_str(), value.as_str())]);
        let replaced = Field::new(&content).values(&values).sanitizer(Sanitizer::Escape).replaced();
        prop_assert!(replaced.contains(&value));
        let token = format!("(({name}))");
        prop_assert!(!replaced.contains(&token));
    }
}
