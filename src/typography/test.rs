use proptest::prelude::*;

use super::*;

fn init_tracing() {
    _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn smart(text: &str) -> String {
    make_quotes_smart(text, &TypographyConfig::default())
}

#[test]
fn govuk_is_unlinked_unless_part_of_an_address() {
    for (text, expected) in [
        ("gov.uk", "gov.\u{200B}uk"),
        ("GOV.UK", "GOV.\u{200B}UK"),
        ("Gov.uk", "Gov.\u{200B}uk"),
        ("https://gov.uk", "https://gov.uk"),
        ("https://www.gov.uk", "https://www.gov.uk"),
        ("www.gov.uk", "www.gov.uk"),
        ("gov.uk/register-to-vote", "gov.uk/register-to-vote"),
        ("gov.uk?q=", "gov.uk?q="),
        ("see GOV.UK and gov.uk/x", "see GOV.\u{200B}UK and gov.uk/x"),
    ] {
        assert_eq!(unlink_govuk(text), expected, "{text}");
    }
}

#[test]
fn whitespace_before_full_stops_and_commas() {
    for (dirty, clean) in [
        (
            "Hello ((name)) .\n\nThis is a message",
            "Hello ((name)).\n\nThis is a message",
        ),
        ("Hello Jo .\n\nThis is a message", "Hello Jo.\n\nThis is a message"),
        ("\n   \t    . word", "\n. word"),
        ("one , two", "one, two"),
    ] {
        assert_eq!(remove_whitespace_before_punctuation(dirty), clean);
    }
}

#[test]
fn quotes_become_curly() {
    init_tracing();
    assert_eq!(
        smart(r#"And I said, "what about breakfast at Tiffany's"?"#),
        "And I said, \u{201C}what about breakfast at Tiffany\u{2019}s\u{201D}?"
    );
    assert_eq!(smart("'quoted'"), "\u{2018}quoted\u{2019}");
    assert_eq!(smart("back in the '90s"), "back in the \u{2019}90s");
}

#[test]
fn quotes_in_skipped_tags_and_attributes_are_left() {
    let link = r#"<a href="http://example.com?q='foo'">http://example.com?q='foo'</a>"#;
    assert_eq!(smart(link), link);
    assert_eq!(
        smart(r#"<p class="x">it's <code>"raw"</code> "cooked"</p>"#),
        "<p class=\"x\">it\u{2019}s <code>\"raw\"</code> \u{201C}cooked\u{201D}</p>"
    );

    let config = TypographyConfig {
        skip_tags: vec![Cow::Borrowed("p")],
    };
    assert_eq!(make_quotes_smart("<p>\"a\"</p>", &config), "<p>\"a\"</p>");
}

#[test]
fn e_mail_addresses_keep_straight_apostrophes() {
    assert_eq!(
        remove_smart_quotes_from_email_addresses(
            "line one\u{2019}s quote\n\
             first.o\u{2019}last@example.com is someone\u{2019}s email address\n\
             line \u{2018}three\u{2019}"
        ),
        "line one\u{2019}s quote\n\
         first.o'last@example.com is someone\u{2019}s email address\n\
         line \u{2018}three\u{2019}"
    );
}

#[test]
fn en_dashes() {
    for (nasty, nice) in [
        (
            "The en dash - always with spaces in running text when, as discussed, \
             indicating a pause - and the spaced em dash.",
            "The en dash \u{2013} always with spaces in running text when, as discussed, \
             indicating a pause \u{2013} and the spaced em dash.",
        ),
        ("double -- dash", "double \u{2013} dash"),
        ("triple --- dash", "triple \u{2013} dash"),
        ("quadruple ---- dash", "quadruple ---- dash"),
        ("em \u{2014} dash", "em \u{2013} dash"),
        ("already \u{2013} correct", "already \u{2013} correct"),
        ("2004-2008", "2004-2008"),
    ] {
        assert_eq!(replace_hyphens_with_en_dashes(nasty), nice);
    }
}

#[test]
fn en_dash_output_is_not_a_trigger() {
    let once = replace_hyphens_with_en_dashes("a - b");
    assert!(!once.contains('-'));
    assert!(!once.contains('\u{00A0}'));
    assert_eq!(replace_hyphens_with_en_dashes(&once), once);
}

#[test]
fn nice_typography_runs_every_step() {
    assert_eq!(
        do_nice_typography(
            r#"Don't "panic" - write to o'brien@example.com ."#,
            &TypographyConfig::default()
        ),
        "Don\u{2019}t \u{201C}panic\u{201D} \u{2013} write to o'brien@example.com."
    );
}

#[test]
fn non_breaking_hyphens_skip_markup() {
    assert_eq!(
        replace_hyphens_with_non_breaking_hyphens("<div class=\"page-break\">SW1A-1AA</div>"),
        "<div class=\"page-break\">SW1A\u{2011}1AA</div>"
    );
}

#[test]
fn dvla_list_markup() {
    for (markup, fixed) in [
        ("a", "a".to_owned()),
        ("before<p><cr><p><cr>after", "before<p><cr>after".to_owned()),
        ("before<cr><cr><np>after", "before<cr><np>after".to_owned()),
        (
            "before<cr><cr><cr><cr><np>after",
            format!("before{}<np>after", "<cr>".repeat(3)),
        ),
    ] {
        assert_eq!(tweak_dvla_list_markup(markup), fixed);
    }
}

#[test]
fn line_helpers() {
    assert_eq!(nl2li("a\nb\nc\n"), "<ul><li>a</li><li>b</li><li>c</li></ul>");
    assert_eq!(nl2br("  a\nb\r\n"), "a<br>b");
    assert_eq!(remove_empty_lines("a\n\n\nb\n"), "a\nb");
    assert_eq!(normalise_newlines("a\r\nb\rc\u{2028}d\n"), "a\nb\nc\nd");
    assert_eq!(normalise_newlines("a\n\nb"), "a\n\nb");
    assert_eq!(add_prefix("b", Some("a ")), "a: b");
    assert_eq!(add_prefix("b", None), "b");
    assert_eq!(add_prefix("b", Some("")), "b");
    assert_eq!(strip_pipes("a|b"), "ab");
    assert_eq!(strip_unsupported_characters("line one\u{2028}line two"), "line oneline two");
    assert_eq!(prepend_subject("body", "Hi"), "# Hi\n\nbody");
}

#[test]
fn whitespace_helpers() {
    for value in [
        "bar",
        " bar ",
        "\n        \t    bar\n    ",
        " \u{180E}\u{200B} \u{200C} bar \u{200D} \u{2060}\u{FEFF} ",
    ] {
        assert_eq!(strip_whitespace(value, &[]), "bar");
    }
    for value in [
        "notifications-email",
        "  \tnotifications-email \x0c ",
        "\rn\u{200C}oti\u{200D}fi\u{200B}cati\u{2060}ons-\u{180E}emai\u{FEFF}l\u{FEFF}",
    ] {
        assert_eq!(strip_and_remove_obscure_whitespace(value), "notifications-email");
    }
    assert_eq!(
        strip_and_remove_obscure_whitespace("   words \n over multiple lines with \ttabs\t   "),
        "words \n over multiple lines with \ttabs"
    );
    assert_eq!(normalise_whitespace("\u{200C} Your tax   is\ndue\n\n"), "Your tax is due");
    assert_eq!(strip_whitespace("(a)", &['(', ')']), "a");
}

#[test]
fn sms_urls_are_linked() {
    assert_eq!(
        autolink_sms("visit https://example.com/a."),
        format!(
            "visit <a style=\"{LINK_STYLE}\" target=\"_blank\" \
             href=\"https://example.com/a\">https://example.com/a</a>."
        )
    );
}

#[test]
fn unescape_decodes_entities() {
    assert_eq!(unescape("Tom &amp; Jerry &lt;3 &#8217;"), "Tom & Jerry <3 \u{2019}");
}

#[test]
fn pipeline_runs_in_order_and_stops_on_error() {
    let pipeline = Pipeline::new()
        .then("upper", |text| text.to_uppercase())
        .then_if(false, "skipped", |_| unreachable!())
        .then("suffix", |text| text + "!");
    assert_eq!(format!("{pipeline:?}"), r#"["upper", "suffix"]"#);
    assert_eq!(pipeline.run("hi".to_owned()).unwrap(), "HI!");

    let failed = Pipeline::new()
        .try_then("fail", |_| Err(Error::MalformedValues))
        .then("never", |_| unreachable!())
        .run(String::new());
    assert!(matches!(failed, Err(Error::MalformedValues)));
}

proptest! {
    #[test]
    fn nice_typography_is_idempotent(text in r#"[a-zA-Z0-9 '".,@-]{0,60}"#) {
        let config = TypographyConfig::default();
        let once = do_nice_typography(&text, &config);
        prop_assert_eq!(do_nice_typography(&once, &config), once);
    }

    #[test]
    fn govuk_unlinking_is_idempotent(text in "(gov|GOV|uk|UK|[./? a-z]){0,20}") {
        let once = unlink_govuk(&text);
        prop_assert_eq!(unlink_govuk(&once), once);
    }
}
