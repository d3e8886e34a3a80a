use insta::assert_snapshot;

use super::*;

fn init_tracing() {
    _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn text(value: &str) -> Inline {
    Inline::Text(value.to_owned())
}

fn paragraph(value: &str) -> Block {
    Block::Paragraph(vec![text(value)])
}

#[test]
fn action_link_on_its_own_line() {
    init_tracing();
    let blocks = parse(">>[Click here](https://example.com)", &Config::default());
    assert_eq!(
        blocks,
        [Block::ActionLink {
            text: "Click here".to_owned(),
            url: "https://example.com".to_owned(),
        }]
    );
}

#[test]
fn action_link_trailing_text_gets_its_own_paragraph() {
    let blocks = parse("before\n>>[go](https://x.com) and more", &Config::default());
    assert_eq!(
        blocks,
        [
            paragraph("before"),
            Block::ActionLink {
                text: "go".to_owned(),
                url: "https://x.com".to_owned(),
            },
            paragraph("and more"),
        ]
    );
}

#[test]
fn quoted_action_link_stays_in_the_quote() {
    for source in ["^ >>[go](https://x.com)", "> &gt;&gt;[go](https://x.com)"] {
        let blocks = parse(source, &Config::default());
        assert_eq!(
            blocks,
            [Block::BlockQuote(vec![Block::ActionLink {
                text: "go".to_owned(),
                url: "https://x.com".to_owned(),
            }])],
            "{source}"
        );
    }
}

#[test]
fn action_link_urls_are_escaped() {
    let blocks = parse(">>[a &amp; b](https://x.com/a&amp;b{c})", &Config::default());
    assert_eq!(
        blocks,
        [Block::ActionLink {
            text: "a & b".to_owned(),
            url: "https://x.com/a&b%7Bc%7D".to_owned(),
        }]
    );
}

#[test]
fn caret_and_escaped_quotes() {
    let expected = [Block::BlockQuote(vec![paragraph("quoted")])];
    assert_eq!(parse("^ quoted", &Config::default()), expected);
    assert_eq!(parse("&gt; quoted", &Config::default()), expected);
    assert_eq!(parse("> quoted", &Config::default()), expected);
}

#[test]
fn dialect_skips_fenced_code() {
    let blocks = parse("```\n^ not a quote\n• nor a bullet\n```", &Config::default());
    assert_eq!(
        blocks,
        [Block::CodeBlock {
            info: String::new(),
            code: "^ not a quote\n• nor a bullet\n".to_owned(),
        }]
    );
}

#[test]
fn bullets_and_list_shapes() {
    let blocks = parse("• a\n• b", &Config::default());
    assert_eq!(
        blocks,
        [Block::List(List {
            ordered: false,
            start: 1,
            tight: true,
            items: vec![
                ListItem {
                    children: vec![paragraph("a")],
                },
                ListItem {
                    children: vec![paragraph("b")],
                },
            ],
        })]
    );

    let Some(Block::List(list)) = parse("3. a\n\n4. b", &Config::default()).pop() else {
        panic!("expected a list");
    };
    assert!(list.ordered);
    assert_eq!(list.start, 3);
    assert!(!list.tight);
}

#[test]
fn nesting_guard_flattens_deep_containers() {
    let mut config = Config::default();
    config.set("max_nested_level", "2");
    assert_eq!(
        parse("> > > deep", &config),
        [Block::BlockQuote(vec![Block::BlockQuote(vec![paragraph(
            "deep"
        )])])]
    );

    let blocks = parse("- a\n  - b\n    - c", &config);
    let Some(Block::List(outer)) = blocks.first() else {
        panic!("expected a list");
    };
    let Some(Block::List(inner)) = outer.items[0].children.get(1) else {
        panic!("expected a nested list");
    };
    // The third level is folded into the second level item.
    assert_eq!(
        inner.items[0].children,
        [paragraph("b"), paragraph("c")]
    );
}

#[test]
fn nesting_guard_flattens_deep_spans() {
    let mut config = Config::default();
    config.set("max_nested_level", "2");
    assert_eq!(
        parse("*a **b ~~c~~ b** a*", &config),
        [Block::Paragraph(vec![Inline::Emphasis(vec![
            text("a "),
            Inline::Strong(vec![text("b "), text("c"), text(" b")]),
            text(" a"),
        ])])]
    );
}

#[test]
fn very_deep_emphasis_renders() {
    init_tracing();
    let stars = "*".repeat(6000);
    let source = format!("{stars}x{stars}");
    for flavour in [Flavour::Html, Flavour::PlainText, Flavour::Letter] {
        let rendered = render(&source, flavour, &Config::default()).unwrap();
        assert!(rendered.contains('x'), "{flavour:?}");
    }
}

#[test]
fn bare_bullet_after_text_stays_text() {
    let blocks = parse("Some text\n•", &Config::default());
    assert_eq!(
        blocks,
        [Block::Paragraph(vec![
            text("Some text"),
            Inline::SoftBreak,
            text("•"),
        ])]
    );
    let html = render("Some text\n•\n", Flavour::Html, &Config::default()).unwrap();
    assert!(!html.contains("<h2"), "{html}");
    let plain = render("Some text\n•\n", Flavour::PlainText, &Config::default()).unwrap();
    assert!(!plain.contains("---"), "{plain}");
}

#[test]
fn tables_collapse_and_email_autolinks_get_mailto() {
    assert_eq!(
        parse("| a | b |\n|---|---|\n| 1 | 2 |", &Config::default()),
        [Block::Table]
    );
    assert_eq!(
        parse("<me@example.com>", &Config::default()),
        [Block::Paragraph(vec![Inline::Link {
            url: "mailto:me@example.com".to_owned(),
            title: String::new(),
            children: vec![text("me@example.com")],
            autolink: true,
        }])]
    );
}

#[test]
fn empty_input_renders_empty() {
    for flavour in [
        Flavour::Html,
        Flavour::PlainText,
        Flavour::Preheader,
        Flavour::Letter,
    ] {
        assert_eq!(render("", flavour, &Config::default()).unwrap(), "");
    }
}

#[test]
fn html_autolinks_bare_urls() {
    let html = render("see https://example.com.", Flavour::Html, &Config::default()).unwrap();
    assert_eq!(
        html,
        format!(
            "<p style=\"{PARAGRAPH_STYLE}\">see <a style=\"{LINK_STYLE}\" \
             href=\"https://example.com\">https://example.com</a>.</p>"
        )
    );
}

#[test]
fn plain_text_document() {
    init_tracing();
    let source = "# Title\n\nIntro with [a link](https://example.com)\n\n\
                  1. one\n2. two\n   * nested\n\n---\n\n## Section\n\nEnd";
    let plain = render(source, Flavour::PlainText, &Config::default()).unwrap();
    assert_snapshot!(plain, @r"
    Title
    -----------------------------------------------------------------

    Intro with a link: https://example.com

    1. one
    2. two
       • nested

    =================================================================

    Section
    -----------------------------------------------------------------

    End
    ");
}

#[test]
fn preheader_is_text_only() {
    let text = render(
        "# Hi\n\nSee [this](https://x.com) **now**",
        Flavour::Preheader,
        &Config::default(),
    )
    .unwrap();
    assert_eq!(text, "Hi\nSee this now");
}

#[test]
fn letter_markup() {
    let source = "# Title\n\n## Sub\n\nVisit [the site](https://www.gov.uk)\n\n---\n\nMore";
    let letter = render(source, Flavour::Letter, &Config::default()).unwrap();
    assert_eq!(
        letter,
        "<h2>Title</h2>\n<p>Sub</p>\n\
         <p>Visit the site: <strong>www.gov.uk</strong></p>\n\
         <div class=\"page-break\">&nbsp;</div>\n<p>More</p>\n"
    );
}
