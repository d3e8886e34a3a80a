use super::*;

fn html(source: &str) -> String {
    markdown::render(source, Flavour::Html, &Config::default()).unwrap()
}

fn plain(source: &str) -> String {
    markdown::render(source, Flavour::PlainText, &Config::default()).unwrap()
}

fn p(inner: &str) -> String {
    format!("<p style=\"{PARAGRAPH_STYLE}\">{inner}</p>")
}

#[test]
fn paragraphs_run_together_and_lines_break() {
    assert_eq!(
        html("line one\nline two\n\nnew paragraph"),
        format!("{}{}", p("line one<br />line two"), p("new paragraph"))
    );
}

#[test]
fn action_link_block() {
    assert_eq!(
        html(">>[action](https://example.com/foo?a=b)"),
        format!(
            "<p style=\"{PARAGRAPH_STYLE}\"><a style=\"{LINK_STYLE}\" \
             href=\"https://example.com/foo?a=b\" target=\"_blank\">\
             <img src=\"https://dev-va-gov-assets.s3-us-gov-west-1.amazonaws.com/img/vanotify-action-link.png\" \
             alt=\"call to action img\" style=\"vertical-align: middle;\"> <b>action</b></a></p>"
        )
    );
}

#[test]
fn headings_collapse_past_level_three() {
    let rendered = html("# foo\n\n#### deep");
    assert!(rendered.starts_with("<h1 style=\"Margin: 0 0 20px 0; padding: 0; font-size: 32px;"));
    assert!(rendered.contains(">foo</h1>"));
    assert!(rendered.ends_with(&p("deep")));
}

#[test]
fn lists_are_presentational() {
    assert_eq!(
        html("3. a\n4. b"),
        format!(
            "<ol role=\"presentation\" style=\"{ORDERED_LIST_STYLE}\" start=\"3\">\
             <li style=\"{LIST_ITEM_STYLE}\">a</li><li style=\"{LIST_ITEM_STYLE}\">b</li></ol>"
        )
    );
    assert_eq!(
        html("* a\n\n* b"),
        format!(
            "<ul role=\"presentation\" style=\"{UNORDERED_LIST_STYLE}\">\
             <li style=\"{LIST_ITEM_STYLE}\">{}</li><li style=\"{LIST_ITEM_STYLE}\">{}</li></ul>",
            p("a"),
            p("b")
        )
    );
}

#[test]
fn quotes_rules_and_deleted_nodes() {
    assert_eq!(
        html("^ quoted"),
        format!("<blockquote style=\"{BLOCK_QUOTE_STYLE}\">{}</blockquote>", p("quoted"))
    );
    assert_eq!(html("---"), format!("<hr style=\"{THEMATIC_BREAK_STYLE}\" />"));
    assert_eq!(
        html("![alt](https://x.com/i.png)\n\n| a |\n|---|\n| b |\n\ntext"),
        p("text")
    );
}

#[test]
fn text_and_attributes_are_escaped() {
    assert_eq!(html("a < b & c\u{A0}d"), p("a &lt; b &amp; c&nbsp;d"));
    assert_eq!(
        html("[x](https://a.com \"T\")"),
        p(&format!(
            "<a style=\"{LINK_STYLE}\" href=\"https://a.com\" title=\"T\" target=\"_blank\">x</a>"
        ))
    );
}

#[test]
fn plain_text_inline_markers() {
    assert_eq!(plain("*a* **b** `c`"), "*a* **b** `c`");
    assert_eq!(plain("<https://x.com>"), "https://x.com");
    assert_eq!(plain("keep ~~this~~"), "keep \n\nthis");
    assert_eq!(plain("![gone](x.png) text"), " text");
}

#[test]
fn plain_text_quotes_lose_their_markers() {
    assert_eq!(plain("before\n\n> quoted\n\nafter"), "before\n\nquoted\n\nafter");
    assert_eq!(plain("```\nlet x = 1;\n```"), "let x = 1;");
}

#[test]
fn letter_lists_and_breaks() {
    let letter = markdown::render("- a\n- b\n\nline\nbreak", Flavour::Letter, &Config::default())
        .unwrap();
    assert_eq!(
        letter,
        "<ul>\n<li>a</li>\n<li>b</li>\n</ul>\n<p>line<br>break</p>\n"
    );
}

#[test]
fn renderers_share_a_tree() {
    let blocks = markdown::parse("Hi [there](https://x.com)", &Config::default());
    let config = Config::default();
    assert_eq!(
        HtmlRenderer::new(&config).render(&blocks).unwrap(),
        p(&format!(
            "Hi <a style=\"{LINK_STYLE}\" href=\"https://x.com\" target=\"_blank\">there</a>"
        ))
    );
    assert_eq!(
        PlainTextRenderer::new(&config).render(&blocks).unwrap(),
        "Hi there: https://x.com"
    );
    assert_eq!(
        LetterRenderer::new().render(&blocks).unwrap(),
        "<p>Hi there: <strong>x.com</strong></p>\n"
    );
}
