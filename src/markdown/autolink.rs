use super::*;

static BARE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"https?://[^\s<>]+[^<>.,:"')\]\s]"#).expect("valid url pattern")
});

/// Turn bare `http(s)://` URLs in text into links. Text already inside a link is left alone.
pub(crate) fn link_bare_urls(blocks: &mut [Block]) {
    for block in blocks {
        match block {
            Block::Paragraph(children) | Block::Heading { children, .. } => link_inlines(children),
            Block::BlockQuote(blocks) => link_bare_urls(blocks),
            Block::List(list) => list
                .items
                .iter_mut()
                .for_each(|item| link_bare_urls(&mut item.children)),
            _ => {}
        }
    }
}

fn link_inlines(inlines: &mut Vec<Inline>) {
    let mut linked = Vec::with_capacity(inlines.len());
    for mut inline in inlines.drain(..) {
        match &mut inline {
            Inline::Text(text) if BARE_URL.is_match(text) => {
                split_urls(text, &mut linked);
                continue;
            }
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Strikethrough(children) => link_inlines(children),
            _ => {}
        }
        linked.push(inline);
    }
    *inlines = linked;
}

fn split_urls(text: &str, out: &mut Vec<Inline>) {
    let mut last = 0;
    for url in BARE_URL.find_iter(text) {
        if url.start() > last {
            out.push(Inline::Text(text[last..url.start()].to_owned()));
        }
        tracing::trace!(url = url.as_str(), "autolinked");
        out.push(Inline::Link {
            url: url.as_str().to_owned(),
            title: String::new(),
            children: vec![Inline::Text(url.as_str().to_owned())],
            autolink: true,
        });
        last = url.end();
    }
    if last < text.len() {
        out.push(Inline::Text(text[last..].to_owned()));
    }
}
