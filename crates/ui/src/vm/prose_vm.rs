use std::collections::HashSet;

/// Render authored course prose (Markdown) to sanitized HTML.
///
/// Only inline emphasis, links, code and simple lists survive sanitising;
/// headings and images belong to the section structure, not to prose.
#[must_use]
pub fn prose_to_html(input: &str) -> String {
    let mut options = pulldown_cmark::Options::empty();
    options.insert(pulldown_cmark::Options::ENABLE_STRIKETHROUGH);

    let parser = pulldown_cmark::Parser::new_ext(input, options);
    let mut html = String::new();
    pulldown_cmark::html::push_html(&mut html, parser);
    sanitize_prose(&html)
}

#[must_use]
pub fn sanitize_prose(html: &str) -> String {
    let tags: HashSet<&str> = [
        "p", "br", "em", "strong", "b", "i", "del", "code", "ul", "ol", "li", "a",
    ]
    .into_iter()
    .collect();

    ammonia::Builder::new()
        .tags(tags)
        .link_rel(Some("noopener noreferrer"))
        .clean(html)
        .to_string()
}
