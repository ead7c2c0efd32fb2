use pulldown_cmark::{Event, Options, Parser, TagEnd};

/// Extracts the human-readable text of a markdown document
///
/// Markup, link targets and HTML blocks are dropped; block boundaries become
/// newlines.
pub fn visible_text(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::all());
    let mut text = String::with_capacity(markdown.len());

    for event in parser {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::TableRow,
            ) => text.push('\n'),
            _ => {}
        }
    }

    text
}

/// Counts the non-whitespace characters a reader would actually see
pub fn visible_char_count(markdown: &str) -> usize {
    visible_text(markdown)
        .chars()
        .filter(|c| !c.is_whitespace())
        .count()
}
