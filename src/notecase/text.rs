//! Text helpers shared by the views: rich-text flattening and accent cycling.

use pulldown_cmark::{Event, Options, Parser, TagEnd};
use scraper::Html;

/// Flattens rich note content (Markdown with optional inline HTML) to plain text.
///
/// Block ends become line breaks, markup and tags are dropped, and runs of
/// blank lines collapse to one. HTML blocks go through an HTML parser, so
/// their entities are decoded and a bare `<` in them stays text.
pub fn plain_text(content: &str) -> String {
    let mut out = String::new();
    let mut html_block = String::new();

    for event in Parser::new_ext(content, Options::all()) {
        match event {
            Event::Text(text) | Event::Code(text) => out.push_str(&text),
            Event::Html(html) => html_block.push_str(&html),
            Event::End(TagEnd::HtmlBlock) => {
                out.push_str(&html_text(&html_block));
                out.push('\n');
                html_block.clear();
            }
            Event::SoftBreak => out.push(' '),
            Event::HardBreak => out.push('\n'),
            Event::End(
                TagEnd::Paragraph | TagEnd::Heading(_) | TagEnd::Item | TagEnd::CodeBlock,
            ) => out.push('\n'),
            _ => {}
        }
    }

    let mut lines: Vec<&str> = Vec::new();
    for line in out.lines().map(str::trim) {
        if line.is_empty() && lines.last().map_or(true, |l| l.is_empty()) {
            continue;
        }
        lines.push(line);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Text content of an HTML fragment.
fn html_text(fragment: &str) -> String {
    Html::parse_fragment(fragment).root_element().text().collect()
}

/// Keeps the first `max` lines, marking the cut with an ellipsis line.
pub fn clamp_lines(text: &str, max: usize) -> String {
    let mut lines = text.lines();
    let kept: Vec<&str> = lines.by_ref().take(max).collect();
    let mut out = kept.join("\n");
    if lines.next().is_some() {
        out.push_str("\n…");
    }
    out
}

/// Visual emphasis for a note in the collection view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Highlight,
    Bright,
    Plain,
}

/// Accent for the note at `position` (0-based) when cycling through `variants`.
///
/// The first two slots of each cycle are accented, the rest are plain.
pub fn accent_for(position: usize, variants: usize) -> Accent {
    if variants == 0 {
        return Accent::Plain;
    }
    match position % variants {
        0 => Accent::Highlight,
        1 => Accent::Bright,
        _ => Accent::Plain,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_markdown() {
        let text = plain_text("# Shopping\n\n- **milk**\n- eggs\n\nSee `list`.");
        assert_eq!(text, "Shopping\nmilk\neggs\nSee list.");
    }

    #[test]
    fn drops_html_tags() {
        assert_eq!(plain_text("<b>bold</b> and <i>more</i>"), "bold and more");
        assert_eq!(plain_text("<div>\nblock\n</div>"), "block");
    }

    #[test]
    fn html_blocks_keep_their_text() {
        assert_eq!(
            plain_text("<div>\nif a < b then c\n</div>"),
            "if a < b then c"
        );
        assert_eq!(plain_text("<p>Tom &amp; Jerry</p>"), "Tom & Jerry");
        assert_eq!(
            plain_text("Intro\n\n<div>\n<b>bold</b> text\n</div>\n\nOutro"),
            "Intro\nbold text\nOutro"
        );
    }

    #[test]
    fn empty_content() {
        assert_eq!(plain_text(""), "");
        assert_eq!(plain_text("\n\n  \n"), "");
    }

    #[test]
    fn clamps_long_text() {
        assert_eq!(clamp_lines("a\nb\nc", 2), "a\nb\n…");
        assert_eq!(clamp_lines("a\nb", 2), "a\nb");
    }

    #[test]
    fn accents_cycle() {
        let accents: Vec<Accent> = (0..6).map(|i| accent_for(i, 4)).collect();
        assert_eq!(
            accents,
            vec![
                Accent::Highlight,
                Accent::Bright,
                Accent::Plain,
                Accent::Plain,
                Accent::Highlight,
                Accent::Bright,
            ]
        );
        assert_eq!(accent_for(3, 1), Accent::Highlight);
        assert_eq!(accent_for(3, 0), Accent::Plain);
    }
}
