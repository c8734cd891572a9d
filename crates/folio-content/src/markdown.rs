//! Markdown rendering helpers

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

const WORDS_PER_MINUTE: usize = 200;
const EXCERPT_CHARS: usize = 160;

/// Render markdown to HTML
pub fn render_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, Options::all());
    let mut out = String::new();
    html::push_html(&mut out, parser);
    out
}

/// Estimated reading time in minutes, never less than one
pub fn reading_time(markdown: &str) -> usize {
    let words = markdown.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1)
}

/// Plain text of the first paragraph, cut at a word boundary
pub fn excerpt(markdown: &str) -> String {
    let mut text = String::new();
    let mut in_paragraph = false;

    for event in Parser::new(markdown) {
        match event {
            Event::Start(Tag::Paragraph) => in_paragraph = true,
            Event::End(TagEnd::Paragraph) if in_paragraph => break,
            Event::Text(t) | Event::Code(t) if in_paragraph => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak if in_paragraph => text.push(' '),
            _ => {}
        }
    }

    truncate_words(text.trim(), EXCERPT_CHARS)
}

fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let cut: String = text.chars().take(max_chars).collect();
    let cut = match cut.rfind(char::is_whitespace) {
        Some(idx) => &cut[..idx],
        None => cut.as_str(),
    };
    format!("{}…", cut.trim_end())
}
