//! Tag and comment scanning.
//!
//! The tokenizer does not understand HTML. It finds the next thing that looks
//! like a tag (`<`, not followed by `!` or `>`, up to the first `>`) or an HTML
//! comment (`<!--` up to the first `-->`), whichever starts first. Everything
//! it skips over is text and is left alone by the engine.
//!
//! An unterminated comment ends the scan: nothing after `<!--` is looked at.

/// What kind of construct a [`Span`] covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Tag,
    Comment,
}

/// A tag or comment found in the scanned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span<'a> {
    pub kind: SpanKind,
    /// Byte offset of `<` in the scanned text.
    pub start: usize,
    /// The raw tag or comment, delimiters included.
    pub text: &'a str,
}

/// Find the next tag or comment in `html`.
pub fn next_span(html: &str) -> Option<Span<'_>> {
    let tag = crate::regex!(r"<[^!>][^>]*>").find(html);
    let comment_start = html.find("<!--");

    match comment_start {
        Some(start) if tag.is_none_or(|t| start < t.start()) => {
            let end = start + html[start..].find("-->")? + "-->".len();
            Some(Span { kind: SpanKind::Comment, start, text: &html[start..end] })
        }
        _ => tag.map(|t| Span { kind: SpanKind::Tag, start: t.start(), text: t.as_str() }),
    }
}
