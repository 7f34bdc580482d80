//! Splitting model output on triple-backtick code fences.

const FENCE: &str = "```";

/// A fenced code block, stored exactly as it appeared between the fences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    raw: String,
}

impl CodeBlock {
    /// Text between the opening and closing fence, unmodified.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The info string the model wrote after the opening fence, if any.
    ///
    /// Only a bare language identifier (`rust`, `c++`, `objective-c`, `f#`)
    /// counts; a first line that reads like code stays part of the body.
    pub fn language(&self) -> Option<&str> {
        let (first_line, _) = self.raw.split_once('\n')?;
        let tag = first_line.trim();
        is_language_tag(tag).then_some(tag)
    }

    /// The code body, without the info line.
    pub fn code(&self) -> &str {
        match self.raw.split_once('\n') {
            Some((first_line, rest)) if first_line.trim().is_empty() || self.language().is_some() => {
                rest
            }
            _ => &self.raw,
        }
    }
}

fn is_language_tag(tag: &str) -> bool {
    tag.starts_with(|c: char| c.is_ascii_alphabetic())
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '+' | '.' | '#' | '-'))
}

/// A piece of model output: prose or fenced code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Prose(String),
    Code(CodeBlock),
}

impl Segment {
    /// The segment's text as it appeared in the input, fences excluded.
    pub fn raw(&self) -> &str {
        match self {
            Segment::Prose(text) => text,
            Segment::Code(block) => block.raw(),
        }
    }
}

/// Split text into alternating prose and code segments.
///
/// Concatenating the `raw()` text of the returned segments reproduces the
/// input with every fence marker removed. Empty prose between adjacent
/// blocks is omitted. An opening fence without a closing one is not treated
/// as code: the marker and the rest of the text stay in a prose segment.
pub fn split_fenced(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        let Some(close) = after_open.find(FENCE) else {
            break;
        };

        if open > 0 {
            segments.push(Segment::Prose(rest[..open].to_string()));
        }
        segments.push(Segment::Code(CodeBlock {
            raw: after_open[..close].to_string(),
        }));
        rest = &after_open[close + FENCE.len()..];
    }

    if !rest.is_empty() {
        segments.push(Segment::Prose(rest.to_string()));
    }

    segments
}
