//! Candidate generation for the extraction parser.
//!
//! A candidate is a contiguous span of the raw agent reply believed to
//! delimit one JSON value. Three producers, in descending confidence:
//! the whole reply, markdown-fenced code blocks, and balanced-delimiter
//! spans located by a string-aware scan.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use std::ops::Range;

/// Recovery phase that produced a candidate. Declaration order is
/// confidence rank, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    /// The entire reply, whitespace-trimmed.
    Direct,
    /// Content of a backtick-fenced code block.
    Fenced,
    /// Minimal balanced `{..}`/`[..]` span found by scanning.
    Scan,
}

/// A span of the raw reply hypothesized to delimit one JSON value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Byte offsets into the raw reply.
    pub span: Range<usize>,
    pub phase: Phase,
}

impl Candidate {
    /// The candidate's text within the reply it was produced from.
    pub fn text<'a>(&self, raw: &'a str) -> &'a str {
        &raw[self.span.clone()]
    }
}

/// Produce all candidates for a reply, highest confidence first.
///
/// Fenced candidates keep document order; scan candidates keep start
/// order (agents tend to put the payload before the explanation).
pub fn candidates(raw: &str) -> Vec<Candidate> {
    let mut cands = Vec::new();

    let trimmed = trimmed_span(raw);
    if !trimmed.is_empty() {
        cands.push(Candidate {
            span: trimmed,
            phase: Phase::Direct,
        });
    }

    for span in fenced_spans(raw) {
        cands.push(Candidate {
            span,
            phase: Phase::Fenced,
        });
    }

    for span in balanced_spans(raw) {
        cands.push(Candidate {
            span,
            phase: Phase::Scan,
        });
    }

    cands
}

/// Span of the reply with surrounding whitespace removed.
fn trimmed_span(raw: &str) -> Range<usize> {
    if raw.trim().is_empty() {
        return 0..0;
    }
    let start = raw.len() - raw.trim_start().len();
    start..raw.trim_end().len()
}

/// Content spans of backtick-fenced code blocks, in document order.
///
/// The reply convention is triple backticks, optionally tagged `json`;
/// tilde fences and indented code blocks are not part of it and are
/// skipped. The info tag is not required to be `json` — any fenced
/// block gets a chance to parse.
fn fenced_spans(raw: &str) -> Vec<Range<usize>> {
    let parser = Parser::new_ext(raw, Options::all());
    let mut spans: Vec<Range<usize>> = Vec::new();
    let mut in_backtick_fence = false;
    let mut content: Option<Range<usize>> = None;

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(_))) => {
                in_backtick_fence = raw[range].trim_start().starts_with("```");
                content = None;
            }
            Event::Text(_) if in_backtick_fence => {
                // A block can tokenize as several text events; keep the union.
                content = match content.take() {
                    Some(acc) => Some(acc.start..range.end),
                    None => Some(range),
                };
            }
            Event::End(TagEnd::CodeBlock) => {
                if in_backtick_fence {
                    if let Some(span) = content.take() {
                        spans.push(span);
                    }
                }
                in_backtick_fence = false;
            }
            _ => {}
        }
    }

    spans
}

/// Balanced `{..}`/`[..]` spans, earliest start first.
///
/// Depth tracking respects double-quoted string literals and their
/// `\"`/`\\` escapes, so braces inside strings do not affect nesting.
/// After a closed span the scan resumes past it; an opener whose depth
/// never returns to zero (truncated reply) is skipped in favor of the
/// next opener.
fn balanced_spans(raw: &str) -> Vec<Range<usize>> {
    let bytes = raw.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'{' || bytes[i] == b'[' {
            if let Some(end) = matching_close(bytes, i) {
                spans.push(i..end);
                i = end;
                continue;
            }
        }
        i += 1;
    }
    spans
}

/// Offset one past the closer matching the opener at `start`, if nesting
/// ever returns to depth zero.
fn matching_close(bytes: &[u8], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}
