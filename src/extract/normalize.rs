//! Lenient normalization — bounded textual repairs for near-JSON replies.
//!
//! Applied once per candidate after strict parsing fails, never
//! recursively. Three repairs, in order: single-quoted string literals
//! become double-quoted (only when the quote sits where a JSON string can
//! start), trailing commas before a closer are dropped, and trailing
//! commentary after the final closing delimiter is cut.

/// Repair a candidate that failed strict parsing.
///
/// Returns the repaired text; when no repair applies the input comes back
/// unchanged and the caller can skip the re-parse.
pub fn normalize(text: &str) -> String {
    let requoted = requote_single_quoted(text);
    let decommaed = strip_trailing_commas(&requoted);
    strip_trailing_commentary(&decommaed)
}

/// Positions where a JSON string literal can begin. Anything else (prose,
/// an apostrophe mid-word) is ambiguous and left untouched.
fn starts_string(prev: Option<char>) -> bool {
    matches!(prev, None | Some('{') | Some('[') | Some(',') | Some(':'))
}

/// Convert single-quoted string literals to double-quoted ones.
///
/// Double-quoted literals pass through verbatim, apostrophes inside them
/// included. A single quote opens a conversion only in a key/value
/// position with a closing quote in sight; otherwise the text is kept
/// as-is rather than guessed at.
fn requote_single_quoted(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut prev: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            let end = double_quoted_end(&chars, i);
            out.extend(&chars[i..end]);
            prev = Some('"');
            i = end;
        } else if c == '\'' && starts_string(prev) {
            match single_quoted_end(&chars, i) {
                Some(end) => {
                    out.push('"');
                    push_requoted_body(&mut out, &chars[i + 1..end - 1]);
                    out.push('"');
                    prev = Some('"');
                    i = end;
                }
                None => {
                    out.push(c);
                    prev = Some(c);
                    i += 1;
                }
            }
        } else {
            out.push(c);
            if !c.is_whitespace() {
                prev = Some(c);
            }
            i += 1;
        }
    }

    out
}

/// One past the closing `"` of the literal opening at `start`, or the end
/// of input when unterminated.
fn double_quoted_end(chars: &[char], start: usize) -> usize {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '"' => return i + 1,
            _ => i += 1,
        }
    }
    chars.len()
}

/// One past the closing `'` of the literal opening at `start`, if any.
fn single_quoted_end(chars: &[char], start: usize) -> Option<usize> {
    let mut i = start + 1;
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            '\'' => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// Re-emit a single-quoted body inside double quotes: `\'` loses its
/// escape, a bare `"` gains one, every other escape passes through.
fn push_requoted_body(out: &mut String, body: &[char]) {
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            '\\' if i + 1 < body.len() && body[i + 1] == '\'' => {
                out.push('\'');
                i += 2;
            }
            '\\' if i + 1 < body.len() => {
                out.push('\\');
                out.push(body[i + 1]);
                i += 2;
            }
            '"' => {
                out.push_str("\\\"");
                i += 1;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
}

/// Drop commas that directly precede a closing delimiter, outside string
/// literals.
fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            let end = double_quoted_end(&chars, i);
            out.extend(&chars[i..end]);
            i = end;
            continue;
        }
        if c == ',' {
            let mut j = i + 1;
            while j < chars.len() && chars[j].is_whitespace() {
                j += 1;
            }
            if j < chars.len() && (chars[j] == '}' || chars[j] == ']') {
                i += 1;
                continue;
            }
        }
        out.push(c);
        i += 1;
    }

    out
}

/// Cut anything after the final closing delimiter outside string literals.
fn strip_trailing_commentary(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut last_close: Option<usize> = None;
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '"' => i = double_quoted_end(&chars, i),
            '}' | ']' => {
                last_close = Some(i);
                i += 1;
            }
            _ => i += 1,
        }
    }

    match last_close {
        Some(idx) if idx + 1 < chars.len() => chars[..=idx].iter().collect(),
        _ => text.to_string(),
    }
}
