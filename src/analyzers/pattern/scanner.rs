//! Text scanning helpers for the pattern strategy
//!
//! All helpers preserve byte offsets: masking replaces characters with spaces
//! of the same UTF-8 length and keeps newlines, so offsets found in a masked
//! copy are valid in the source text.

use crate::core::SourcePosition;

/// The source with comments blanked, and a copy with string contents blanked too.
#[derive(Debug, Clone)]
pub struct MaskedSource {
    /// Comments replaced by spaces.
    pub without_comments: String,
    /// Comments and string/template literal contents replaced by spaces.
    pub code_only: String,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum State {
    Code,
    LineComment,
    BlockComment,
    Str(char),
}

fn blank(out: &mut String, c: char) {
    if c == '\n' {
        out.push('\n');
    } else {
        out.extend(std::iter::repeat(' ').take(c.len_utf8()));
    }
}

/// Blank comments (and, in `code_only`, string contents) out of `source`.
pub fn mask_source(source: &str) -> MaskedSource {
    let mut without_comments = String::with_capacity(source.len());
    let mut code_only = String::with_capacity(source.len());
    let mut state = State::Code;
    let mut chars = source.chars().peekable();

    while let Some(c) = chars.next() {
        match state {
            State::Code => match c {
                '/' if chars.peek() == Some(&'/') => {
                    state = State::LineComment;
                    blank(&mut without_comments, c);
                    blank(&mut code_only, c);
                }
                '/' if chars.peek() == Some(&'*') => {
                    state = State::BlockComment;
                    blank(&mut without_comments, c);
                    blank(&mut code_only, c);
                    if let Some(star) = chars.next() {
                        blank(&mut without_comments, star);
                        blank(&mut code_only, star);
                    }
                }
                '\'' | '"' | '`' => {
                    state = State::Str(c);
                    without_comments.push(c);
                    code_only.push(c);
                }
                _ => {
                    without_comments.push(c);
                    code_only.push(c);
                }
            },
            State::LineComment => {
                if c == '\n' {
                    state = State::Code;
                }
                blank(&mut without_comments, c);
                blank(&mut code_only, c);
            }
            State::BlockComment => {
                blank(&mut without_comments, c);
                blank(&mut code_only, c);
                if c == '*' && chars.peek() == Some(&'/') {
                    if let Some(slash) = chars.next() {
                        blank(&mut without_comments, slash);
                        blank(&mut code_only, slash);
                    }
                    state = State::Code;
                }
            }
            State::Str(quote) => {
                without_comments.push(c);
                if c == quote {
                    code_only.push(c);
                    state = State::Code;
                } else if c == '\\' {
                    blank(&mut code_only, c);
                    if let Some(escaped) = chars.next() {
                        without_comments.push(escaped);
                        blank(&mut code_only, escaped);
                    }
                } else if c == '\n' && quote != '`' {
                    // Unterminated string literal ends at the line break
                    code_only.push(c);
                    state = State::Code;
                } else {
                    blank(&mut code_only, c);
                }
            }
        }
    }

    MaskedSource {
        without_comments,
        code_only,
    }
}

fn closer_for(open: u8) -> Option<u8> {
    match open {
        b'{' => Some(b'}'),
        b'(' => Some(b')'),
        b'[' => Some(b']'),
        _ => None,
    }
}

/// Offset of the bracket closing the one at `open`, in masked text.
pub fn matching_close(text: &str, open: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut stack = vec![closer_for(*bytes.get(open)?)?];

    for (offset, &byte) in bytes.iter().enumerate().skip(open + 1) {
        match byte {
            b'{' | b'(' | b'[' => stack.extend(closer_for(byte)),
            b'}' | b')' | b']' => {
                if stack.pop() != Some(byte) {
                    return None;
                }
                if stack.is_empty() {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// End (exclusive) of the expression or statement starting at `start`.
///
/// Stops at a top-level `;` or `,`, at a bracket that closes an enclosing
/// scope, or at a line break not followed by a continuation.
pub fn expression_end(text: &str, start: usize) -> usize {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut seen_content = false;

    let mut offset = start;
    while offset < bytes.len() {
        let byte = bytes[offset];
        match byte {
            b'{' | b'(' | b'[' => depth += 1,
            b'}' | b')' | b']' => {
                if depth == 0 {
                    return offset;
                }
                depth -= 1;
            }
            b';' | b',' if depth == 0 => return offset,
            b'\n' if depth == 0 && seen_content && !continues_on_next_line(text, offset) => {
                return offset;
            }
            _ => {}
        }
        if !byte.is_ascii_whitespace() {
            seen_content = true;
        }
        offset += 1;
    }
    bytes.len()
}

fn continues_on_next_line(text: &str, newline: usize) -> bool {
    text[newline + 1..]
        .trim_start()
        .starts_with(['.', '?', ':', '+', '-', '*', '/', '&', '|'])
}

/// Offset of the first non-whitespace byte at or after `from`.
pub fn skip_whitespace(text: &str, from: usize) -> usize {
    text[from..]
        .find(|c: char| !c.is_whitespace())
        .map_or(text.len(), |skipped| from + skipped)
}

/// Maps byte offsets to 1-based line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        Self { line_starts }
    }

    pub fn position(&self, offset: usize) -> SourcePosition {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let line_start = self.line_starts[line.saturating_sub(1)];
        SourcePosition::new(line.max(1), offset - line_start + 1)
    }

    pub fn line(&self, offset: usize) -> usize {
        self.position(offset).line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_preserves_offsets() {
        let source = "let a = 'x{y'; // for (;;)\n/* é */ b();";
        let masked = mask_source(source);
        assert_eq!(masked.without_comments.len(), source.len());
        assert_eq!(masked.code_only.len(), source.len());
        assert!(!masked.without_comments.contains("for"));
        assert!(masked.without_comments.contains("'x{y'"));
        assert!(masked.code_only.contains("'   '"));
        assert!(masked.code_only.ends_with("b();"));
    }

    #[test]
    fn test_mask_handles_escapes_and_templates() {
        let source = "const s = \"a\\\"{\"; const t = `multi\nline {`; f();";
        let masked = mask_source(source);
        assert!(!masked.code_only.contains('{'));
        assert!(masked.code_only.ends_with("f();"));
        assert_eq!(masked.code_only.matches('\n').count(), 1);
    }

    #[test]
    fn test_matching_close() {
        let text = "f(a, [b], { c: (d) }) + 1";
        assert_eq!(matching_close(text, 1), Some(20));
        assert_eq!(matching_close(text, 10), Some(19));
        assert_eq!(matching_close("(]", 0), None);
        assert_eq!(matching_close("((", 0), None);
        assert_eq!(matching_close("x", 0), None);
    }

    #[test]
    fn test_expression_end() {
        let text = "x * 2; next";
        assert_eq!(expression_end(text, 0), 5);
        let text = "items.map((x) => x + 1)\n  .filter(Boolean)\nconst y = 1;";
        let end = expression_end(text, 0);
        assert_eq!(&text[..end], "items.map((x) => x + 1)\n  .filter(Boolean)");
        assert_eq!(expression_end("a, b", 0), 1);
        assert_eq!(expression_end("a }", 0), 2);
    }

    #[test]
    fn test_line_index() {
        let index = LineIndex::new("ab\ncd\n\nef");
        assert_eq!(index.position(0), SourcePosition::new(1, 1));
        assert_eq!(index.position(1), SourcePosition::new(1, 2));
        assert_eq!(index.position(3), SourcePosition::new(2, 1));
        assert_eq!(index.position(7), SourcePosition::new(4, 1));
        assert_eq!(index.line(8), 4);
    }

    #[test]
    fn test_skip_whitespace() {
        assert_eq!(skip_whitespace("a   {", 1), 4);
        assert_eq!(skip_whitespace("a   ", 1), 4);
    }
}
