//! String-aware tokenizer for malformed JSON-like text
//!
//! The tokenizer never fails: it splits any input into structural tokens,
//! string literals (possibly unterminated) and bare literals, so that the
//! repair stages can reason about nesting without being fooled by brackets
//! inside strings.

/// Kind of a scanned token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    /// `{` or `[`
    Open(char),
    /// `}` or `]`
    Close(char),
    Comma,
    Colon,
    /// String literal; `closed` is false when the input ended inside it
    Str { closed: bool },
    /// Run of non-structural characters (numbers, `true`, junk)
    Literal,
}

/// Token with its byte span in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) start: usize,
    pub(crate) end: usize,
}

impl TokenKind {
    /// True for tokens that can end a value
    pub(crate) fn ends_value(self) -> bool {
        matches!(
            self,
            Self::Close(_) | Self::Str { closed: true } | Self::Literal
        )
    }

    /// True for tokens that can start a value
    pub(crate) fn starts_value(self) -> bool {
        matches!(self, Self::Open(_) | Self::Str { .. } | Self::Literal)
    }
}

fn is_structural(c: char) -> bool {
    matches!(c, '{' | '}' | '[' | ']' | ',' | ':' | '"')
}

/// Split `text` into tokens, skipping whitespace
pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = text.char_indices().peekable();

    while let Some((start, c)) = chars.next() {
        let kind = match c {
            c if c.is_whitespace() => continue,
            '{' | '[' => TokenKind::Open(c),
            '}' | ']' => TokenKind::Close(c),
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            '"' => {
                let mut escaped = false;
                let mut closed = false;
                let mut end = text.len();
                for (idx, ch) in chars.by_ref() {
                    if escaped {
                        escaped = false;
                    } else if ch == '\\' {
                        escaped = true;
                    } else if ch == '"' {
                        closed = true;
                        end = idx + 1;
                        break;
                    }
                }
                tokens.push(Token {
                    kind: TokenKind::Str { closed },
                    start,
                    end,
                });
                continue;
            }
            _ => {
                let mut end = start + c.len_utf8();
                while let Some(&(idx, ch)) = chars.peek() {
                    if ch.is_whitespace() || is_structural(ch) {
                        break;
                    }
                    end = idx + ch.len_utf8();
                    chars.next();
                }
                tokens.push(Token {
                    kind: TokenKind::Literal,
                    start,
                    end,
                });
                continue;
            }
        };
        tokens.push(Token {
            kind,
            start,
            end: start + 1,
        });
    }

    tokens
}

/// Closer matching an opener
pub(crate) fn closer_for(open: char) -> char {
    if open == '[' {
        ']'
    } else {
        '}'
    }
}

/// Openers still unclosed after `tokens`, innermost last
///
/// Mismatched closers are ignored.
pub(crate) fn open_stack(tokens: &[Token]) -> Vec<char> {
    let mut stack = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::Open(c) => stack.push(c),
            TokenKind::Close(c) => {
                if stack.last().map(|&o| closer_for(o)) == Some(c) {
                    stack.pop();
                }
            }
            _ => {}
        }
    }
    stack
}

/// Byte span of the balanced value opened by `tokens[open_idx]`
pub(crate) fn balanced_span(tokens: &[Token], open_idx: usize) -> Option<(usize, usize)> {
    let first = tokens.get(open_idx)?;
    if !matches!(first.kind, TokenKind::Open(_)) {
        return None;
    }

    let mut stack = Vec::new();
    for token in &tokens[open_idx..] {
        match token.kind {
            TokenKind::Open(c) => stack.push(c),
            TokenKind::Close(c) => {
                let open = stack.pop()?;
                if closer_for(open) != c {
                    return None;
                }
                if stack.is_empty() {
                    return Some((first.start, token.end));
                }
            }
            _ => {}
        }
    }
    None
}

/// End offset of the last point where nesting returned to zero
///
/// Only closers that match their opener count; the scan starts at the first
/// opener.
pub(crate) fn last_balanced_end(tokens: &[Token]) -> Option<usize> {
    let start = tokens
        .iter()
        .position(|t| matches!(t.kind, TokenKind::Open(_)))?;

    let mut stack: Vec<char> = Vec::new();
    let mut last = None;
    for token in &tokens[start..] {
        match token.kind {
            TokenKind::Open(c) => stack.push(c),
            TokenKind::Close(c) => match stack.last() {
                Some(&open) if closer_for(open) == c => {
                    stack.pop();
                    if stack.is_empty() {
                        last = Some(token.end);
                    }
                }
                _ => break,
            },
            _ => {}
        }
    }
    last
}
