//! Lexer
//!
//!     Turns template text into the flat [Token] stream the generator consumes. Templates use
//!     JSP-style delimiters:
//!
//!         <%@ ... %>      directive
//!         <%= ... %>      expression
//!         <%-- ... --%>   comment
//!         <% ... %>       statement
//!
//!     Everything outside a delimited block is string content.
//!
//! Two Passes
//!
//!     The raw pass is a vanilla logos lexer over delimiters and runs of plain text; it never
//!     fails, since every character matches some rule. The assembly pass walks the raw tokens
//!     with their byte spans and cuts the source into blocks. Working from spans means the
//!     content of a block is always an exact slice of the source, whatever the raw tokens
//!     inside it were.
//!
//!     Inside a comment only `--%>` closes the block. Inside any other block `%>` closes it,
//!     and a `--%>` there is read as two dashes followed by the close (`i--%>`).
//!
//!     Directive, expression and statement contents are trimmed. String content and comments
//!     are kept verbatim. Every token records the 1-based line its first character is on.

use crate::bb::token::{Token, TokenKind};
use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Delimiters and plain text, as seen by logos.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum RawToken {
    #[token("<%@")]
    OpenDirective,
    #[token("<%=")]
    OpenExpression,
    #[token("<%--")]
    OpenComment,
    #[token("<%")]
    OpenStatement,
    #[token("--%>")]
    CloseComment,
    #[token("%>")]
    Close,

    // Characters that may start a delimiter, when they don't
    #[token("<")]
    Angle,
    #[token("%")]
    Percent,
    #[token("-")]
    Dash,

    #[regex(r"[^<%-]+")]
    Text,
}

impl RawToken {
    fn opened_kind(self) -> Option<TokenKind> {
        match self {
            RawToken::OpenDirective => Some(TokenKind::Directive),
            RawToken::OpenExpression => Some(TokenKind::Expression),
            RawToken::OpenComment => Some(TokenKind::Comment),
            RawToken::OpenStatement => Some(TokenKind::Statement),
            _ => None,
        }
    }
}

/// Errors that can occur during lexing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A block was opened and the input ended before its closing delimiter
    UnterminatedBlock { kind: TokenKind, line: usize },
}

impl LexError {
    pub fn line(&self) -> usize {
        match self {
            LexError::UnterminatedBlock { line, .. } => *line,
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedBlock { kind, line } => {
                let what = match kind {
                    TokenKind::Directive => "directive",
                    TokenKind::Expression => "expression",
                    TokenKind::Comment => "comment",
                    TokenKind::Statement | TokenKind::StringContent => "statement",
                };
                write!(f, "Unterminated {} block opened on line {}", what, line)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Byte offset to line number lookup
struct LineIndex {
    newlines: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        LineIndex {
            newlines: source.match_indices('\n').map(|(at, _)| at).collect(),
        }
    }

    fn line_of(&self, offset: usize) -> usize {
        self.newlines.partition_point(|&at| at < offset) + 1
    }
}

/// An open block waiting for its close
struct OpenBlock {
    kind: TokenKind,
    opened_at: usize,
    content_start: usize,
}

/// Tokenize template source text.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut open: Option<OpenBlock> = None;

    let mut lexer = RawToken::lexer(source);
    while let Some(result) = lexer.next() {
        let span = lexer.span();
        // Every character matches a rule; anything logos still rejects is plain text
        let raw = result.unwrap_or(RawToken::Text);

        match open.take() {
            None => {
                if let Some(kind) = raw.opened_kind() {
                    push_text(&mut tokens, source, text_start..span.start, &lines);
                    open = Some(OpenBlock {
                        kind,
                        opened_at: span.start,
                        content_start: span.end,
                    });
                }
            }
            Some(block) => {
                let content_end = match (block.kind, raw) {
                    (TokenKind::Comment, RawToken::CloseComment) => Some(span.start),
                    (TokenKind::Comment, _) => None,
                    (_, RawToken::Close) => Some(span.start),
                    (_, RawToken::CloseComment) => Some(span.start + "--".len()),
                    _ => None,
                };
                match content_end {
                    Some(end) => {
                        push_block(&mut tokens, source, &block, end, &lines);
                        text_start = span.end;
                    }
                    None => open = Some(block),
                }
            }
        }
    }

    if let Some(block) = open {
        return Err(LexError::UnterminatedBlock {
            kind: block.kind,
            line: lines.line_of(block.opened_at),
        });
    }
    push_text(&mut tokens, source, text_start..source.len(), &lines);
    Ok(tokens)
}

fn push_text(tokens: &mut Vec<Token>, source: &str, range: Range<usize>, lines: &LineIndex) {
    if range.is_empty() {
        return;
    }
    let line = lines.line_of(range.start);
    tokens.push(Token::string_content(&source[range], line));
}

fn push_block(
    tokens: &mut Vec<Token>,
    source: &str,
    block: &OpenBlock,
    content_end: usize,
    lines: &LineIndex,
) {
    let raw = &source[block.content_start..content_end];
    let content = match block.kind {
        TokenKind::Comment => raw,
        _ => raw.trim(),
    };
    tokens.push(Token::new(block.kind, content, lines.line_of(block.opened_at)));
}
