//! Token types consumed by the generator
//!
//!     The generator never looks at template text directly. It walks a flat sequence of typed
//!     tokens, each carrying its content and the 1-based source line it started on. Any lexer
//!     that produces this shape can drive code generation; [lexing](crate::bb::lexing) is the
//!     one shipped with the crate.
//!
//!     Directive content is expected to be de-delimited and trimmed (`import java.util.*`, not
//!     `<%@ import java.util.* %>`). Statement content is kept as written, since it ends up
//!     verbatim in the generated method body and the type table reads declarations out of it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five token categories a template is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenKind {
    /// Literal text copied to the output
    StringContent,
    /// Host-language statement embedded verbatim
    Statement,
    /// Host-language expression whose value is rendered as text
    Expression,
    /// Template comment, dropped
    Comment,
    /// Structural instruction (import, extends, params, include, section, end section)
    Directive,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::StringContent => "STRING_CONTENT",
            TokenKind::Statement => "STATEMENT",
            TokenKind::Expression => "EXPRESSION",
            TokenKind::Comment => "COMMENT",
            TokenKind::Directive => "DIRECTIVE",
        };
        f.write_str(name)
    }
}

/// One token of the stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    /// 1-based line of the token's first character
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, line: usize) -> Self {
        Token {
            kind,
            content: content.into(),
            line,
        }
    }

    pub fn string_content(content: impl Into<String>, line: usize) -> Self {
        Self::new(TokenKind::StringContent, content, line)
    }

    pub fn statement(content: impl Into<String>, line: usize) -> Self {
        Self::new(TokenKind::Statement, content, line)
    }

    pub fn expression(content: impl Into<String>, line: usize) -> Self {
        Self::new(TokenKind::Expression, content, line)
    }

    pub fn comment(content: impl Into<String>, line: usize) -> Self {
        Self::new(TokenKind::Comment, content, line)
    }

    pub fn directive(content: impl Into<String>, line: usize) -> Self {
        Self::new(TokenKind::Directive, content, line)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}: {:?}", self.kind, self.line, self.content)
    }
}
