//! Token factories for unit tests

use crate::bb::token::Token;

pub fn lit(content: &str) -> Token {
    Token::string_content(content, 1)
}

pub fn stmt(content: &str) -> Token {
    Token::statement(content, 1)
}

pub fn expr(content: &str) -> Token {
    Token::expression(content, 1)
}

pub fn comment(content: &str) -> Token {
    Token::comment(content, 1)
}

pub fn dir(content: &str) -> Token {
    Token::directive(content, 1)
}

pub fn dir_at(content: &str, line: usize) -> Token {
    Token::directive(content, line)
}
