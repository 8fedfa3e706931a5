//! Parameter list parsing
//!
//!     `params` and `section` directives carry a parenthesized, comma separated list of
//!     parameters. Each entry is either `<type> <name>` or a bare `<name>`; bare names get
//!     their type later from the [type table](crate::bb::types).
//!
//! Algorithm
//!
//!     1. Collapse every whitespace run (line breaks included) to a single space.
//!     2. Split on commas that are not nested inside `<...>`, so generic types such as
//!        `Map<String, Integer> counts` stay in one entry.
//!     3. Split each entry on its first top-level space into (type, name). An entry with a
//!        single field is name-only.
//!
//!     Empty clauses produce an empty list, and empty entries (`a, , b` or a trailing comma)
//!     are skipped.

use crate::bb::error::CompileError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// A parameter as written in a directive, with the type still optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedParameter {
    pub ty: Option<String>,
    pub name: String,
}

impl ParsedParameter {
    pub fn typed(ty: impl Into<String>, name: impl Into<String>) -> Self {
        ParsedParameter {
            ty: Some(ty.into()),
            name: name.into(),
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        ParsedParameter {
            ty: None,
            name: name.into(),
        }
    }
}

/// A parameter whose type is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: String,
    pub name: String,
}

impl Parameter {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Parameter {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// Parse a parameter clause (without the surrounding parentheses).
pub fn parse_parameter_list(clause: &str) -> Vec<ParsedParameter> {
    let normalized = WHITESPACE.replace_all(clause.trim(), " ");
    if normalized.is_empty() {
        return Vec::new();
    }

    split_top_level(&normalized, ',')
        .into_iter()
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_entry)
        .collect()
}

fn parse_entry(entry: &str) -> ParsedParameter {
    let mut fields = split_top_level(entry, ' ');
    if fields.len() <= 1 {
        return ParsedParameter::bare(entry);
    }
    let ty = fields.remove(0);
    let name_start = ty.len() + 1;
    ParsedParameter::typed(ty, entry[name_start..].trim())
}

/// Split on the separator wherever it is not inside angle brackets. When the separator is
/// a space only the first occurrence splits, so at most two fields come back.
fn split_top_level(text: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        match ch {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&text[start..idx]);
                start = idx + c.len_utf8();
                if separator == ' ' {
                    break;
                }
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Fail on the first name that appears twice in one list.
pub fn ensure_unique_names<'a, I>(names: I, line: usize) -> Result<(), CompileError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    for name in names {
        if !seen.insert(name) {
            return Err(CompileError::DuplicateParameter {
                line,
                name: name.to_string(),
            });
        }
    }
    Ok(())
}

/// `String a, int b`
pub fn declaration_list(params: &[Parameter]) -> String {
    params
        .iter()
        .map(Parameter::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// `a, b`
pub fn argument_list(params: &[Parameter]) -> String {
    params
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
