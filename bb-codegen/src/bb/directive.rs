//! Directive classification
//!
//!     Directive tokens carry trimmed text such as `section greeting(name)`. Classification
//!     turns that text into a [Directive] variant holding the already-extracted fields, so the
//!     generator can `match` exhaustively instead of re-probing strings.
//!
//! Grammar
//!
//!     import <symbol>
//!     extends <superclass-reference>
//!     params (<type name>, <type name>, ...)
//!     include <name>            | include <name>(<args>)
//!     section <name>            | section <name>(<type name | name>, ...)
//!     end section
//!
//!     Keywords are case sensitive and tried in the order above; the first keyword the text
//!     starts with wins. A keyword only counts when followed by whitespace, `(`, or the end of
//!     the text, so `importer` is not an import. `end section` must match exactly (after
//!     trimming).
//!
//!     `include x()` and `section x()` behave exactly like `include x` and `section x`.

use crate::bb::error::CompileError;
use crate::bb::params::{parse_parameter_list, ParsedParameter};
use std::fmt;

/// The six directive kinds, without their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectiveKind {
    Import,
    Extends,
    Params,
    Include,
    Section,
    EndSection,
}

impl fmt::Display for DirectiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DirectiveKind::Import => "import",
            DirectiveKind::Extends => "extends",
            DirectiveKind::Params => "params",
            DirectiveKind::Include => "include",
            DirectiveKind::Section => "section",
            DirectiveKind::EndSection => "end section",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// File-level import of `symbol`
    Import { symbol: String },
    /// Superclass for the current scope, injected verbatim
    Extends { superclass: String },
    /// Parameter list of the top-level scope
    Params { params: Vec<ParsedParameter> },
    /// Delegation to another template; `args` is forwarded verbatim
    Include {
        template: String,
        args: Option<String>,
    },
    /// Opens a nested scope
    Section {
        name: String,
        params: Option<Vec<ParsedParameter>>,
    },
    /// Closes the innermost open section
    EndSection,
}

impl Directive {
    pub fn kind(&self) -> DirectiveKind {
        match self {
            Directive::Import { .. } => DirectiveKind::Import,
            Directive::Extends { .. } => DirectiveKind::Extends,
            Directive::Params { .. } => DirectiveKind::Params,
            Directive::Include { .. } => DirectiveKind::Include,
            Directive::Section { .. } => DirectiveKind::Section,
            Directive::EndSection => DirectiveKind::EndSection,
        }
    }
}

const KEYWORDS: &[(&str, DirectiveKind)] = &[
    ("import", DirectiveKind::Import),
    ("extends", DirectiveKind::Extends),
    ("params", DirectiveKind::Params),
    ("include", DirectiveKind::Include),
    ("section", DirectiveKind::Section),
];

/// Classify directive text and extract its fields.
pub fn classify(content: &str, line: usize) -> Result<Directive, CompileError> {
    let content = content.trim();
    if content == "end section" {
        return Ok(Directive::EndSection);
    }

    let (kind, rest) = KEYWORDS
        .iter()
        .find_map(|(keyword, kind)| strip_keyword(content, keyword).map(|rest| (*kind, rest)))
        .ok_or_else(|| CompileError::UnsupportedDirective {
            line,
            content: content.to_string(),
        })?;
    let rest = rest.trim();
    let malformed = |reason: &str| CompileError::MalformedDirective {
        line,
        content: content.to_string(),
        reason: reason.to_string(),
    };

    match kind {
        DirectiveKind::Import => {
            let symbol = rest.trim_end_matches(';').trim_end();
            if symbol.is_empty() {
                return Err(malformed("import needs a symbol"));
            }
            Ok(Directive::Import {
                symbol: symbol.to_string(),
            })
        }
        DirectiveKind::Extends => {
            if rest.is_empty() {
                return Err(malformed("extends needs a superclass"));
            }
            Ok(Directive::Extends {
                superclass: rest.to_string(),
            })
        }
        DirectiveKind::Params => {
            let clause = rest
                .strip_prefix('(')
                .ok_or_else(|| malformed("params list must start with '('"))?;
            let clause = strip_closing_paren(clause).ok_or_else(|| malformed("missing ')'"))?;
            Ok(Directive::Params {
                params: parse_parameter_list(clause),
            })
        }
        DirectiveKind::Include => {
            let (template, clause) = split_name(rest).map_err(|reason| malformed(reason))?;
            let args = clause
                .map(str::trim)
                .filter(|args| !args.is_empty())
                .map(str::to_string);
            Ok(Directive::Include { template, args })
        }
        DirectiveKind::Section => {
            let (name, clause) = split_name(rest).map_err(|reason| malformed(reason))?;
            let params = clause
                .map(parse_parameter_list)
                .filter(|params| !params.is_empty());
            Ok(Directive::Section { name, params })
        }
        DirectiveKind::EndSection => unreachable!("end section is matched before keywords"),
    }
}

fn strip_keyword<'a>(content: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = content.strip_prefix(keyword)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() || c == '(' => Some(rest),
        Some(_) => None,
    }
}

fn strip_closing_paren(clause: &str) -> Option<&str> {
    clause.trim_end().strip_suffix(')')
}

/// Split `name(clause)` into the name and the clause between the parentheses.
fn split_name(rest: &str) -> Result<(String, Option<&str>), &'static str> {
    let (name, clause) = match rest.split_once('(') {
        Some((name, clause)) => {
            let clause = strip_closing_paren(clause).ok_or("missing ')'")?;
            (name.trim(), Some(clause))
        }
        None => (rest, None),
    };
    if name.is_empty() {
        return Err("missing name");
    }
    if name.contains(char::is_whitespace) {
        return Err("name must be a single word");
    }
    Ok((name.to_string(), clause))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("import java.util.*", DirectiveKind::Import)]
    #[case("extends bb.sparkjava.BBSparkTemplate", DirectiveKind::Extends)]
    #[case("params (String name)", DirectiveKind::Params)]
    #[case("params(String name)", DirectiveKind::Params)]
    #[case("include header", DirectiveKind::Include)]
    #[case("include header(1, 2)", DirectiveKind::Include)]
    #[case("section body", DirectiveKind::Section)]
    #[case("section body(String title)", DirectiveKind::Section)]
    #[case("end section", DirectiveKind::EndSection)]
    #[case("  end section  ", DirectiveKind::EndSection)]
    fn test_classifies_by_prefix(#[case] content: &str, #[case] expected: DirectiveKind) {
        assert_eq!(classify(content, 1).unwrap().kind(), expected);
    }

    #[rstest]
    #[case("layout main")]
    #[case("importer foo")]
    #[case("end  section")]
    #[case("End section")]
    #[case("")]
    fn test_unsupported(#[case] content: &str) {
        let err = classify(content, 42).unwrap_err();
        assert_eq!(
            err,
            CompileError::UnsupportedDirective {
                line: 42,
                content: content.trim().to_string()
            }
        );
    }

    #[test]
    fn test_import_symbol() {
        assert_eq!(
            classify("import java.util.*;", 1).unwrap(),
            Directive::Import {
                symbol: "java.util.*".to_string()
            }
        );
    }

    #[test]
    fn test_extends_is_verbatim() {
        assert_eq!(
            classify("extends  Base<String>", 1).unwrap(),
            Directive::Extends {
                superclass: "Base<String>".to_string()
            }
        );
    }

    #[test]
    fn test_params_list() {
        assert_eq!(
            classify("params (String name, int count)", 1).unwrap(),
            Directive::Params {
                params: vec![
                    ParsedParameter::typed("String", "name"),
                    ParsedParameter::typed("int", "count"),
                ]
            }
        );
    }

    #[test]
    fn test_params_without_parenthesis_is_malformed() {
        let err = classify("params String name", 3).unwrap_err();
        assert!(matches!(err, CompileError::MalformedDirective { line: 3, .. }));
    }

    #[rstest]
    #[case("include other", None)]
    #[case("include other()", None)]
    #[case("include other( )", None)]
    #[case("include other(1,2)", Some("1,2"))]
    #[case("include other (a, \"b\")", Some("a, \"b\""))]
    fn test_include_arguments(#[case] content: &str, #[case] args: Option<&str>) {
        assert_eq!(
            classify(content, 1).unwrap(),
            Directive::Include {
                template: "other".to_string(),
                args: args.map(str::to_string),
            }
        );
    }

    #[test]
    fn test_section_with_parameters() {
        assert_eq!(
            classify("section greeting(name, int times)", 1).unwrap(),
            Directive::Section {
                name: "greeting".to_string(),
                params: Some(vec![
                    ParsedParameter::bare("name"),
                    ParsedParameter::typed("int", "times"),
                ]),
            }
        );
    }

    #[test]
    fn test_section_with_empty_parentheses_has_no_parameters() {
        assert_eq!(
            classify("section footer()", 1).unwrap(),
            Directive::Section {
                name: "footer".to_string(),
                params: None,
            }
        );
    }

    #[rstest]
    #[case("section")]
    #[case("section (String a)")]
    #[case("section my section")]
    #[case("include other(1, 2")]
    #[case("import")]
    #[case("extends")]
    fn test_malformed(#[case] content: &str) {
        let err = classify(content, 5).unwrap_err();
        assert!(
            matches!(err, CompileError::MalformedDirective { line: 5, .. }),
            "{content:?} gave {err:?}"
        );
    }
}
