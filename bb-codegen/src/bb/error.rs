//! Compilation errors
//!
//!     Every error is fatal for the file being compiled: there is no warning channel and no
//!     local recovery, since these are authoring mistakes in the template. Errors carry the
//!     source line of the offending token whenever one exists, and the directive text where
//!     that helps the author find the problem.
//!
//!     The variants fall into four groups:
//!         - Unsupported directive: unknown directive prefix, or a known prefix with a
//!           malformed clause.
//!         - Structural: duplicate extends, misplaced or duplicated params, unterminated or
//!           unmatched sections, duplicate or shadowing parameter names, duplicate sections.
//!         - Resolution: a bare parameter name with no preceding declaration.
//!         - Emission: the output sink refused a write.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Directive text matched none of the known prefixes
    UnsupportedDirective { line: usize, content: String },
    /// Known directive prefix, but the rest of the clause can't be used
    MalformedDirective {
        line: usize,
        content: String,
        reason: String,
    },
    /// Second `extends` in one scope
    DuplicateExtends {
        line: usize,
        first: String,
        second: String,
    },
    /// `params` inside a section
    MisplacedParams { line: usize, section: String },
    /// Second `params`, or `params` in a scope whose parameters are already known
    DuplicateParams { line: usize },
    /// `section` with no matching `end section` before the end of the stream
    UnterminatedSection { line: usize, name: String },
    /// `end section` with no open section
    UnmatchedEndSection { line: usize },
    /// Same parameter name twice in one list
    DuplicateParameter { line: usize, name: String },
    /// Section parameter reusing a parameter name of an enclosing scope
    ShadowedParameter {
        line: usize,
        section: String,
        name: String,
    },
    /// Two sibling sections with the same name
    DuplicateSection { line: usize, name: String },
    /// Bare parameter name with no preceding declaration
    UnresolvedVariable { line: usize, name: String },
    /// The output sink failed while emitting
    Emission(String),
}

impl CompileError {
    /// Source line of the offending token, if the error has one.
    pub fn line(&self) -> Option<usize> {
        match self {
            CompileError::UnsupportedDirective { line, .. }
            | CompileError::MalformedDirective { line, .. }
            | CompileError::DuplicateExtends { line, .. }
            | CompileError::MisplacedParams { line, .. }
            | CompileError::DuplicateParams { line }
            | CompileError::UnterminatedSection { line, .. }
            | CompileError::UnmatchedEndSection { line }
            | CompileError::DuplicateParameter { line, .. }
            | CompileError::ShadowedParameter { line, .. }
            | CompileError::DuplicateSection { line, .. }
            | CompileError::UnresolvedVariable { line, .. } => Some(*line),
            CompileError::Emission(_) => None,
        }
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::UnsupportedDirective { line, content } => {
                write!(f, "Unsupported directive on line {}: {}", line, content)
            }
            CompileError::MalformedDirective {
                line,
                content,
                reason,
            } => write!(
                f,
                "Malformed directive on line {}: {} ({})",
                line, content, reason
            ),
            CompileError::DuplicateExtends {
                line,
                first,
                second,
            } => write!(
                f,
                "Cannot extend 2 classes on line {}: {} and {}",
                line, first, second
            ),
            CompileError::MisplacedParams { line, section } => write!(
                f,
                "Cannot have a params directive inside section '{}' (line {})",
                section, line
            ),
            CompileError::DuplicateParams { line } => {
                write!(f, "Cannot have 2 params directives: on line {}", line)
            }
            CompileError::UnterminatedSection { line, name } => write!(
                f,
                "Section '{}' opened on line {} is never closed with 'end section'",
                name, line
            ),
            CompileError::UnmatchedEndSection { line } => {
                write!(f, "'end section' on line {} has no open section", line)
            }
            CompileError::DuplicateParameter { line, name } => write!(
                f,
                "Parameter '{}' is declared twice on line {}",
                name, line
            ),
            CompileError::ShadowedParameter {
                line,
                section,
                name,
            } => write!(
                f,
                "Parameter '{}' of section '{}' (line {}) shadows a parameter of an enclosing scope",
                name, section, line
            ),
            CompileError::DuplicateSection { line, name } => write!(
                f,
                "Section '{}' on line {} is already defined in this scope",
                name, line
            ),
            CompileError::UnresolvedVariable { line, name } => {
                write!(f, "variable {} not found (line {})", name, line)
            }
            CompileError::Emission(msg) => write!(f, "Emission error: {}", msg),
        }
    }
}

impl std::error::Error for CompileError {}

impl From<fmt::Error> for CompileError {
    fn from(err: fmt::Error) -> Self {
        CompileError::Emission(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_extends_names_both_references() {
        let err = CompileError::DuplicateExtends {
            line: 4,
            first: "Layout".to_string(),
            second: "Page".to_string(),
        };
        let message = err.to_string();

        assert!(message.contains("Layout"));
        assert!(message.contains("Page"));
        assert!(message.contains("line 4"));
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_emission_error_has_no_line() {
        let err = CompileError::from(fmt::Error);
        assert_eq!(err.line(), None);
        assert!(err.to_string().starts_with("Emission error"));
    }
}
