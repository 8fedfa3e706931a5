//! Scope tree produced by the generator
//!
//!     A compilation unit is a tree: the implicit top-level scope at the root, one child per
//!     `section`, nested as deep as the template nests them. Each scope records what its
//!     render body does as a list of [Instruction]s, in template order. Nothing here is text
//!     yet; the [emitter](crate::bb::emitter) decides how each node is spelled in Java.

use crate::bb::params::Parameter;

/// Whether a scope is the file's top-level class or a section nested inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    TopLevel,
    Section,
}

/// One step of a scope's render body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Literal text, unescaped
    Literal(String),
    /// Host statement, copied verbatim
    Statement(String),
    /// Host expression rendered through the null-safe text helper
    Expression(String),
    /// Delegation to another template's buffer entry point
    Include {
        template: String,
        args: Option<String>,
    },
    /// Call into a nested section, forwarding its parameters by name
    RenderSection { name: String, args: Vec<String> },
}

impl Instruction {
    /// True when the instruction calls `buffer.append` itself, which can throw `IOException`.
    ///
    /// Includes and section calls go through `renderInto`, which declares no checked
    /// exception, so they don't count.
    pub fn writes_output(&self) -> bool {
        matches!(self, Instruction::Literal(_) | Instruction::Expression(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub name: String,
    pub kind: ScopeKind,
    /// Line of the opening `section` directive; 0 for the top-level scope
    pub line: usize,
    /// Superclass set by an `extends` directive in this scope
    pub superclass: Option<String>,
    /// Resolved parameters; `None` means the no-argument entry points
    pub params: Option<Vec<Parameter>>,
    pub body: Vec<Instruction>,
    pub children: Vec<Scope>,
}

impl Scope {
    pub fn new(name: impl Into<String>, kind: ScopeKind, line: usize) -> Self {
        Scope {
            name: name.into(),
            kind,
            line,
            superclass: None,
            params: None,
            body: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn is_top_level(&self) -> bool {
        self.kind == ScopeKind::TopLevel
    }

    pub fn params(&self) -> &[Parameter] {
        self.params.as_deref().unwrap_or(&[])
    }

    pub fn writes_output(&self) -> bool {
        self.body.iter().any(Instruction::writes_output)
    }

    /// Depth-first search by section name.
    pub fn find(&self, name: &str) -> Option<&Scope> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(name))
    }
}

/// Everything generated for one template file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unit {
    /// Symbols from `import` directives, in order of appearance
    pub imports: Vec<String>,
    pub root: Scope,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_only_body_does_not_write() {
        let mut scope = Scope::new("Page", ScopeKind::TopLevel, 0);
        scope.body.push(Instruction::Statement("int x = 1;".to_string()));
        assert!(!scope.writes_output());

        scope.body.push(Instruction::Expression("x".to_string()));
        assert!(scope.writes_output());
    }

    #[test]
    fn test_delegation_only_body_does_not_write() {
        let mut scope = Scope::new("Page", ScopeKind::TopLevel, 0);
        scope.body.push(Instruction::Include {
            template: "other".to_string(),
            args: None,
        });
        scope.body.push(Instruction::RenderSection {
            name: "footer".to_string(),
            args: vec![],
        });
        assert!(!scope.writes_output());

        scope.body.push(Instruction::Literal("x".to_string()));
        assert!(scope.writes_output());
    }

    #[test]
    fn test_find_nested_scope() {
        let mut root = Scope::new("Page", ScopeKind::TopLevel, 0);
        let mut outer = Scope::new("outer", ScopeKind::Section, 2);
        outer
            .children
            .push(Scope::new("inner", ScopeKind::Section, 3));
        root.children.push(outer);

        assert_eq!(root.find("inner").map(|s| s.line), Some(3));
        assert!(root.find("missing").is_none());
    }
}
