//! Structural checks on a finished scope tree
//!
//!     Some rules are about the tree as a whole rather than any single token, so they are
//!     checked after generation and before any text exists:
//!
//!         - Sibling sections must have distinct names (they become sibling nested classes),
//!           and no section may share its name with an enclosing scope (Java rejects a
//!           nested class named like one of its enclosing classes).
//!         - A section's parameter names must not reuse a parameter name of any enclosing
//!           scope, the top-level `params` included.
//!
//!     The walk is depth-first in template order, so the first violation reported is the
//!     first one in the source.

use crate::bb::error::CompileError;
use crate::bb::scope::{Scope, Unit};
use std::collections::HashSet;

pub fn validate(unit: &Unit) -> Result<(), CompileError> {
    let mut enclosing = Enclosing::default();
    check_scope(&unit.root, &mut enclosing)
}

/// Names visible from the scope being checked.
#[derive(Default)]
struct Enclosing<'a> {
    scopes: Vec<&'a str>,
    params: Vec<&'a str>,
}

fn check_scope<'a>(scope: &'a Scope, enclosing: &mut Enclosing<'a>) -> Result<(), CompileError> {
    if !scope.is_top_level() {
        if let Some(param) = scope
            .params()
            .iter()
            .find(|param| enclosing.params.contains(&param.name.as_str()))
        {
            return Err(CompileError::ShadowedParameter {
                line: scope.line,
                section: scope.name.clone(),
                name: param.name.clone(),
            });
        }
    }

    let mut siblings = HashSet::new();
    for child in &scope.children {
        let clashes_with_enclosing =
            child.name == scope.name || enclosing.scopes.contains(&child.name.as_str());
        if clashes_with_enclosing || !siblings.insert(child.name.as_str()) {
            return Err(CompileError::DuplicateSection {
                line: child.line,
                name: child.name.clone(),
            });
        }
    }

    let pushed = scope.params().len();
    enclosing.scopes.push(&scope.name);
    enclosing
        .params
        .extend(scope.params().iter().map(|param| param.name.as_str()));
    for child in &scope.children {
        check_scope(child, enclosing)?;
    }
    enclosing.scopes.pop();
    enclosing.params.truncate(enclosing.params.len() - pushed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bb::generator::generate;
    use crate::bb::testing::*;

    fn check(tokens: &[crate::bb::token::Token]) -> Result<(), CompileError> {
        validate(&generate(tokens, "Page")?)
    }

    #[test]
    fn test_section_parameter_shadowing_top_level_params_fails() {
        let tokens = vec![
            dir("params (String name)"),
            stmt("String name = name.trim();"),
            dir_at("section greeting(name)", 3),
            dir("end section"),
        ];
        assert_eq!(
            check(&tokens),
            Err(CompileError::ShadowedParameter {
                line: 3,
                section: "greeting".to_string(),
                name: "name".to_string()
            })
        );
    }

    #[test]
    fn test_nested_section_shadowing_outer_section_fails() {
        let tokens = vec![
            dir("section outer(String title)"),
            dir_at("section inner(String title)", 2),
            dir("end section"),
            dir("end section"),
        ];
        assert!(matches!(
            check(&tokens),
            Err(CompileError::ShadowedParameter { line: 2, .. })
        ));
    }

    #[test]
    fn test_sibling_sections_may_reuse_names() {
        let tokens = vec![
            dir("section first(String title)"),
            dir("end section"),
            dir("section second(String title)"),
            dir("end section"),
        ];
        assert_eq!(check(&tokens), Ok(()));
    }

    #[test]
    fn test_duplicate_sibling_sections_fail() {
        let tokens = vec![
            dir("section body"),
            dir("end section"),
            dir_at("section body", 7),
            dir("end section"),
        ];
        assert_eq!(
            check(&tokens),
            Err(CompileError::DuplicateSection {
                line: 7,
                name: "body".to_string()
            })
        );
    }

    #[test]
    fn test_section_named_like_an_enclosing_scope_fails() {
        let tokens = vec![
            dir("section body"),
            dir_at("section body", 2),
            dir("end section"),
            dir("end section"),
        ];
        assert_eq!(
            check(&tokens),
            Err(CompileError::DuplicateSection {
                line: 2,
                name: "body".to_string()
            })
        );
    }

    #[test]
    fn test_section_named_like_the_template_fails() {
        let tokens = vec![dir_at("section Page", 4), dir("end section")];
        assert!(matches!(
            check(&tokens),
            Err(CompileError::DuplicateSection { line: 4, .. })
        ));
    }

    #[test]
    fn test_same_section_name_in_different_branches_is_allowed() {
        let tokens = vec![
            dir("section left"),
            dir("section item"),
            dir("end section"),
            dir("end section"),
            dir("section right"),
            dir("section item"),
            dir("end section"),
            dir("end section"),
        ];
        assert_eq!(check(&tokens), Ok(()));
    }
}
