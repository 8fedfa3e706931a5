//! Recursive scope generator
//!
//!     The generator walks the token stream exactly once and builds the [Unit] scope tree.
//!     A `section` directive opens a child scope by recursing; the matching `end section`
//!     returns from that call. All calls share one [GenerationState] through a mutable borrow:
//!     the cursor, the nesting depth, the file-level import list, and the type table.
//!
//! Shared Cursor
//!
//!     Because the cursor lives in the shared state rather than in each call, a child scope
//!     leaves it wherever its `end section` was, and the parent carries on from there. The
//!     type table is fed at the same moment the cursor passes a statement, so after a
//!     section returns, the parent's lookups see the statements the section consumed too.
//!     The cursor only ever moves forward.
//!
//! Token Handling
//!
//!     STRING_CONTENT   literal instruction (escaping is the emitter's job)
//!     STATEMENT        verbatim instruction, and recorded in the type table
//!     EXPRESSION       null-safe text rendering instruction
//!     COMMENT          dropped
//!     DIRECTIVE        classified, then:
//!         import       appended to the file-level import list, whatever the depth
//!         extends      sets this scope's superclass, at most once per scope
//!         params       top-level only, at most once, resolves and sets the parameters
//!         include      delegation instruction, arguments forwarded verbatim
//!         section      depth + 1, recurse, attach the child, add a call instruction
//!         end section  returns from the current section; an error at the top level
//!
//!     Reaching the end of the stream inside a section is an unterminated-section error.

use crate::bb::directive::{classify, Directive};
use crate::bb::error::CompileError;
use crate::bb::params::{ensure_unique_names, Parameter, ParsedParameter};
use crate::bb::scope::{Instruction, Scope, ScopeKind, Unit};
use crate::bb::token::{Token, TokenKind};
use crate::bb::types::TypeTable;

/// Build the scope tree for one template. `name` becomes the top-level scope's name.
pub fn generate(tokens: &[Token], name: &str) -> Result<Unit, CompileError> {
    let mut state = GenerationState::new(tokens);
    let root = state.generate_scope(Scope::new(name, ScopeKind::TopLevel, 0))?;
    tracing::debug!(
        unit = name,
        tokens = tokens.len(),
        sections = root.children.len(),
        imports = state.imports.len(),
        "generated scope tree"
    );
    Ok(Unit {
        imports: state.imports,
        root,
    })
}

/// Mutable state shared by every recursive call of one compilation.
#[derive(Debug)]
pub struct GenerationState<'a> {
    tokens: &'a [Token],
    cursor: usize,
    depth: usize,
    types: TypeTable,
    imports: Vec<String>,
}

impl<'a> GenerationState<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        GenerationState {
            tokens,
            cursor: 0,
            depth: 0,
            types: TypeTable::new(),
            imports: Vec::new(),
        }
    }

    fn next_token(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.cursor)?;
        self.cursor += 1;
        Some(token)
    }

    /// Consume tokens into `scope` until its `end section` (or the end of the stream for the
    /// top-level scope).
    pub fn generate_scope(&mut self, mut scope: Scope) -> Result<Scope, CompileError> {
        while let Some(token) = self.next_token() {
            match token.kind {
                TokenKind::StringContent => {
                    scope.body.push(Instruction::Literal(token.content.clone()));
                }
                TokenKind::Statement => {
                    self.types.record_statement(&token.content);
                    scope
                        .body
                        .push(Instruction::Statement(token.content.clone()));
                }
                TokenKind::Expression => {
                    scope
                        .body
                        .push(Instruction::Expression(token.content.clone()));
                }
                TokenKind::Comment => {}
                TokenKind::Directive => {
                    let directive = classify(&token.content, token.line)?;
                    if let Directive::EndSection = directive {
                        if self.depth == 0 {
                            return Err(CompileError::UnmatchedEndSection { line: token.line });
                        }
                        tracing::debug!(section = %scope.name, depth = self.depth, line = token.line, "closing section");
                        return Ok(scope);
                    }
                    self.apply_directive(&mut scope, directive, token.line)?;
                }
            }
        }

        if self.depth > 0 {
            return Err(CompileError::UnterminatedSection {
                line: scope.line,
                name: scope.name,
            });
        }
        Ok(scope)
    }

    fn apply_directive(
        &mut self,
        scope: &mut Scope,
        directive: Directive,
        line: usize,
    ) -> Result<(), CompileError> {
        match directive {
            Directive::Import { symbol } => {
                tracing::debug!(%symbol, line, "import");
                self.imports.push(symbol);
            }
            Directive::Extends { superclass } => match &scope.superclass {
                Some(first) => {
                    return Err(CompileError::DuplicateExtends {
                        line,
                        first: first.clone(),
                        second: superclass,
                    });
                }
                None => scope.superclass = Some(superclass),
            },
            Directive::Params { params } => {
                if self.depth > 0 {
                    return Err(CompileError::MisplacedParams {
                        line,
                        section: scope.name.clone(),
                    });
                }
                if scope.params.is_some() {
                    return Err(CompileError::DuplicateParams { line });
                }
                scope.params = Some(self.resolve_params(params, line)?);
            }
            Directive::Include { template, args } => {
                tracing::debug!(%template, args = args.as_deref().unwrap_or(""), line, "include");
                scope.body.push(Instruction::Include { template, args });
            }
            Directive::Section { name, params } => {
                let params = params
                    .map(|params| self.resolve_params(params, line))
                    .transpose()?;
                let args = params
                    .iter()
                    .flatten()
                    .map(|param| param.name.clone())
                    .collect();

                let mut child = Scope::new(name.clone(), ScopeKind::Section, line);
                child.params = params;

                self.depth += 1;
                tracing::debug!(section = %name, depth = self.depth, line, "opening section");
                let child = self.generate_scope(child)?;
                self.depth -= 1;

                scope.children.push(child);
                scope
                    .body
                    .push(Instruction::RenderSection { name, args });
            }
            Directive::EndSection => unreachable!("end section is handled by generate_scope"),
        }
        Ok(())
    }

    /// Check names are unique, then give every bare name the type the table knows for it.
    fn resolve_params(
        &self,
        params: Vec<ParsedParameter>,
        line: usize,
    ) -> Result<Vec<Parameter>, CompileError> {
        ensure_unique_names(params.iter().map(|p| p.name.as_str()), line)?;
        params
            .into_iter()
            .map(|param| -> Result<Parameter, CompileError> {
                let ty = match param.ty {
                    Some(ty) => ty,
                    None => self.types.resolve(&param.name, line)?,
                };
                Ok(Parameter::new(ty, param.name))
            })
            .collect()
    }
}
