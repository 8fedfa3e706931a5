//! Main module for bb template compilation

pub mod directive;
pub mod emitter;
pub mod error;
pub mod generator;
pub mod lexing;
pub mod loader;
pub mod naming;
pub mod params;
pub mod scope;
pub mod token;
pub mod types;
pub mod validate;

#[cfg(test)]
pub(crate) mod testing;

use emitter::{EmitOptions, UnitName};
use error::CompileError;
use token::Token;

/// Compile a token stream into Java source for one compilation unit.
///
/// Runs generation, structural validation and emission in order, failing on the first error.
/// Identical inputs always produce byte-identical output.
pub fn compile(
    tokens: &[Token],
    name: &UnitName,
    options: &EmitOptions,
) -> Result<String, CompileError> {
    let unit = generator::generate(tokens, &name.class_name)?;
    validate::validate(&unit)?;
    emitter::emit(&unit, name, options)
}
