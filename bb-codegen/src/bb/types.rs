//! Name to type table
//!
//!     Sections may list their parameters by name only (`section greeting(name)`), relying
//!     on a declaration written earlier in the template (`<% String name = "X"; %>`). The
//!     type table recovers those types from the statements consumed so far.
//!
//!     The table is fed one statement at a time, in consumption order, as the generator
//!     advances its cursor. That includes statements consumed inside nested sections, so a
//!     lookup after a section returns sees everything the section consumed.
//!
//! Matching
//!
//!     A statement is split into whitespace separated words. Every word after the first is a
//!     candidate name: its key is the word up to its first `;` (`name;` declares `name`), and
//!     the word right before it is the type. Later entries overwrite earlier ones, so a lookup
//!     returns the nearest preceding declaration, and within one statement the last matching
//!     word.
//!
//!     This is textual inference, not parsing. It only works when the declaration precedes the
//!     use, and phrasing that puts something other than the type before the name (`x = y`)
//!     records a nonsense type for that name. Such entries are harmless until looked up.

use crate::bb::error::CompileError;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    types: HashMap<String, String>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every declaration-shaped word pair of a consumed statement.
    pub fn record_statement(&mut self, statement: &str) {
        let words: Vec<&str> = statement.split_whitespace().collect();
        for pair in words.windows(2) {
            let (ty, word) = (pair[0], pair[1]);
            let name = match word.find(';') {
                Some(end) => &word[..end],
                None => word,
            };
            if !name.is_empty() {
                self.types.insert(name.to_string(), ty.to_string());
            }
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.types.get(name).map(String::as_str)
    }

    /// Look a name up, failing with a resolution error naming the line that needed it.
    pub fn resolve(&self, name: &str, line: usize) -> Result<String, CompileError> {
        self.lookup(name)
            .map(str::to_string)
            .ok_or_else(|| CompileError::UnresolvedVariable {
                line,
                name: name.to_string(),
            })
    }
}
