//! # bb-codegen
//!
//! Compiles bb templates into Java classes exposing `render` entry points.
//!
//! File Layout
//!
//! Everything lives under [bb]. The compiler is a short chain of stages, each in its own
//! module, and each usable on its own:
//!
//! src/bb
//!   ├── lexing      Template text -> token stream (replaceable; the core only sees tokens)
//!   ├── directive   Directive text -> tagged Directive
//!   ├── params      Parameter clauses -> ordered (type?, name) pairs
//!   ├── types       Name -> type table fed by consumed statements
//!   ├── generator   Token stream -> scope tree (the recursive core)
//!   ├── validate    Structural checks over the finished scope tree
//!   ├── emitter     Scope tree -> Java source
//!   ├── naming      Template paths -> package / class names / output paths
//!   └── loader      Convenience front door tying the stages together
//!
//! The contract between stages is plain data ([bb::token::Token], [bb::scope::Unit]), so a
//! different lexer can feed the generator without touching anything downstream.

pub mod bb;

pub use bb::error::CompileError;
pub use bb::loader::TemplateLoader;
