//! thrift-ast-core: Thrift IDL to AST.
//!
//! A backtracking recursive-descent parser over an in-memory source buffer.
//! One call parses one file; following `include`s is left to the caller.
//!
//! # Public API
//!
//! - [`parse()`] / [`parse_with()`] -- source text to [`ThriftAst`]
//! - [`ThriftSyntaxError`] -- the single error a failed parse returns
//! - [`ParseOptions`] -- duplicate field id policy, error excerpt width
//! - [`serialize::to_json`] -- AST to the JSON interchange consumed by
//!   code generators

pub mod ast;
pub mod comments;
pub mod cursor;
pub mod error;
pub mod options;
pub mod parser;
pub mod serialize;

// ── Convenience re-exports ───────────────────────────────────────────

pub use ast::{
    Comments, ContainerKind, Field, Function, Literal, Qualifier, Subject, SubjectKind, ThriftAst,
    TypeRef,
};
pub use error::ThriftSyntaxError;
pub use options::{DuplicateFieldIds, ParseOptions};
pub use parser::{parse, parse_with};
pub use serialize::to_json;
