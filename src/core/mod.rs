//! Core data model: the complexity lattice, parsed documents and function records.

pub mod ast;
pub mod lattice;
pub mod types;

pub use ast::{JsAst, JsLanguageVariant};
pub use lattice::ComplexityClass;
pub use types::{FunctionKind, FunctionRecord, FunctionResult, SourcePosition};
