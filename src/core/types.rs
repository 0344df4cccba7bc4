//! Function inventory and result types
//!
//! Core data structures shared by the extraction strategies, the local
//! classifier and the call-graph propagator.

use super::lattice::ComplexityClass;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Where a declaration begins in the document (1-based line and column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    pub line: usize,
    pub column: usize,
}

impl SourcePosition {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Syntactic form a function was declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    /// Regular function declaration: `function foo() {}`
    Declaration,
    /// Generator function: `function* foo() {}`
    Generator,
    /// Function expression: `const foo = function() {}`
    Expression,
    /// Arrow function: `const foo = () => {}`
    Arrow,
    /// Object or class method: `{ foo() {} }`
    Method,
    /// Getter: `get foo() {}`
    Getter,
    /// Setter: `set foo(v) {}`
    Setter,
}

/// One statically discovered function-like unit.
///
/// Identity is `(name, position)`; two records may share a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionRecord {
    pub name: String,
    pub position: SourcePosition,
    pub kind: FunctionKind,
    /// Function body with comments stripped.
    pub body: String,
    /// Distinct bare-identifier callee names referenced in the body.
    pub calls: BTreeSet<String>,
    /// Estimate from the function's own shape, fixed after classification.
    pub local_complexity: ComplexityClass,
    /// Current estimate; only ever raised by propagation.
    pub complexity: ComplexityClass,
    /// Human-readable justification, append-only.
    pub evidence: Vec<String>,
}

impl FunctionRecord {
    pub fn new(
        name: impl Into<String>,
        position: SourcePosition,
        kind: FunctionKind,
        body: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            position,
            kind,
            body: body.into(),
            calls: BTreeSet::new(),
            local_complexity: ComplexityClass::BOTTOM,
            complexity: ComplexityClass::BOTTOM,
            evidence: Vec::new(),
        }
    }

    /// Install the local estimate; the current complexity starts from it.
    pub fn with_local_estimate(
        mut self,
        complexity: ComplexityClass,
        evidence: Vec<String>,
    ) -> Self {
        self.local_complexity = complexity;
        self.complexity = complexity;
        self.evidence = evidence;
        self
    }

    pub fn with_calls(mut self, calls: BTreeSet<String>) -> Self {
        self.calls = calls;
        self
    }

    /// Deduplication key used when several matchers find the same declaration.
    pub fn dedup_key(&self) -> (String, usize) {
        (self.name.clone(), self.position.line)
    }

    pub fn to_result(&self) -> FunctionResult {
        FunctionResult {
            name: self.name.clone(),
            position: self.position,
            kind: self.kind,
            complexity: self.complexity,
            calls: self.calls.iter().cloned().collect(),
            evidence: self.evidence.clone(),
        }
    }
}

/// Reported outcome for one function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionResult {
    pub name: String,
    pub position: SourcePosition,
    pub kind: FunctionKind,
    pub complexity: ComplexityClass,
    pub calls: Vec<String>,
    pub evidence: Vec<String>,
}
