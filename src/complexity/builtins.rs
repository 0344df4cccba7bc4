//! Fixed name tables shared by every analysis.
//!
//! These are process-wide immutable constants, so concurrent analyses can
//! consult them without synchronization.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Control-flow keywords that look like calls to a textual matcher (`if (`).
pub const CONTROL_KEYWORDS: &[&str] = &[
    "for", "if", "while", "switch", "return", "new", "console", "class", "super", "function",
    "import", "export", "else", "do", "try", "catch", "finally", "with", "typeof", "void",
    "delete", "await", "yield", "throw", "case",
];

/// Global objects and functions whose calls never resolve to user code.
pub const BUILTIN_GLOBALS: &[&str] = &[
    "Array",
    "ArrayBuffer",
    "BigInt",
    "Boolean",
    "Date",
    "Error",
    "EvalError",
    "Function",
    "Intl",
    "JSON",
    "Map",
    "Math",
    "Number",
    "Object",
    "Promise",
    "Proxy",
    "RangeError",
    "ReferenceError",
    "Reflect",
    "RegExp",
    "Set",
    "String",
    "Symbol",
    "SyntaxError",
    "TypeError",
    "URIError",
    "WeakMap",
    "WeakSet",
    "alert",
    "clearInterval",
    "clearTimeout",
    "decodeURI",
    "decodeURIComponent",
    "document",
    "encodeURI",
    "encodeURIComponent",
    "eval",
    "fetch",
    "globalThis",
    "isFinite",
    "isNaN",
    "parseFloat",
    "parseInt",
    "queueMicrotask",
    "require",
    "setInterval",
    "setTimeout",
    "structuredClone",
    "window",
];

/// Array methods that visit every element once.
pub const ITERATION_METHODS: &[&str] = &[
    "map",
    "forEach",
    "filter",
    "reduce",
    "reduceRight",
    "some",
    "every",
    "find",
    "findIndex",
    "flatMap",
];

/// Methods that sort their receiver.
pub const SORT_METHODS: &[&str] = &["sort", "toSorted"];

/// `Math` functions that only round their single argument.
pub const ROUNDING_FUNCTIONS: &[&str] = &["floor", "ceil", "trunc", "round"];

static CONTROL_KEYWORD_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| CONTROL_KEYWORDS.iter().copied().collect());

static BUILTIN_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    CONTROL_KEYWORDS
        .iter()
        .chain(BUILTIN_GLOBALS.iter())
        .copied()
        .collect()
});

pub fn is_control_keyword(name: &str) -> bool {
    CONTROL_KEYWORD_SET.contains(name)
}

/// Keyword or well-known global: never recorded as a callee.
pub fn is_builtin(name: &str) -> bool {
    BUILTIN_SET.contains(name)
}

pub fn is_iteration_method(name: &str) -> bool {
    ITERATION_METHODS.contains(&name)
}

pub fn is_sort_method(name: &str) -> bool {
    SORT_METHODS.contains(&name)
}

pub fn is_rounding_function(name: &str) -> bool {
    ROUNDING_FUNCTIONS.contains(&name)
}
