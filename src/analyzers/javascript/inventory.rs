//! Function inventory for TypeScript/JavaScript
//!
//! Walks the tree-sitter AST in document order and records every function-like
//! node that has a name we can reference it by. Nested functions are recorded
//! as their own entries; anonymous ones (callbacks, IIFEs) are dropped.

use super::calls::extract_calls;
use super::classifier::collect_findings;
use super::parser::{node_position, node_text, text_without_comments};
use crate::analyzers::ExtractionOptions;
use crate::complexity::estimate;
use crate::core::{FunctionKind, FunctionRecord, JsAst, SourcePosition};
use tree_sitter::Node;

/// A function-like node together with the name callers use for it.
#[derive(Debug, Clone)]
pub struct NamedFunction<'tree> {
    pub name: String,
    pub kind: FunctionKind,
    /// Where the declaration begins (the binding for bound expressions).
    pub position: SourcePosition,
    pub body: Node<'tree>,
}

/// Whether a node kind introduces a function body.
pub fn is_function_like(kind: &str) -> bool {
    matches!(
        kind,
        "function_declaration"
            | "generator_function_declaration"
            | "function_expression"
            | "function"
            | "generator_function"
            | "arrow_function"
            | "method_definition"
    )
}

/// Resolve the name and kind of a function-like node.
///
/// Returns `None` for nodes that are not function-like, have no body, or have
/// no derivable name.
pub fn resolve_function<'tree>(node: &Node<'tree>, source: &str) -> Option<NamedFunction<'tree>> {
    let body = node.child_by_field_name("body")?;

    match node.kind() {
        "function_declaration" => named_declaration(node, body, source, FunctionKind::Declaration),
        "generator_function_declaration" => {
            named_declaration(node, body, source, FunctionKind::Generator)
        }
        "method_definition" => {
            let name_node = node.child_by_field_name("name")?;
            if name_node.kind() == "computed_property_name" {
                return None;
            }
            Some(NamedFunction {
                name: node_text(&name_node, source).to_string(),
                kind: method_kind(node),
                position: node_position(node),
                body,
            })
        }
        "function_expression" | "function" | "generator_function" | "arrow_function" => {
            let kind = match node.kind() {
                "arrow_function" => FunctionKind::Arrow,
                "generator_function" => FunctionKind::Generator,
                _ => FunctionKind::Expression,
            };
            if let Some((name, anchor)) = binding_name(node, source) {
                return Some(NamedFunction {
                    name,
                    kind,
                    position: node_position(&anchor),
                    body,
                });
            }
            // Named function expression used without a binding: `function walk() {}`
            node.child_by_field_name("name").map(|name_node| NamedFunction {
                name: node_text(&name_node, source).to_string(),
                kind,
                position: node_position(node),
                body,
            })
        }
        _ => None,
    }
}

fn named_declaration<'tree>(
    node: &Node<'tree>,
    body: Node<'tree>,
    source: &str,
    kind: FunctionKind,
) -> Option<NamedFunction<'tree>> {
    let name_node = node.child_by_field_name("name")?;
    Some(NamedFunction {
        name: node_text(&name_node, source).to_string(),
        kind,
        position: node_position(node),
        body,
    })
}

fn method_kind(node: &Node) -> FunctionKind {
    let mut cursor = node.walk();
    let kind = node
        .children(&mut cursor)
        .find_map(|child| match child.kind() {
            "get" => Some(FunctionKind::Getter),
            "set" => Some(FunctionKind::Setter),
            _ => None,
        })
        .unwrap_or(FunctionKind::Method);
    kind
}

/// Name a function expression receives from the construct it is bound by.
fn binding_name<'tree>(node: &Node<'tree>, source: &str) -> Option<(String, Node<'tree>)> {
    let parent = node.parent()?;
    let is_field = |field: &str| parent.child_by_field_name(field) == Some(*node);

    let target = match parent.kind() {
        // const foo = () => {}
        "variable_declarator" if is_field("value") => parent.child_by_field_name("name")?,
        // foo = function() {} / obj.foo = () => {}
        "assignment_expression" if is_field("right") => parent.child_by_field_name("left")?,
        // { foo: () => {} }
        "pair" if is_field("value") => parent.child_by_field_name("key")?,
        // class C { foo = () => {} }
        "field_definition" | "public_field_definition" if is_field("value") => parent
            .child_by_field_name("property")
            .or_else(|| parent.child_by_field_name("name"))?,
        _ => return None,
    };

    let name = match target.kind() {
        "identifier" | "property_identifier" | "private_property_identifier" | "number" => {
            node_text(&target, source).to_string()
        }
        "member_expression" => {
            let property = target.child_by_field_name("property")?;
            node_text(&property, source).to_string()
        }
        "string" => node_text(&target, source)
            .trim_matches(|c| c == '"' || c == '\'' || c == '`')
            .to_string(),
        // Destructuring patterns and computed keys have no single name
        _ => return None,
    };

    if name.is_empty() {
        None
    } else {
        Some((name, parent))
    }
}

/// Build the classified inventory for a parsed document.
pub fn extract_inventory(ast: &JsAst, options: &ExtractionOptions) -> Vec<FunctionRecord> {
    let mut records = Vec::new();
    collect_functions(&ast.tree.root_node(), &ast.source, options, &mut records);
    records
}

fn collect_functions(
    node: &Node,
    source: &str,
    options: &ExtractionOptions,
    records: &mut Vec<FunctionRecord>,
) {
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        if is_function_like(child.kind()) {
            // No partial results for a construct that did not parse
            if child.has_error() {
                continue;
            }
            if let Some(function) = resolve_function(&child, source) {
                records.push(build_record(&function, source, options));
            }
        }
        collect_functions(&child, source, options, records);
    }
}

fn build_record(
    function: &NamedFunction,
    source: &str,
    options: &ExtractionOptions,
) -> FunctionRecord {
    let findings = collect_findings(&function.body, &function.name, source);
    let local = estimate(&findings);
    let calls = extract_calls(&function.body, source, options);

    FunctionRecord::new(
        function.name.clone(),
        function.position,
        function.kind,
        text_without_comments(&function.body, source),
    )
    .with_calls(calls)
    .with_local_estimate(local.complexity, local.evidence)
}
