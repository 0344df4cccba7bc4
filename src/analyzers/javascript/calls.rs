//! Call reference extraction
//!
//! Collects the distinct bare-identifier callees of a function body. Calls
//! through member expressions (`this.save()`, `arr.map()`) are not call-graph
//! edges. Bodies of nested named functions belong to those functions.

use super::inventory::{is_function_like, resolve_function};
use super::parser::node_text;
use crate::analyzers::ExtractionOptions;
use crate::complexity::builtins::is_builtin;
use std::collections::BTreeSet;
use tree_sitter::Node;

/// Distinct callee names referenced in `body`.
pub fn extract_calls(body: &Node, source: &str, options: &ExtractionOptions) -> BTreeSet<String> {
    let mut calls = BTreeSet::new();
    collect_calls(body, source, options, &mut calls);
    calls
}

fn collect_calls(
    node: &Node,
    source: &str,
    options: &ExtractionOptions,
    calls: &mut BTreeSet<String>,
) {
    let mut cursor = node.walk();

    for child in node.children(&mut cursor) {
        if is_function_like(child.kind()) && resolve_function(&child, source).is_some() {
            continue;
        }

        if child.kind() == "call_expression" {
            if let Some(callee) = child.child_by_field_name("function") {
                if callee.kind() == "identifier" {
                    let name = node_text(&callee, source);
                    if !is_builtin(name) && !options.is_ignored(name) {
                        calls.insert(name.to_string());
                    }
                }
            }
        }

        collect_calls(&child, source, options, calls);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::javascript::parser::parse_source;
    use crate::core::JsLanguageVariant;
    use indoc::indoc;

    fn calls_of_first_function(source: &str, options: &ExtractionOptions) -> Vec<String> {
        let ast = parse_source(source, JsLanguageVariant::JavaScript).unwrap();
        let root = ast.tree.root_node();
        let function = root.named_child(0).unwrap();
        let body = function.child_by_field_name("body").unwrap();
        extract_calls(&body, &ast.source, options)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_collects_distinct_identifier_calls() {
        let calls = calls_of_first_function(
            indoc! {r#"
                function run(items) {
                    prepare(items);
                    const result = transform(prepare(items));
                    return finish(result);
                }
            "#},
            &ExtractionOptions::default(),
        );
        assert_eq!(calls, vec!["finish", "prepare", "transform"]);
    }

    #[test]
    fn test_skips_member_calls_and_builtins() {
        let calls = calls_of_first_function(
            indoc! {r#"
                function run(items) {
                    console.log(items.length);
                    const n = parseInt(Math.floor(2.5));
                    this.save(items);
                    items.map(helper);
                    return new Map(items.map((x) => convert(x)));
                }
            "#},
            &ExtractionOptions::default(),
        );
        assert_eq!(calls, vec!["convert"]);
    }

    #[test]
    fn test_nested_named_function_calls_are_not_attributed() {
        let calls = calls_of_first_function(
            indoc! {r#"
                function outer() {
                    const inner = () => deep();
                    return inner();
                }
            "#},
            &ExtractionOptions::default(),
        );
        assert_eq!(calls, vec!["inner"]);
    }

    #[test]
    fn test_configured_ignores() {
        let options = ExtractionOptions::default().with_ignored_callees(["invariant"]);
        let calls = calls_of_first_function(
            "function f(x) { invariant(x); return g(x); }",
            &options,
        );
        assert_eq!(calls, vec!["g"]);
    }

    #[test]
    fn test_self_call_is_recorded() {
        let calls = calls_of_first_function(
            "function fact(n) { return n <= 1 ? 1 : n * fact(n - 1); }",
            &ExtractionOptions::default(),
        );
        assert_eq!(calls, vec!["fact"]);
    }
}
