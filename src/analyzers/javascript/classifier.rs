//! Syntactic shape collection for the local classifier
//!
//! Walks one function body and records loop nesting, sort calls, halving
//! idioms and self-recursive call sites into [`ShapeFindings`]. The rules
//! that turn findings into a complexity class live in
//! [`crate::complexity::local`].

use super::inventory::{is_function_like, resolve_function};
use super::parser::{node_line, node_text};
use crate::complexity::builtins::{is_iteration_method, is_rounding_function, is_sort_method};
use crate::complexity::{
    halving_bounds_loop, Assignment, HalvingStep, LoopNesting, RecursiveArgument, RecursiveCall,
    ShapeFindings,
};
use tree_sitter::Node;

fn is_loop(kind: &str) -> bool {
    matches!(
        kind,
        "for_statement" | "for_in_statement" | "while_statement" | "do_statement"
    )
}

/// Collect the shape of `body`, treating calls to `name` as self-recursion.
pub fn collect_findings(body: &Node, name: &str, source: &str) -> ShapeFindings {
    let mut walker = ShapeWalker {
        name,
        source,
        findings: ShapeFindings::default(),
    };
    walker.visit_children(body, LoopNesting::default());
    walker.findings
}

struct ShapeWalker<'a> {
    name: &'a str,
    source: &'a str,
    findings: ShapeFindings,
}

impl ShapeWalker<'_> {
    fn visit_children(&mut self, node: &Node, nesting: LoopNesting) {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            self.visit(&child, nesting);
        }
    }

    fn visit(&mut self, node: &Node, nesting: LoopNesting) {
        let kind = node.kind();

        if kind == "comment" {
            return;
        }
        // Named nested functions are analyzed as their own records
        if is_function_like(kind) && resolve_function(node, self.source).is_some() {
            return;
        }
        if is_loop(kind) {
            self.visit_loop(node, nesting);
            return;
        }
        if kind == "call_expression" && self.visit_call(node, nesting) {
            return;
        }
        if nesting.is_empty() && halving_step(node, self.source).is_some() {
            self.findings.halving_outside_loops = true;
        }

        self.visit_children(node, nesting);
    }

    fn visit_loop(&mut self, node: &Node, nesting: LoopNesting) {
        let halving = loop_is_halving(node, self.source);
        if halving {
            self.findings.halving_loops.push(node_line(node));
        }

        let inner = nesting.enter(halving);
        self.findings.record_nesting(inner);

        // The iterated collection of for..in/of is evaluated once
        let iterated = if node.kind() == "for_in_statement" {
            node.child_by_field_name("right")
        } else {
            None
        };

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            let level = if Some(child) == iterated { nesting } else { inner };
            self.visit(&child, level);
        }
    }

    /// Returns true when the call's children were already visited.
    fn visit_call(&mut self, node: &Node, nesting: LoopNesting) -> bool {
        let Some(callee) = node.child_by_field_name("function") else {
            return false;
        };

        match callee.kind() {
            "identifier" => {
                if node_text(&callee, self.source) == self.name {
                    self.record_recursive_call(node);
                }
                false
            }
            "member_expression" => {
                let Some(property) = callee.child_by_field_name("property") else {
                    return false;
                };
                let method = node_text(&property, self.source);

                let on_this = callee
                    .child_by_field_name("object")
                    .is_some_and(|object| object.kind() == "this");
                if on_this && method == self.name {
                    self.record_recursive_call(node);
                }

                if is_sort_method(method) {
                    self.findings.sort_calls.push(node_line(node));
                }

                if is_iteration_method(method) {
                    let inner = nesting.enter_linear();
                    self.findings.record_nesting(inner);
                    // Receiver chain runs at the current level, callbacks one deeper
                    self.visit(&callee, nesting);
                    if let Some(arguments) = node.child_by_field_name("arguments") {
                        self.visit_children(&arguments, inner);
                    }
                    return true;
                }
                false
            }
            _ => false,
        }
    }

    fn record_recursive_call(&mut self, call: &Node) {
        let first = call
            .child_by_field_name("arguments")
            .and_then(|arguments| first_argument(&arguments));

        self.findings.recursive_calls.push(RecursiveCall {
            line: node_line(call),
            argument: classify_argument(first, self.source),
            argument_text: first
                .map(|arg| node_text(&arg, self.source).to_string())
                .unwrap_or_default(),
        });
    }
}

fn first_argument<'tree>(arguments: &Node<'tree>) -> Option<Node<'tree>> {
    let mut cursor = arguments.walk();
    let first = arguments
        .named_children(&mut cursor)
        .find(|child| child.kind() != "comment");
    first
}

/// Shape of the first argument passed at a self-recursive call site.
pub fn classify_argument(argument: Option<Node>, source: &str) -> RecursiveArgument {
    let Some(argument) = argument else {
        return RecursiveArgument::Unrecognized;
    };
    let argument = unwrap_expression(argument, source);

    match argument.kind() {
        "identifier" | "member_expression" | "subscript_expression" => RecursiveArgument::Opaque,
        "binary_expression" => {
            let Some((left, operator, constant)) = binary_with_constant(&argument, source) else {
                return RecursiveArgument::Unrecognized;
            };
            if left.kind() != "identifier" {
                return RecursiveArgument::Unrecognized;
            }
            match operator {
                "-" | "+" => RecursiveArgument::StepByConstant,
                "/" | "*" if constant > 1.0 => RecursiveArgument::ScaleByConstant,
                ">>" | ">>>" if constant >= 1.0 => RecursiveArgument::ScaleByConstant,
                _ => RecursiveArgument::Unrecognized,
            }
        }
        _ => RecursiveArgument::Unrecognized,
    }
}

/// Peel parentheses and single-argument `Math.floor`-style rounding.
fn unwrap_expression<'tree>(node: Node<'tree>, source: &str) -> Node<'tree> {
    let mut current = node;
    loop {
        let next = match current.kind() {
            "parenthesized_expression" => current.named_child(0),
            "call_expression" => rounded_argument(&current, source),
            _ => None,
        };
        match next {
            Some(inner) => current = inner,
            None => return current,
        }
    }
}

/// The argument of `Math.floor(x)` (or ceil/trunc/round).
fn rounded_argument<'tree>(call: &Node<'tree>, source: &str) -> Option<Node<'tree>> {
    let callee = call.child_by_field_name("function")?;
    if callee.kind() != "member_expression" {
        return None;
    }
    let object = callee.child_by_field_name("object")?;
    let property = callee.child_by_field_name("property")?;
    if node_text(&object, source) != "Math" || !is_rounding_function(node_text(&property, source))
    {
        return None;
    }
    let arguments = call.child_by_field_name("arguments")?;
    if arguments.named_child_count() != 1 {
        return None;
    }
    arguments.named_child(0)
}

/// `(left, operator, constant)` for a binary expression whose right operand
/// is a numeric literal.
fn binary_with_constant<'tree, 's>(
    node: &Node<'tree>,
    source: &'s str,
) -> Option<(Node<'tree>, &'s str, f64)> {
    let left = node.child_by_field_name("left")?;
    let operator = node.child_by_field_name("operator")?;
    let right = node.child_by_field_name("right")?;
    let constant = number_value(&unwrap_expression(right, source), source)?;
    Some((
        unwrap_expression(left, source),
        node_text(&operator, source),
        constant,
    ))
}

fn number_value(node: &Node, source: &str) -> Option<f64> {
    if node.kind() != "number" {
        return None;
    }
    let text = node_text(node, source).replace('_', "");
    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return u64::from_str_radix(hex, 16).ok().map(|v| v as f64);
    }
    text.parse::<f64>().ok()
}

fn is_shrinking_operator(operator: &str, constant: f64) -> bool {
    match operator {
        "/" | "*" => constant > 1.0,
        ">>" | ">>>" | "<<" => constant >= 1.0,
        _ => false,
    }
}

/// Numerator of a rounded division by a constant, `Math.floor(x / 2)`.
fn rounded_division<'tree>(node: Node<'tree>, source: &str) -> Option<Node<'tree>> {
    let inner = unwrap_expression(rounded_argument(&node, source)?, source);
    if inner.kind() != "binary_expression" {
        return None;
    }
    let (numerator, operator, constant) = binary_with_constant(&inner, source)?;
    (operator == "/" && constant > 1.0).then_some(numerator)
}

/// A halving step when `value` is written to `target`.
///
/// `n = Math.floor(n / 2)` and `j = j * 2` scale the target itself;
/// `mid = Math.floor((lo + hi) / 2)` and `mid = (lo + hi) >> 1` are midpoints.
fn halving_value(target: &str, value: Node, source: &str) -> Option<HalvingStep> {
    let step = |midpoint| HalvingStep {
        target: target.to_string(),
        midpoint,
    };

    if let Some(numerator) = rounded_division(value, source) {
        return Some(step(node_text(&numerator, source) != target));
    }
    let value = unwrap_expression(value, source);
    if value.kind() != "binary_expression" {
        return None;
    }
    let (left, operator, constant) = binary_with_constant(&value, source)?;
    if node_text(&left, source) == target && is_shrinking_operator(operator, constant) {
        return Some(step(false));
    }
    (matches!(operator, ">>" | ">>>") && constant >= 1.0).then(|| step(true))
}

/// A statement-level step that halves or doubles a value.
fn halving_step(node: &Node, source: &str) -> Option<HalvingStep> {
    match node.kind() {
        // n /= 2, i *= 2, n >>= 1
        "augmented_assignment_expression" => {
            let target = node.child_by_field_name("left")?;
            let operator = node.child_by_field_name("operator")?;
            let right = node.child_by_field_name("right")?;
            let constant = number_value(&unwrap_expression(right, source), source)?;
            let operator = node_text(&operator, source).trim_end_matches('=');
            is_shrinking_operator(operator, constant).then(|| HalvingStep {
                target: node_text(&target, source).to_string(),
                midpoint: false,
            })
        }
        "assignment_expression" => {
            let target = node.child_by_field_name("left")?;
            let value = node.child_by_field_name("right")?;
            halving_value(node_text(&target, source), value, source)
        }
        "variable_declarator" => {
            let target = node.child_by_field_name("name")?;
            let value = node.child_by_field_name("value")?;
            halving_value(node_text(&target, source), value, source)
        }
        _ => None,
    }
}

/// Whether a loop is bounded by halving or doubling.
///
/// A `for` with an update clause is judged by that clause alone, so
/// `for (...; i++)` stays linear whatever its body computes. Other loops
/// need a halving step that feeds their condition.
fn loop_is_halving(node: &Node, source: &str) -> bool {
    let condition = match node.kind() {
        "for_statement" => {
            if let Some(update) = node.child_by_field_name("increment") {
                let mut steps = Vec::new();
                collect_loop_writes(&update, source, &mut steps, &mut Vec::new());
                return steps.iter().any(|step| !step.midpoint);
            }
            node.child_by_field_name("condition")
        }
        "while_statement" | "do_statement" => node.child_by_field_name("condition"),
        _ => None,
    };
    let Some(condition) = condition else {
        return false;
    };

    let mut steps = Vec::new();
    let mut assignments = Vec::new();
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_loop_writes(&child, source, &mut steps, &mut assignments);
    }
    halving_bounds_loop(node_text(&condition, source), &steps, &assignments)
}

/// Halving steps and plain assignments of a loop's own body (nested loops
/// and named functions excluded).
fn collect_loop_writes(
    node: &Node,
    source: &str,
    steps: &mut Vec<HalvingStep>,
    assignments: &mut Vec<Assignment>,
) {
    let kind = node.kind();
    if is_loop(kind) || (is_function_like(kind) && resolve_function(node, source).is_some()) {
        return;
    }
    if let Some(step) = halving_step(node, source) {
        steps.push(step);
    }
    if kind == "assignment_expression" {
        if let (Some(target), Some(value)) = (
            node.child_by_field_name("left"),
            node.child_by_field_name("right"),
        ) {
            assignments.push(Assignment {
                target: node_text(&target, source).to_string(),
                value: node_text(&value, source).to_string(),
            });
        }
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect_loop_writes(&child, source, steps, assignments);
    }
}
