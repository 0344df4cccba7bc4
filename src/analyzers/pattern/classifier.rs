//! Shape collection over masked body text
//!
//! Loop scopes are found with header regexes and closed by bracket matching.
//! Their containment gives the nesting depth; halving, sort and recursion
//! idioms are recognized with regexes on the same text.

use super::scanner::{expression_end, matching_close, skip_whitespace, LineIndex};
use crate::complexity::builtins::is_iteration_method;
use crate::complexity::{
    halving_bounds_loop, Assignment, HalvingStep, LoopNesting, RecursiveArgument, RecursiveCall,
    ShapeFindings,
};
use crate::errors::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static LOOP_HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:for|while)\s*\(").unwrap());
static DO_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bdo\s*\{").unwrap());
static MEMBER_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s*([A-Za-z_$][\w$]*)\s*\(").unwrap());
static SORT_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.\s*(?:sort|toSorted)\s*\(").unwrap());

static COMPOUND_HALVING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_$][\w$]*)\s*(/=|\*=|>>>=|>>=|<<=)\s*(\d+(?:\.\d+)?)").unwrap()
});
static ROUNDED_DIVISION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"([A-Za-z_$][\w$]*)\s*(?::\s*[\w$<>\[\]., ]+?)?\s*=\s*Math\s*\.\s*(?:floor|ceil|trunc|round)\s*\(([^;]*?)/\s*(\d+(?:\.\d+)?)\s*\)",
    )
    .unwrap()
});
static SELF_SCALE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_$][\w$]*)\s*=\s*([A-Za-z_$][\w$]*)\s*(/|\*|>>>|>>|<<)\s*(\d+(?:\.\d+)?)")
        .unwrap()
});
static SHIFTED_MIDPOINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([A-Za-z_$][\w$]*)\s*(?::\s*[\w$<>\[\]., ]+?)?\s*=\s*\([^;()]*\)\s*>>>?\s*\d+")
        .unwrap()
});
static ASSIGNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z_$][\w$]*)\s*=([^=>][^;]*)").unwrap());

static ARG_STEP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_$][\w$]*\s*[-+]\s*\d+(?:\.\d+)?$").unwrap());
static ARG_SCALE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$]*\s*(/|\*|>>>|>>)\s*(\d+(?:\.\d+)?)$").unwrap()
});
static ARG_OPAQUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][\w$]*(?:\s*\??\.\s*[A-Za-z_$][\w$]*|\s*\[[^\]]*\])*$").unwrap()
});
static ARG_ROUNDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^Math\s*\.\s*(?:floor|ceil|trunc|round)\s*\(").unwrap());

/// One function body in its masked forms.
///
/// `code` has comments and string contents blanked, `plain` only comments.
/// Both are slices of the document starting at byte `offset`.
#[derive(Debug, Clone, Copy)]
pub struct BodyText<'a> {
    pub code: &'a str,
    pub plain: &'a str,
    pub offset: usize,
}

/// What decides how many times a loop runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopBound {
    /// The update clause of a three-clause `for`
    Update(usize, usize),
    /// The condition of a `while`, `do..while` or `for` without update
    Condition(usize, usize),
    /// `for..of`/`for..in` and iteration calls walk a collection
    Collection,
}

#[derive(Debug, Clone)]
struct LoopScope {
    line: usize,
    /// Header plus body, where halving steps are looked for.
    own: (usize, usize),
    /// Where scopes nested inside this one start.
    inner: (usize, usize),
    bound: LoopBound,
    halving: bool,
}

impl LoopScope {
    fn contains(&self, offset: usize) -> bool {
        self.inner.0 <= offset && offset < self.inner.1
    }
}

/// Collect the shape findings of one body.
pub fn collect_findings(body: &BodyText, name: &str, lines: &LineIndex) -> Result<ShapeFindings> {
    let mut findings = ShapeFindings::default();
    let line_of = |offset: usize| lines.line(body.offset + offset);

    let mut scopes = loop_scopes(body.code, &line_of);
    mark_halving_loops(body.code, &mut scopes);

    for scope in &scopes {
        let nesting = scopes
            .iter()
            .filter(|outer| outer.contains(scope.own.0) || std::ptr::eq(*outer, scope))
            .fold(LoopNesting::default(), |nesting, outer| {
                nesting.enter(outer.halving)
            });
        findings.record_nesting(nesting);
        if scope.halving {
            findings.halving_loops.push(scope.line);
        }
    }

    findings.sort_calls = SORT_CALL
        .find_iter(body.code)
        .map(|m| line_of(m.start()))
        .collect();

    findings.halving_outside_loops = halving_steps(body.code)
        .into_iter()
        .any(|(offset, _)| {
            !scopes
                .iter()
                .any(|scope| scope.own.0 <= offset && offset < scope.own.1)
        });

    findings.recursive_calls = recursive_calls(body, name, &line_of)?;
    Ok(findings)
}

fn loop_scopes(code: &str, line_of: &impl Fn(usize) -> usize) -> Vec<LoopScope> {
    let mut scopes = Vec::new();
    let mut do_ends = HashSet::new();

    for m in DO_BLOCK.find_iter(code) {
        let brace = m.end() - 1;
        let Some(close) = matching_close(code, brace) else {
            continue;
        };
        do_ends.insert(close);

        let mut own_end = close + 1;
        let mut bound = LoopBound::Collection;
        let after = skip_whitespace(code, close + 1);
        if code[after..].starts_with("while") {
            let paren = skip_whitespace(code, after + "while".len());
            if let Some(cond_close) = matching_close(code, paren) {
                own_end = cond_close + 1;
                bound = LoopBound::Condition(paren + 1, cond_close);
            }
        }
        scopes.push(LoopScope {
            line: line_of(m.start()),
            own: (m.start(), own_end),
            inner: (brace, close + 1),
            bound,
            halving: false,
        });
    }

    for m in LOOP_HEADER.find_iter(code) {
        // The condition of a do-while was covered with its block
        let preceding = code[..m.start()].trim_end();
        if preceding.ends_with('}') && do_ends.contains(&(preceding.len() - 1)) {
            continue;
        }

        let paren = m.end() - 1;
        let Some(header_close) = matching_close(code, paren) else {
            continue;
        };
        let body_start = skip_whitespace(code, header_close + 1);
        let body_end = if code[body_start..].starts_with('{') {
            match matching_close(code, body_start) {
                Some(close) => close + 1,
                None => continue,
            }
        } else {
            expression_end(code, body_start)
        };

        scopes.push(LoopScope {
            line: line_of(m.start()),
            own: (m.start(), body_end),
            inner: (header_close + 1, body_end),
            bound: header_bound(code, paren, header_close),
            halving: false,
        });
    }

    for caps in MEMBER_CALL.captures_iter(code) {
        let (Some(m), Some(method)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if !is_iteration_method(method.as_str()) {
            continue;
        }
        let paren = m.end() - 1;
        if let Some(close) = matching_close(code, paren) {
            scopes.push(LoopScope {
                line: line_of(m.start()),
                own: (paren, close + 1),
                inner: (paren, close + 1),
                bound: LoopBound::Collection,
                halving: false,
            });
        }
    }

    scopes.sort_by_key(|scope| scope.own.0);
    scopes
}

/// How a `for`/`while` header between `open` and `close` bounds its loop.
fn header_bound(code: &str, open: usize, close: usize) -> LoopBound {
    if code[..open].trim_end().ends_with("while") {
        return LoopBound::Condition(open + 1, close);
    }

    let mut separators = Vec::new();
    let mut depth = 0usize;
    for (index, c) in code[open + 1..close].char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ';' if depth == 0 => separators.push(open + 1 + index),
            _ => {}
        }
    }

    match separators.as_slice() {
        [condition_end, update_start] => {
            if code[update_start + 1..close].trim().is_empty() {
                LoopBound::Condition(condition_end + 1, *update_start)
            } else {
                LoopBound::Update(update_start + 1, close)
            }
        }
        _ => LoopBound::Collection,
    }
}

/// A loop halves when it is bounded by a halving step: the update clause of
/// a `for`, or a step in its own body that feeds the loop condition.
fn mark_halving_loops(code: &str, scopes: &mut [LoopScope]) {
    let steps = halving_steps(code);
    let assignments = assignments(code);

    let halving: Vec<bool> = scopes
        .iter()
        .enumerate()
        .map(|(index, scope)| {
            let owned = |offset: usize| {
                scope.own.0 <= offset
                    && offset < scope.own.1
                    && !scopes.iter().enumerate().any(|(other, nested)| {
                        other != index
                            && scope.contains(nested.own.0)
                            && nested.own.0 <= offset
                            && offset < nested.own.1
                    })
            };

            match scope.bound {
                LoopBound::Update(start, end) => steps
                    .iter()
                    .any(|(offset, step)| start <= *offset && *offset < end && !step.midpoint),
                LoopBound::Condition(start, end) => {
                    let own_steps: Vec<HalvingStep> = steps
                        .iter()
                        .filter(|(offset, _)| owned(*offset))
                        .map(|(_, step)| step.clone())
                        .collect();
                    let own_assignments: Vec<Assignment> = assignments
                        .iter()
                        .filter(|(offset, _)| owned(*offset))
                        .map(|(_, assignment)| assignment.clone())
                        .collect();
                    halving_bounds_loop(&code[start..end], &own_steps, &own_assignments)
                }
                LoopBound::Collection => false,
            }
        })
        .collect();

    for (scope, is_halving) in scopes.iter_mut().zip(halving) {
        scope.halving = is_halving;
    }
}

fn parse_constant(text: &str) -> Option<f64> {
    text.parse::<f64>().ok()
}

fn shrinks(operator: &str, constant: &str) -> bool {
    let Some(value) = parse_constant(constant) else {
        return false;
    };
    match operator.trim_end_matches('=') {
        "/" | "*" => value > 1.0,
        _ => value >= 1.0,
    }
}

fn strip_parens(text: &str) -> &str {
    let mut text = text.trim();
    while let Some(inner) = text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        text = inner.trim();
    }
    text
}

/// Halving steps with their offsets: `n /= 2`, `i *= 2`, `n >>= 1`,
/// `n = n / 2`, `n = Math.floor(n / 2)`, and the midpoints
/// `mid = Math.floor((lo + hi) / 2)`, `mid = (lo + hi) >> 1`.
fn halving_steps(code: &str) -> Vec<(usize, HalvingStep)> {
    let mut steps = Vec::new();
    let step = |target: &str, midpoint| HalvingStep {
        target: target.to_string(),
        midpoint,
    };

    for caps in COMPOUND_HALVING.captures_iter(code) {
        let (Some(m), Some(target), Some(op), Some(value)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        if shrinks(op.as_str(), value.as_str()) {
            steps.push((m.start(), step(target.as_str(), false)));
        }
    }

    for caps in ROUNDED_DIVISION.captures_iter(code) {
        let (Some(m), Some(target), Some(numerator), Some(value)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3))
        else {
            continue;
        };
        if parse_constant(value.as_str()).is_some_and(|v| v > 1.0) {
            let midpoint = strip_parens(numerator.as_str()) != target.as_str();
            steps.push((m.start(), step(target.as_str(), midpoint)));
        }
    }

    for caps in SELF_SCALE.captures_iter(code) {
        let (Some(m), Some(target), Some(operand), Some(op), Some(value)) =
            (caps.get(0), caps.get(1), caps.get(2), caps.get(3), caps.get(4))
        else {
            continue;
        };
        if target.as_str() == operand.as_str() && shrinks(op.as_str(), value.as_str()) {
            steps.push((m.start(), step(target.as_str(), false)));
        }
    }

    for caps in SHIFTED_MIDPOINT.captures_iter(code) {
        if let (Some(m), Some(target)) = (caps.get(0), caps.get(1)) {
            steps.push((m.start(), step(target.as_str(), true)));
        }
    }

    steps.sort_by_key(|(offset, _)| *offset);
    steps
}

/// Plain assignments `x = value` with their offsets.
fn assignments(code: &str) -> Vec<(usize, Assignment)> {
    ASSIGNMENT
        .captures_iter(code)
        .filter_map(|caps| {
            let (m, target, value) = (caps.get(0)?, caps.get(1)?, caps.get(2)?);
            Some((
                m.start(),
                Assignment {
                    target: target.as_str().to_string(),
                    value: value.as_str().to_string(),
                },
            ))
        })
        .collect()
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Whether the text before a call site makes it a call of the function itself.
fn is_self_call_prefix(before: &str) -> bool {
    if before.ends_with(is_identifier_char) {
        return false;
    }
    let trimmed = before.trim_end();
    if let Some(receiver) = trimmed.strip_suffix('.') {
        let receiver = receiver.trim_end();
        return receiver
            .strip_suffix("this")
            .is_some_and(|rest| !rest.ends_with(is_identifier_char) && !rest.ends_with('.'));
    }
    // A nested declaration that reuses the name is not a call
    !(trimmed.ends_with("function") || trimmed.ends_with("new"))
}

fn recursive_calls(
    body: &BodyText,
    name: &str,
    line_of: &impl Fn(usize) -> usize,
) -> Result<Vec<RecursiveCall>> {
    let call_site = Regex::new(&format!(r"{}\s*\(", regex::escape(name)))?;
    let mut calls = Vec::new();

    for m in call_site.find_iter(body.code) {
        if !is_self_call_prefix(&body.code[..m.start()]) {
            continue;
        }
        let paren = m.end() - 1;
        let args_end = matching_close(body.code, paren).unwrap_or(body.code.len());
        let first_end = first_argument_end(body.code, paren + 1, args_end);
        let argument_text = body.plain[paren + 1..first_end].trim().to_string();

        calls.push(RecursiveCall {
            line: line_of(m.start()),
            argument: classify_argument(&argument_text),
            argument_text,
        });
    }
    Ok(calls)
}

fn first_argument_end(code: &str, start: usize, end: usize) -> usize {
    let mut depth = 0usize;
    for (offset, byte) in code.as_bytes()[start..end].iter().enumerate() {
        match byte {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => return start + offset,
            _ => {}
        }
    }
    end
}

/// Peel wrapping parentheses and `Math.floor(...)`-style rounding.
fn unwrap_argument(mut text: &str) -> &str {
    loop {
        text = text.trim();
        if text.starts_with('(') && matching_close(text, 0) == Some(text.len() - 1) {
            text = &text[1..text.len() - 1];
            continue;
        }
        if let Some(m) = ARG_ROUNDED.find(text) {
            let paren = m.end() - 1;
            if matching_close(text, paren) == Some(text.len() - 1) {
                text = &text[paren + 1..text.len() - 1];
                continue;
            }
        }
        return text;
    }
}

/// Classify the first argument of a self-recursive call from its text.
pub fn classify_argument(text: &str) -> RecursiveArgument {
    let text = unwrap_argument(text);
    if text.is_empty() {
        return RecursiveArgument::Unrecognized;
    }
    if ARG_STEP.is_match(text) {
        return RecursiveArgument::StepByConstant;
    }
    if let Some(caps) = ARG_SCALE.captures(text) {
        let value = caps.get(2).and_then(|v| parse_constant(v.as_str()));
        let op = caps.get(1).map_or("", |op| op.as_str());
        return match (op, value) {
            ("/" | "*", Some(v)) if v > 1.0 => RecursiveArgument::ScaleByConstant,
            (">>" | ">>>", Some(v)) if v >= 1.0 => RecursiveArgument::ScaleByConstant,
            _ => RecursiveArgument::Unrecognized,
        };
    }
    if ARG_OPAQUE.is_match(text) {
        return RecursiveArgument::Opaque;
    }
    RecursiveArgument::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::pattern::scanner::mask_source;
    use crate::complexity::estimate;
    use crate::core::ComplexityClass;
    use indoc::indoc;

    fn findings(body: &str, name: &str) -> ShapeFindings {
        let masked = mask_source(body);
        let lines = LineIndex::new(body);
        let text = BodyText {
            code: &masked.code_only,
            plain: &masked.without_comments,
            offset: 0,
        };
        collect_findings(&text, name, &lines).unwrap()
    }

    fn class(body: &str, name: &str) -> ComplexityClass {
        estimate(&findings(body, name)).complexity
    }

    #[test]
    fn test_straight_line_code_is_constant() {
        assert_eq!(class("{ const x = a + b; return x * 2; }", "f"), ComplexityClass::Constant);
    }

    #[test]
    fn test_loop_nesting() {
        let body = indoc! {r#"
            {
                for (let i = 0; i < n; i++) {
                    for (let j = 0; j < n; j++) {
                        while (k < n) k++;
                    }
                }
                for (const x of xs) {}
            }
        "#};
        let shape = findings(body, "f");
        assert_eq!(shape.deepest_nesting.linear, 3);
        assert_eq!(estimate(&shape).complexity, ComplexityClass::Cubic);
    }

    #[test]
    fn test_iteration_methods_nest() {
        let body = "{ return rows.map((row) => row.filter((c) => c > 0)); }";
        assert_eq!(class(body, "f"), ComplexityClass::Quadratic);
    }

    #[test]
    fn test_iterated_collection_in_for_header_is_not_nested() {
        let body = "{ for (const x of xs.filter(Boolean)) { total += x; } }";
        assert_eq!(class(body, "f"), ComplexityClass::Linear);
    }

    #[test]
    fn test_do_while() {
        let body = "{ do { i++; } while (i < n); }";
        let shape = findings(body, "f");
        assert_eq!(shape.deepest_nesting.linear, 1);
    }

    #[test]
    fn test_binary_search_loop_is_logarithmic() {
        let body = indoc! {r#"
            {
                let lo = 0, hi = arr.length - 1;
                while (lo <= hi) {
                    const mid = Math.floor((lo + hi) / 2);
                    if (arr[mid] === target) return mid;
                    if (arr[mid] < target) lo = mid + 1; else hi = mid - 1;
                }
                return -1;
            }
        "#};
        let shape = findings(body, "binarySearch");
        assert_eq!(shape.halving_loops, vec![3]);
        assert_eq!(estimate(&shape).complexity, ComplexityClass::Logarithmic);
    }

    #[test]
    fn test_halving_inside_linear_loop_is_linearithmic() {
        let body = indoc! {r#"
            {
                for (let i = 0; i < n; i++) {
                    let j = n;
                    while (j > 1) { j /= 2; }
                }
            }
        "#};
        assert_eq!(class(body, "logInsideLoop"), ComplexityClass::Linearithmic);
    }

    #[test]
    fn test_halving_step_in_nested_loop_does_not_mark_outer() {
        let body = "{ while (a < n) { a++; for (let i = 1; i < n; i *= 2) {} } }";
        let shape = findings(body, "f");
        assert_eq!(shape.halving_loops.len(), 1);
        assert_eq!(estimate(&shape).complexity, ComplexityClass::Linearithmic);
    }

    #[test]
    fn test_scaling_inside_counting_loop_stays_linear() {
        let pow2 = indoc! {r#"
            {
                let result = 1;
                for (let i = 0; i < n; i++) {
                    result *= 2;
                }
                return result;
            }
        "#};
        let shape = findings(pow2, "pow2");
        assert!(shape.halving_loops.is_empty());
        assert_eq!(estimate(&shape).complexity, ComplexityClass::Linear);

        let halves = indoc! {r#"
            {
                const out = [];
                for (let i = 0; i < arr.length; i++) {
                    const h = Math.floor(arr[i] / 2);
                    out.push(h);
                }
                return out;
            }
        "#};
        assert_eq!(class(halves, "halves"), ComplexityClass::Linear);

        let doubling = "{ let i = 0; while (i < n) { total = total * 2; i++; } }";
        assert_eq!(class(doubling, "f"), ComplexityClass::Linear);
    }

    #[test]
    fn test_scaling_inside_nested_counting_loops_stays_quadratic() {
        let body = indoc! {r#"
            {
                for (let i = 0; i < n; i++) {
                    for (let j = 0; j < n; j++) {
                        acc *= 2;
                        const half = Math.floor((i + j) / 2);
                    }
                }
            }
        "#};
        let shape = findings(body, "grid");
        assert!(shape.halving_loops.is_empty());
        assert_eq!(estimate(&shape).complexity, ComplexityClass::Quadratic);
    }

    #[test]
    fn test_loop_bounds_from_headers() {
        let code = "for (let i = 0; i < n; i += 2) while (k > 0) for (const x of xs) for (;;)";
        let open = |from: usize| from + code[from..].find('(').unwrap_or(0);
        let close = |from: usize| matching_close(code, open(from)).unwrap_or(0);

        let first = open(0);
        assert!(matches!(header_bound(code, first, close(0)), LoopBound::Update(..)));

        let at_while = code.find("while").unwrap();
        let LoopBound::Condition(start, end) = header_bound(code, open(at_while), close(at_while))
        else {
            panic!("while headers are bounded by their condition");
        };
        assert_eq!(&code[start..end], "k > 0");

        let at_of = code.find("for (const").unwrap();
        assert_eq!(header_bound(code, open(at_of), close(at_of)), LoopBound::Collection);

        let at_forever = code.find("for (;;)").unwrap();
        assert!(matches!(
            header_bound(code, open(at_forever), close(at_forever)),
            LoopBound::Condition(..)
        ));
    }

    #[test]
    fn test_sort_calls() {
        let shape = findings("{\n  return xs.slice().sort((a, b) => a - b);\n}", "f");
        assert_eq!(shape.sort_calls, vec![2]);
        assert_eq!(estimate(&shape).complexity, ComplexityClass::Linearithmic);
    }

    #[test]
    fn test_commented_and_quoted_loops_are_ignored() {
        let body = "{ // for (;;) {}\n const s = 'while (x) {}'; return s; }";
        assert_eq!(class(body, "f"), ComplexityClass::Constant);
    }

    #[test]
    fn test_recursion_shapes() {
        assert_eq!(
            class("{ return n <= 1 ? 1 : n * fact(n - 1); }", "fact"),
            ComplexityClass::Linear
        );
        assert_eq!(
            class("{ if (n <= 1) return 0; return 1 + halve(Math.floor(n / 2)); }", "halve"),
            ComplexityClass::Logarithmic
        );
        assert_eq!(
            class("{ if (!node) return 0; return 1 + depth(node.next); }", "depth"),
            ComplexityClass::Linear
        );
        assert_eq!(
            class("{ return n < 2 ? n : fib(n - 1) + fib(n - 2); }", "fib"),
            ComplexityClass::Exponential
        );
        assert_eq!(class("{ return again(); }", "again"), ComplexityClass::Exponential);
    }

    #[test]
    fn test_member_calls_with_same_name_are_not_recursion() {
        let shape = findings("{ return other.walk(n - 1) + rewalk(n); }", "walk");
        assert!(shape.recursive_calls.is_empty());

        let shape = findings("{ return this.walk(n - 1); }", "walk");
        assert_eq!(shape.recursive_calls.len(), 1);
        assert_eq!(shape.recursive_calls[0].argument_text, "n - 1");
    }

    #[test]
    fn test_halving_outside_loops_with_recursion() {
        let body = indoc! {r#"
            {
                const mid = Math.floor((lo + hi) / 2);
                if (arr[mid] < target) return search(arr, target, mid + 1, hi);
                return mid;
            }
        "#};
        let shape = findings(body, "search");
        assert!(shape.halving_outside_loops);
        assert_eq!(estimate(&shape).complexity, ComplexityClass::Linear);
    }

    #[test]
    fn test_classify_argument_text() {
        assert_eq!(classify_argument("n - 1"), RecursiveArgument::StepByConstant);
        assert_eq!(classify_argument("(n + 2)"), RecursiveArgument::StepByConstant);
        assert_eq!(classify_argument("n / 2"), RecursiveArgument::ScaleByConstant);
        assert_eq!(classify_argument("n >> 1"), RecursiveArgument::ScaleByConstant);
        assert_eq!(classify_argument("Math.floor(n / 2)"), RecursiveArgument::ScaleByConstant);
        assert_eq!(classify_argument("n / 1"), RecursiveArgument::Unrecognized);
        assert_eq!(classify_argument("node.left"), RecursiveArgument::Opaque);
        assert_eq!(classify_argument("items[i + 1]"), RecursiveArgument::Opaque);
        assert_eq!(classify_argument("n - m"), RecursiveArgument::Unrecognized);
        assert_eq!(classify_argument(""), RecursiveArgument::Unrecognized);
    }
}
