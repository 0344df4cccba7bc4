//! Local pattern classification rules
//!
//! Extraction front-ends (syntax tree or text patterns) walk a function body
//! and record what they saw in [`ShapeFindings`]. [`estimate`] turns those
//! findings into a local estimate using one fixed precedence:
//!
//! 1. loop and iteration-call nesting
//! 2. sort calls
//! 3. halving idioms
//! 4. self-recursion
//!
//! Every step raises the estimate with `join`; none can lower it.

use crate::core::ComplexityClass;

/// Nesting of loop scopes along one path through a body.
///
/// A halving loop (binary search, `i *= 2`) contributes a logarithmic factor
/// instead of a linear level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoopNesting {
    pub linear: u32,
    pub logarithmic: u32,
}

impl LoopNesting {
    pub fn enter_linear(self) -> Self {
        Self {
            linear: self.linear + 1,
            ..self
        }
    }

    pub fn enter_logarithmic(self) -> Self {
        Self {
            logarithmic: self.logarithmic + 1,
            ..self
        }
    }

    pub fn enter(self, halving: bool) -> Self {
        if halving {
            self.enter_logarithmic()
        } else {
            self.enter_linear()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.linear == 0 && self.logarithmic == 0
    }

    /// Map the nesting to a class. Logarithmic factors only refine the
    /// lowest levels; `n^2 log n` has no class of its own and stays `O(n^2)`.
    pub fn complexity(&self) -> ComplexityClass {
        match (self.linear, self.logarithmic) {
            (0, 0) => ComplexityClass::Constant,
            (0, _) => ComplexityClass::Logarithmic,
            (1, 0) => ComplexityClass::Linear,
            (1, _) => ComplexityClass::Linearithmic,
            (2, _) => ComplexityClass::Quadratic,
            _ => ComplexityClass::Cubic,
        }
    }

    /// Keep whichever nesting maps to the greater class.
    pub fn deepest(self, other: LoopNesting) -> LoopNesting {
        let (a, b) = (self.complexity(), other.complexity());
        if b > a || (b == a && other.linear + other.logarithmic > self.linear + self.logarithmic)
        {
            other
        } else {
            self
        }
    }
}

/// A statement that halves or doubles a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HalvingStep {
    /// Variable written by the step.
    pub target: String,
    /// `mid = Math.floor((lo + hi) / 2)`: the written value is derived from
    /// other variables instead of scaling the target itself.
    pub midpoint: bool,
}

/// An assignment `target = value` inside a loop body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: String,
    pub value: String,
}

/// Whether `text` contains `name` as a whole identifier.
pub fn mentions_identifier(text: &str, name: &str) -> bool {
    !name.is_empty()
        && text
            .split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
            .any(|word| word == name)
}

/// Whether halving steps in a loop's own body bound the loop.
///
/// A scaling step counts when it writes a variable the condition reads. A
/// midpoint counts when it flows into such a variable (`lo = mid + 1`).
/// Loops with an update clause are judged by that clause alone and never
/// reach this rule.
pub fn halving_bounds_loop(
    condition: &str,
    steps: &[HalvingStep],
    assignments: &[Assignment],
) -> bool {
    steps.iter().any(|step| {
        if step.midpoint {
            assignments.iter().any(|assignment| {
                mentions_identifier(condition, &assignment.target)
                    && mentions_identifier(&assignment.value, &step.target)
            })
        } else {
            mentions_identifier(condition, &step.target)
        }
    })
}

/// Shape of the first argument at a self-recursive call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecursiveArgument {
    /// `n - 1`, `n + 2`
    StepByConstant,
    /// `n / 2`, `n * 3`, `n >> 1`
    ScaleByConstant,
    /// `n`, `node.left`, `items[i]`
    Opaque,
    /// Anything else, including a missing argument
    Unrecognized,
}

impl RecursiveArgument {
    pub fn complexity(self) -> ComplexityClass {
        match self {
            RecursiveArgument::StepByConstant => ComplexityClass::Linear,
            RecursiveArgument::ScaleByConstant => ComplexityClass::Logarithmic,
            RecursiveArgument::Opaque => ComplexityClass::Linear,
            RecursiveArgument::Unrecognized => ComplexityClass::Exponential,
        }
    }

    fn describe(self) -> &'static str {
        match self {
            RecursiveArgument::StepByConstant => "steps its argument by a constant",
            RecursiveArgument::ScaleByConstant => "divides its argument by a constant",
            RecursiveArgument::Opaque => "passes a variable or property",
            RecursiveArgument::Unrecognized => "passes an unrecognized argument",
        }
    }
}

/// One self-recursive call site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursiveCall {
    pub line: usize,
    pub argument: RecursiveArgument,
    /// Source text of the first argument (empty when there is none).
    pub argument_text: String,
}

/// What a front-end observed in one function body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShapeFindings {
    /// Deepest loop nesting reached anywhere in the body.
    pub deepest_nesting: LoopNesting,
    /// Lines of loops recognized as halving loops.
    pub halving_loops: Vec<usize>,
    /// Lines of sort calls.
    pub sort_calls: Vec<usize>,
    /// A halving expression appeared outside every loop.
    pub halving_outside_loops: bool,
    /// Self-recursive call sites in document order.
    pub recursive_calls: Vec<RecursiveCall>,
}

impl ShapeFindings {
    pub fn record_nesting(&mut self, nesting: LoopNesting) {
        self.deepest_nesting = self.deepest_nesting.deepest(nesting);
    }
}

/// A local estimate with its justification.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocalEstimate {
    pub complexity: ComplexityClass,
    pub evidence: Vec<String>,
}

impl LocalEstimate {
    /// Join `class` into the estimate and note why.
    pub fn raise(&mut self, class: ComplexityClass, reason: impl Into<String>) {
        self.complexity = self.complexity.join(class);
        self.evidence.push(reason.into());
    }
}

/// Apply the classification rules to a body's findings.
pub fn estimate(findings: &ShapeFindings) -> LocalEstimate {
    let mut estimate = LocalEstimate::default();

    let nesting = findings.deepest_nesting;
    if !nesting.is_empty() {
        let reason = if nesting.logarithmic == 0 {
            format!("loop nesting depth {}", nesting.linear)
        } else {
            format!(
                "loop nesting depth {} with {} halving loop level(s)",
                nesting.linear, nesting.logarithmic
            )
        };
        estimate.raise(nesting.complexity(), reason);
    }
    for line in &findings.halving_loops {
        estimate
            .evidence
            .push(format!("halving loop at line {}", line));
    }

    if let Some(line) = findings.sort_calls.first() {
        estimate.raise(
            ComplexityClass::Linearithmic,
            format!("sort call at line {}", line),
        );
    }

    let recursive = !findings.recursive_calls.is_empty();
    if findings.halving_outside_loops && recursive {
        estimate.raise(
            ComplexityClass::Logarithmic,
            "halving expression bounds the recursion",
        );
    }

    match findings.recursive_calls.as_slice() {
        [] => {}
        [call] => {
            let reason = if call.argument_text.is_empty() {
                format!(
                    "single self-recursive call at line {} {}",
                    call.line,
                    call.argument.describe()
                )
            } else {
                format!(
                    "single self-recursive call at line {} {} (`{}`)",
                    call.line,
                    call.argument.describe(),
                    call.argument_text
                )
            };
            estimate.raise(call.argument.complexity(), reason);
        }
        calls => {
            estimate.raise(
                ComplexityClass::Exponential,
                format!("{} self-recursive call sites (branching recursion)", calls.len()),
            );
        }
    }

    estimate
}
