//! Complexity classes and their join-semilattice
//!
//! The classes form a fixed total order from `O(1)` up to `O(n!)`. `join` is
//! the lattice's least upper bound, which for a total order is simply `max`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asymptotic time complexity class, ordered from cheapest to most expensive.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum ComplexityClass {
    #[default]
    #[serde(rename = "O(1)")]
    Constant,
    #[serde(rename = "O(log n)")]
    Logarithmic,
    #[serde(rename = "O(n)")]
    Linear,
    #[serde(rename = "O(n log n)")]
    Linearithmic,
    #[serde(rename = "O(n^2)")]
    Quadratic,
    #[serde(rename = "O(n^3)")]
    Cubic,
    #[serde(rename = "O(2^n)")]
    Exponential,
    #[serde(rename = "O(n!)")]
    Factorial,
}

impl ComplexityClass {
    /// Every class in ascending order.
    pub const ALL: [ComplexityClass; 8] = [
        ComplexityClass::Constant,
        ComplexityClass::Logarithmic,
        ComplexityClass::Linear,
        ComplexityClass::Linearithmic,
        ComplexityClass::Quadratic,
        ComplexityClass::Cubic,
        ComplexityClass::Exponential,
        ComplexityClass::Factorial,
    ];

    /// Number of levels in the lattice.
    pub const HEIGHT: usize = Self::ALL.len();

    /// Identity element of `join`.
    pub const BOTTOM: ComplexityClass = ComplexityClass::Constant;

    pub const TOP: ComplexityClass = ComplexityClass::Factorial;

    /// Least upper bound of two classes.
    pub fn join(self, other: ComplexityClass) -> ComplexityClass {
        self.max(other)
    }

    /// Fold any number of classes with `join`, starting from the bottom element.
    pub fn join_all<I>(classes: I) -> ComplexityClass
    where
        I: IntoIterator<Item = ComplexityClass>,
    {
        classes.into_iter().fold(Self::BOTTOM, Self::join)
    }

    /// Position of this class in the order (0 for `O(1)`).
    pub fn rank(self) -> usize {
        self as usize
    }

    /// Fixed display string, e.g. `O(n log n)`.
    pub fn as_str(self) -> &'static str {
        match self {
            ComplexityClass::Constant => "O(1)",
            ComplexityClass::Logarithmic => "O(log n)",
            ComplexityClass::Linear => "O(n)",
            ComplexityClass::Linearithmic => "O(n log n)",
            ComplexityClass::Quadratic => "O(n^2)",
            ComplexityClass::Cubic => "O(n^3)",
            ComplexityClass::Exponential => "O(2^n)",
            ComplexityClass::Factorial => "O(n!)",
        }
    }
}

impl fmt::Display for ComplexityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplexityClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.as_str().replace(' ', "") == normalized)
            .ok_or_else(|| format!("unknown complexity class: {}", s))
    }
}
