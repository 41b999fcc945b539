use anyhow::Result;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::model::Model;

/// good_lp backend used for a solve
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SolverKind {
    /// Pure Rust simplex, continuous models only
    #[default]
    Minilp,
    /// COIN-OR branch and cut, needs the `cbc` feature
    Cbc,
}

impl SolverKind {
    pub fn supports_integers(&self) -> bool {
        matches!(self, SolverKind::Cbc)
    }
}

/// Objective value and the `(var, value)` result table of a solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveOutcome {
    pub objective: f64,
    /// In variable registration order
    pub results: Vec<(String, f64)>,
}

impl SolveOutcome {
    pub fn value(&self, var: &str) -> Option<f64> {
        self.results
            .iter()
            .find(|(name, _)| name == var)
            .map(|(_, value)| *value)
    }
}

pub trait ModelSolver {
    fn solve(&self, model: &Model) -> Result<SolveOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_solver_kind_names() {
        assert_eq!(SolverKind::from_str("CBC").unwrap(), SolverKind::Cbc);
        assert_eq!(SolverKind::Minilp.to_string(), "minilp");
        assert!(!SolverKind::default().supports_integers());
    }
}
