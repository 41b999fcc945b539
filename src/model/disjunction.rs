//! Mutually exclusive constraint blocks.
//!
//! Each disjunct of a disjunction gets a binary indicator and the indicators
//! must sum to one. The constraints of a disjunct are relaxed with big-M
//! terms derived from the variable bounds, so they only bind when the
//! indicator is set. A disjunction with a single disjunct is added as plain
//! constraints.

use tracing::debug;

use super::builder::{Constraint, ModelBuilder, Sense, VarDef};
use super::expr::{LinExpr, VarId};
use crate::error::ModelError;

/// One alternative of a disjunction
#[derive(Debug, Clone, PartialEq)]
pub struct Disjunct {
    pub name: String,
    pub constraints: Vec<Constraint>,
}

impl Disjunct {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    /// Add a constraint that binds only when this disjunct is selected
    pub fn with(
        mut self,
        name: &str,
        lhs: impl Into<LinExpr>,
        sense: Sense,
        rhs: impl Into<LinExpr>,
    ) -> Self {
        let name = format!("{}.{}", self.name, name);
        self.constraints.push(Constraint::new(name, lhs, sense, rhs));
        self
    }
}

/// What was registered for a disjunction
#[derive(Debug, Clone, PartialEq)]
pub struct DisjunctionRecord {
    pub name: String,
    pub disjuncts: Vec<String>,
    /// One binary per disjunct; empty when the only disjunct is unconditional
    pub indicators: Vec<VarId>,
}

impl ModelBuilder {
    /// Require exactly one of `disjuncts` to hold.
    ///
    /// Returns the indicator variables in disjunct order.
    pub fn add_disjunction(
        &mut self,
        name: &str,
        disjuncts: Vec<Disjunct>,
    ) -> Result<Vec<VarId>, ModelError> {
        if disjuncts.is_empty() {
            return Err(ModelError::EmptyDisjunction(name.to_string()));
        }

        let names = disjuncts.iter().map(|d| d.name.clone()).collect();
        if disjuncts.len() == 1 {
            for disjunct in disjuncts {
                for constraint in disjunct.constraints {
                    self.push_constraint(constraint)?;
                }
            }
            self.push_disjunction(DisjunctionRecord {
                name: name.to_string(),
                disjuncts: names,
                indicators: Vec::new(),
            });
            return Ok(Vec::new());
        }

        let mut indicators = Vec::with_capacity(disjuncts.len());
        for disjunct in disjuncts {
            let y = self.add_var(disjunct.name.as_str(), VarDef::binary())?;
            for constraint in disjunct.constraints {
                self.add_relaxed(&disjunct.name, constraint, y)?;
            }
            indicators.push(y);
        }

        let selected: LinExpr = indicators.iter().copied().sum();
        self.constrain(format!("{name}.exactly_one"), selected, Sense::Eq, 1.0)?;
        debug!(disjunction = name, disjuncts = indicators.len(), "registered disjunction");

        self.push_disjunction(DisjunctionRecord {
            name: name.to_string(),
            disjuncts: names,
            indicators: indicators.clone(),
        });
        Ok(indicators)
    }

    fn add_relaxed(
        &mut self,
        disjunct: &str,
        constraint: Constraint,
        indicator: VarId,
    ) -> Result<(), ModelError> {
        let Constraint {
            name,
            lhs,
            sense,
            rhs,
        } = constraint;

        match sense {
            Sense::Le => self.add_relaxed_le(disjunct, name, lhs, rhs, indicator),
            Sense::Ge => self.add_relaxed_ge(disjunct, name, lhs, rhs, indicator),
            Sense::Eq => {
                self.add_relaxed_le(disjunct, format!("{name}_le"), lhs.clone(), rhs, indicator)?;
                self.add_relaxed_ge(disjunct, format!("{name}_ge"), lhs, rhs, indicator)
            }
        }
    }

    // lhs <= rhs + M (1 - y)
    fn add_relaxed_le(
        &mut self,
        disjunct: &str,
        name: String,
        lhs: LinExpr,
        rhs: f64,
        indicator: VarId,
    ) -> Result<(), ModelError> {
        let (_, hi) = self.model().expr_bounds(&lhs);
        if !hi.is_finite() {
            return Err(ModelError::UnboundedDisjunct(disjunct.to_string()));
        }
        let big_m = (hi - rhs).max(0.0);
        self.constrain(name, lhs + big_m * indicator, Sense::Le, rhs + big_m)
    }

    // lhs >= rhs - M (1 - y)
    fn add_relaxed_ge(
        &mut self,
        disjunct: &str,
        name: String,
        lhs: LinExpr,
        rhs: f64,
        indicator: VarId,
    ) -> Result<(), ModelError> {
        let (lo, _) = self.model().expr_bounds(&lhs);
        if !lo.is_finite() {
            return Err(ModelError::UnboundedDisjunct(disjunct.to_string()));
        }
        let big_m = (rhs - lo).max(0.0);
        self.constrain(name, lhs - big_m * indicator, Sense::Ge, rhs - big_m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded_builder() -> (ModelBuilder, VarId, VarId) {
        let mut builder = ModelBuilder::new(1);
        let size = builder.add_var("size", VarDef::free().bounds(0.0, 100.0)).unwrap();
        let subsidy = builder.add_var("subsidy", VarDef::free().bounds(0.0, 500.0)).unwrap();
        (builder, size, subsidy)
    }

    #[test]
    fn test_two_disjuncts_get_indicators() {
        let (mut builder, size, subsidy) = bounded_builder();
        let small = Disjunct::new("small")
            .with("upper", size, Sense::Le, 10.0)
            .with("value", subsidy, Sense::Eq, 5.0 * size);
        let large = Disjunct::new("large")
            .with("lower", size, Sense::Ge, 10.0)
            .with("value", subsidy, Sense::Eq, 50.0);

        let indicators = builder.add_disjunction("tariff", vec![small, large]).unwrap();
        let model = builder.finish();

        assert_eq!(indicators.len(), 2);
        let exactly_one = model.constraint("tariff.exactly_one").unwrap();
        assert_eq!(exactly_one.rhs, 1.0);
        assert!(indicators.iter().all(|y| exactly_one.lhs.coefficient(*y) == 1.0));

        // size <= 10 relaxed by M = 100 - 10
        let upper = model.constraint("small.upper").unwrap();
        assert_eq!(upper.lhs.coefficient(indicators[0]), 90.0);
        assert_eq!(upper.rhs, 100.0);

        assert!(model.constraint("small.value_le").is_some());
        assert!(model.constraint("small.value_ge").is_some());
        assert!(model.has_integer_vars());
    }

    #[test]
    fn test_single_disjunct_is_unconditional() {
        let (mut builder, _, subsidy) = bounded_builder();
        let default = Disjunct::new("none").with("value", subsidy, Sense::Eq, 0.0);

        let indicators = builder.add_disjunction("tariff", vec![default]).unwrap();
        let model = builder.finish();

        assert!(indicators.is_empty());
        assert!(!model.has_integer_vars());
        assert_eq!(model.disjunction("tariff").unwrap().disjuncts, vec!["none"]);
        assert_eq!(model.constraint("none.value").unwrap().rhs, 0.0);
    }

    #[test]
    fn test_unbounded_disjunct_rejected() {
        let mut builder = ModelBuilder::new(1);
        let x = builder.add_var("x", VarDef::non_negative()).unwrap();
        let a = Disjunct::new("a").with("cap", x, Sense::Le, 1.0);
        let b = Disjunct::new("b").with("floor", x, Sense::Ge, 1.0);

        assert_eq!(
            builder.add_disjunction("d", vec![a, b]),
            Err(ModelError::UnboundedDisjunct("a".to_string()))
        );
    }

    #[test]
    fn test_empty_disjunction_rejected() {
        let mut builder = ModelBuilder::new(1);
        assert_eq!(
            builder.add_disjunction("d", Vec::new()),
            Err(ModelError::EmptyDisjunction("d".to_string()))
        );
    }
}
