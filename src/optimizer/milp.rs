//! MILP solve through good_lp.
//!
//! The frozen [`Model`] is translated one to one: every variable keeps its
//! bounds and kind, every constraint becomes a good_lp constraint and the
//! objective is minimised. Values are read back in registration order.

use anyhow::Result;
use tracing::{info, warn};

#[cfg(feature = "optimization")]
use anyhow::Context;

use super::types::{ModelSolver, SolveOutcome, SolverKind};
use crate::model::Model;

#[derive(Debug, Clone, Copy, Default)]
pub struct MilpSolver {
    kind: SolverKind,
}

impl MilpSolver {
    pub fn new(kind: SolverKind) -> Self {
        Self { kind }
    }

    pub fn kind(&self) -> SolverKind {
        self.kind
    }

    #[cfg(feature = "optimization")]
    fn solve_model(&self, model: &Model) -> Result<SolveOutcome> {
        match self.kind {
            SolverKind::Minilp => solve_with(model, good_lp::solvers::minilp::minilp),
            #[cfg(feature = "cbc")]
            SolverKind::Cbc => solve_with(model, good_lp::solvers::coin_cbc::coin_cbc),
            #[cfg(not(feature = "cbc"))]
            SolverKind::Cbc => {
                anyhow::bail!("the cbc solver requires the 'cbc' feature to be enabled")
            }
        }
    }

    #[cfg(not(feature = "optimization"))]
    fn solve_model(&self, _model: &Model) -> Result<SolveOutcome> {
        anyhow::bail!("solving requires the 'optimization' feature to be enabled");
    }
}

impl ModelSolver for MilpSolver {
    fn solve(&self, model: &Model) -> Result<SolveOutcome> {
        if model.has_integer_vars() && !self.kind.supports_integers() {
            let integers = model
                .variables()
                .iter()
                .filter(|v| v.kind != crate::model::VarKind::Continuous)
                .count();
            anyhow::bail!(
                "solver {} cannot handle the {integers} binary/integer variables \
                 of this model, use cbc",
                self.kind
            );
        }
        if model.variables().len() > 200_000 {
            warn!(variables = model.variables().len(), "large model, solve may take long");
        }

        info!(
            solver = %self.kind,
            variables = model.variables().len(),
            constraints = model.constraints().len(),
            "solving model"
        );
        let outcome = self.solve_model(model)?;
        info!(objective = outcome.objective, "solve finished");
        Ok(outcome)
    }
}

#[cfg(feature = "optimization")]
fn solve_with<S>(model: &Model, solver: S) -> Result<SolveOutcome>
where
    S: good_lp::Solver,
    S::Model: good_lp::SolverModel<Error = good_lp::ResolutionError>,
{
    use good_lp::{
        constraint, variable, Expression, ProblemVariables, Solution, SolverModel, Variable,
    };

    use crate::model::{LinExpr, Sense, VarKind};

    let mut problem = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|v| {
            let mut def = variable();
            if let Some(lower) = v.lower {
                def = def.min(lower);
            }
            if let Some(upper) = v.upper {
                def = def.max(upper);
            }
            match v.kind {
                VarKind::Continuous => {}
                VarKind::Binary => def = def.binary(),
                VarKind::Integer => def = def.integer(),
            }
            problem.add(def)
        })
        .collect();

    let to_expression = |expr: &LinExpr| -> Expression {
        let mut out = Expression::from(expr.constant());
        for &(var, coef) in expr.terms() {
            out += coef * handles[var.index()];
        }
        out
    };

    let mut lp = problem.minimise(to_expression(model.objective())).using(solver);
    for c in model.constraints() {
        let lhs = to_expression(&c.lhs);
        lp = lp.with(match c.sense {
            Sense::Le => constraint!(lhs <= c.rhs),
            Sense::Eq => constraint!(lhs == c.rhs),
            Sense::Ge => constraint!(lhs >= c.rhs),
        });
    }

    let solution = lp
        .solve()
        .context("solver found no optimal solution (try export-lp to inspect the model)")?;

    let values: Vec<f64> = handles.iter().map(|&h| solution.value(h)).collect();
    let objective = model.objective().evaluate(|v| values[v.index()]);
    let results = model
        .variables()
        .iter()
        .zip(values)
        .map(|(v, value)| (v.name.clone(), value))
        .collect();

    Ok(SolveOutcome { objective, results })
}
