use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use super::disjunction::DisjunctionRecord;
use super::expr::{LinExpr, VarId};
use crate::error::ModelError;

/// Name of the value of `base` at time step `t`
pub fn indexed_name(base: &str, t: usize) -> String {
    format!("{base}[{t}]")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Continuous,
    Binary,
    Integer,
}

/// Domain of a variable about to be registered
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarDef {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub kind: VarKind,
}

impl VarDef {
    /// Unbounded continuous variable
    pub fn free() -> Self {
        Self {
            lower: None,
            upper: None,
            kind: VarKind::Continuous,
        }
    }

    pub fn non_negative() -> Self {
        Self::free().min(0.0)
    }

    pub fn binary() -> Self {
        Self {
            lower: Some(0.0),
            upper: Some(1.0),
            kind: VarKind::Binary,
        }
    }

    pub fn min(mut self, lower: f64) -> Self {
        self.lower = Some(lower);
        self
    }

    pub fn max(mut self, upper: f64) -> Self {
        self.upper = Some(upper);
        self
    }

    pub fn bounds(self, lower: f64, upper: f64) -> Self {
        self.min(lower).max(upper)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub kind: VarKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Le,
    Eq,
    Ge,
}

impl fmt::Display for Sense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sense::Le => write!(f, "<="),
            Sense::Eq => write!(f, "="),
            Sense::Ge => write!(f, ">="),
        }
    }
}

/// Linear constraint kept in the form `terms sense rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub lhs: LinExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl Constraint {
    /// Move every variable to the left and every constant to the right
    pub fn new(
        name: impl Into<String>,
        lhs: impl Into<LinExpr>,
        sense: Sense,
        rhs: impl Into<LinExpr>,
    ) -> Self {
        let (terms, offset) = (lhs.into() - rhs.into()).simplified().without_constant();
        Self {
            name: name.into(),
            lhs: terms,
            sense,
            // no -0.0 in exported models
            rhs: 0.0 - offset,
        }
    }

    pub fn references(&self, var: VarId) -> bool {
        self.lhs.references(var)
    }
}

/// Time-indexed family of variables sharing one base name
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    base: String,
    vars: Vec<VarId>,
}

impl Series {
    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn at(&self, t: usize) -> VarId {
        self.vars[t]
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = VarId> + '_ {
        self.vars.iter().copied()
    }
}

/// Variables, constraints and objective of one optimization run
#[derive(Debug, Clone)]
pub struct Model {
    time_steps: usize,
    variables: Vec<Variable>,
    constraints: Vec<Constraint>,
    objective: LinExpr,
    disjunctions: Vec<DisjunctionRecord>,
    var_index: HashMap<String, VarId>,
    constraint_index: HashMap<String, usize>,
}

impl Model {
    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.0]
    }

    pub fn var_id(&self, name: &str) -> Option<VarId> {
        self.var_index.get(name).copied()
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, name: &str) -> Option<&Constraint> {
        self.constraint_index.get(name).map(|&i| &self.constraints[i])
    }

    pub fn constraints_referencing(&self, var: VarId) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(move |c| c.references(var))
    }

    /// Minimised cost expression
    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }

    pub fn disjunctions(&self) -> &[DisjunctionRecord] {
        &self.disjunctions
    }

    pub fn disjunction(&self, name: &str) -> Option<&DisjunctionRecord> {
        self.disjunctions.iter().find(|d| d.name == name)
    }

    pub fn has_integer_vars(&self) -> bool {
        self.variables
            .iter()
            .any(|v| v.kind != VarKind::Continuous)
    }

    /// Interval spanned by `expr` over the variable bounds, if finite
    pub fn expr_bounds(&self, expr: &LinExpr) -> (f64, f64) {
        let mut lo = expr.constant();
        let mut hi = expr.constant();
        for &(var, coef) in expr.terms().iter().filter(|(_, c)| *c != 0.0) {
            let v = self.variable(var);
            let lower = v.lower.unwrap_or(f64::NEG_INFINITY);
            let upper = v.upper.unwrap_or(f64::INFINITY);
            if coef >= 0.0 {
                lo += coef * lower;
                hi += coef * upper;
            } else {
                lo += coef * upper;
                hi += coef * lower;
            }
        }
        (lo, hi)
    }
}

/// Accumulates the model during assembly. Owned by the assembler for one run
/// and turned into a read-only [`Model`] by [`finish`](Self::finish).
#[derive(Debug)]
pub struct ModelBuilder {
    model: Model,
}

impl ModelBuilder {
    pub fn new(time_steps: usize) -> Self {
        Self {
            model: Model {
                time_steps,
                variables: Vec::new(),
                constraints: Vec::new(),
                objective: LinExpr::new(),
                disjunctions: Vec::new(),
                var_index: HashMap::new(),
                constraint_index: HashMap::new(),
            },
        }
    }

    pub fn time_steps(&self) -> usize {
        self.model.time_steps
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn add_var(&mut self, name: impl Into<String>, def: VarDef) -> Result<VarId, ModelError> {
        let name = name.into();
        if self.model.var_index.contains_key(&name) {
            return Err(ModelError::DuplicateVariable(name));
        }
        if let (Some(lower), Some(upper)) = (def.lower, def.upper) {
            if lower > upper {
                return Err(ModelError::InvalidBounds { name, lower, upper });
            }
        }

        let id = VarId(self.model.variables.len());
        self.model.var_index.insert(name.clone(), id);
        self.model.variables.push(Variable {
            name,
            lower: def.lower,
            upper: def.upper,
            kind: def.kind,
        });
        Ok(id)
    }

    /// Register one variable per time step, named `base[t]`
    pub fn add_series(
        &mut self,
        base: impl Into<String>,
        def: VarDef,
    ) -> Result<Series, ModelError> {
        let base = base.into();
        let vars = (0..self.model.time_steps)
            .map(|t| self.add_var(indexed_name(&base, t), def))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(series = %base, steps = vars.len(), "registered series");
        Ok(Series { base, vars })
    }

    pub fn constrain(
        &mut self,
        name: impl Into<String>,
        lhs: impl Into<LinExpr>,
        sense: Sense,
        rhs: impl Into<LinExpr>,
    ) -> Result<(), ModelError> {
        self.push_constraint(Constraint::new(name, lhs, sense, rhs))
    }

    pub(crate) fn push_constraint(&mut self, constraint: Constraint) -> Result<(), ModelError> {
        if self.model.constraint_index.contains_key(&constraint.name) {
            return Err(ModelError::DuplicateConstraint(constraint.name));
        }
        self.model
            .constraint_index
            .insert(constraint.name.clone(), self.model.constraints.len());
        self.model.constraints.push(constraint);
        Ok(())
    }

    pub(crate) fn push_disjunction(&mut self, record: DisjunctionRecord) {
        self.model.disjunctions.push(record);
    }

    /// Add a term to the minimised objective
    pub fn add_cost(&mut self, cost: impl Into<LinExpr>) {
        self.model.objective += cost.into();
    }

    pub fn finish(self) -> Model {
        let mut model = self.model;
        model.objective = model.objective.simplified();
        model
    }
}
