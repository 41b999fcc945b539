//! Solver-independent optimization model.
//!
//! Components register variables and constraints on a [`ModelBuilder`]
//! through typed handles; the finished [`Model`] is handed to a solver
//! backend or exported as an LP file.

pub mod builder;
pub mod disjunction;
pub mod expr;
pub mod lp_format;

pub use builder::{
    indexed_name, Constraint, Model, ModelBuilder, Sense, Series, VarDef, VarKind, Variable,
};
pub use disjunction::{Disjunct, DisjunctionRecord};
pub use expr::{LinExpr, VarId};
pub use lp_format::write_lp;
