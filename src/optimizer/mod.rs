//! Solving assembled models.
//!
//! The model is solver independent; this module hands it to a good_lp
//! backend and returns the flat result table.

pub mod milp;
pub mod types;

pub use milp::MilpSolver;
pub use types::{ModelSolver, SolveOutcome, SolverKind};
