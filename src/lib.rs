//! Building energy system optimization.
//!
//! Components of a building energy system (boilers, CHPs, heat pumps,
//! storages, solar collectors, grids and demands) register variables and
//! constraints on one shared linear model. The model is solved by a good_lp
//! backend and the flat `var,value` result table is post-processed into
//! workbooks.

pub mod assembly;
pub mod components;
pub mod config;
pub mod costs;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod io;
pub mod model;
pub mod optimizer;
pub mod pipeline;
pub mod postprocess;
pub mod tariffs;
pub mod telemetry;
pub mod topology;

pub use assembly::{AssembledModel, Assembler};
pub use error::{InputError, ModelError};
