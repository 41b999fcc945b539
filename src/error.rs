use thiserror::Error;

use crate::domain::Commodity;

/// Errors raised while assembling a model
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Duplicate variable name: {0}")]
    DuplicateVariable(String),

    #[error("Duplicate constraint name: {0}")]
    DuplicateConstraint(String),

    #[error("Invalid bounds for {name}: lower {lower} > upper {upper}")]
    InvalidBounds { name: String, lower: f64, upper: f64 },

    #[error("Unknown component type: {0}")]
    UnknownComponentType(String),

    #[error("Unknown component model: {0}")]
    UnknownModel(String),

    #[error("Component not found: {0}")]
    ComponentNotFound(String),

    #[error("Duplicate component name: {0}")]
    DuplicateComponent(String),

    #[error("Invalid component name {0:?}: must be non-empty without '->', '[' or ']'")]
    InvalidComponentName(String),

    #[error("No shared commodity between {from} and {to}")]
    IncompatibleConnection { from: String, to: String },

    #[error("Component {component} has no {commodity} {role}")]
    MissingPort {
        component: String,
        commodity: Commodity,
        role: &'static str,
    },

    #[error("Component {component} is missing property {property}")]
    MissingProperty {
        component: String,
        property: &'static str,
    },

    #[error("Missing profile: {0}")]
    MissingProfile(String),

    #[error("Profile {name} has {actual} values, expected {expected}")]
    ProfileLength {
        name: String,
        actual: usize,
        expected: usize,
    },

    #[error("Disjunction {0} has no disjuncts")]
    EmptyDisjunction(String),

    #[error("Unbounded expression in disjunct {0}")]
    UnboundedDisjunct(String),
}

/// Errors raised while reading input tables
#[derive(Debug, Error)]
pub enum InputError {
    #[error("Missing column {column} in {table}")]
    MissingColumn { table: String, column: String },

    #[error("Invalid value {value:?} in {table}, row {row}, column {column}")]
    InvalidValue {
        table: String,
        row: usize,
        column: String,
        value: String,
    },

    #[error("Topology column {0} does not match any component row")]
    UnknownTopologyColumn(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
