pub mod component;
pub mod context;
pub mod registry;
pub mod strategies;

#[cfg(test)]
pub(crate) mod test_utils;

pub use component::{Component, ComponentVars};
pub use context::{AssemblyContext, Economics};
pub use registry::{
    builtin_templates, Capability, ComponentRegistry, ComponentTemplate, ConversionRule,
    FeederElection,
};
