//! Fixtures shared by the component tests.

use super::context::{AssemblyContext, Economics};
use super::{Component, ComponentRegistry};
use crate::domain::{ComponentProperties, Profiles, SizeBounds};
use crate::topology::FlowTable;

/// Built-in component with a 0..100 size range
pub(crate) fn component(name: &str, type_name: &str, properties: ComponentProperties) -> Component {
    let registry = ComponentRegistry::with_builtin();
    let template = registry.lookup(type_name).unwrap().clone();
    Component::new(name, type_name, template, SizeBounds::new(0.0, 100.0, 0.0), properties)
}

/// Owns the data an [`AssemblyContext`] borrows
#[derive(Default)]
pub(crate) struct Fixture {
    pub flows: FlowTable,
    pub profiles: Profiles,
    pub economics: Economics,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn context(&self) -> AssemblyContext<'_> {
        AssemblyContext {
            flows: &self.flows,
            profiles: &self.profiles,
            economics: &self.economics,
        }
    }
}
