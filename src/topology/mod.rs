//! Components of a building energy system and the connections between them.

pub mod flows;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{Component, ComponentRegistry};
use crate::domain::{ComponentProperties, SizeBounds};
use crate::error::ModelError;

pub use flows::{elect_commodities, link_flows, FlowTable};

/// Directed connection from producer to consumer
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

impl Connection {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Unresolved component row, as read from a topology table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub name: String,
    pub type_name: String,
    /// Catalog entry providing the technical properties
    pub model: Option<String>,
    pub size: SizeBounds,
}

/// Names end up inside `flow_<c>_<from>-><to>[t]`, so the delimiters stay reserved
fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains("->") && !name.contains(['[', ']'])
}

/// Validated set of components and connections
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub components: Vec<Component>,
    pub connections: Vec<Connection>,
    index: BTreeMap<String, usize>,
}

impl Topology {
    /// Build a topology, rejecting duplicate or malformed names and
    /// dangling connections
    pub fn new(
        components: Vec<Component>,
        connections: Vec<Connection>,
    ) -> Result<Self, ModelError> {
        let mut index = BTreeMap::new();
        for (i, component) in components.iter().enumerate() {
            if !is_valid_name(&component.name) {
                return Err(ModelError::InvalidComponentName(component.name.clone()));
            }
            if index.insert(component.name.clone(), i).is_some() {
                return Err(ModelError::DuplicateComponent(component.name.clone()));
            }
        }
        for connection in &connections {
            for end in [&connection.from, &connection.to] {
                if !index.contains_key(end) {
                    return Err(ModelError::ComponentNotFound(end.clone()));
                }
            }
        }
        Ok(Self {
            components,
            connections,
            index,
        })
    }

    /// Resolve component rows against the registry and a model catalog
    pub fn resolve(
        specs: Vec<ComponentSpec>,
        connections: Vec<Connection>,
        registry: &ComponentRegistry,
        catalog: &BTreeMap<String, ComponentProperties>,
    ) -> Result<Self, ModelError> {
        let components = specs
            .into_iter()
            .map(|spec| {
                let template = registry.lookup(&spec.type_name)?.clone();
                let properties = match &spec.model {
                    Some(model) => catalog
                        .get(model)
                        .cloned()
                        .ok_or_else(|| ModelError::UnknownModel(model.clone()))?,
                    None => ComponentProperties::default(),
                };
                debug!(
                    component = %spec.name,
                    kind = %spec.type_name,
                    model = ?spec.model,
                    "resolved component"
                );
                Ok(Component::new(spec.name, spec.type_name, template, spec.size, properties))
            })
            .collect::<Result<Vec<_>, ModelError>>()?;
        Self::new(components, connections)
    }

    pub fn component(&self, name: &str) -> Result<&Component, ModelError> {
        self.index
            .get(name)
            .map(|&i| &self.components[i])
            .ok_or_else(|| ModelError::ComponentNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Components nothing is connected to or from
    pub fn isolated(&self) -> Vec<&str> {
        let connected: BTreeSet<&str> = self
            .connections
            .iter()
            .flat_map(|c| [c.from.as_str(), c.to.as_str()])
            .collect();
        self.components
            .iter()
            .map(|c| c.name.as_str())
            .filter(|name| !connected.contains(name))
            .collect()
    }
}
