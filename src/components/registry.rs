//! Catalogue of available component types.
//!
//! A component type is plain data: the commodities it consumes and produces,
//! the constraint strategies (capabilities) applied to it, and how it elects
//! the commodity of each upstream feeder. New type names can be registered
//! at runtime against any template.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Coefficient, Commodity};
use crate::error::ModelError;

/// How the commodity of a connection into this component is chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeederElection {
    /// Every commodity the feeder outputs and this component accepts
    SharedCommodities,
    /// Only the first declared output of the feeder that this component
    /// accepts. Depends on the feeder's output order.
    FirstFeederOutput,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConversionRule {
    /// `output_c = coefficient_c * input` for each listed output
    Linear {
        input: Commodity,
        outputs: Vec<(Commodity, Coefficient)>,
    },
    /// `output_base = input_base + coefficient * input_booster`
    Boost {
        base: Commodity,
        booster: Commodity,
        coefficient: Coefficient,
    },
}

/// Constraint strategy applied to a component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Capability {
    Conversion(ConversionRule),
    /// Primary output bounded by the installed size
    Capacity,
    Storage,
    Demand(Commodity),
    Supply(Commodity),
    FeedIn(Commodity),
    Collector,
    Investment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentTemplate {
    pub inputs: Vec<Commodity>,
    pub outputs: Vec<Commodity>,
    pub capabilities: Vec<Capability>,
    pub election: FeederElection,
}

impl ComponentTemplate {
    pub fn new(inputs: &[Commodity], outputs: &[Commodity]) -> Self {
        Self {
            inputs: inputs.to_vec(),
            outputs: outputs.to_vec(),
            capabilities: Vec::new(),
            election: FeederElection::SharedCommodities,
        }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        self.capabilities.push(capability);
        self
    }

    pub fn elect(mut self, election: FeederElection) -> Self {
        self.election = election;
        self
    }

    pub fn has_investment(&self) -> bool {
        self.capabilities.contains(&Capability::Investment)
    }

    pub fn is_storage(&self) -> bool {
        self.capabilities.contains(&Capability::Storage)
    }

    /// Whether the component carries a size decision variable
    pub fn is_sized(&self) -> bool {
        self.capabilities.iter().any(|c| {
            matches!(
                c,
                Capability::Capacity
                    | Capability::Storage
                    | Capability::Collector
                    | Capability::Investment
            )
        })
    }

    pub fn accepts(&self, commodity: Commodity) -> bool {
        self.inputs.contains(&commodity)
    }

    pub fn produces(&self, commodity: Commodity) -> bool {
        self.outputs.contains(&commodity)
    }
}

fn linear(input: Commodity, outputs: &[(Commodity, Coefficient)]) -> Capability {
    Capability::Conversion(ConversionRule::Linear {
        input,
        outputs: outputs.to_vec(),
    })
}

/// The built-in component types
pub fn builtin_templates() -> Vec<(&'static str, ComponentTemplate)> {
    use Capability::*;
    use Commodity::*;

    fn generator(input: Commodity, outputs: &[(Commodity, Coefficient)]) -> ComponentTemplate {
        let produced: Vec<_> = outputs.iter().map(|(c, _)| *c).collect();
        ComponentTemplate::new(&[input], &produced)
            .with(linear(input, outputs))
            .with(Capability::Capacity)
            .with(Capability::Investment)
    }
    let heat_demand = ComponentTemplate::new(&[Heat], &[]).with(Demand(Heat));

    vec![
        ("Boiler", generator(Gas, &[(Heat, Coefficient::Efficiency)])),
        (
            "CHP",
            generator(
                Gas,
                &[
                    (Heat, Coefficient::ThermalEfficiency),
                    (Electricity, Coefficient::ElectricalEfficiency),
                ],
            ),
        ),
        ("HeatPump", generator(Electricity, &[(Heat, Coefficient::Cop)])),
        (
            "ElectricBoiler",
            generator(Electricity, &[(Heat, Coefficient::Efficiency)]),
        ),
        (
            "ThroughHeater",
            ComponentTemplate::new(&[Heat, Electricity], &[Heat])
                .with(Conversion(ConversionRule::Boost {
                    base: Heat,
                    booster: Electricity,
                    coefficient: Coefficient::Efficiency,
                }))
                .with(Capacity)
                .with(Investment)
                .elect(FeederElection::FirstFeederOutput),
        ),
        (
            "HeatStorage",
            ComponentTemplate::new(&[Heat], &[Heat])
                .with(Storage)
                .with(Investment),
        ),
        (
            "SolarThermal",
            ComponentTemplate::new(&[], &[Heat])
                .with(Collector)
                .with(Investment),
        ),
        ("Radiator", heat_demand.clone()),
        ("HeatConsumer", heat_demand),
        (
            "ElectricalConsumer",
            ComponentTemplate::new(&[Electricity], &[]).with(Demand(Electricity)),
        ),
        ("GasGrid", ComponentTemplate::new(&[], &[Gas]).with(Supply(Gas))),
        (
            "ElectricalGrid",
            ComponentTemplate::new(&[Electricity], &[Electricity])
                .with(Supply(Electricity))
                .with(FeedIn(Electricity)),
        ),
    ]
}

/// Maps component type names (case-insensitive) to templates
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    templates: BTreeMap<String, (String, ComponentTemplate)>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for (name, template) in builtin_templates() {
            registry.register(name, template);
        }
        registry
    }

    /// Register `template` under `name`, replacing any previous entry
    pub fn register(&mut self, name: &str, template: ComponentTemplate) {
        self.templates
            .insert(name.to_ascii_lowercase(), (name.to_string(), template));
    }

    pub fn lookup(&self, name: &str) -> Result<&ComponentTemplate, ModelError> {
        self.templates
            .get(&name.to_ascii_lowercase())
            .map(|(_, t)| t)
            .ok_or_else(|| ModelError::UnknownComponentType(name.to_string()))
    }

    /// Registered type names as they were registered
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.values().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ComponentTemplate)> {
        self.templates.values().map(|(name, t)| (name.as_str(), t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup_is_case_insensitive() {
        let registry = ComponentRegistry::with_builtin();
        let chp = registry.lookup("chp").unwrap();
        assert_eq!(chp.outputs, vec![Commodity::Heat, Commodity::Electricity]);
        assert!(chp.is_sized());
        assert!(registry.lookup("Radiator").unwrap().capabilities
            == vec![Capability::Demand(Commodity::Heat)]);
    }

    #[test]
    fn test_unknown_type() {
        let registry = ComponentRegistry::with_builtin();
        assert_eq!(
            registry.lookup("FuelCell").unwrap_err(),
            ModelError::UnknownComponentType("FuelCell".to_string())
        );
    }

    #[test]
    fn test_register_alias() {
        let mut registry = ComponentRegistry::with_builtin();
        let boiler = registry.lookup("Boiler").unwrap().clone();
        registry.register("CondensingBoiler", boiler);

        assert!(registry.names().any(|n| n == "CondensingBoiler"));
        assert!(registry.lookup("condensingboiler").is_ok());
    }

    #[test]
    fn test_only_through_heater_elects_by_feeder_output() {
        let registry = ComponentRegistry::with_builtin();
        let electing: Vec<_> = registry
            .iter()
            .filter(|(_, t)| t.election == FeederElection::FirstFeederOutput)
            .map(|(n, _)| n)
            .collect();
        assert_eq!(electing, vec!["ThroughHeater"]);
    }
}
