use std::collections::BTreeMap;

use tracing::debug;

use super::context::AssemblyContext;
use super::registry::ComponentTemplate;
use super::strategies;
use crate::domain::{Commodity, ComponentProperties, SizeBounds};
use crate::error::ModelError;
use crate::model::{LinExpr, ModelBuilder, Sense, Series, VarDef, VarId};

/// One energy device of a topology
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    /// Registry name of the type, also used to match tariff rows
    pub type_name: String,
    pub template: ComponentTemplate,
    pub size: SizeBounds,
    pub properties: ComponentProperties,
}

/// Handles of the variables a component registered
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentVars {
    pub inputs: BTreeMap<Commodity, Series>,
    pub outputs: BTreeMap<Commodity, Series>,
    pub size: Option<VarId>,
    pub invest: Option<VarId>,
    /// Build decision, only present for components with a fixed cost
    pub built: Option<VarId>,
    /// Stored energy of a storage at the end of each step
    pub state: Option<Series>,
}

impl ComponentVars {
    pub fn input(&self, component: &str, commodity: Commodity) -> Result<&Series, ModelError> {
        self.inputs.get(&commodity).ok_or_else(|| ModelError::MissingPort {
            component: component.to_string(),
            commodity,
            role: "input",
        })
    }

    pub fn output(&self, component: &str, commodity: Commodity) -> Result<&Series, ModelError> {
        self.outputs.get(&commodity).ok_or_else(|| ModelError::MissingPort {
            component: component.to_string(),
            commodity,
            role: "output",
        })
    }

    pub fn size(&self, component: &str) -> Result<VarId, ModelError> {
        self.size.ok_or_else(|| ModelError::MissingProperty {
            component: component.to_string(),
            property: "size",
        })
    }
}

impl Component {
    pub fn new(
        name: impl Into<String>,
        type_name: impl Into<String>,
        template: ComponentTemplate,
        size: SizeBounds,
        properties: ComponentProperties,
    ) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            template,
            size,
            properties,
        }
    }

    pub fn inputs(&self) -> &[Commodity] {
        &self.template.inputs
    }

    pub fn outputs(&self) -> &[Commodity] {
        &self.template.outputs
    }

    fn has_fixed_cost(&self) -> bool {
        self.properties.fixed_cost.unwrap_or(0.0) > 0.0 && self.size.current <= 0.0
    }

    /// Register every decision variable of this component
    pub fn add_vars(&self, builder: &mut ModelBuilder) -> Result<ComponentVars, ModelError> {
        let mut vars = ComponentVars::default();
        let name = &self.name;

        for &commodity in self.inputs() {
            let base = format!("input_{commodity}_{name}");
            let series = builder.add_series(base, VarDef::non_negative())?;
            vars.inputs.insert(commodity, series);
        }
        for &commodity in self.outputs() {
            let base = format!("output_{commodity}_{name}");
            let series = builder.add_series(base, VarDef::non_negative())?;
            vars.outputs.insert(commodity, series);
        }

        if self.template.is_sized() {
            let def = VarDef::free().bounds(self.size.lower(), self.size.upper());
            vars.size = Some(builder.add_var(format!("size_{name}"), def)?);
        }
        if self.template.has_investment() {
            vars.invest = Some(builder.add_var(format!("invest_{name}"), VarDef::non_negative())?);
            if self.has_fixed_cost() {
                vars.built = Some(builder.add_var(format!("built_{name}"), VarDef::binary())?);
            }
        }
        if self.template.is_storage() {
            vars.state = Some(builder.add_series(format!("soc_{name}"), VarDef::non_negative())?);
        }

        debug!(
            component = %name,
            kind = %self.type_name,
            vars = builder.model().variables().len(),
            "registered component variables"
        );
        Ok(vars)
    }

    /// Link inputs and outputs to their flows and apply every capability
    pub fn add_cons(
        &self,
        vars: &ComponentVars,
        ctx: &AssemblyContext<'_>,
        builder: &mut ModelBuilder,
    ) -> Result<(), ModelError> {
        self.link_flows(vars, ctx, builder)?;
        for capability in &self.template.capabilities {
            strategies::apply(capability, self, vars, ctx, builder)?;
        }
        Ok(())
    }

    fn link_flows(
        &self,
        vars: &ComponentVars,
        ctx: &AssemblyContext<'_>,
        builder: &mut ModelBuilder,
    ) -> Result<(), ModelError> {
        let name = &self.name;
        for (&commodity, input) in &vars.inputs {
            let feeders: Vec<&Series> = ctx.flows.inflows(name, commodity).collect();
            for t in 0..builder.time_steps() {
                let supplied: LinExpr = feeders.iter().map(|f| f.at(t)).sum();
                builder.constrain(
                    format!("inflow_{commodity}_{name}[{t}]"),
                    input.at(t),
                    Sense::Eq,
                    supplied,
                )?;
            }
        }
        for (&commodity, output) in &vars.outputs {
            let consumers: Vec<&Series> = ctx.flows.outflows(name, commodity).collect();
            for t in 0..builder.time_steps() {
                let delivered: LinExpr = consumers.iter().map(|f| f.at(t)).sum();
                builder.constrain(
                    format!("outflow_{commodity}_{name}[{t}]"),
                    output.at(t),
                    Sense::Eq,
                    delivered,
                )?;
            }
        }
        Ok(())
    }
}
