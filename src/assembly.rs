//! Assembles one optimization model from a topology.
//!
//! Assembly runs in fixed phases on a single builder: every component
//! registers its variables, the connections become flow series, every
//! component registers its constraints against those flows, and finally the
//! subsidy disjunctions of invested components are added.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::components::{AssemblyContext, ComponentVars, Economics};
use crate::domain::Profiles;
use crate::error::ModelError;
use crate::model::{Model, ModelBuilder, VarId};
use crate::tariffs::{add_subsidy_disjunction, Site, TariffTable};
use crate::topology::{link_flows, FlowTable, Topology};

/// Finished model together with the handles registered for it
#[derive(Debug, Clone)]
pub struct AssembledModel {
    pub model: Model,
    pub vars: BTreeMap<String, ComponentVars>,
    pub flows: FlowTable,
    pub subsidies: BTreeMap<String, VarId>,
}

#[derive(Debug, Clone)]
pub struct Assembler {
    time_steps: usize,
    economics: Economics,
    profiles: Profiles,
    tariffs: Option<(TariffTable, Site)>,
}

impl Assembler {
    pub fn new(time_steps: usize, economics: Economics, profiles: Profiles) -> Self {
        Self {
            time_steps,
            economics,
            profiles,
            tariffs: None,
        }
    }

    /// Model subsidies from `table` for a building at `site`
    pub fn with_tariffs(mut self, table: TariffTable, site: Site) -> Self {
        self.tariffs = Some((table, site));
        self
    }

    pub fn economics(&self) -> &Economics {
        &self.economics
    }

    pub fn assemble(&self, topology: &Topology) -> Result<AssembledModel, ModelError> {
        let mut builder = ModelBuilder::new(self.time_steps);

        let mut vars = BTreeMap::new();
        for component in &topology.components {
            vars.insert(component.name.clone(), component.add_vars(&mut builder)?);
        }

        let flows = link_flows(topology, &mut builder)?;

        let ctx = AssemblyContext {
            flows: &flows,
            profiles: &self.profiles,
            economics: &self.economics,
        };
        for component in &topology.components {
            let component_vars = vars
                .get(&component.name)
                .ok_or_else(|| ModelError::ComponentNotFound(component.name.clone()))?;
            component.add_cons(component_vars, &ctx, &mut builder)?;
        }

        let mut subsidies = BTreeMap::new();
        if let Some((table, site)) = &self.tariffs {
            for component in topology
                .components
                .iter()
                .filter(|c| c.template.has_investment())
            {
                let rows: Vec<_> = table.matching(site, &component.type_name).collect();
                debug!(component = %component.name, rows = rows.len(), "matched tariff rows");
                let component_vars = vars
                    .get(&component.name)
                    .ok_or_else(|| ModelError::ComponentNotFound(component.name.clone()))?;
                let subsidy = add_subsidy_disjunction(
                    component,
                    component_vars,
                    &rows,
                    &self.economics,
                    &mut builder,
                )?;
                subsidies.insert(component.name.clone(), subsidy);
            }
        }

        let model = builder.finish();
        info!(
            components = topology.len(),
            flows = flows.len(),
            variables = model.variables().len(),
            constraints = model.constraints().len(),
            disjunctions = model.disjunctions().len(),
            "assembled model"
        );

        Ok(AssembledModel {
            model,
            vars,
            flows,
            subsidies,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_utils::component;
    use crate::domain::ComponentProperties;
    use crate::tariffs::TariffRow;
    use crate::topology::Connection;

    fn heating(demand: Vec<f64>) -> (Topology, Assembler) {
        let boiler = component(
            "boiler",
            "Boiler",
            ComponentProperties {
                efficiency: Some(0.9),
                specific_cost: Some(100.0),
                ..Default::default()
            },
        );
        let gas = component("gas", "GasGrid", ComponentProperties::default());
        let radiator = component("rad", "Radiator", ComponentProperties::default());
        let topology = Topology::new(
            vec![gas, boiler, radiator],
            vec![Connection::new("gas", "boiler"), Connection::new("boiler", "rad")],
        )
        .unwrap();

        let steps = demand.len();
        let economics = Economics {
            gas_price: 0.08,
            ..Default::default()
        };
        let profiles = Profiles::new().with("rad", demand);
        (topology, Assembler::new(steps, economics, profiles))
    }

    #[test]
    fn test_assembles_every_phase() {
        let (topology, assembler) = heating(vec![5.0, 7.0, 3.0]);
        let assembled = assembler.assemble(&topology).unwrap();

        assert_eq!(assembled.flows.len(), 2);
        assert_eq!(assembled.vars.len(), 3);
        assert!(assembled.subsidies.is_empty());

        let model = &assembled.model;
        let demand = model.constraint("demand_rad[1]").unwrap();
        assert_eq!(demand.rhs, 7.0);
        assert!(model.constraint("inflow_heat_rad[2]").is_some());
        assert!(model.constraint("outflow_gas_gas[0]").is_some());
        assert!(model.constraint("investment_boiler").is_some());
    }

    #[test]
    fn test_tariffs_only_apply_to_invested_components() {
        let (topology, assembler) = heating(vec![1.0]);
        let table = TariffTable::new(vec![TariffRow {
            state: String::new(),
            city: String::new(),
            building_type: String::new(),
            component: "Boiler".to_string(),
            min_area: 0.0,
            max_area: None,
            coefficient: 20.0,
            constant: 0.0,
        }]);
        let assembled = assembler
            .with_tariffs(table, Site::default())
            .assemble(&topology)
            .unwrap();

        assert_eq!(assembled.subsidies.keys().collect::<Vec<_>>(), vec!["boiler"]);
        assert!(assembled.model.disjunction("tariff_boiler").is_some());
        assert!(assembled.model.disjunction("tariff_rad").is_none());
    }

    #[test]
    fn test_missing_profile_is_reported() {
        let (topology, _) = heating(vec![1.0]);
        let assembler = Assembler::new(1, Economics::default(), Profiles::new());
        assert_eq!(
            assembler.assemble(&topology).unwrap_err(),
            ModelError::MissingProfile("rad".to_string())
        );
    }
}
