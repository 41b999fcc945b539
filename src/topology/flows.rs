//! Energy flows between connected components.
//!
//! Every connection of a topology gets one flow series per elected
//! commodity, recorded under its (producer, consumer) pair. Both endpoints
//! later reference the same handles: the producer in its outflow balance,
//! the consumer in its inflow balance.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::Topology;
use crate::components::{Component, FeederElection};
use crate::domain::Commodity;
use crate::error::ModelError;
use crate::model::{ModelBuilder, Series, VarDef};

/// Flow series keyed by (producer, consumer) and commodity
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowTable {
    flows: BTreeMap<(String, String), BTreeMap<Commodity, Series>>,
}

impl FlowTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, from: &str, to: &str, commodity: Commodity) -> Option<&Series> {
        self.flows
            .get(&(from.to_string(), to.to_string()))
            .and_then(|by_commodity| by_commodity.get(&commodity))
    }

    pub fn between(&self, from: &str, to: &str) -> Option<&BTreeMap<Commodity, Series>> {
        self.flows.get(&(from.to_string(), to.to_string()))
    }

    /// Flows of `commodity` delivered to `to`
    pub fn inflows<'a>(
        &'a self,
        to: &'a str,
        commodity: Commodity,
    ) -> impl Iterator<Item = &'a Series> + 'a {
        self.flows
            .iter()
            .filter(move |((_, consumer), _)| consumer == to)
            .filter_map(move |(_, by_commodity)| by_commodity.get(&commodity))
    }

    /// Flows of `commodity` leaving `from`
    pub fn outflows<'a>(
        &'a self,
        from: &'a str,
        commodity: Commodity,
    ) -> impl Iterator<Item = &'a Series> + 'a {
        self.flows
            .iter()
            .filter(move |((producer, _), _)| producer == from)
            .filter_map(move |(_, by_commodity)| by_commodity.get(&commodity))
    }

    /// Every (producer, consumer, commodity, series) entry
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, Commodity, &Series)> {
        self.flows.iter().flat_map(|((from, to), by_commodity)| {
            by_commodity
                .iter()
                .map(move |(c, s)| (from.as_str(), to.as_str(), *c, s))
        })
    }

    /// Number of (producer, consumer, commodity) flows
    pub fn len(&self) -> usize {
        self.flows.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, from: &str, to: &str, commodity: Commodity, series: Series) {
        self.flows
            .entry((from.to_string(), to.to_string()))
            .or_default()
            .insert(commodity, series);
    }
}

/// Commodities carried from `producer` into `consumer`
pub fn elect_commodities(producer: &Component, consumer: &Component) -> Vec<Commodity> {
    let mut accepted = producer
        .outputs()
        .iter()
        .copied()
        .filter(|c| consumer.template.accepts(*c));

    match consumer.template.election {
        FeederElection::SharedCommodities => accepted.collect(),
        // Classify the feeder by what it produces, not by what the consumer
        // declares. The first matching output in the feeder's declaration
        // order wins.
        FeederElection::FirstFeederOutput => accepted.next().into_iter().collect(),
    }
}

/// Create the flow series of every connection in `topology`
pub fn link_flows(
    topology: &Topology,
    builder: &mut ModelBuilder,
) -> Result<FlowTable, ModelError> {
    let mut table = FlowTable::new();

    for connection in &topology.connections {
        let producer = topology.component(&connection.from)?;
        let consumer = topology.component(&connection.to)?;

        let commodities = elect_commodities(producer, consumer);
        if commodities.is_empty() {
            return Err(ModelError::IncompatibleConnection {
                from: connection.from.clone(),
                to: connection.to.clone(),
            });
        }

        for commodity in commodities {
            if table.get(&connection.from, &connection.to, commodity).is_some() {
                continue;
            }
            let series = builder.add_series(
                format!("flow_{commodity}_{}->{}", connection.from, connection.to),
                VarDef::non_negative(),
            )?;
            debug!(from = %connection.from, to = %connection.to, %commodity, "linked flow");
            table.insert(&connection.from, &connection.to, commodity, series);
        }
    }

    info!(
        connections = topology.connections.len(),
        flows = table.len(),
        "linked topology flows"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::test_utils::component;
    use crate::domain::ComponentProperties;
    use crate::topology::Connection;

    fn topology(parts: &[(&str, &str)], connections: &[(&str, &str)]) -> Topology {
        Topology::new(
            parts
                .iter()
                .map(|(name, kind)| component(name, kind, ComponentProperties::default()))
                .collect(),
            connections
                .iter()
                .map(|(from, to)| Connection::new(*from, *to))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_incompatible_connection_rejected() {
        let topo = topology(
            &[("chp", "CHP"), ("grid", "ElectricalGrid"), ("rad", "Radiator")],
            &[("chp", "grid"), ("chp", "rad"), ("grid", "rad")],
        );
        let mut builder = ModelBuilder::new(4);

        let err = link_flows(&topo, &mut builder).unwrap_err();
        assert_eq!(
            err,
            ModelError::IncompatibleConnection {
                from: "grid".to_string(),
                to: "rad".to_string()
            }
        );
    }

    #[test]
    fn test_flow_names_and_count() {
        let topo = topology(
            &[
                ("gas", "GasGrid"),
                ("chp", "CHP"),
                ("grid", "ElectricalGrid"),
                ("rad", "Radiator"),
            ],
            &[("gas", "chp"), ("chp", "grid"), ("chp", "rad"), ("chp", "rad")],
        );
        let mut builder = ModelBuilder::new(4);
        let table = link_flows(&topo, &mut builder).unwrap();

        assert_eq!(table.len(), 3);
        let flow = table.get("chp", "rad", Commodity::Heat).unwrap();
        assert_eq!(flow.len(), 4);
        assert_eq!(builder.model().variable(flow.at(3)).name, "flow_heat_chp->rad[3]");
        assert!(table.get("chp", "grid", Commodity::Electricity).is_some());
        assert_eq!(table.inflows("rad", Commodity::Heat).count(), 1);
        assert_eq!(table.outflows("chp", Commodity::Electricity).count(), 1);
    }

    #[test]
    fn test_underscored_names_get_distinct_flows() {
        let topo = topology(
            &[
                ("a", "Boiler"),
                ("a_b", "Boiler"),
                ("b_c", "Radiator"),
                ("c", "Radiator"),
            ],
            &[("a_b", "c"), ("a", "b_c")],
        );
        let mut builder = ModelBuilder::new(1);
        let table = link_flows(&topo, &mut builder).unwrap();

        assert_eq!(table.len(), 2);
        let model = builder.model();
        assert!(model.var_id("flow_heat_a_b->c[0]").is_some());
        assert!(model.var_id("flow_heat_a->b_c[0]").is_some());
    }

    #[test]
    fn test_through_heater_elects_first_feeder_output() {
        let topo = topology(
            &[("chp", "CHP"), ("grid", "ElectricalGrid"), ("dlh", "ThroughHeater")],
            &[("chp", "dlh"), ("grid", "dlh")],
        );
        let mut builder = ModelBuilder::new(1);
        let table = link_flows(&topo, &mut builder).unwrap();

        // the CHP declares heat first, so it only feeds heat
        let from_chp = table.between("chp", "dlh").unwrap();
        assert_eq!(from_chp.keys().copied().collect::<Vec<_>>(), vec![Commodity::Heat]);
        let from_grid = table.between("grid", "dlh").unwrap();
        assert_eq!(from_grid.keys().copied().collect::<Vec<_>>(), vec![Commodity::Electricity]);
    }

    #[test]
    fn test_shared_commodities_keep_all() {
        let chp = component("chp", "CHP", ComponentProperties::default());
        let mut sink = component("sink", "ThroughHeater", ComponentProperties::default());
        sink.template.election = FeederElection::SharedCommodities;

        assert_eq!(
            elect_commodities(&chp, &sink),
            vec![Commodity::Heat, Commodity::Electricity]
        );
    }
}
