use serde::{Deserialize, Serialize};

use crate::domain::{Commodity, Profiles};
use crate::topology::FlowTable;

/// Prices and financial parameters shared by all components of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Economics {
    /// Length of one time step (h)
    pub step_hours: f64,
    /// Scales the modelled horizon to one year of operation
    pub operation_weight: f64,
    pub interest_rate: f64,
    pub lifetime_years: u32,
    pub gas_price: f64,
    pub electricity_price: f64,
    pub feed_in_price: f64,
}

impl Default for Economics {
    fn default() -> Self {
        Self {
            step_hours: 1.0,
            operation_weight: 1.0,
            interest_rate: 0.0,
            lifetime_years: 20,
            gas_price: 0.0,
            electricity_price: 0.0,
            feed_in_price: 0.0,
        }
    }
}

impl Economics {
    /// Capital recovery factor turning an investment into a yearly cost
    pub fn annuity_factor(&self, lifetime_years: u32) -> f64 {
        let n = lifetime_years.max(1) as f64;
        let i = self.interest_rate;
        if i.abs() < f64::EPSILON {
            return 1.0 / n;
        }
        let q = (1.0 + i).powf(n);
        i * q / (q - 1.0)
    }

    pub fn commodity_price(&self, commodity: Commodity) -> Option<f64> {
        match commodity {
            Commodity::Gas => Some(self.gas_price),
            Commodity::Electricity => Some(self.electricity_price),
            Commodity::Heat | Commodity::Solar => None,
        }
    }

    /// Weight of one step of power in the yearly objective
    pub fn step_weight(&self) -> f64 {
        self.step_hours * self.operation_weight
    }
}

/// Everything a component needs to register its constraints
#[derive(Debug, Clone, Copy)]
pub struct AssemblyContext<'a> {
    pub flows: &'a FlowTable,
    pub profiles: &'a Profiles,
    pub economics: &'a Economics,
}
