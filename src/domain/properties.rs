use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Installed size range of a component (kW, kWh or m² depending on the type)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeBounds {
    pub min: f64,
    pub max: f64,
    /// Already installed size; never removed by the optimizer
    pub current: f64,
}

impl SizeBounds {
    pub fn new(min: f64, max: f64, current: f64) -> Self {
        Self { min, max, current }
    }

    /// Lower bound of the size variable
    pub fn lower(&self) -> f64 {
        self.min.max(self.current)
    }

    pub fn upper(&self) -> f64 {
        self.max.max(self.lower())
    }
}

impl Default for SizeBounds {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            current: 0.0,
        }
    }
}

/// Cost and efficiency coefficients of a component model.
///
/// Loaded from the model table; every field is optional because each
/// component type reads only the coefficients its constraints need.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentProperties {
    #[serde(default)]
    pub efficiency: Option<f64>,
    #[serde(default)]
    pub thermal_efficiency: Option<f64>,
    #[serde(default)]
    pub electrical_efficiency: Option<f64>,
    #[serde(default)]
    pub cop: Option<f64>,
    /// Standing loss of a storage, fraction of the stored energy per step
    #[serde(default)]
    pub loss_rate: Option<f64>,
    #[serde(default)]
    pub charge_efficiency: Option<f64>,
    /// Investment cost per unit of size
    #[serde(default)]
    pub specific_cost: Option<f64>,
    #[serde(default)]
    pub fixed_cost: Option<f64>,
    #[serde(default)]
    pub lifetime_years: Option<u32>,
    /// Purchase price overriding the configured commodity price
    #[serde(default)]
    pub energy_price: Option<f64>,
    #[serde(default)]
    pub feed_in_price: Option<f64>,
}

/// Named coefficient of a [`ComponentProperties`] record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Coefficient {
    Efficiency,
    ThermalEfficiency,
    ElectricalEfficiency,
    Cop,
}

impl Coefficient {
    pub fn name(&self) -> &'static str {
        match self {
            Coefficient::Efficiency => "efficiency",
            Coefficient::ThermalEfficiency => "thermal_efficiency",
            Coefficient::ElectricalEfficiency => "electrical_efficiency",
            Coefficient::Cop => "cop",
        }
    }
}

impl ComponentProperties {
    pub fn coefficient(&self, key: Coefficient) -> Option<f64> {
        match key {
            Coefficient::Efficiency => self.efficiency,
            Coefficient::ThermalEfficiency => self.thermal_efficiency,
            Coefficient::ElectricalEfficiency => self.electrical_efficiency,
            Coefficient::Cop => self.cop,
        }
    }

    /// Look up a coefficient the constraints of `component` cannot do without
    pub fn require(&self, component: &str, key: Coefficient) -> Result<f64, ModelError> {
        self.coefficient(key).ok_or_else(|| ModelError::MissingProperty {
            component: component.to_string(),
            property: key.name(),
        })
    }
}
