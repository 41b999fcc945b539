//! Investment subsidies granted by regional tariff tables.
//!
//! A tariff row grants `coefficient * size + constant` for a component type
//! when the installed size falls in the row's bracket. The rows applying to
//! a component become the disjuncts of one disjunction, so the optimizer
//! picks exactly one bracket.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{Component, ComponentVars, Economics};
use crate::error::ModelError;
use crate::model::{Disjunct, LinExpr, ModelBuilder, Sense, VarDef, VarId};

/// Where the building is located, used to select tariff rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Site {
    pub state: String,
    pub city: String,
    pub building_type: String,
}

/// One subsidy bracket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffRow {
    pub state: String,
    pub city: String,
    pub building_type: String,
    /// Component type the subsidy applies to
    pub component: String,
    pub min_area: f64,
    #[serde(default)]
    pub max_area: Option<f64>,
    pub coefficient: f64,
    pub constant: f64,
}

/// Blank fields match anything
fn field_matches(field: &str, value: &str) -> bool {
    field.is_empty() || field.eq_ignore_ascii_case(value)
}

impl TariffRow {
    pub fn applies_to(&self, site: &Site, type_name: &str) -> bool {
        field_matches(&self.state, &site.state)
            && field_matches(&self.city, &site.city)
            && field_matches(&self.building_type, &site.building_type)
            && self.component.eq_ignore_ascii_case(type_name)
    }

    fn subsidy_at(&self, size: f64) -> f64 {
        self.coefficient * size + self.constant
    }

    /// Part of the size range `lower..=upper` this row's bracket covers
    fn bracket_within(&self, lower: f64, upper: f64) -> Option<(f64, f64)> {
        let lo = lower.max(self.min_area);
        let hi = self.max_area.map_or(upper, |max| upper.min(max));
        (lo <= hi).then_some((lo, hi))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffTable {
    pub rows: Vec<TariffRow>,
}

impl TariffTable {
    pub fn new(rows: Vec<TariffRow>) -> Self {
        Self { rows }
    }

    /// Rows applying to a component type at `site`, in table order
    pub fn matching<'a>(
        &'a self,
        site: &'a Site,
        type_name: &'a str,
    ) -> impl Iterator<Item = &'a TariffRow> + 'a {
        self.rows.iter().filter(move |row| row.applies_to(site, type_name))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Register the subsidy variable and tariff disjunction of `component`.
///
/// A selected bracket caps the subsidy at `coefficient * size + constant`,
/// and the subsidy never exceeds the investment it pays for. The constant
/// is only granted together with the build decision when there is one.
/// Rows whose bracket lies outside the size range are left out. Without any
/// remaining row a single default disjunct fixes the subsidy to zero.
/// Returns the subsidy variable.
pub fn add_subsidy_disjunction(
    component: &Component,
    vars: &ComponentVars,
    rows: &[&TariffRow],
    economics: &Economics,
    builder: &mut ModelBuilder,
) -> Result<VarId, ModelError> {
    let name = &component.name;
    let size = vars.size(name)?;
    let invest = vars.invest.ok_or_else(|| ModelError::MissingProperty {
        component: name.clone(),
        property: "invest",
    })?;

    let brackets: Vec<(&TariffRow, f64, f64)> = rows
        .iter()
        .filter_map(|&row| {
            let (lo, hi) = row.bracket_within(component.size.lower(), component.size.upper())?;
            Some((row, lo, hi))
        })
        .collect();
    if brackets.len() < rows.len() {
        debug!(
            component = %name,
            skipped = rows.len() - brackets.len(),
            "tariff brackets outside the size range"
        );
    }

    // linear in size, so each bracket is spanned by its endpoints
    let (low, high) = brackets
        .iter()
        .flat_map(|(row, lo, hi)| {
            [lo, hi].map(|&x| [row.coefficient * x, row.subsidy_at(x)])
        })
        .flatten()
        .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let subsidy = builder.add_var(format!("subsidy_{name}"), VarDef::free().bounds(low, high))?;

    let disjuncts = if brackets.is_empty() {
        vec![Disjunct::new(format!("tariff_{name}_none")).with("subsidy", subsidy, Sense::Eq, 0.0)]
    } else {
        brackets
            .iter()
            .enumerate()
            .map(|(i, (row, _, _))| {
                let constant = match vars.built {
                    Some(built) => row.constant * built,
                    None => LinExpr::from(row.constant),
                };
                let mut disjunct = Disjunct::new(format!("tariff_{name}_{i}"))
                    .with("min_area", size, Sense::Ge, row.min_area)
                    .with("subsidy", subsidy, Sense::Le, row.coefficient * size + constant);
                if let Some(max_area) = row.max_area {
                    disjunct = disjunct.with("max_area", size, Sense::Le, max_area);
                }
                disjunct
            })
            .collect()
    };

    debug!(component = %name, brackets = brackets.len(), "adding tariff disjunction");
    builder.add_disjunction(&format!("tariff_{name}"), disjuncts)?;
    builder.constrain(format!("subsidy_cap_{name}"), subsidy, Sense::Le, invest)?;

    let lifetime = component
        .properties
        .lifetime_years
        .unwrap_or(economics.lifetime_years);
    builder.add_cost(-economics.annuity_factor(lifetime) * subsidy);
    Ok(subsidy)
}
