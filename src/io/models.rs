//! Component model catalog and catalog prices.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, info, warn};

use super::{column_index, open, parse_number};
use crate::costs::CostCurve;
use crate::domain::ComponentProperties;
use crate::error::InputError;

const MODELS: &str = "models";

const PROPERTY_COLUMNS: &[&str] = &[
    "efficiency",
    "thermal_efficiency",
    "electrical_efficiency",
    "cop",
    "loss_rate",
    "charge_efficiency",
    "specific_cost",
    "fixed_cost",
    "energy_price",
    "feed_in_price",
    "lifetime_years",
];

fn is_property(column: &str) -> bool {
    PROPERTY_COLUMNS.iter().any(|p| p.eq_ignore_ascii_case(column))
}

/// Store a numeric cell under its property column. Returns false for
/// columns that are not a known property.
fn set_property(properties: &mut ComponentProperties, column: &str, value: f64) -> bool {
    let slot = match column.to_ascii_lowercase().as_str() {
        "efficiency" => &mut properties.efficiency,
        "thermal_efficiency" => &mut properties.thermal_efficiency,
        "electrical_efficiency" => &mut properties.electrical_efficiency,
        "cop" => &mut properties.cop,
        "loss_rate" => &mut properties.loss_rate,
        "charge_efficiency" => &mut properties.charge_efficiency,
        "specific_cost" => &mut properties.specific_cost,
        "fixed_cost" => &mut properties.fixed_cost,
        "energy_price" => &mut properties.energy_price,
        "feed_in_price" => &mut properties.feed_in_price,
        "lifetime_years" => {
            properties.lifetime_years = Some(value.round().max(1.0) as u32);
            return true;
        }
        _ => return false,
    };
    *slot = Some(value);
    true
}

/// Read `model,<property columns>` into one property record per model.
///
/// Unknown columns such as manufacturer or notes are ignored unparsed.
pub fn read_models<R: Read>(
    reader: R,
) -> Result<BTreeMap<String, ComponentProperties>, InputError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();
    let key = column_index(&headers, MODELS, "model")?;

    let (properties, skipped): (Vec<_>, Vec<_>) = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != key)
        .partition(|(_, column)| is_property(column));
    if !skipped.is_empty() {
        let columns: Vec<&str> = skipped.iter().map(|(_, column)| *column).collect();
        warn!(?columns, "ignoring unknown model property columns");
    }

    let mut catalog = BTreeMap::new();
    for (row, record) in csv.records().enumerate() {
        let record = record?;
        let mut model = ComponentProperties::default();
        for &(i, column) in &properties {
            let cell = record.get(i).unwrap_or("");
            if let Some(value) = parse_number(MODELS, row, column, cell)? {
                set_property(&mut model, column, value);
            }
        }
        catalog.insert(record.get(key).unwrap_or("").to_string(), model);
    }
    Ok(catalog)
}

pub fn load_models(path: &Path) -> Result<BTreeMap<String, ComponentProperties>> {
    let catalog = read_models(open(path)?)
        .with_context(|| format!("reading models {}", path.display()))?;
    info!(path = %path.display(), models = catalog.len(), "loaded model catalog");
    Ok(catalog)
}

/// One catalog price quote
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceRow {
    pub model: String,
    pub size: f64,
    pub price: f64,
}

pub fn read_prices<R: Read>(reader: R) -> Result<Vec<PriceRow>, InputError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = csv.deserialize().collect::<Result<Vec<PriceRow>, _>>()?;
    Ok(rows)
}

pub fn load_prices(path: &Path) -> Result<Vec<PriceRow>> {
    read_prices(open(path)?).with_context(|| format!("reading prices {}", path.display()))
}

/// Fit a cost curve per model and store it in the catalog.
///
/// Quotes for models missing from the catalog are skipped with a warning.
pub fn apply_price_curves(
    catalog: &mut BTreeMap<String, ComponentProperties>,
    prices: &[PriceRow],
) {
    let rows: Vec<_> = prices
        .iter()
        .map(|p| (p.model.clone(), p.size, p.price))
        .collect();

    for (model, curve) in CostCurve::fit_grouped(&rows) {
        match catalog.get_mut(&model) {
            Some(properties) => {
                debug!(
                    %model,
                    specific = curve.specific_cost,
                    fixed = curve.fixed_cost,
                    "fitted cost curve"
                );
                properties.specific_cost = Some(curve.specific_cost);
                properties.fixed_cost = Some(curve.fixed_cost.max(0.0));
            }
            None => warn!(%model, "price table names a model missing from the catalog"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_models_read_known_columns() {
        let text = "model,efficiency,cop,lifetime_years,noise_db\nB-20,0.92,,15,40\nHP-8,,3.5,,\n";
        let catalog = read_models(text.as_bytes()).unwrap();
        let boiler = &catalog["B-20"];
        assert_eq!(boiler.efficiency, Some(0.92));
        assert_eq!(boiler.cop, None);
        assert_eq!(boiler.lifetime_years, Some(15));
        assert_eq!(catalog["HP-8"].cop, Some(3.5));
    }

    #[test]
    fn test_text_in_unknown_columns_is_ignored() {
        let text = "model,manufacturer,efficiency,notes\nB-20,Acme Heating,0.92,wall mounted\n";
        let catalog = read_models(text.as_bytes()).unwrap();
        assert_eq!(catalog["B-20"].efficiency, Some(0.92));

        // known columns still reject text
        let text = "model,efficiency\nB-20,high\n";
        assert!(read_models(text.as_bytes()).is_err());
    }

    #[test]
    fn test_price_curves_update_catalog() {
        let mut catalog = BTreeMap::new();
        catalog.insert("B-20".to_string(), ComponentProperties::default());
        let text = "model,size,price\nB-20,10,1500\nB-20,20,2500\nX,5,100\n";
        let prices = read_prices(text.as_bytes()).unwrap();
        assert_eq!(prices.len(), 3);

        apply_price_curves(&mut catalog, &prices);
        let boiler = &catalog["B-20"];
        assert!((boiler.specific_cost.unwrap() - 100.0).abs() < 1e-9);
        assert!((boiler.fixed_cost.unwrap() - 500.0).abs() < 1e-9);
        assert!(!catalog.contains_key("X"));
    }
}
