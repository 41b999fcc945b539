//! CSV input tables and the result table.
//!
//! Each loader comes as a `read_*` function over any reader, returning typed
//! [`InputError`]s, and a `load_*` wrapper over a file path that adds the
//! path as `anyhow` context.

pub mod models;
pub mod profiles;
pub mod results;
pub mod tariffs;
pub mod topology;

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::InputError;

pub use models::{apply_price_curves, load_models, load_prices, read_models, read_prices, PriceRow};
pub use profiles::{load_profiles, read_profiles};
pub use results::{load_results, read_results, save_results, write_results};
pub use tariffs::{load_tariffs, read_tariffs};
pub use topology::{load_topology, read_topology};

pub(crate) fn open(path: &Path) -> Result<File> {
    File::open(path).with_context(|| format!("opening {}", path.display()))
}

/// Parse an optional numeric cell; blank cells are `None`
pub(crate) fn parse_number(
    table: &str,
    row: usize,
    column: &str,
    value: &str,
) -> Result<Option<f64>, InputError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<f64>()
        .map(Some)
        .map_err(|_| InputError::InvalidValue {
            table: table.to_string(),
            row,
            column: column.to_string(),
            value: value.to_string(),
        })
}

pub(crate) fn column_index(
    headers: &csv::StringRecord,
    table: &str,
    column: &str,
) -> Result<usize, InputError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(column))
        .ok_or_else(|| InputError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        })
}
