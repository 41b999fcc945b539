//! Time series profiles, one numeric column per profile.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{open, parse_number};
use crate::domain::Profiles;
use crate::error::InputError;

const TABLE: &str = "profiles";

fn is_time_column(name: &str) -> bool {
    name.eq_ignore_ascii_case("t") || name.eq_ignore_ascii_case("time")
}

pub fn read_profiles<R: Read>(reader: R) -> Result<Profiles, InputError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();
    let columns: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(_, name)| !is_time_column(name))
        .map(|(i, name)| (i, name.to_string()))
        .collect();

    let mut values = vec![Vec::new(); columns.len()];
    for (row, record) in csv.records().enumerate() {
        let record = record?;
        for ((i, name), series) in columns.iter().zip(values.iter_mut()) {
            let cell = record.get(*i).unwrap_or("");
            let value =
                parse_number(TABLE, row, name, cell)?.ok_or_else(|| InputError::InvalidValue {
                    table: TABLE.to_string(),
                    row,
                    column: name.clone(),
                    value: String::new(),
                })?;
            series.push(value);
        }
    }

    let mut profiles = Profiles::new();
    for ((_, name), series) in columns.into_iter().zip(values) {
        profiles.insert(name, series);
    }
    Ok(profiles)
}

pub fn load_profiles(path: &Path) -> Result<Profiles> {
    let profiles = read_profiles(open(path)?)
        .with_context(|| format!("reading profiles {}", path.display()))?;
    info!(
        path = %path.display(),
        profiles = profiles.names().count(),
        "loaded profiles"
    );
    Ok(profiles)
}
