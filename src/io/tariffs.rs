use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::open;
use crate::error::InputError;
use crate::tariffs::{TariffRow, TariffTable};

/// Read `state,city,building_type,component,min_area,max_area,coefficient,constant`.
/// A blank `max_area` leaves the bracket open.
pub fn read_tariffs<R: Read>(reader: R) -> Result<TariffTable, InputError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = csv.deserialize().collect::<Result<Vec<TariffRow>, _>>()?;
    Ok(TariffTable::new(rows))
}

pub fn load_tariffs(path: &Path) -> Result<TariffTable> {
    let table = read_tariffs(open(path)?)
        .with_context(|| format!("reading tariffs {}", path.display()))?;
    info!(path = %path.display(), rows = table.len(), "loaded tariff table");
    Ok(table)
}
