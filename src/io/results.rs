//! The flat `var,value` result table written after a solve.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::open;
use crate::error::InputError;

#[derive(Debug, Serialize, Deserialize)]
struct ResultRow {
    var: String,
    value: f64,
}

pub fn read_results<R: Read>(reader: R) -> Result<Vec<(String, f64)>, InputError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    csv.deserialize::<ResultRow>()
        .map(|row| row.map(|r| (r.var, r.value)).map_err(InputError::from))
        .collect()
}

pub fn write_results<W: Write>(writer: W, results: &[(String, f64)]) -> Result<(), InputError> {
    let mut csv = csv::Writer::from_writer(writer);
    for (var, value) in results {
        csv.serialize(ResultRow {
            var: var.clone(),
            value: *value,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn load_results(path: &Path) -> Result<Vec<(String, f64)>> {
    let results = read_results(open(path)?)
        .with_context(|| format!("reading results {}", path.display()))?;
    info!(path = %path.display(), rows = results.len(), "loaded results");
    Ok(results)
}

pub fn save_results(path: &Path, results: &[(String, f64)]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_results(file, results).with_context(|| format!("writing results {}", path.display()))?;
    info!(path = %path.display(), rows = results.len(), "saved results");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_keep_row_order() {
        let results = vec![
            ("size_b".to_string(), 12.5),
            ("output_heat_b[0]".to_string(), 3.0),
            ("output_heat_b[1]".to_string(), 0.0),
        ];
        let mut buffer = Vec::new();
        write_results(&mut buffer, &results).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("var,value\nsize_b,12.5\n"));
        assert_eq!(read_results(buffer.as_slice()).unwrap(), results);
    }
}
