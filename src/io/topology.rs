//! Topology matrix.
//!
//! One row per component: `name,type,model,min_size,max_size,current_size`
//! followed by one column per component name. A non-zero cell means the row
//! component feeds the column component.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use super::{column_index, open, parse_number};
use crate::domain::SizeBounds;
use crate::error::InputError;
use crate::topology::{ComponentSpec, Connection};

const TABLE: &str = "topology";
const FIXED_COLUMNS: [&str; 6] = ["name", "type", "model", "min_size", "max_size", "current_size"];

pub fn read_topology<R: Read>(
    reader: R,
) -> Result<(Vec<ComponentSpec>, Vec<Connection>), InputError> {
    let mut csv = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = csv.headers()?.clone();
    let fixed = FIXED_COLUMNS
        .iter()
        .map(|column| column_index(&headers, TABLE, column))
        .collect::<Result<Vec<_>, _>>()?;
    let matrix: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| !fixed.contains(i))
        .map(|(i, h)| (i, h.to_string()))
        .collect();

    let mut specs = Vec::new();
    let mut cells = Vec::new();
    for (row, record) in csv.records().enumerate() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("");
        let number = |k: usize| parse_number(TABLE, row, FIXED_COLUMNS[k], field(fixed[k]));

        let name = field(fixed[0]).to_string();
        let model = Some(field(fixed[2]))
            .filter(|m| !m.is_empty())
            .map(str::to_string);
        let size = SizeBounds::new(
            number(3)?.unwrap_or(0.0),
            number(4)?.unwrap_or(0.0),
            number(5)?.unwrap_or(0.0),
        );

        for (i, target) in &matrix {
            if parse_number(TABLE, row, target, field(*i))?.unwrap_or(0.0) != 0.0 {
                cells.push(Connection::new(name.clone(), target.clone()));
            }
        }
        specs.push(ComponentSpec {
            name,
            type_name: field(fixed[1]).to_string(),
            model,
            size,
        });
    }

    if let Some((_, unknown)) = matrix
        .iter()
        .find(|(_, target)| !specs.iter().any(|s| &s.name == target))
    {
        return Err(InputError::UnknownTopologyColumn(unknown.clone()));
    }
    Ok((specs, cells))
}

pub fn load_topology(path: &Path) -> Result<(Vec<ComponentSpec>, Vec<Connection>)> {
    let (specs, connections) =
        read_topology(open(path)?).with_context(|| format!("reading topology {}", path.display()))?;
    info!(
        path = %path.display(),
        components = specs.len(),
        connections = connections.len(),
        "loaded topology"
    );
    Ok((specs, connections))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MATRIX: &str = "\
name,type,model,min_size,max_size,current_size,gas,boiler,rad
gas,GasGrid,,0,0,0,0,1,0
boiler,Boiler,B-20,0,40,10,0,0,1
rad,Radiator,,,,,0,0,0
";

    #[test]
    fn test_matrix_cells_become_connections() {
        let (specs, connections) = read_topology(MATRIX.as_bytes()).unwrap();

        assert_eq!(specs.len(), 3);
        assert_eq!(specs[1].model.as_deref(), Some("B-20"));
        assert_eq!(specs[1].size, SizeBounds::new(0.0, 40.0, 10.0));
        assert_eq!(specs[0].model, None);
        assert_eq!(
            connections,
            vec![Connection::new("gas", "boiler"), Connection::new("boiler", "rad")]
        );
    }

    #[test]
    fn test_unknown_column_rejected() {
        let text = "name,type,model,min_size,max_size,current_size,pump\nb,Boiler,,0,1,0,0\n";
        assert!(matches!(
            read_topology(text.as_bytes()),
            Err(InputError::UnknownTopologyColumn(c)) if c == "pump"
        ));
    }

    #[test]
    fn test_missing_fixed_column_rejected() {
        let text = "name,type,min_size,max_size,current_size\n";
        assert!(matches!(
            read_topology(text.as_bytes()),
            Err(InputError::MissingColumn { column, .. }) if column == "model"
        ));
    }
}
