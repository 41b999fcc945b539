//! Mapping the generic names of an exported LP file back to model names.
//!
//! External solvers report infeasible subsystems in terms of the `x<i>` and
//! `c<i>` aliases written by [`write_lp`](crate::model::write_lp). A
//! [`NameMap`] saved next to the LP file lets [`remap_names`] restore the
//! readable names.

use std::collections::BTreeMap;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::InputError;
use crate::model::Model;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NameKind {
    Variable,
    Constraint,
}

#[derive(Debug, Serialize, Deserialize)]
struct NameRow {
    kind: NameKind,
    index: usize,
    name: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameMap {
    variables: BTreeMap<usize, String>,
    constraints: BTreeMap<usize, String>,
}

impl NameMap {
    pub fn from_model(model: &Model) -> Self {
        Self {
            variables: model
                .variables()
                .iter()
                .enumerate()
                .map(|(i, v)| (i, v.name.clone()))
                .collect(),
            constraints: model
                .constraints()
                .iter()
                .enumerate()
                .map(|(i, c)| (i, c.name.clone()))
                .collect(),
        }
    }

    pub fn variable(&self, index: usize) -> Option<&str> {
        self.variables.get(&index).map(String::as_str)
    }

    pub fn constraint(&self, index: usize) -> Option<&str> {
        self.constraints.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.variables.len() + self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Write `kind,index,name` rows
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), InputError> {
        let mut csv = csv::Writer::from_writer(writer);
        let rows = self
            .variables
            .iter()
            .map(|(i, n)| (NameKind::Variable, i, n))
            .chain(self.constraints.iter().map(|(i, n)| (NameKind::Constraint, i, n)));
        for (kind, index, name) in rows {
            csv.serialize(NameRow {
                kind,
                index: *index,
                name: name.clone(),
            })?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn read_csv<R: Read>(reader: R) -> Result<Self, InputError> {
        let mut csv = csv::Reader::from_reader(reader);
        let mut map = Self::default();
        for row in csv.deserialize::<NameRow>() {
            let row = row?;
            match row.kind {
                NameKind::Variable => map.variables.insert(row.index, row.name),
                NameKind::Constraint => map.constraints.insert(row.index, row.name),
            };
        }
        Ok(map)
    }
}

/// Replace every `x<i>` and `c<i>` token of `text` with its model name.
///
/// A token is a maximal run of alphanumerics, `_`, `.`, `[` and `]`.
/// Tokens with unknown indices are left as they are.
pub fn remap_names(text: &str, map: &NameMap) -> String {
    let is_token_char = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '[' | ']');

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(is_token_char) {
        out.push_str(&rest[..start]);
        let token_rest = &rest[start..];
        let end = token_rest.find(|c: char| !is_token_char(c)).unwrap_or(token_rest.len());
        let token = &token_rest[..end];
        out.push_str(resolve(token, map).unwrap_or(token));
        rest = &token_rest[end..];
    }
    out.push_str(rest);
    out
}

fn resolve<'a>(token: &str, map: &'a NameMap) -> Option<&'a str> {
    let prefix = token.get(..1)?;
    let digits = token.get(1..)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let index = digits.parse().ok()?;
    match prefix {
        "x" => map.variable(index),
        "c" => map.constraint(index),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelBuilder, Sense, VarDef};

    fn model() -> Model {
        let mut builder = ModelBuilder::new(2);
        let s = builder.add_series("output_heat_b", VarDef::non_negative()).unwrap();
        builder.constrain("demand_rad[0]", s.at(0), Sense::Eq, 4.0).unwrap();
        builder.finish()
    }

    #[test]
    fn test_remap_listing() {
        let map = NameMap::from_model(&model());
        let listing = "Infeasible set:\n c0: x1 >= 4\n x17 unknown, max2 kept\n";
        assert_eq!(
            remap_names(listing, &map),
            "Infeasible set:\n demand_rad[0]: output_heat_b[1] >= 4\n x17 unknown, max2 kept\n"
        );
    }

    #[test]
    fn test_name_map_csv() {
        let map = NameMap::from_model(&model());
        let mut buffer = Vec::new();
        map.write_csv(&mut buffer).unwrap();

        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("kind,index,name\nvariable,0,output_heat_b[0]\n"));
        assert!(text.contains("constraint,0,demand_rad[0]"));
        assert_eq!(NameMap::read_csv(buffer.as_slice()).unwrap(), map);
    }
}
