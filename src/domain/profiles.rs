use std::collections::BTreeMap;

use crate::error::ModelError;

/// Column name used for collectors without a profile of their own
pub const IRRADIANCE: &str = "irradiance";

/// Named input time series (demands, irradiance), one value per time step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Profiles {
    series: BTreeMap<String, Vec<f64>>,
}

impl Profiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) {
        self.series.insert(name.into(), values);
    }

    pub fn with(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.insert(name, values);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(Vec::as_slice)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Fetch a profile and check it covers exactly `time_steps` steps
    pub fn require(&self, name: &str, time_steps: usize) -> Result<&[f64], ModelError> {
        let values = self
            .get(name)
            .ok_or_else(|| ModelError::MissingProfile(name.to_string()))?;
        if values.len() != time_steps {
            return Err(ModelError::ProfileLength {
                name: name.to_string(),
                actual: values.len(),
                expected: time_steps,
            });
        }
        Ok(values)
    }

    /// Like [`require`](Self::require), falling back to a shared profile
    pub fn require_or(
        &self,
        name: &str,
        fallback: &str,
        time_steps: usize,
    ) -> Result<&[f64], ModelError> {
        if self.get(name).is_some() {
            self.require(name, time_steps)
        } else {
            self.require(fallback, time_steps)
        }
    }
}
