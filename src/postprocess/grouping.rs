//! Regrouping flat `var,value` rows into named series.

use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::debug;

/// Split `base[t]` into its base name and time index
pub fn split_index(name: &str) -> Option<(&str, usize)> {
    let inner = name.strip_suffix(']')?;
    let open = inner.rfind('[')?;
    let t = inner[open + 1..].parse().ok()?;
    Some((&inner[..open], t))
}

/// Group result rows by base name, values ordered by time index.
///
/// Names without an index become groups of length one.
pub fn group_series(results: &[(String, f64)]) -> BTreeMap<String, Vec<f64>> {
    let mut indexed: BTreeMap<String, Vec<(usize, f64)>> = BTreeMap::new();
    for (name, value) in results {
        let (base, t) = split_index(name).unwrap_or((name.as_str(), 0));
        indexed.entry(base.to_string()).or_default().push((t, *value));
    }

    indexed
        .into_iter()
        .map(|(base, mut values)| {
            values.sort_by_key(|(t, _)| *t);
            (base, values.into_iter().map(|(_, v)| v).collect())
        })
        .collect()
}

/// Pick the period shared by most time series.
///
/// Candidates are the distinct lengths above one; the one evenly dividing
/// the most series wins, ties going to the larger length.
pub fn elect_period(lengths: impl IntoIterator<Item = usize>) -> Option<usize> {
    let lengths: Vec<usize> = lengths.into_iter().filter(|&l| l > 1).collect();
    lengths
        .iter()
        .copied()
        .unique()
        .max_by_key(|&p| (lengths.iter().filter(|&&l| l % p == 0).count(), p))
}

/// Groups sorted into scalars and time series
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitResults {
    pub period: Option<usize>,
    pub series: BTreeMap<String, Vec<f64>>,
    pub scalars: BTreeMap<String, f64>,
    /// Series whose length is not a multiple of the period
    pub dropped: Vec<String>,
}

pub fn split_results(groups: BTreeMap<String, Vec<f64>>, period: Option<usize>) -> SplitResults {
    let mut split = SplitResults {
        period,
        ..Default::default()
    };
    for (name, values) in groups {
        if values.len() == 1 {
            split.scalars.insert(name, values[0]);
        } else if period.is_some_and(|p| values.len() % p == 0) {
            split.series.insert(name, values);
        } else {
            debug!(series = %name, len = values.len(), ?period, "dropping series off the period");
            split.dropped.push(name);
        }
    }
    split
}
