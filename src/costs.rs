//! Linear investment cost curves fitted to catalog prices.

use std::hash::Hash;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// `cost(size) = specific_cost * size + fixed_cost`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostCurve {
    pub specific_cost: f64,
    pub fixed_cost: f64,
}

impl CostCurve {
    /// Least-squares fit through `(size, price)` points.
    ///
    /// A single point, or points all at the same size, give a purely
    /// specific cost through the origin. Returns `None` without points.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let n = points.len() as f64;
        let mean_size = points.iter().map(|(s, _)| s).sum::<f64>() / n;
        let mean_price = points.iter().map(|(_, p)| p).sum::<f64>() / n;

        let spread: f64 = points.iter().map(|(s, _)| (s - mean_size).powi(2)).sum();
        if spread <= f64::EPSILON {
            let specific_cost = if mean_size.abs() > f64::EPSILON {
                mean_price / mean_size
            } else {
                0.0
            };
            return Some(Self {
                specific_cost,
                fixed_cost: 0.0,
            });
        }

        let covariance: f64 = points
            .iter()
            .map(|(s, p)| (s - mean_size) * (p - mean_price))
            .sum();
        let specific_cost = covariance / spread;
        Some(Self {
            specific_cost,
            fixed_cost: mean_price - specific_cost * mean_size,
        })
    }

    /// Fit one curve per key of `(key, size, price)` rows
    pub fn fit_grouped<K: Ord + Hash + Clone>(rows: &[(K, f64, f64)]) -> Vec<(K, Self)> {
        rows.iter()
            .into_group_map_by(|(key, _, _)| key.clone())
            .into_iter()
            .sorted_by(|a, b| a.0.cmp(&b.0))
            .filter_map(|(key, group)| {
                let points: Vec<_> = group.iter().map(|(_, s, p)| (*s, *p)).collect();
                Self::fit(&points).map(|curve| (key, curve))
            })
            .collect()
    }

    pub fn cost(&self, size: f64) -> f64 {
        self.specific_cost * size + self.fixed_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_exact_line_is_recovered() {
        let curve = CostCurve::fit(&[(10.0, 1500.0), (20.0, 2500.0), (40.0, 4500.0)]).unwrap();
        assert!((curve.specific_cost - 100.0).abs() < 1e-9);
        assert!((curve.fixed_cost - 500.0).abs() < 1e-9);
        assert!((curve.cost(30.0) - 3500.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(&[(20.0, 3000.0)], 150.0)]
    #[case(&[(20.0, 2000.0), (20.0, 4000.0)], 150.0)]
    #[case(&[(0.0, 100.0)], 0.0)]
    fn test_degenerate_points_fall_back_to_specific_cost(
        #[case] points: &[(f64, f64)],
        #[case] expected: f64,
    ) {
        let curve = CostCurve::fit(points).unwrap();
        assert_eq!(curve.specific_cost, expected);
        assert_eq!(curve.fixed_cost, 0.0);
    }

    #[test]
    fn test_grouped_fit_per_model() {
        let rows = vec![
            ("b".to_string(), 10.0, 1000.0),
            ("a".to_string(), 5.0, 500.0),
            ("b".to_string(), 20.0, 2000.0),
        ];
        let curves = CostCurve::fit_grouped(&rows);
        assert_eq!(curves.len(), 2);
        assert_eq!(curves[0].0, "a");
        assert!((curves[1].1.specific_cost - 100.0).abs() < 1e-9);
        assert!(CostCurve::fit(&[]).is_none());
    }
}
