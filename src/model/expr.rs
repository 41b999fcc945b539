use std::collections::BTreeMap;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Handle of a decision variable, returned when the variable is registered
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in registration order
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Affine expression `Σ coef * var + constant`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn term(var: VarId, coef: f64) -> Self {
        Self {
            terms: vec![(var, coef)],
            constant: 0.0,
        }
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Total coefficient of `var`, summing repeated terms
    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms
            .iter()
            .filter(|(v, _)| *v == var)
            .map(|(_, c)| c)
            .sum()
    }

    pub fn references(&self, var: VarId) -> bool {
        self.terms.iter().any(|(v, c)| *v == var && *c != 0.0)
    }

    /// Merge repeated variables and drop zero coefficients
    pub fn simplified(self) -> Self {
        let mut merged: BTreeMap<VarId, f64> = BTreeMap::new();
        for (var, coef) in self.terms {
            *merged.entry(var).or_insert(0.0) += coef;
        }
        Self {
            terms: merged.into_iter().filter(|(_, c)| *c != 0.0).collect(),
            constant: self.constant,
        }
    }

    pub fn evaluate(&self, value: impl Fn(VarId) -> f64) -> f64 {
        self.constant + self.terms.iter().map(|(v, c)| c * value(*v)).sum::<f64>()
    }

    pub(crate) fn without_constant(mut self) -> (Self, f64) {
        let constant = self.constant;
        self.constant = 0.0;
        (self, constant)
    }
}

impl From<VarId> for LinExpr {
    fn from(var: VarId) -> Self {
        LinExpr::term(var, 1.0)
    }
}

impl From<f64> for LinExpr {
    fn from(constant: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant,
        }
    }
}

impl AddAssign<LinExpr> for LinExpr {
    fn add_assign(&mut self, rhs: LinExpr) {
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl SubAssign<LinExpr> for LinExpr {
    fn sub_assign(&mut self, rhs: LinExpr) {
        *self += -rhs;
    }
}

impl<T: Into<LinExpr>> Add<T> for LinExpr {
    type Output = LinExpr;

    fn add(mut self, rhs: T) -> LinExpr {
        self += rhs.into();
        self
    }
}

impl<T: Into<LinExpr>> Sub<T> for LinExpr {
    type Output = LinExpr;

    fn sub(mut self, rhs: T) -> LinExpr {
        self -= rhs.into();
        self
    }
}

impl<T: Into<LinExpr>> Add<T> for VarId {
    type Output = LinExpr;

    fn add(self, rhs: T) -> LinExpr {
        LinExpr::from(self) + rhs
    }
}

impl<T: Into<LinExpr>> Sub<T> for VarId {
    type Output = LinExpr;

    fn sub(self, rhs: T) -> LinExpr {
        LinExpr::from(self) - rhs
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;

    fn neg(self) -> LinExpr {
        self * -1.0
    }
}

impl Mul<f64> for LinExpr {
    type Output = LinExpr;

    fn mul(mut self, rhs: f64) -> LinExpr {
        for (_, coef) in &mut self.terms {
            *coef *= rhs;
        }
        self.constant *= rhs;
        self
    }
}

impl Mul<VarId> for f64 {
    type Output = LinExpr;

    fn mul(self, rhs: VarId) -> LinExpr {
        LinExpr::term(rhs, self)
    }
}

impl Mul<LinExpr> for f64 {
    type Output = LinExpr;

    fn mul(self, rhs: LinExpr) -> LinExpr {
        rhs * self
    }
}

impl Sum<LinExpr> for LinExpr {
    fn sum<I: Iterator<Item = LinExpr>>(iter: I) -> Self {
        iter.fold(LinExpr::new(), |mut acc, e| {
            acc += e;
            acc
        })
    }
}

impl Sum<VarId> for LinExpr {
    fn sum<I: Iterator<Item = VarId>>(iter: I) -> Self {
        iter.map(LinExpr::from).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operators_build_affine_expression() {
        let (x, y) = (VarId(0), VarId(1));
        let expr = 2.0 * x + y - 0.5 * x + 3.0;

        assert_eq!(expr.coefficient(x), 1.5);
        assert_eq!(expr.coefficient(y), 1.0);
        assert_eq!(expr.constant(), 3.0);
        assert_eq!(expr.evaluate(|v| if v == x { 2.0 } else { 4.0 }), 10.0);
    }

    #[test]
    fn test_simplified_merges_and_drops_zeros() {
        let (x, y) = (VarId(0), VarId(1));
        let expr = (x + y - x).simplified();
        assert_eq!(expr.terms(), &[(y, 1.0)]);
        assert!(!expr.references(x));
    }

    #[test]
    fn test_sum_of_vars() {
        let expr: LinExpr = [VarId(3), VarId(4)].into_iter().sum();
        assert_eq!(expr.terms().len(), 2);
        assert_eq!(expr.constant(), 0.0);
    }
}
