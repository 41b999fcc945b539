//! CPLEX LP export for external solvers.
//!
//! Variables are written as `x<i>` and constraints as `c<i>` (registration
//! order) because generated names contain brackets and dots that not every
//! LP reader accepts. [`crate::diagnostics::NameMap`] maps them back.

use std::io::{self, Write};

use super::builder::{Model, Sense, VarKind};
use super::expr::LinExpr;

pub fn var_alias(index: usize) -> String {
    format!("x{index}")
}

pub fn constraint_alias(index: usize) -> String {
    format!("c{index}")
}

fn write_expr<W: Write>(out: &mut W, expr: &LinExpr) -> io::Result<()> {
    if expr.terms().is_empty() {
        // LP readers need at least one term
        return write!(out, " 0 {}", var_alias(0));
    }
    for (i, &(var, coef)) in expr.terms().iter().enumerate() {
        let alias = var_alias(var.index());
        if i == 0 && coef >= 0.0 {
            write!(out, " {coef} {alias}")?;
        } else {
            let sign = if coef < 0.0 { '-' } else { '+' };
            write!(out, " {sign} {} {alias}", coef.abs())?;
        }
    }
    Ok(())
}

/// Write `model` in CPLEX LP format. The objective constant is dropped.
pub fn write_lp<W: Write>(model: &Model, out: &mut W) -> io::Result<()> {
    writeln!(out, "\\ bemopt model, {} time steps", model.time_steps())?;
    writeln!(out, "Minimize")?;
    write!(out, " obj:")?;
    write_expr(out, model.objective())?;
    writeln!(out)?;

    writeln!(out, "Subject To")?;
    for (i, c) in model.constraints().iter().enumerate() {
        write!(out, " {}:", constraint_alias(i))?;
        write_expr(out, &c.lhs)?;
        let sense = match c.sense {
            Sense::Le => "<=",
            Sense::Eq => "=",
            Sense::Ge => ">=",
        };
        writeln!(out, " {} {}", sense, c.rhs)?;
    }

    writeln!(out, "Bounds")?;
    for (i, v) in model.variables().iter().enumerate() {
        if v.kind == VarKind::Binary {
            continue;
        }
        let alias = var_alias(i);
        match (v.lower, v.upper) {
            (None, None) => writeln!(out, " {alias} free")?,
            (Some(lo), None) => writeln!(out, " {alias} >= {lo}")?,
            (None, Some(hi)) => writeln!(out, " -inf <= {alias} <= {hi}")?,
            (Some(lo), Some(hi)) => writeln!(out, " {lo} <= {alias} <= {hi}")?,
        }
    }

    let of_kind = |kind: VarKind| {
        model
            .variables()
            .iter()
            .enumerate()
            .filter(move |(_, v)| v.kind == kind)
            .map(|(i, _)| var_alias(i))
            .collect::<Vec<_>>()
    };
    let generals = of_kind(VarKind::Integer);
    if !generals.is_empty() {
        writeln!(out, "Generals")?;
        writeln!(out, " {}", generals.join(" "))?;
    }
    let binaries = of_kind(VarKind::Binary);
    if !binaries.is_empty() {
        writeln!(out, "Binaries")?;
        writeln!(out, " {}", binaries.join(" "))?;
    }
    writeln!(out, "End")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelBuilder, VarDef};

    #[test]
    fn test_lp_sections() {
        let mut builder = ModelBuilder::new(1);
        let x = builder.add_var("size_boiler", VarDef::free().bounds(0.0, 20.0)).unwrap();
        let y = builder.add_var("built_boiler", VarDef::binary()).unwrap();
        builder.constrain("link", x - 20.0 * y, Sense::Le, 0.0).unwrap();
        builder.add_cost(3.0 * x + 100.0 * y);

        let mut buf = Vec::new();
        write_lp(&builder.finish(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains(" obj: 3 x0 + 100 x1"));
        assert!(text.contains(" c0: 1 x0 - 20 x1 <= 0"));
        assert!(text.contains(" 0 <= x0 <= 20"));
        assert!(text.contains("Binaries\n x1"));
        assert!(text.trim_end().ends_with("End"));
    }
}
