//! Result reports: time series and scalars with sum/max summaries.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use serde::Serialize;
use tracing::{info, warn};

use super::grouping::{elect_period, group_series, split_results};

pub const SERIES_SHEET: &str = "time_series";
pub const SCALARS_SHEET: &str = "scalars";

/// Per-column summary rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub sum: BTreeMap<String, f64>,
    pub max: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub period: Option<usize>,
    pub series: BTreeMap<String, Vec<f64>>,
    pub scalars: BTreeMap<String, f64>,
    pub dropped: Vec<String>,
}

impl Report {
    pub fn from_results(results: &[(String, f64)]) -> Self {
        let groups = group_series(results);
        let period = elect_period(groups.values().map(Vec::len));
        let split = split_results(groups, period);
        if !split.dropped.is_empty() {
            warn!(
                dropped = split.dropped.len(),
                ?period,
                "series not matching the report period were dropped"
            );
        }
        Self {
            period: split.period,
            series: split.series,
            scalars: split.scalars,
            dropped: split.dropped,
        }
    }

    /// Remove series and scalars with every |value| <= `eps`.
    /// Returns how many columns were removed.
    pub fn drop_zero_columns(&mut self, eps: f64) -> usize {
        let before = self.series.len() + self.scalars.len();
        self.series.retain(|_, values| values.iter().any(|v| v.abs() > eps));
        self.scalars.retain(|_, value| value.abs() > eps);
        before - self.series.len() - self.scalars.len()
    }

    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for (name, values) in &self.series {
            summary.sum.insert(name.clone(), values.iter().sum());
            summary
                .max
                .insert(name.clone(), values.iter().copied().fold(f64::NEG_INFINITY, f64::max));
        }
        summary
    }

    /// Number of data rows of the time series table
    pub fn rows(&self) -> usize {
        self.series.values().map(Vec::len).max().unwrap_or(0)
    }

    /// Workbook with a `time_series` and a `scalars` sheet
    pub fn write_xlsx(&self, path: &Path) -> Result<()> {
        let mut workbook = Workbook::new();
        let bold = Format::new().set_bold();
        let summary = self.summary();

        let sheet = workbook.add_worksheet();
        sheet.set_name(SERIES_SHEET)?;
        sheet.write_string_with_format(0, 0, "t", &bold)?;
        for (col, (name, values)) in (1u16..).zip(&self.series) {
            sheet.write_string_with_format(0, col, name.as_str(), &bold)?;
            for (row, value) in (1u32..).zip(values) {
                sheet.write_number(row, col, *value)?;
            }
        }
        for t in 0..self.rows() {
            sheet.write_number(t as u32 + 1, 0, t as f64)?;
        }
        // one blank row between the data and the summary rows
        let sum_row = self.rows() as u32 + 2;
        sheet.write_string_with_format(sum_row, 0, "sum", &bold)?;
        sheet.write_string_with_format(sum_row + 1, 0, "max", &bold)?;
        for (col, name) in (1u16..).zip(self.series.keys()) {
            sheet.write_number(sum_row, col, summary.sum[name])?;
            sheet.write_number(sum_row + 1, col, summary.max[name])?;
        }

        let sheet = workbook.add_worksheet();
        sheet.set_name(SCALARS_SHEET)?;
        sheet.write_string_with_format(0, 0, "var", &bold)?;
        sheet.write_string_with_format(0, 1, "value", &bold)?;
        for (row, (name, value)) in (1u32..).zip(&self.scalars) {
            sheet.write_string(row, 0, name.as_str())?;
            sheet.write_number(row, 1, *value)?;
        }

        workbook
            .save(path)
            .with_context(|| format!("saving workbook {}", path.display()))?;
        info!(
            path = %path.display(),
            series = self.series.len(),
            scalars = self.scalars.len(),
            "wrote report workbook"
        );
        Ok(())
    }

    /// Time series table followed by `sum` and `max` rows
    pub fn write_series_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        let names: Vec<&String> = self.series.keys().collect();
        csv.write_record(std::iter::once("t").chain(names.iter().map(|n| n.as_str())))?;

        for t in 0..self.rows() {
            let mut record = vec![t.to_string()];
            record.extend(
                self.series
                    .values()
                    .map(|values| values.get(t).map(f64::to_string).unwrap_or_default()),
            );
            csv.write_record(&record)?;
        }

        let summary = self.summary();
        for (label, row) in [("sum", &summary.sum), ("max", &summary.max)] {
            let mut record = vec![label.to_string()];
            record.extend(names.iter().map(|n| row[*n].to_string()));
            csv.write_record(&record)?;
        }
        csv.flush()?;
        Ok(())
    }

    pub fn write_scalars_csv<W: std::io::Write>(&self, writer: W) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(["var", "value"])?;
        for (name, value) in &self.scalars {
            csv.write_record([name.clone(), value.to_string()])?;
        }
        csv.flush()?;
        Ok(())
    }

    /// `<stem>_time_series.csv` and `<stem>_scalars.csv` in `dir`
    pub fn write_csv(&self, dir: &Path, stem: &str) -> Result<()> {
        let series_path = dir.join(format!("{stem}_{SERIES_SHEET}.csv"));
        let file = File::create(&series_path)
            .with_context(|| format!("creating {}", series_path.display()))?;
        self.write_series_csv(file)?;

        let scalars_path = dir.join(format!("{stem}_{SCALARS_SHEET}.csv"));
        let file = File::create(&scalars_path)
            .with_context(|| format!("creating {}", scalars_path.display()))?;
        self.write_scalars_csv(file)?;

        info!(dir = %dir.display(), %stem, "wrote report tables");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn results() -> Vec<(String, f64)> {
        vec![
            ("size_b".to_string(), 12.0),
            ("invest_b".to_string(), 0.0),
            ("output_heat_b[0]".to_string(), 3.0),
            ("output_heat_b[1]".to_string(), 5.0),
            ("input_gas_b[0]".to_string(), 0.0),
            ("input_gas_b[1]".to_string(), 0.0),
        ]
    }

    #[test]
    fn test_zero_columns_dropped() {
        let mut report = Report::from_results(&results());
        assert_eq!(report.period, Some(2));
        assert_eq!(report.drop_zero_columns(1e-9), 2);
        assert_eq!(report.series.keys().collect::<Vec<_>>(), vec!["output_heat_b"]);
        assert_eq!(report.scalars.keys().collect::<Vec<_>>(), vec!["size_b"]);
    }

    #[test]
    fn test_summary_rows() {
        let report = Report::from_results(&results());
        let summary = report.summary();
        assert_eq!(summary.sum["output_heat_b"], 8.0);
        assert_eq!(summary.max["output_heat_b"], 5.0);
        assert_eq!(summary.max["input_gas_b"], 0.0);
    }

    #[test]
    fn test_series_csv_layout() {
        let mut report = Report::from_results(&results());
        report.drop_zero_columns(0.0);
        let mut buffer = Vec::new();
        report.write_series_csv(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        assert_eq!(text, "t,output_heat_b\n0,3\n1,5\nsum,8\nmax,5\n");
    }
}
