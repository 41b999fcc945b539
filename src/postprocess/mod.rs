//! Turning the flat solver result table into readable reports.

pub mod grouping;
pub mod report;

pub use grouping::{elect_period, group_series, split_index, split_results, SplitResults};
pub use report::{Report, Summary, SCALARS_SHEET, SERIES_SHEET};
