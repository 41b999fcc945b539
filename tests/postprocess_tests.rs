use bemopt::io::{read_results, write_results};
use bemopt::model::{ModelBuilder, VarDef};
use bemopt::pipeline;
use bemopt::postprocess::{group_series, Report};
use proptest::prelude::*;

fn series(name: &str, len: usize, value: f64) -> Vec<(String, f64)> {
    (0..len).map(|t| (format!("{name}[{t}]"), value)).collect()
}

#[test]
fn test_period_election_drops_odd_series() {
    let mut results = series("day", 24, 1.0);
    results.extend(series("two_days", 48, 2.0));
    results.extend(series("odd", 17, 3.0));
    results.push(("size_boiler".to_string(), 7.0));

    let report = Report::from_results(&results);
    assert_eq!(report.period, Some(24));
    assert_eq!(report.series.keys().collect::<Vec<_>>(), vec!["day", "two_days"]);
    assert_eq!(report.dropped, vec!["odd".to_string()]);
    assert_eq!(report.scalars["size_boiler"], 7.0);
    assert_eq!(report.rows(), 48);
}

#[test]
fn test_report_files_written() {
    let mut results = series("output_heat_boiler", 4, 2.5);
    results.extend(series("input_gas_boiler", 4, 0.0));
    results.push(("size_boiler".to_string(), 2.5));
    results.push(("invest_boiler".to_string(), 0.0));

    let dir = tempfile::tempdir().unwrap();
    let report = pipeline::write_report(&results, dir.path()).unwrap();
    assert_eq!(report.series.len(), 1);
    assert_eq!(report.scalars.len(), 1);

    assert!(dir.path().join("report.xlsx").metadata().unwrap().len() > 0);
    let series_csv = std::fs::read_to_string(dir.path().join("report_time_series.csv")).unwrap();
    assert_eq!(
        series_csv,
        "t,output_heat_boiler\n0,2.5\n1,2.5\n2,2.5\n3,2.5\nsum,10\nmax,2.5\n"
    );
    let scalars_csv = std::fs::read_to_string(dir.path().join("report_scalars.csv")).unwrap();
    assert_eq!(scalars_csv, "var,value\nsize_boiler,2.5\n");
}

proptest! {
    #[test]
    fn test_indexed_names_regroup_per_series(
        bases in prop::collection::btree_set("[a-z][a-z_]{0,10}", 1..6),
        steps in 1usize..40,
    ) {
        let mut builder = ModelBuilder::new(steps);
        for base in &bases {
            builder.add_series(base.as_str(), VarDef::non_negative()).unwrap();
        }
        let model = builder.finish();
        let results: Vec<(String, f64)> = model
            .variables()
            .iter()
            .enumerate()
            .map(|(i, v)| (v.name.clone(), i as f64))
            .collect();

        // the flat table survives a csv round trip unchanged
        let mut buffer = Vec::new();
        write_results(&mut buffer, &results).unwrap();
        let results = read_results(buffer.as_slice()).unwrap();

        let groups = group_series(&results);
        prop_assert_eq!(groups.len(), bases.len());
        for (offset, base) in bases.iter().enumerate() {
            let values = &groups[base];
            prop_assert_eq!(values.len(), steps);
            let first = (offset * steps) as f64;
            prop_assert!(values.iter().enumerate().all(|(t, v)| *v == first + t as f64));
        }
    }
}
