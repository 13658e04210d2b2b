//! Integration tests that run the analysis against on-disk result fixtures.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use policy_core::analysis::{differences_for_year, distribution_for_year, weighted_totals};
use policy_core::{ChangeCategory, ReformParams, Simulation, SimulationError};
use policy_data::CsvSimulation;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

fn simulation() -> CsvSimulation {
    CsvSimulation::new(fixture_dir(), 2026, 2027, ReformParams::default())
}

#[test]
fn run_loads_every_year() {
    let mut sim = simulation();
    assert!(!sim.has_run());

    sim.run().expect("fixtures should load");

    assert!(sim.has_run());
    for year in sim.years() {
        assert_eq!(sim.base_results(year).unwrap().rows(), 8);
        assert_eq!(sim.reform_results(year).unwrap().rows(), 8);
    }
}

#[test]
fn results_before_run_are_an_error() {
    let sim = simulation();

    assert!(matches!(sim.base_results(2026), Err(SimulationError::NotRun)));
}

#[test]
fn year_outside_window_is_an_error() {
    let mut sim = simulation();
    sim.run().unwrap();

    assert!(matches!(
        sim.reform_results(2030),
        Err(SimulationError::YearNotFound(2030))
    ));
}

#[test]
fn missing_results_file_fails_the_run() {
    let mut sim = CsvSimulation::new(fixture_dir(), 2026, 2028, ReformParams::default());

    let err = sim.run().unwrap_err();

    match err {
        SimulationError::Failed(msg) => assert!(msg.contains("base_2028.csv"), "{msg}"),
        other => panic!("expected Failed, got {other:?}"),
    }
    assert!(!sim.has_run());
}

#[test]
fn aggregate_differences_from_fixtures() {
    let mut sim = simulation();
    sim.run().unwrap();

    let diffs = differences_for_year(&sim, 2026).unwrap();

    assert_eq!(
        diffs.iter().map(|d| (d.label, d.difference)).collect::<Vec<_>>(),
        vec![
            ("Income Tax", 5_790_000.0),
            ("Payroll Tax", 0.0),
            ("Combined", 5_790_000.0),
        ]
    );
}

#[test]
fn distribution_from_fixtures() {
    let mut sim = simulation();
    sim.run().unwrap();

    let rows = distribution_for_year(&sim, 2026).unwrap();
    let share = |label: &str, category| {
        rows.iter().find(|r| r.label == label).unwrap().shares.get(category)
    };

    assert_eq!(share("Less than $10K", ChangeCategory::SmallIncrease), 1.0);
    assert_eq!(share("$30K-40K", ChangeCategory::Negligible), 1.0);
    assert_eq!(share("$100K-200K", ChangeCategory::SmallDecrease), 1.0);
    assert_eq!(share("$1M or More", ChangeCategory::LargeDecrease), 1.0);
    assert_eq!(share("$40K-50K", ChangeCategory::Negligible), 0.0);
    for row in rows.iter().filter(|r| r.population > 0.0) {
        assert!((row.shares.total() - 1.0).abs() < 1e-9);
    }
}

#[test]
fn weighted_totals_across_years() {
    let mut sim = simulation();
    sim.run().unwrap();

    let totals = weighted_totals(&sim, "combined").unwrap();

    assert_eq!(totals.years.len(), 2);
    assert_eq!(totals.total_difference(), 2.0 * 5_790_000.0);
}
