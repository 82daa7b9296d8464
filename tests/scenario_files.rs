//! Loading scenarios from disk and running them.

use locus::{create_rng, LocusError, LocusResult, Scenario};
use std::io::Write;

const SCENARIO: &str = r#"{
    "chunk_size": 3,
    "iterations": 400,
    "seed": 21,
    "acceptance": "incremental",
    "grid": [
        ["Forest", "Forest", "Forest", "Plains", "Plains", "Plains"],
        ["Forest", "Forest", "Forest", "Plains", "Plains", "Plains"],
        ["Forest", "Forest", "Forest", "Plains", "Plains", "Plains"],
        ["Plains", "Plains", "Plains", "Plains", "Plains", "Plains"],
        ["Plains", "Plains", "Plains", "Plains", "Plains", "Plains"],
        ["Plains", "Plains", "Plains", "Plains", "Plains", "Plains"]
    ],
    "locations": [
        { "id": "lodge", "biome": "Forest", "roads": [{ "target": "mill", "distance": 3.0 }] },
        { "id": "mill", "biome": "Plains", "roads": [{ "target": null, "distance": 4.0 }] }
    ]
}"#;

#[test]
fn test_load_and_run_from_file() -> LocusResult<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    file.write_all(SCENARIO.as_bytes())?;

    let mut scenario = Scenario::from_path(file.path())?;
    assert_eq!(scenario.seed, Some(21));

    let outcome = scenario.run(&mut create_rng(21))?;
    assert_eq!(outcome.placements.len(), 2);

    // Forest only dominates the top-left chunk
    let lodge = &outcome.placements[0];
    assert_eq!(lodge.bounds.start.x, 0);
    assert_eq!(lodge.bounds.start.y, 0);
    assert_eq!(lodge.center.x, 1.0);

    // Plains chunks right of or below the lodge are exactly 3 away
    assert_eq!(outcome.report.final_energy, 0.0);

    let json = serde_json::to_string(&outcome)?;
    assert!(json.contains("\"placements\""));
    Ok(())
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Scenario::from_path(dir.path().join("absent.json"));
    assert!(matches!(result, Err(LocusError::Io(_))));
}

#[test]
fn test_ragged_grid_in_file() -> LocusResult<()> {
    let mut scenario = Scenario::from_json(
        r#"{"grid": [["Plains", "Plains"], ["Plains"]], "locations": []}"#,
    )?;
    assert!(matches!(
        scenario.run(&mut create_rng(1)),
        Err(LocusError::Configuration(_))
    ));
    Ok(())
}
