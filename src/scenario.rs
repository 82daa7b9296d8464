//! # Scenarios
//!
//! JSON bundles of a biome grid, the locations to place and the optimizer
//! parameters. The `locus` binary reads these; they are also handy fixtures
//! for tests.
//!
//! ```json
//! {
//!   "chunk_size": 4,
//!   "iterations": 2000,
//!   "seed": 7,
//!   "grid": [["Forest", "Forest"], ["Plains", "Plains"]],
//!   "locations": [
//!     { "id": "mill", "biome": "Plains", "roads": [{ "target": "lodge", "distance": 6.0 }] },
//!     { "id": "lodge", "biome": "Forest" }
//!   ]
//! }
//! ```

use crate::grid::{Biome, BiomeGrid, ChunkBounds, ChunkCenter};
use crate::placement::{
    AcceptanceRule, LocalSearchOptimizer, Location, OptimizationReport, OptimizerConfig,
};
use crate::{config, LocusError, LocusResult};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_chunk_size() -> usize {
    config::DEFAULT_CHUNK_SIZE
}

fn default_iterations() -> usize {
    config::DEFAULT_ITERATIONS
}

/// A complete placement problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// Seed for the random source; callers pick one when absent
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub acceptance: AcceptanceRule,
    /// Biome rows, top row first
    pub grid: Vec<Vec<Biome>>,
    pub locations: Vec<Location>,
}

impl Scenario {
    /// Parses a scenario from JSON text.
    pub fn from_json(json: &str) -> LocusResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a scenario from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> LocusResult<Self> {
        let path = path.as_ref();
        debug!("Loading scenario from {}", path.display());
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Builds the biome grid described by `grid`.
    pub fn biome_grid(&self) -> LocusResult<BiomeGrid> {
        BiomeGrid::from_rows(self.grid.clone())
    }

    /// Optimizer parameters described by the scenario.
    pub fn optimizer_config(&self) -> OptimizerConfig {
        OptimizerConfig::new(self.chunk_size)
            .with_iterations(self.iterations)
            .with_acceptance(self.acceptance)
    }

    /// Runs the optimizer and collects the placements.
    pub fn run<R: Rng + ?Sized>(&mut self, rng: &mut R) -> LocusResult<ScenarioOutcome> {
        let grid = self.biome_grid()?;
        let optimizer = LocalSearchOptimizer::new(self.optimizer_config());
        debug!("Running scenario with {:?}", optimizer.config());
        let report = optimizer.optimize(&mut self.locations, &grid, rng)?;

        let placements = self
            .locations
            .iter()
            .map(PlacedLocation::try_from)
            .collect::<LocusResult<Vec<_>>>()?;

        Ok(ScenarioOutcome { report, placements })
    }
}

/// Final position of one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLocation {
    pub id: String,
    pub biome: Biome,
    pub bounds: ChunkBounds,
    pub center: ChunkCenter,
}

impl TryFrom<&Location> for PlacedLocation {
    type Error = LocusError;

    fn try_from(location: &Location) -> LocusResult<Self> {
        let chunk = location.assignment.as_ref().ok_or_else(|| {
            LocusError::Configuration(format!("location '{}' was not placed", location.id))
        })?;

        Ok(Self {
            id: location.id.to_string(),
            biome: location.biome.clone(),
            bounds: chunk.bounds,
            center: chunk.center,
        })
    }
}

/// Everything a scenario run produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub report: OptimizationReport,
    pub placements: Vec<PlacedLocation>,
}
