//! # Locus
//!
//! Places abstract world locations (settlements, points of interest) onto a
//! biome-labelled world grid so that straight-line distances between
//! connected locations approximate the distances the caller asked for.
//!
//! ## Architecture Overview
//!
//! - **Grid**: biome labels per cell, split into square chunks, each chunk
//!   tagged with its dominant biome
//! - **Placement**: location descriptors, biome compatibility rules and the
//!   local-search optimizer that assigns one chunk per location
//! - **Scenario**: JSON bundles of grid, locations and parameters used by the
//!   `locus` binary
//!
//! ```
//! use locus::{BiomeGrid, LocalSearchOptimizer, Location, OptimizerConfig};
//! use rand::SeedableRng;
//!
//! let grid = BiomeGrid::filled(8, 8, "Plains")?;
//! let mut locations = vec![
//!     Location::new("harbor", "Plains").with_road("mill", 4.0),
//!     Location::new("mill", "Plains"),
//! ];
//!
//! let optimizer = LocalSearchOptimizer::new(OptimizerConfig::new(2));
//! let mut rng = rand::rngs::StdRng::seed_from_u64(7);
//! let report = optimizer.optimize(&mut locations, &grid, &mut rng)?;
//!
//! assert!(locations.iter().all(|l| l.assignment.is_some()));
//! assert!(report.final_energy >= 0.0);
//! # Ok::<(), locus::LocusError>(())
//! ```

pub mod grid;
pub mod placement;
pub mod scenario;

pub use grid::*;
pub use placement::*;
pub use scenario::*;

/// Core error type for the Locus placement engine.
#[derive(thiserror::Error, Debug)]
pub enum LocusError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Grid dimensions or optimizer parameters are unusable
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// No chunk on the grid is compatible with a location's biome
    #[error("No chunk with biome '{biome}' is available for location '{location}'")]
    BiomeMismatch { location: String, biome: String },
}

/// Result type used throughout the Locus codebase.
pub type LocusResult<T> = Result<T, LocusError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine configuration constants.
pub mod config {
    /// Default chunk edge length in grid cells
    pub const DEFAULT_CHUNK_SIZE: usize = 16;

    /// Default number of proposal steps per optimization run
    pub const DEFAULT_ITERATIONS: usize = 5000;

    /// Seed used by the binary when none is given
    pub const DEFAULT_SEED: u64 = 12345;
}
