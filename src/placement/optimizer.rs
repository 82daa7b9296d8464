//! # Local Search Optimizer
//!
//! Greedy hill-climb over chunk assignments.
//!
//! A run:
//! 1. Partitions the grid and tags chunks with their dominant biome
//! 2. Builds a fresh [`PlacementContext`] (roads and candidate sets)
//! 3. Places every location on a random candidate
//! 4. Repeatedly moves one random location to a random candidate, keeping the
//!    move only when the [`AcceptanceRule`] says it improved things
//!
//! There is no temperature schedule; the only way out of a local minimum is
//! the randomness of the proposals.

use super::{BiomeCompatibility, ExactBiome, Location, PlacementContext};
use crate::grid::{BiomeGrid, GridPartitioner};
use crate::{config, LocusError, LocusResult};
use log::{debug, info, trace};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a proposed move is judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptanceRule {
    /// Keep the move when the moved location's local energy is below the
    /// best energy seen so far; that local energy then becomes the new best.
    ///
    /// The bound starts as the total energy of the initial placement, so it
    /// mixes a per-location term with a global one.
    #[default]
    LocalAgainstBest,
    /// Keep the move when it lowers the moved location's local energy, which
    /// is exactly when it lowers the total energy.
    Incremental,
}

/// Parameters of an optimization run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerConfig {
    /// Edge length of the square chunks, in grid cells
    pub chunk_size: usize,
    /// Number of proposal steps
    pub iterations: usize,
    /// How proposals are accepted
    pub acceptance: AcceptanceRule,
}

impl OptimizerConfig {
    /// Creates a configuration with the default iteration count.
    ///
    /// # Examples
    ///
    /// ```
    /// use locus::{AcceptanceRule, OptimizerConfig};
    ///
    /// let config = OptimizerConfig::new(8);
    /// assert_eq!(config.chunk_size, 8);
    /// assert_eq!(config.iterations, 5000);
    /// assert_eq!(config.acceptance, AcceptanceRule::LocalAgainstBest);
    /// ```
    pub fn new(chunk_size: usize) -> Self {
        Self {
            chunk_size,
            iterations: config::DEFAULT_ITERATIONS,
            acceptance: AcceptanceRule::default(),
        }
    }

    /// Creates a configuration for tests: small chunks, short runs.
    pub fn for_testing() -> Self {
        Self {
            chunk_size: 2,
            iterations: 500,
            acceptance: AcceptanceRule::default(),
        }
    }

    /// Sets the number of proposal steps.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Sets the acceptance rule.
    pub fn with_acceptance(mut self, acceptance: AcceptanceRule) -> Self {
        self.acceptance = acceptance;
        self
    }

    /// Checks that the parameters can drive a run.
    pub fn validate(&self) -> LocusResult<()> {
        if self.chunk_size == 0 {
            return Err(LocusError::Configuration(
                "chunk size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::new(config::DEFAULT_CHUNK_SIZE)
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    /// Total energy of the random starting placement
    pub initial_energy: f64,
    /// Total energy of the final placement
    pub final_energy: f64,
    /// Proposal steps executed
    pub iterations: usize,
    /// Proposals that were kept
    pub accepted_moves: usize,
}

/// Assigns each location a chunk so that road distances come out close to
/// the requested ones.
pub struct LocalSearchOptimizer {
    config: OptimizerConfig,
    compatibility: Box<dyn BiomeCompatibility>,
}

impl fmt::Debug for LocalSearchOptimizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSearchOptimizer")
            .field("config", &self.config)
            .field("compatibility", &self.compatibility.rule_name())
            .finish()
    }
}

impl Default for LocalSearchOptimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default())
    }
}

impl LocalSearchOptimizer {
    /// Creates an optimizer using exact biome matching.
    pub fn new(config: OptimizerConfig) -> Self {
        Self {
            config,
            compatibility: Box::new(ExactBiome),
        }
    }

    /// Replaces the biome compatibility rule.
    pub fn with_compatibility(mut self, compatibility: impl BiomeCompatibility + 'static) -> Self {
        self.compatibility = Box::new(compatibility);
        self
    }

    /// Gets the run parameters.
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Places every location on a compatible chunk of `grid`.
    ///
    /// Previous assignments are cleared first. On success each location's
    /// `assignment` holds its final chunk. Fails with
    /// [`LocusError::BiomeMismatch`] before any random draw when a location
    /// has no compatible chunk.
    pub fn optimize<R: Rng + ?Sized>(
        &self,
        locations: &mut [Location],
        grid: &BiomeGrid,
        rng: &mut R,
    ) -> LocusResult<OptimizationReport> {
        self.config.validate()?;

        for location in locations.iter_mut() {
            location.assignment = None;
        }

        let partitioner = GridPartitioner::for_grid(grid, self.config.chunk_size)?;
        let partition = partitioner.compute_dominant_biomes(grid)?;
        let mut context =
            PlacementContext::build(locations, &partition, self.compatibility.as_ref())?;

        info!(
            "Optimizing {} locations over {} chunks of size {} ({} iterations, {:?}, {} biome matching)",
            context.len(),
            partition.len(),
            partitioner.chunk_size(),
            self.config.iterations,
            self.config.acceptance,
            self.compatibility.rule_name()
        );

        context.initialize(rng)?;

        let initial_energy = context.total_energy();
        let mut best_energy = initial_energy;
        let mut accepted_moves = 0;
        let iterations = if context.is_empty() {
            0
        } else {
            self.config.iterations
        };

        debug!("Initial placement energy: {:.3}", initial_energy);

        for step in 0..iterations {
            let index = rng.gen_range(0..context.len());
            let previous = context.assigned(index);
            let proposal = context.propose(index, rng)?;

            let accepted = match self.config.acceptance {
                AcceptanceRule::LocalAgainstBest => {
                    context.assign(index, Some(proposal));
                    let local = context.local_energy(index);
                    if local < best_energy {
                        best_energy = local;
                        true
                    } else {
                        false
                    }
                }
                AcceptanceRule::Incremental => {
                    let before = context.local_energy(index);
                    context.assign(index, Some(proposal));
                    let after = context.local_energy(index);
                    if after < before {
                        best_energy += after - before;
                        true
                    } else {
                        false
                    }
                }
            };

            if accepted {
                accepted_moves += 1;
                if let Some(chunk) = context.assigned_chunk(index) {
                    trace!(
                        "Step {}: location #{} moved to {} at ({:.1}, {:.1}) (energy {:.3})",
                        step,
                        index,
                        chunk.id,
                        chunk.center.x,
                        chunk.center.y,
                        best_energy
                    );
                }
            } else {
                context.assign(index, previous);
            }
        }

        context.apply(locations);

        let final_energy = context.total_energy();
        info!(
            "Placement finished: energy {:.3} -> {:.3}, {} of {} moves accepted",
            initial_energy, final_energy, accepted_moves, iterations
        );

        Ok(OptimizationReport {
            initial_energy,
            final_energy,
            iterations,
            accepted_moves,
        })
    }
}

/// Creates a seeded random number generator for reproducible runs.
pub fn create_rng(seed: u64) -> rand::rngs::StdRng {
    use rand::SeedableRng;
    rand::rngs::StdRng::seed_from_u64(seed)
}
