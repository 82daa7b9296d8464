//! # Biome Compatibility
//!
//! Rules deciding which chunks a location may occupy.

use super::Location;
use crate::grid::{Biome, BiomePartition, Chunk, ChunkId};
use std::collections::HashMap;

/// Decides whether a location may be placed on a chunk.
///
/// Closures of the form `Fn(&Location, &Chunk) -> bool` implement this trait,
/// so one-off rules do not need a dedicated type.
pub trait BiomeCompatibility {
    /// Checks a single location/chunk pair.
    fn is_compatible(&self, location: &Location, chunk: &Chunk) -> bool;

    /// All chunks a location may occupy, in chunk order.
    fn candidates(&self, location: &Location, partition: &BiomePartition) -> Vec<ChunkId> {
        partition
            .chunks()
            .iter()
            .filter(|chunk| self.is_compatible(location, chunk))
            .map(|chunk| chunk.id)
            .collect()
    }

    /// Rule name for logging and debugging.
    fn rule_name(&self) -> &'static str {
        "custom"
    }
}

impl<F> BiomeCompatibility for F
where
    F: Fn(&Location, &Chunk) -> bool,
{
    fn is_compatible(&self, location: &Location, chunk: &Chunk) -> bool {
        self(location, chunk)
    }
}

/// Labels must match exactly. This is the default rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactBiome;

impl BiomeCompatibility for ExactBiome {
    fn is_compatible(&self, location: &Location, chunk: &Chunk) -> bool {
        location.biome == chunk.biome
    }

    fn candidates(&self, location: &Location, partition: &BiomePartition) -> Vec<ChunkId> {
        partition.group(location.biome.as_str()).to_vec()
    }

    fn rule_name(&self) -> &'static str {
        "exact"
    }
}

/// Labels match ignoring ASCII case, so `"forest"` fits a `"Forest"` chunk.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveBiome;

impl BiomeCompatibility for CaseInsensitiveBiome {
    fn is_compatible(&self, location: &Location, chunk: &Chunk) -> bool {
        location
            .biome
            .as_str()
            .eq_ignore_ascii_case(chunk.biome.as_str())
    }

    fn rule_name(&self) -> &'static str {
        "case_insensitive"
    }
}

/// Exact match, or one of the alternates registered for the location's biome.
///
/// # Examples
///
/// ```
/// use locus::{BiomeCompatibility, FallbackBiomes};
///
/// let rule = FallbackBiomes::new()
///     .with_fallback("Plains", "Grassland")
///     .with_fallback("Plains", "Savanna");
/// assert_eq!(rule.fallbacks_for("Plains").len(), 2);
/// assert_eq!(rule.rule_name(), "fallback");
/// ```
#[derive(Debug, Clone, Default)]
pub struct FallbackBiomes {
    fallbacks: HashMap<Biome, Vec<Biome>>,
}

impl FallbackBiomes {
    /// Creates a rule with no fallbacks; behaves like [`ExactBiome`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Lets locations requiring `biome` also sit on `alternate` chunks.
    pub fn with_fallback(mut self, biome: impl Into<Biome>, alternate: impl Into<Biome>) -> Self {
        let alternates = self.fallbacks.entry(biome.into()).or_default();
        let alternate = alternate.into();
        if !alternates.contains(&alternate) {
            alternates.push(alternate);
        }
        self
    }

    /// Alternates registered for `biome`.
    pub fn fallbacks_for(&self, biome: &str) -> &[Biome] {
        self.fallbacks.get(biome).map_or(&[], Vec::as_slice)
    }
}

impl BiomeCompatibility for FallbackBiomes {
    fn is_compatible(&self, location: &Location, chunk: &Chunk) -> bool {
        location.biome == chunk.biome
            || self
                .fallbacks_for(location.biome.as_str())
                .contains(&chunk.biome)
    }

    fn rule_name(&self) -> &'static str {
        "fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BiomeGrid, ChunkBounds, GridPartitioner, GridPoint};

    fn mixed_partition() -> BiomePartition {
        // 2x2 chunks of size 2: Forest, Desert / forest, Forest
        let mut grid = BiomeGrid::filled(4, 4, "Forest").unwrap();
        grid.fill_bounds(
            ChunkBounds::new(GridPoint::new(2, 0), GridPoint::new(3, 1)),
            "Desert",
        );
        grid.fill_bounds(
            ChunkBounds::new(GridPoint::new(0, 2), GridPoint::new(1, 3)),
            "forest",
        );
        GridPartitioner::for_grid(&grid, 2)
            .unwrap()
            .compute_dominant_biomes(&grid)
            .unwrap()
    }

    #[test]
    fn test_exact_match() {
        let partition = mixed_partition();
        let location = Location::new("camp", "Forest");
        assert_eq!(
            ExactBiome.candidates(&location, &partition),
            vec![ChunkId(0), ChunkId(3)]
        );
    }

    #[test]
    fn test_exact_group_lookup_matches_filtering() {
        let partition = mixed_partition();
        let location = Location::new("camp", "Desert");
        let filtered: Vec<_> = partition
            .chunks()
            .iter()
            .filter(|c| ExactBiome.is_compatible(&location, c))
            .map(|c| c.id)
            .collect();
        assert_eq!(ExactBiome.candidates(&location, &partition), filtered);
    }

    #[test]
    fn test_case_insensitive_match() {
        let partition = mixed_partition();
        let location = Location::new("camp", "FOREST");
        assert_eq!(
            CaseInsensitiveBiome.candidates(&location, &partition),
            vec![ChunkId(0), ChunkId(2), ChunkId(3)]
        );
    }

    #[test]
    fn test_fallback_match() {
        let partition = mixed_partition();
        let rule = FallbackBiomes::new()
            .with_fallback("Forest", "Desert")
            .with_fallback("Forest", "Desert");
        assert_eq!(rule.fallbacks_for("Forest").len(), 1);

        let location = Location::new("camp", "Forest");
        assert_eq!(
            rule.candidates(&location, &partition),
            vec![ChunkId(0), ChunkId(1), ChunkId(3)]
        );

        let location = Location::new("oasis", "Desert");
        assert_eq!(rule.candidates(&location, &partition), vec![ChunkId(1)]);
    }

    #[test]
    fn test_closure_rule() {
        let partition = mixed_partition();
        let top_row_only = |_: &Location, chunk: &Chunk| chunk.bounds.start.y == 0;
        let location = Location::new("anything", "Tundra");
        assert_eq!(
            top_row_only.candidates(&location, &partition),
            vec![ChunkId(0), ChunkId(1)]
        );
        assert_eq!(top_row_only.rule_name(), "custom");
    }
}
