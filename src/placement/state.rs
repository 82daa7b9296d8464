//! # Placement State
//!
//! Per-run working data for the optimizer. A [`PlacementContext`] is built
//! fresh at the start of every run from the caller's locations and thrown
//! away afterwards, so nothing carries over between runs.

use super::{BiomeCompatibility, Location};
use crate::grid::{BiomePartition, Chunk, ChunkCenter, ChunkId};
use crate::{LocusError, LocusResult};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// A resolved road requirement between two locations of the same run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesiredRoad {
    /// Index of the location at the other end
    pub other: usize,
    /// Requested center-to-center distance
    pub distance: f64,
}

/// Mutable placement record for one location.
#[derive(Debug, Clone, Default)]
pub struct PlacementState {
    /// Roads this location declares
    pub desired_roads: Vec<DesiredRoad>,
    /// Roads other locations declare towards this one
    pub incoming_roads: Vec<DesiredRoad>,
    /// Chunks this location may occupy
    pub candidates: Vec<ChunkId>,
    /// Currently assigned chunk, always one of `candidates`
    pub assigned: Option<ChunkId>,
}

/// Working state of one optimization run.
#[derive(Debug)]
pub struct PlacementContext<'a> {
    partition: &'a BiomePartition,
    states: Vec<PlacementState>,
}

impl<'a> PlacementContext<'a> {
    /// Resolves roads and candidate sets for `locations`.
    ///
    /// Fails on duplicate ids, or with [`LocusError::BiomeMismatch`] for the
    /// first location that has no compatible chunk. Nothing is assigned yet.
    pub fn build(
        locations: &[Location],
        partition: &'a BiomePartition,
        compatibility: &dyn BiomeCompatibility,
    ) -> LocusResult<Self> {
        let mut index_of: HashMap<&str, usize> = HashMap::with_capacity(locations.len());
        for (index, location) in locations.iter().enumerate() {
            if index_of.insert(location.id.as_str(), index).is_some() {
                return Err(LocusError::Configuration(format!(
                    "location id '{}' is used more than once",
                    location.id
                )));
            }
        }

        let mut states = vec![PlacementState::default(); locations.len()];

        for (index, location) in locations.iter().enumerate() {
            for (target, distance) in location.desired_roads() {
                let Some(&other) = index_of.get(target.as_str()) else {
                    debug!(
                        "Dropping road from '{}' to unknown location '{}'",
                        location.id, target
                    );
                    continue;
                };

                states[index]
                    .desired_roads
                    .push(DesiredRoad { other, distance });
                // A road to itself is already counted as outgoing
                if other != index {
                    states[other].incoming_roads.push(DesiredRoad {
                        other: index,
                        distance,
                    });
                }
            }
        }

        for (state, location) in states.iter_mut().zip(locations) {
            state.candidates = compatibility.candidates(location, partition);
            if state.candidates.is_empty() {
                return Err(LocusError::BiomeMismatch {
                    location: location.id.to_string(),
                    biome: location.biome.to_string(),
                });
            }
        }

        Ok(Self { partition, states })
    }

    /// Number of locations in the run.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Whether the run has no locations.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Gets the state of one location.
    pub fn state(&self, index: usize) -> Option<&PlacementState> {
        self.states.get(index)
    }

    /// Gives every location a uniformly random candidate.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> LocusResult<()> {
        for index in 0..self.states.len() {
            let chunk = self.propose(index, rng)?;
            self.states[index].assigned = Some(chunk);
        }
        Ok(())
    }

    /// Draws a uniformly random candidate for one location.
    ///
    /// The current chunk may come up again.
    pub fn propose<R: Rng + ?Sized>(&self, index: usize, rng: &mut R) -> LocusResult<ChunkId> {
        self.states
            .get(index)
            .and_then(|state| state.candidates.choose(rng))
            .copied()
            .ok_or_else(|| {
                LocusError::Configuration(format!("location #{} has no candidate chunks", index))
            })
    }

    /// Current chunk of a location.
    pub fn assigned(&self, index: usize) -> Option<ChunkId> {
        self.states.get(index).and_then(|state| state.assigned)
    }

    /// Moves a location to `chunk` (or unassigns it with `None`).
    pub fn assign(&mut self, index: usize, chunk: Option<ChunkId>) {
        if let Some(state) = self.states.get_mut(index) {
            state.assigned = chunk;
        }
    }

    fn center(&self, index: usize) -> Option<ChunkCenter> {
        let id = self.assigned(index)?;
        self.partition.chunk(id).map(|chunk| chunk.center)
    }

    fn deviation(&self, from: usize, to: usize, desired: f64) -> f64 {
        match (self.center(from), self.center(to)) {
            (Some(a), Some(b)) => (a.distance(b) - desired).abs(),
            _ => 0.0,
        }
    }

    /// Sum of `|actual - desired|` over every declared road.
    pub fn total_energy(&self) -> f64 {
        self.states
            .iter()
            .enumerate()
            .flat_map(|(index, state)| {
                state
                    .desired_roads
                    .iter()
                    .map(move |road| (index, road))
            })
            .map(|(index, road)| self.deviation(index, road.other, road.distance))
            .sum()
    }

    /// Energy of the roads touching one location: the ones it declares plus
    /// the ones pointing at it.
    pub fn local_energy(&self, index: usize) -> f64 {
        let Some(state) = self.states.get(index) else {
            return 0.0;
        };

        let outgoing: f64 = state
            .desired_roads
            .iter()
            .map(|road| self.deviation(index, road.other, road.distance))
            .sum();
        let incoming: f64 = state
            .incoming_roads
            .iter()
            .map(|road| self.deviation(road.other, index, road.distance))
            .sum();

        outgoing + incoming
    }

    /// Writes the final chunks back onto the caller's locations.
    pub fn apply(&self, locations: &mut [Location]) {
        for (location, state) in locations.iter_mut().zip(&self.states) {
            location.assignment = state
                .assigned
                .and_then(|id| self.partition.chunk(id))
                .cloned();
        }
    }

    /// Chunk a location currently sits on.
    pub fn assigned_chunk(&self, index: usize) -> Option<&Chunk> {
        self.assigned(index).and_then(|id| self.partition.chunk(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{BiomeGrid, GridPartitioner};
    use crate::placement::ExactBiome;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn plains_partition() -> BiomePartition {
        // 1x4 chunks of size 1 along a row, centers at x = 0, 1, 2, 3
        let grid = BiomeGrid::filled(4, 1, "Plains").unwrap();
        GridPartitioner::for_grid(&grid, 1)
            .unwrap()
            .compute_dominant_biomes(&grid)
            .unwrap()
    }

    #[test]
    fn test_build_resolves_roads() {
        let partition = plains_partition();
        let locations = vec![
            Location::new("a", "Plains")
                .with_road("b", 2.0)
                .with_road("missing", 4.0),
            Location::new("b", "Plains"),
            Location::new("c", "Plains").with_road("b", 1.0),
        ];

        let context = PlacementContext::build(&locations, &partition, &ExactBiome).unwrap();
        assert_eq!(context.len(), 3);

        let a = context.state(0).unwrap();
        assert_eq!(
            a.desired_roads,
            vec![DesiredRoad {
                other: 1,
                distance: 2.0
            }]
        );
        assert_eq!(a.candidates.len(), 4);
        assert!(a.assigned.is_none());

        let b = context.state(1).unwrap();
        assert!(b.desired_roads.is_empty());
        assert_eq!(b.incoming_roads.len(), 2);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let partition = plains_partition();
        let locations = vec![Location::new("a", "Plains"), Location::new("a", "Plains")];
        assert!(matches!(
            PlacementContext::build(&locations, &partition, &ExactBiome),
            Err(LocusError::Configuration(_))
        ));
    }

    #[test]
    fn test_missing_biome_is_fatal() {
        let partition = plains_partition();
        let locations = vec![Location::new("a", "Plains"), Location::new("b", "Glacier")];

        match PlacementContext::build(&locations, &partition, &ExactBiome) {
            Err(LocusError::BiomeMismatch { location, biome }) => {
                assert_eq!(location, "b");
                assert_eq!(biome, "Glacier");
            }
            other => panic!("expected biome mismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_initialize_assigns_candidates() {
        let partition = plains_partition();
        let locations = vec![Location::new("a", "Plains"), Location::new("b", "Plains")];
        let mut context = PlacementContext::build(&locations, &partition, &ExactBiome).unwrap();

        let mut rng = StdRng::seed_from_u64(1);
        context.initialize(&mut rng).unwrap();

        for index in 0..context.len() {
            let state = context.state(index).unwrap();
            assert!(state.candidates.contains(&state.assigned.unwrap()));
        }
    }

    #[test]
    fn test_energies() {
        let partition = plains_partition();
        let locations = vec![
            Location::new("a", "Plains").with_road("b", 2.0),
            Location::new("b", "Plains").with_road("a", 1.0),
            Location::new("c", "Plains").with_road("a", 3.0),
        ];
        let mut context = PlacementContext::build(&locations, &partition, &ExactBiome).unwrap();

        context.assign(0, Some(ChunkId(0)));
        context.assign(1, Some(ChunkId(3)));
        context.assign(2, Some(ChunkId(1)));

        // a->b |3-2| = 1, b->a |3-1| = 2, c->a |1-3| = 2
        assert!((context.total_energy() - 5.0).abs() < 1e-9);
        // a touches all three roads
        assert!((context.local_energy(0) - 5.0).abs() < 1e-9);
        // c only touches its own
        assert!((context.local_energy(2) - 2.0).abs() < 1e-9);
        assert_eq!(context.local_energy(99), 0.0);
    }

    #[test]
    fn test_road_to_self_is_counted_once() {
        let partition = plains_partition();
        let locations = vec![Location::new("a", "Plains").with_road("a", 3.0)];
        let mut context = PlacementContext::build(&locations, &partition, &ExactBiome).unwrap();
        assert!(context.state(0).unwrap().incoming_roads.is_empty());

        context.assign(0, Some(ChunkId(0)));
        assert!((context.total_energy() - 3.0).abs() < 1e-9);
        assert!((context.local_energy(0) - context.total_energy()).abs() < 1e-9);
    }

    #[test]
    fn test_apply_writes_chunks() {
        let partition = plains_partition();
        let mut locations = vec![Location::new("a", "Plains")];
        let mut context = PlacementContext::build(&locations, &partition, &ExactBiome).unwrap();
        context.assign(0, Some(ChunkId(2)));
        context.apply(&mut locations);

        let chunk = locations[0].assignment.as_ref().unwrap();
        assert_eq!(chunk.id, ChunkId(2));
        assert_eq!(chunk.center.x, 2.0);
        assert_eq!(context.assigned_chunk(0).map(|c| c.id), Some(ChunkId(2)));
    }
}
