//! # Placement Module
//!
//! Location descriptors and the search that assigns each of them a chunk.
//!
//! Callers describe locations by id, required biome and a list of road
//! requirements ("this place should be N cells from that one"). The
//! [`LocalSearchOptimizer`] picks one compatible chunk per location so that
//! center-to-center distances come close to the requested ones.

pub mod compatibility;
pub mod optimizer;
pub mod state;

pub use compatibility::*;
pub use optimizer::*;
pub use state::*;

use crate::grid::{Biome, Chunk};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

/// Identifier of a location, unique within one optimization run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocationId(String);

impl LocationId {
    /// Creates a new identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Gets the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LocationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LocationId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LocationId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for LocationId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A requested straight-line distance from one location to another.
///
/// Requirements are directed: declaring a road from A to B says nothing
/// about B. Entries without a target or with a non-positive distance are
/// ignored by the optimizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadRequirement {
    #[serde(default)]
    pub target: Option<LocationId>,
    pub distance: f64,
}

impl RoadRequirement {
    /// Creates a requirement towards `target`.
    pub fn new(target: impl Into<LocationId>, distance: f64) -> Self {
        Self {
            target: Some(target.into()),
            distance,
        }
    }

    /// Whether this requirement takes part in placement.
    pub fn is_active(&self) -> bool {
        self.target.is_some() && self.distance > 0.0
    }
}

/// A place on the world map waiting for a chunk.
///
/// `assignment` is output only: the optimizer clears it at the start of
/// every run and fills it with the chosen chunk on success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub id: LocationId,
    /// Biome the location must be placed on
    pub biome: Biome,
    #[serde(default)]
    pub roads: Vec<RoadRequirement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignment: Option<Chunk>,
}

impl Location {
    /// Creates a location with no road requirements.
    ///
    /// # Examples
    ///
    /// ```
    /// use locus::Location;
    ///
    /// let village = Location::new("village", "Plains")
    ///     .with_road("castle", 12.0)
    ///     .with_road("mine", 0.0);
    /// assert_eq!(village.roads.len(), 2);
    /// assert_eq!(village.desired_roads().count(), 1);
    /// ```
    pub fn new(id: impl Into<LocationId>, biome: impl Into<Biome>) -> Self {
        Self {
            id: id.into(),
            biome: biome.into(),
            roads: Vec::new(),
            assignment: None,
        }
    }

    /// Adds a road requirement, builder style.
    pub fn with_road(mut self, target: impl Into<LocationId>, distance: f64) -> Self {
        self.add_road(target, distance);
        self
    }

    /// Adds a road requirement.
    pub fn add_road(&mut self, target: impl Into<LocationId>, distance: f64) {
        self.roads.push(RoadRequirement::new(target, distance));
    }

    /// Road requirements that take part in placement, as `(target, distance)`.
    pub fn desired_roads(&self) -> impl Iterator<Item = (&LocationId, f64)> {
        self.roads
            .iter()
            .filter(|road| road.is_active())
            .filter_map(|road| road.target.as_ref().map(|target| (target, road.distance)))
    }
}

/// Scores already-placed locations: the sum of `|actual - desired|` over
/// every active road whose two ends are assigned.
///
/// Roads to unknown or unplaced locations contribute nothing. When ids repeat
/// the first location with that id is used.
pub fn total_energy(locations: &[Location]) -> f64 {
    let mut by_id: HashMap<&str, &Location> = HashMap::new();
    for location in locations {
        by_id.entry(location.id.as_str()).or_insert(location);
    }

    locations
        .iter()
        .filter_map(|location| location.assignment.as_ref().map(|chunk| (location, chunk)))
        .flat_map(|(location, chunk)| {
            let by_id = &by_id;
            location.desired_roads().filter_map(move |(target, desired)| {
                let other = by_id.get(target.as_str())?.assignment.as_ref()?;
                Some((chunk.distance_to(other) - desired).abs())
            })
        })
        .sum()
}
