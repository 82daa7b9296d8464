//! # Chunks
//!
//! Rectangular groups of grid cells with a computed center and a single
//! dominant biome.

use super::{Biome, GridPoint};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a chunk in its partition, in row-major chunk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(pub usize);

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk#{}", self.0)
    }
}

/// Inclusive cell bounds of a chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkBounds {
    /// Top-left cell
    pub start: GridPoint,
    /// Bottom-right cell (inclusive)
    pub end: GridPoint,
}

impl ChunkBounds {
    /// Creates bounds from two inclusive corners.
    pub fn new(start: GridPoint, end: GridPoint) -> Self {
        Self { start, end }
    }

    /// Width in cells.
    pub fn width(&self) -> usize {
        self.end.x - self.start.x + 1
    }

    /// Height in cells.
    pub fn height(&self) -> usize {
        self.end.y - self.start.y + 1
    }

    /// Number of cells covered.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Checks if a cell lies inside these bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use locus::{ChunkBounds, GridPoint};
    ///
    /// let bounds = ChunkBounds::new(GridPoint::new(4, 4), GridPoint::new(7, 7));
    /// assert!(bounds.contains(GridPoint::new(7, 4)));
    /// assert!(!bounds.contains(GridPoint::new(8, 4)));
    /// ```
    pub fn contains(&self, point: GridPoint) -> bool {
        point.x >= self.start.x
            && point.x <= self.end.x
            && point.y >= self.start.y
            && point.y <= self.end.y
    }

    /// Midpoint of the bounds on each axis.
    pub fn center(&self) -> ChunkCenter {
        ChunkCenter::new(
            (self.start.x + self.end.x) as f64 / 2.0,
            (self.start.y + self.end.y) as f64 / 2.0,
        )
    }

    /// All cells inside the bounds, row by row.
    pub fn points(&self) -> impl Iterator<Item = GridPoint> {
        let (start, end) = (self.start, self.end);
        (start.y..=end.y).flat_map(move |y| (start.x..=end.x).map(move |x| GridPoint::new(x, y)))
    }
}

/// Continuous center point of a chunk in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChunkCenter {
    pub x: f64,
    pub y: f64,
}

impl ChunkCenter {
    /// Creates a new center point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance to another center.
    pub fn distance(self, other: ChunkCenter) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A partitioned piece of the world grid.
///
/// Chunks come out of [`GridPartitioner::compute_dominant_biomes`](super::GridPartitioner::compute_dominant_biomes)
/// and are not modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub bounds: ChunkBounds,
    pub center: ChunkCenter,
    /// Most frequent biome among the chunk's cells
    pub biome: Biome,
}

impl Chunk {
    /// Creates a chunk; the center is derived from the bounds.
    pub fn new(id: ChunkId, bounds: ChunkBounds, biome: Biome) -> Self {
        Self {
            id,
            bounds,
            center: bounds.center(),
            biome,
        }
    }

    /// Center-to-center distance between two chunks.
    pub fn distance_to(&self, other: &Chunk) -> f64 {
        self.center.distance(other.center)
    }
}
