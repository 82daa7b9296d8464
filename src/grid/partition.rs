//! # Grid Partitioning
//!
//! Splits a biome grid into a regular array of square chunks and resolves the
//! dominant biome of each one by majority vote.

use super::{Biome, BiomeGrid, Chunk, ChunkBounds, ChunkId, GridPoint};
use crate::{LocusError, LocusResult};
use log::debug;
use std::collections::HashMap;

/// Splits a `width × height` grid into `chunk_size` squares.
///
/// Chunks are laid out row-major. Chunks on the right and bottom edges are
/// clipped to the grid, so they may be smaller than `chunk_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPartitioner {
    width: usize,
    height: usize,
    chunk_size: usize,
}

impl GridPartitioner {
    /// Creates a partitioner for the given grid dimensions.
    ///
    /// # Examples
    ///
    /// ```
    /// use locus::GridPartitioner;
    ///
    /// let partitioner = GridPartitioner::new(10, 10, 4)?;
    /// assert_eq!(partitioner.chunk_count(), 9);
    /// # Ok::<(), locus::LocusError>(())
    /// ```
    pub fn new(width: usize, height: usize, chunk_size: usize) -> LocusResult<Self> {
        if chunk_size == 0 {
            return Err(LocusError::Configuration(
                "chunk size must be positive".to_string(),
            ));
        }

        if width == 0 || height == 0 {
            return Err(LocusError::Configuration(format!(
                "cannot partition an empty {}x{} grid",
                width, height
            )));
        }

        Ok(Self {
            width,
            height,
            chunk_size,
        })
    }

    /// Creates a partitioner matching a grid's dimensions.
    pub fn for_grid(grid: &BiomeGrid, chunk_size: usize) -> LocusResult<Self> {
        Self::new(grid.width(), grid.height(), chunk_size)
    }

    /// Number of chunk columns.
    pub fn columns(&self) -> usize {
        self.width.div_ceil(self.chunk_size)
    }

    /// Number of chunk rows.
    pub fn rows(&self) -> usize {
        self.height.div_ceil(self.chunk_size)
    }

    /// Total number of chunks.
    pub fn chunk_count(&self) -> usize {
        self.columns() * self.rows()
    }

    /// Nominal chunk edge length.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Bounds of every chunk in row-major chunk order.
    pub fn bounds(&self) -> Vec<ChunkBounds> {
        let mut bounds = Vec::with_capacity(self.chunk_count());

        for row in 0..self.rows() {
            for column in 0..self.columns() {
                let start = GridPoint::new(column * self.chunk_size, row * self.chunk_size);
                let end = GridPoint::new(
                    ((column + 1) * self.chunk_size).min(self.width) - 1,
                    ((row + 1) * self.chunk_size).min(self.height) - 1,
                );
                bounds.push(ChunkBounds::new(start, end));
            }
        }

        bounds
    }

    /// Tallies the biomes inside every chunk and picks the most frequent one.
    ///
    /// Ties go to the label seen first when scanning the chunk row by row.
    /// The returned partition also groups chunks by their dominant biome.
    pub fn compute_dominant_biomes(&self, grid: &BiomeGrid) -> LocusResult<BiomePartition> {
        if grid.width() != self.width || grid.height() != self.height {
            return Err(LocusError::Configuration(format!(
                "partitioner expects a {}x{} grid, got {}x{}",
                self.width,
                self.height,
                grid.width(),
                grid.height()
            )));
        }

        let mut chunks = Vec::with_capacity(self.chunk_count());
        let mut groups: HashMap<Biome, Vec<ChunkId>> = HashMap::new();

        for (index, bounds) in self.bounds().into_iter().enumerate() {
            let id = ChunkId(index);
            let biome = dominant_biome(grid, bounds).ok_or_else(|| {
                LocusError::Configuration(format!("{} covers no grid cells", id))
            })?;

            groups.entry(biome.clone()).or_default().push(id);
            chunks.push(Chunk::new(id, bounds, biome));
        }

        debug!(
            "Partitioned {}x{} grid into {} chunks of size {} ({} biomes)",
            self.width,
            self.height,
            chunks.len(),
            self.chunk_size,
            groups.len()
        );

        Ok(BiomePartition { chunks, groups })
    }
}

/// Majority vote over the cells in `bounds`; earliest label wins ties.
fn dominant_biome(grid: &BiomeGrid, bounds: ChunkBounds) -> Option<Biome> {
    // Kept in first-seen order so the tie-break is a plain scan.
    let mut tally: Vec<(&Biome, usize)> = Vec::new();

    for point in bounds.points() {
        let Some(biome) = grid.get(point) else {
            continue;
        };
        match tally.iter_mut().find(|(label, _)| *label == biome) {
            Some((_, count)) => *count += 1,
            None => tally.push((biome, 1)),
        }
    }

    let mut leader: Option<(&Biome, usize)> = None;
    for (biome, count) in tally {
        if leader.map_or(true, |(_, best)| count > best) {
            leader = Some((biome, count));
        }
    }

    leader.map(|(biome, _)| biome.clone())
}

/// Chunks of a grid with their dominant biomes, plus a biome → chunks index.
#[derive(Debug, Clone)]
pub struct BiomePartition {
    chunks: Vec<Chunk>,
    groups: HashMap<Biome, Vec<ChunkId>>,
}

impl BiomePartition {
    /// All chunks in row-major chunk order.
    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    /// Looks up a chunk by id.
    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks.get(id.0)
    }

    /// Chunks whose dominant biome is `biome`, in chunk order.
    pub fn group(&self, biome: &str) -> &[ChunkId] {
        self.groups.get(biome).map_or(&[], Vec::as_slice)
    }

    /// Every biome that dominates at least one chunk.
    pub fn biomes(&self) -> impl Iterator<Item = &Biome> {
        self.groups.keys()
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the partition has no chunks.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}
