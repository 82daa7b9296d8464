//! # Grid Module
//!
//! Biome-labelled world grids and their partitioning into square chunks.
//!
//! The grid itself is produced elsewhere (terrain generation); this module
//! only stores the labels, splits the grid into chunks and works out which
//! biome dominates each chunk.

pub mod chunk;
pub mod partition;

pub use chunk::*;
pub use partition::*;

use crate::{LocusError, LocusResult};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Categorical terrain label attached to a grid cell.
///
/// Labels are opaque strings; two biomes are the same when their labels are
/// equal. Looser matching is the job of
/// [`BiomeCompatibility`](crate::placement::BiomeCompatibility).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Biome(String);

impl Biome {
    /// Creates a biome from its label.
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Gets the label as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Biome {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl From<String> for Biome {
    fn from(label: String) -> Self {
        Self(label)
    }
}

impl Borrow<str> for Biome {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// A cell coordinate on the grid. `x` grows to the right, `y` grows down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPoint {
    pub x: usize,
    pub y: usize,
}

impl GridPoint {
    /// Creates a new grid point.
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A width × height array of biome labels stored row-major.
///
/// # Examples
///
/// ```
/// use locus::{BiomeGrid, GridPoint};
///
/// let grid = BiomeGrid::from_rows(vec![
///     vec!["Forest", "Desert"],
///     vec!["Forest", "Forest"],
/// ])?;
/// assert_eq!(grid.width(), 2);
/// assert_eq!(grid.get(GridPoint::new(1, 0)).map(|b| b.as_str()), Some("Desert"));
/// # Ok::<(), locus::LocusError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBiomeGrid")]
pub struct BiomeGrid {
    width: usize,
    height: usize,
    cells: Vec<Biome>,
}

/// Unchecked serialized form; goes through [`BiomeGrid::new`] on load.
#[derive(Deserialize)]
struct RawBiomeGrid {
    width: usize,
    height: usize,
    cells: Vec<Biome>,
}

impl TryFrom<RawBiomeGrid> for BiomeGrid {
    type Error = LocusError;

    fn try_from(raw: RawBiomeGrid) -> LocusResult<Self> {
        Self::new(raw.width, raw.height, raw.cells)
    }
}

impl BiomeGrid {
    /// Creates a grid from row-major cells.
    ///
    /// Fails when either dimension is zero or the cell count does not match.
    pub fn new(width: usize, height: usize, cells: Vec<Biome>) -> LocusResult<Self> {
        if width == 0 || height == 0 {
            return Err(LocusError::Configuration(format!(
                "grid must not be empty, got {}x{}",
                width, height
            )));
        }

        if cells.len() != width * height {
            return Err(LocusError::Configuration(format!(
                "grid of {}x{} needs {} cells, got {}",
                width,
                height,
                width * height,
                cells.len()
            )));
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Creates a grid from a list of rows, top row first.
    pub fn from_rows<B: Into<Biome>>(rows: Vec<Vec<B>>) -> LocusResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);

        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(LocusError::Configuration(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            cells.extend(row.into_iter().map(Into::into));
        }

        Self::new(width, height, cells)
    }

    /// Creates a grid where every cell carries the same biome.
    pub fn filled(width: usize, height: usize, biome: impl Into<Biome>) -> LocusResult<Self> {
        let biome = biome.into();
        Self::new(width, height, vec![biome; width * height])
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Gets the biome at a cell, or `None` outside the grid.
    pub fn get(&self, point: GridPoint) -> Option<&Biome> {
        if point.x >= self.width || point.y >= self.height {
            return None;
        }
        self.cells.get(point.y * self.width + point.x)
    }

    /// Overwrites the biome at a cell. Returns `false` outside the grid.
    pub fn set(&mut self, point: GridPoint, biome: impl Into<Biome>) -> bool {
        if point.x >= self.width || point.y >= self.height {
            return false;
        }
        match self.cells.get_mut(point.y * self.width + point.x) {
            Some(cell) => {
                *cell = biome.into();
                true
            }
            None => false,
        }
    }

    /// Paints every cell inside `bounds` with one biome.
    pub fn fill_bounds(&mut self, bounds: ChunkBounds, biome: impl Into<Biome>) {
        let biome = biome.into();
        for point in bounds.points() {
            self.set(point, biome.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = BiomeGrid::filled(4, 3, "Plains").unwrap();
        assert_eq!(grid.width(), 4);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.get(GridPoint::new(3, 2)), Some(&Biome::from("Plains")));
        assert_eq!(grid.get(GridPoint::new(4, 0)), None);
        assert_eq!(grid.get(GridPoint::new(0, 3)), None);
    }

    #[test]
    fn test_zero_sized_grid_is_rejected() {
        assert!(matches!(
            BiomeGrid::filled(0, 5, "Plains"),
            Err(LocusError::Configuration(_))
        ));
        assert!(matches!(
            BiomeGrid::from_rows(Vec::<Vec<&str>>::new()),
            Err(LocusError::Configuration(_))
        ));
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let result = BiomeGrid::from_rows(vec![vec!["Forest", "Forest"], vec!["Forest"]]);
        assert!(matches!(result, Err(LocusError::Configuration(_))));
    }

    #[test]
    fn test_cell_count_mismatch_is_rejected() {
        let result = BiomeGrid::new(2, 2, vec![Biome::from("Forest"); 3]);
        assert!(matches!(result, Err(LocusError::Configuration(_))));
    }

    #[test]
    fn test_rows_are_row_major() {
        let grid = BiomeGrid::from_rows(vec![vec!["A", "B", "C"], vec!["D", "E", "F"]]).unwrap();
        assert_eq!(grid.get(GridPoint::new(2, 0)).unwrap().as_str(), "C");
        assert_eq!(grid.get(GridPoint::new(0, 1)).unwrap().as_str(), "D");
    }

    #[test]
    fn test_fill_bounds() {
        let mut grid = BiomeGrid::filled(6, 6, "Ocean").unwrap();
        grid.fill_bounds(
            ChunkBounds::new(GridPoint::new(2, 2), GridPoint::new(3, 4)),
            "Forest",
        );

        assert_eq!(grid.get(GridPoint::new(2, 2)).unwrap().as_str(), "Forest");
        assert_eq!(grid.get(GridPoint::new(3, 4)).unwrap().as_str(), "Forest");
        assert_eq!(grid.get(GridPoint::new(4, 4)).unwrap().as_str(), "Ocean");
        assert!(!grid.set(GridPoint::new(6, 0), "Forest"));
    }

    #[test]
    fn test_deserialized_grid_is_validated() {
        let grid: BiomeGrid =
            serde_json::from_str(r#"{"width":2,"height":1,"cells":["Forest","Desert"]}"#).unwrap();
        assert_eq!(grid.get(GridPoint::new(1, 0)).unwrap().as_str(), "Desert");

        let short = serde_json::from_str::<BiomeGrid>(r#"{"width":3,"height":3,"cells":["Forest"]}"#);
        assert!(short.is_err());

        let empty = serde_json::from_str::<BiomeGrid>(r#"{"width":0,"height":0,"cells":[]}"#);
        assert!(empty.is_err());
    }

    #[test]
    fn test_biome_label_round_trip() {
        let biome = Biome::from("Tundra");
        assert_eq!(biome.to_string(), "Tundra");
        assert_eq!(serde_json::to_string(&biome).unwrap(), "\"Tundra\"");
    }
}
