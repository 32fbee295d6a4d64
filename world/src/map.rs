//! Tile grid implementation of the map collaborator.

use std::collections::HashSet;

use waypoint_defence_core::{PathMap, SetupError, Vec2};

/// Column and row of a tile within the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    const fn is_adjacent_to(self, other: Self) -> bool {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row) == 1
    }
}

/// Bundled layouts shipped with the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// 18 by 18 tiles with a long serpentine path.
    Easy,
    /// 12 by 12 tiles with a shorter serpentine path.
    Normal,
    /// 8 by 8 tiles with a single L-shaped turn.
    Hard,
}

impl Preset {
    const fn dimensions(self) -> (u32, u32) {
        match self {
            Self::Easy => (18, 18),
            Self::Normal => (12, 12),
            Self::Hard => (8, 8),
        }
    }

    fn corners(self) -> &'static [(u32, u32)] {
        match self {
            Self::Easy => &[
                (0, 1),
                (2, 1),
                (2, 16),
                (5, 16),
                (5, 1),
                (8, 1),
                (8, 16),
                (11, 16),
                (11, 1),
                (14, 1),
                (14, 16),
                (17, 16),
            ],
            Self::Normal => &[
                (0, 1),
                (2, 1),
                (2, 10),
                (5, 10),
                (5, 1),
                (8, 1),
                (8, 10),
                (11, 10),
            ],
            Self::Hard => &[(0, 1), (6, 1), (6, 6), (7, 6)],
        }
    }
}

/// Rectangular tile map with an ordered path of adjacent tiles.
#[derive(Clone, Debug)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    tile_length: f32,
    path: Vec<TileCoord>,
    path_lookup: HashSet<TileCoord>,
}

impl GridMap {
    /// Creates a map from an explicit, ordered list of path tiles.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        path: Vec<TileCoord>,
    ) -> Result<Self, SetupError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(SetupError::InvalidTileLength { tile_length });
        }
        if path.is_empty() {
            return Err(SetupError::EmptyPath);
        }
        if let Some(tile) = path
            .iter()
            .find(|tile| tile.column >= columns || tile.row >= rows)
        {
            return Err(SetupError::PathTileOutOfBounds {
                column: tile.column,
                row: tile.row,
            });
        }
        if let Some(index) = path
            .windows(2)
            .position(|pair| !pair[0].is_adjacent_to(pair[1]))
        {
            return Err(SetupError::DisconnectedPath { index });
        }

        let path_lookup = path.iter().copied().collect();
        Ok(Self {
            columns,
            rows,
            tile_length,
            path,
            path_lookup,
        })
    }

    /// Creates a map whose path runs in straight segments between `corners`.
    ///
    /// Consecutive corners must share a column or a row.
    pub fn from_corners(
        columns: u32,
        rows: u32,
        tile_length: f32,
        corners: &[(u32, u32)],
    ) -> Result<Self, SetupError> {
        let mut path = Vec::new();
        for (index, pair) in corners.windows(2).enumerate() {
            let (from, to) = (pair[0], pair[1]);
            if from.0 != to.0 && from.1 != to.1 {
                return Err(SetupError::DisconnectedPath { index });
            }
            if path.is_empty() {
                path.push(TileCoord::new(from.0, from.1));
            }
            let mut cursor = from;
            while cursor != to {
                cursor = (step_towards(cursor.0, to.0), step_towards(cursor.1, to.1));
                path.push(TileCoord::new(cursor.0, cursor.1));
            }
        }
        if let [(column, row)] = corners {
            path.push(TileCoord::new(*column, *row));
        }

        Self::new(columns, rows, tile_length, path)
    }

    /// Creates one of the bundled layouts.
    pub fn preset(preset: Preset, tile_length: f32) -> Result<Self, SetupError> {
        let (columns, rows) = preset.dimensions();
        Self::from_corners(columns, rows, tile_length, preset.corners())
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Ordered path tiles from entrance to exit.
    #[must_use]
    pub fn path(&self) -> &[TileCoord] {
        &self.path
    }

    /// Tile containing the provided world-space position, if it lies on the map.
    #[must_use]
    pub fn tile_at(&self, position: Vec2) -> Option<TileCoord> {
        let scaled = (position / self.tile_length).floor();
        if scaled.x < 0.0 || scaled.y < 0.0 {
            return None;
        }
        let (column, row) = (scaled.x as u32, scaled.y as u32);
        (column < self.columns && row < self.rows).then_some(TileCoord::new(column, row))
    }

    /// World-space centre of the provided tile.
    #[must_use]
    pub fn tile_centre(&self, tile: TileCoord) -> Vec2 {
        let half = self.tile_length / 2.0;
        Vec2::new(
            tile.column as f32 * self.tile_length + half,
            tile.row as f32 * self.tile_length + half,
        )
    }

    /// Every tile that is not part of the path, in row-major order.
    #[must_use]
    pub fn buildable_tiles(&self) -> Vec<TileCoord> {
        (0..self.rows)
            .flat_map(|row| (0..self.columns).map(move |column| TileCoord::new(column, row)))
            .filter(|tile| !self.path_lookup.contains(tile))
            .collect()
    }
}

fn step_towards(from: u32, to: u32) -> u32 {
    match from.cmp(&to) {
        std::cmp::Ordering::Less => from + 1,
        std::cmp::Ordering::Greater => from - 1,
        std::cmp::Ordering::Equal => from,
    }
}

impl PathMap for GridMap {
    fn waypoints(&self) -> Vec<Vec2> {
        self.path.iter().map(|tile| self.tile_centre(*tile)).collect()
    }

    fn is_path_tile(&self, position: Vec2) -> bool {
        self.tile_at(position)
            .is_some_and(|tile| self.path_lookup.contains(&tile))
    }

    fn tile_length(&self) -> f32 {
        self.tile_length
    }
}
