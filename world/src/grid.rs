//! Tile grid storage and collision queries.

use dungeonion_core::{
    ArenaDimensions, Channel, MapSnapshot, TileId, DEFAULT_TILE_SIZE, MAX_MAP_SIDE, MAX_TILE_SIZE,
};
use glam::Vec2;

use crate::{layout, tiles::TilePropertyTable};

/// Grid of stacked tile identifiers with per-tile passability.
///
/// Every in-range cell owns a (possibly empty) stack; out-of-range
/// coordinates are never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct TileWorld {
    columns: u32,
    rows: u32,
    tile_size: u32,
    cells: Vec<Vec<TileId>>,
    properties: TilePropertyTable,
}

impl TileWorld {
    /// Creates a grid of empty stacks.
    ///
    /// Sides are clamped to [`MAX_MAP_SIDE`]; a tile size outside
    /// `1..=MAX_TILE_SIZE` falls back to the default.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tile_size: u32) -> Self {
        let columns = columns.min(MAX_MAP_SIDE);
        let rows = rows.min(MAX_MAP_SIDE);
        let tile_size = if (1..=MAX_TILE_SIZE).contains(&tile_size) {
            tile_size
        } else {
            DEFAULT_TILE_SIZE
        };
        Self {
            columns,
            rows,
            tile_size,
            cells: vec![Vec::new(); cell_count(columns, rows)],
            properties: TilePropertyTable::dungeon(),
        }
    }

    /// Creates a grid where every cell holds a single tile.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, tile_size: u32, tile: TileId) -> Self {
        let mut grid = Self::new(columns, rows, tile_size);
        for cell in &mut grid.cells {
            cell.push(tile);
        }
        grid
    }

    /// Builds the stock dungeon level: floor everywhere with the decorated
    /// layer stacked on top.
    #[must_use]
    pub fn default_dungeon() -> Self {
        let mut grid = Self::filled(
            layout::COLUMNS,
            layout::ROWS,
            DEFAULT_TILE_SIZE,
            TileId::DEFAULT_FLOOR,
        );
        let known = grid.properties;
        for (index, raw) in layout::DUNGEON_LAYER.iter().enumerate() {
            let Some(tile) = layout::decode(*raw).map(TileId::new) else {
                continue;
            };
            if !known.contains(tile) || tile == TileId::DEFAULT_FLOOR {
                continue;
            }
            grid.cells[index].push(tile);
        }
        grid
    }

    /// Builds a grid from a snapshot, repairing any gaps.
    ///
    /// Missing rows and cells become empty stacks and surplus entries are
    /// dropped, so the result always holds exactly `width × height` stacks.
    #[must_use]
    pub fn from_snapshot(snapshot: &MapSnapshot) -> Self {
        let mut grid = Self::new(snapshot.width, snapshot.height, snapshot.tile_size);
        for (row, stacks) in snapshot.grid.iter().take(grid.rows as usize).enumerate() {
            for (column, stack) in stacks.iter().take(grid.columns as usize).enumerate() {
                let index = row * grid.columns as usize + column;
                grid.cells[index] = stack.clone();
            }
        }
        grid
    }

    /// Replaces the grid contents with a snapshot.
    pub fn load_from(&mut self, snapshot: &MapSnapshot) {
        *self = Self::from_snapshot(snapshot);
    }

    /// Serialises the grid into its persisted layout.
    #[must_use]
    pub fn to_snapshot(&self) -> MapSnapshot {
        let grid = if self.columns == 0 {
            vec![Vec::new(); self.rows as usize]
        } else {
            self.cells
                .chunks(self.columns as usize)
                .map(<[Vec<TileId>]>::to_vec)
                .collect()
        };
        MapSnapshot {
            width: self.columns,
            height: self.rows,
            tile_size: self.tile_size,
            grid,
        }
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Edge length of a tile in world pixels.
    #[must_use]
    pub const fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Dimensions of the grid.
    #[must_use]
    pub const fn dimensions(&self) -> ArenaDimensions {
        ArenaDimensions::new(self.columns, self.rows, self.tile_size)
    }

    /// Property table consulted by collision queries.
    #[must_use]
    pub const fn properties(&self) -> &TilePropertyTable {
        &self.properties
    }

    /// Reads the stack stored at a cell.
    #[must_use]
    pub fn cell(&self, row: u32, column: u32) -> Option<&[TileId]> {
        self.index(row, column).map(|index| self.cells[index].as_slice())
    }

    /// Pushes a tile on top of a cell stack. Returns `false` when the cell is
    /// outside the grid.
    pub fn paint(&mut self, row: u32, column: u32, tile: TileId) -> bool {
        match self.index(row, column) {
            Some(index) => {
                self.cells[index].push(tile);
                true
            }
            None => false,
        }
    }

    /// Empties a cell stack. Returns `false` when the cell is outside the grid.
    pub fn clear_cell(&mut self, row: u32, column: u32) -> bool {
        match self.index(row, column) {
            Some(index) => {
                self.cells[index].clear();
                true
            }
            None => false,
        }
    }

    /// Iterates over every cell as `(row, column, stack)` in row-major order.
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u32, &[TileId])> {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, stack)| {
            let index = index as u32;
            (index / columns, index % columns, stack.as_slice())
        })
    }

    /// Reports whether a world point is blocked for the given channel.
    ///
    /// Points outside the grid are blocked. Empty stacks and unknown tile
    /// identifiers pass.
    #[must_use]
    pub fn collides(&self, point: Vec2, channel: Channel) -> bool {
        let tile = self.tile_size as f32;
        let column = (point.x / tile).floor();
        let row = (point.y / tile).floor();
        if !(column >= 0.0 && row >= 0.0) {
            return true;
        }
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return true;
        }

        let Some(stack) = self.cell(row as u32, column as u32) else {
            return true;
        };
        stack
            .iter()
            .any(|tile| !self.properties.get(*tile).passable(channel))
    }

    /// Grows the grid by `amount` tiles on each axis, keeping the previous
    /// contents centred. New cells hold the default floor tile.
    ///
    /// Growth stops once the larger side reaches [`MAX_MAP_SIDE`]. Returns
    /// the number of tiles the previous contents shifted by on each axis.
    pub fn expand(&mut self, amount: u32) -> u32 {
        let amount = amount.min(MAX_MAP_SIDE.saturating_sub(self.columns.max(self.rows)));
        let offset = amount / 2;
        let columns = self.columns + amount;
        let rows = self.rows + amount;
        let mut cells = vec![vec![TileId::DEFAULT_FLOOR]; cell_count(columns, rows)];

        for (index, stack) in self.cells.drain(..).enumerate() {
            let row = index / self.columns as usize + offset as usize;
            let column = index % self.columns as usize + offset as usize;
            cells[row * columns as usize + column] = stack;
        }

        self.columns = columns;
        self.rows = rows;
        self.cells = cells;
        offset
    }

    fn index(&self, row: u32, column: u32) -> Option<usize> {
        if row < self.rows && column < self.columns {
            Some(row as usize * self.columns as usize + column as usize)
        } else {
            None
        }
    }
}

fn cell_count(columns: u32, rows: u32) -> usize {
    columns as usize * rows as usize
}
