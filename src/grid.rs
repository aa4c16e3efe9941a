//! The grids the generators write into: a float heightmap for the terrain
//! algorithm and a classified tile grid for the dungeon algorithm. Both are
//! plain row-major buffers handed to the external renderer as-is.

/// Classification of one dungeon grid cell. The numeric values are the wire
/// contract with the renderer.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Tile {
    Empty = 0,
    Room = 1,
    Corridor = 2,
    Wall = 3,
}

impl Tile {
    pub fn as_index(self) -> i32 {
        self as i32
    }

    /// Map a renderer-side index back to a tile. Unknown indices are logged
    /// and ignored rather than panicking.
    pub fn from_index(index: i32) -> Option<Tile> {
        match index {
            0 => Some(Tile::Empty),
            1 => Some(Tile::Room),
            2 => Some(Tile::Corridor),
            3 => Some(Tile::Wall),
            _ => {
                log::error!("Incorrect tile grid number {}", index);
                None
            }
        }
    }

    /// Room and corridor cells are the carved, walkable interior.
    pub fn is_carved(self) -> bool {
        matches!(self, Tile::Room | Tile::Corridor)
    }
}

/// The shared classification grid for one dungeon generation pass. The
/// partition tree receives it as `&mut TileGrid`; no node owns it.
#[derive(Clone, Debug)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// A fresh all-empty grid. Dungeon grids are sized dungeon size + 2 so
    /// the 1-cell border stays free for inferred walls.
    pub fn new(width: usize, height: usize) -> Self {
        TileGrid {
            width,
            height,
            tiles: vec![Tile::Empty; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    pub fn tile(&self, x: i32, y: i32) -> Tile {
        debug_assert!(self.in_bounds(x, y));
        self.tiles[y as usize * self.width + x as usize]
    }

    pub fn get(&self, x: i32, y: i32) -> Option<Tile> {
        if self.in_bounds(x, y) {
            Some(self.tiles[y as usize * self.width + x as usize])
        } else {
            None
        }
    }

    pub fn set(&mut self, x: i32, y: i32, tile: Tile) {
        if self.in_bounds(x, y) {
            self.tiles[y as usize * self.width + x as usize] = tile;
        }
    }

    /// Write a tile only when the cell currently holds `expected`. Corridor
    /// carving uses this to keep room cells intact, wall inference to fill
    /// only still-empty cells.
    pub fn set_if(&mut self, x: i32, y: i32, expected: Tile, tile: Tile) {
        if self.get(x, y) == Some(expected) {
            self.set(x, y, tile);
        }
    }

    /// Iterate every cell as `(x, y, tile)`.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Tile)> + '_ {
        let width = self.width;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| ((i % width) as i32, (i / width) as i32, *t))
    }

    pub fn count(&self, tile: Tile) -> usize {
        self.tiles.iter().filter(|t| **t == tile).count()
    }

    /// The grid flattened to renderer indices, row-major.
    pub fn to_indices(&self) -> Vec<i32> {
        self.tiles.iter().map(|t| t.as_index()).collect()
    }
}

/// A square heightmap of `(resolution + 1)²` values in `[0, 1]`, row-major.
/// Rebuilt from scratch on every generation call.
#[derive(Clone, Debug)]
pub struct HeightGrid {
    dim: usize,
    heights: Vec<f32>,
}

impl HeightGrid {
    pub fn new(dim: usize) -> Self {
        HeightGrid {
            dim,
            heights: vec![0.0; dim * dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn height(&self, x: usize, y: usize) -> f32 {
        self.heights[y * self.dim + x]
    }

    pub fn set_height(&mut self, x: usize, y: usize, height: f32) {
        self.heights[y * self.dim + x] = height;
    }

    pub fn values(&self) -> &[f32] {
        &self.heights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tile_indices_round_trip() {
        for tile in &[Tile::Empty, Tile::Room, Tile::Corridor, Tile::Wall] {
            assert_eq!(Tile::from_index(tile.as_index()), Some(*tile));
        }
        assert_eq!(Tile::from_index(4), None);
        assert_eq!(Tile::from_index(-1), None);
    }

    #[test]
    fn set_if_preserves_room_cells() {
        let mut grid = TileGrid::new(4, 4);
        grid.set(1, 1, Tile::Room);
        grid.set_if(1, 1, Tile::Empty, Tile::Corridor);
        assert_eq!(grid.tile(1, 1), Tile::Room);
        grid.set_if(2, 1, Tile::Empty, Tile::Corridor);
        assert_eq!(grid.tile(2, 1), Tile::Corridor);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut grid = TileGrid::new(3, 3);
        grid.set(-1, 0, Tile::Wall);
        grid.set(3, 3, Tile::Wall);
        assert_eq!(grid.count(Tile::Wall), 0);
    }

    #[test]
    fn cells_iterates_row_major() {
        let mut grid = TileGrid::new(2, 2);
        grid.set(1, 0, Tile::Room);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells[1], (1, 0, Tile::Room));
        assert_eq!(cells.len(), 4);
    }
}
