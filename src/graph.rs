//! Connectivity analysis over a carved dungeon grid. The renderer (and the
//! tests) use this to confirm that every room can reach every other room
//! through the corridor network before committing to output.

use crate::grid::TileGrid;

use fnv::FnvHashMap;
use petgraph::{algo::tarjan_scc, stable_graph::StableGraph, Undirected};

/// Adjacency graph over the carved (room and corridor) cells: one node per
/// cell, an edge for every 4-adjacent carved pair.
pub fn carved_region_graph(grid: &TileGrid) -> StableGraph<(i32, i32), (), Undirected> {
    let mut graph = StableGraph::default();
    let mut cell_nodes = FnvHashMap::default();

    for (x, y, tile) in grid.cells() {
        if tile.is_carved() {
            cell_nodes.insert((x, y), graph.add_node((x, y)));
        }
    }

    for (&(x, y), &node) in cell_nodes.iter() {
        // Right and up only, so each undirected edge is added once.
        for &neighbour in &[(x + 1, y), (x, y + 1)] {
            if let Some(&neighbour_node) = cell_nodes.get(&neighbour) {
                graph.add_edge(node, neighbour_node, ());
            }
        }
    }

    graph
}

/// Number of disconnected carved regions in the grid.
pub fn carved_region_count(grid: &TileGrid) -> usize {
    tarjan_scc(&carved_region_graph(grid)).len()
}

/// True when the carved cells form at most one connected region. A fully
/// empty grid counts as connected.
pub fn carved_region_connected(grid: &TileGrid) -> bool {
    carved_region_count(grid) <= 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Tile;

    #[test]
    fn empty_grid_is_trivially_connected() {
        let grid = TileGrid::new(5, 5);
        assert_eq!(carved_region_count(&grid), 0);
        assert!(carved_region_connected(&grid));
    }

    #[test]
    fn adjacent_carved_cells_form_one_region() {
        let mut grid = TileGrid::new(6, 6);
        grid.set(1, 1, Tile::Room);
        grid.set(2, 1, Tile::Corridor);
        grid.set(3, 1, Tile::Corridor);
        grid.set(3, 2, Tile::Room);

        assert_eq!(carved_region_count(&grid), 1);
        assert!(carved_region_connected(&grid));
    }

    #[test]
    fn separated_rooms_are_two_regions() {
        let mut grid = TileGrid::new(6, 6);
        grid.set(1, 1, Tile::Room);
        grid.set(4, 4, Tile::Room);

        assert_eq!(carved_region_count(&grid), 2);
        assert!(!carved_region_connected(&grid));
    }

    #[test]
    fn diagonal_contact_does_not_connect() {
        let mut grid = TileGrid::new(6, 6);
        grid.set(1, 1, Tile::Room);
        grid.set(2, 2, Tile::Room);

        assert_eq!(carved_region_count(&grid), 2);
    }

    #[test]
    fn walls_are_not_part_of_the_carved_region() {
        let mut grid = TileGrid::new(6, 6);
        grid.set(1, 1, Tile::Room);
        grid.set(2, 1, Tile::Wall);
        grid.set(3, 1, Tile::Room);

        assert_eq!(carved_region_count(&grid), 2);
    }
}
