//! The binary space partition tree. Nodes live in an arena owned by the
//! tree and reference their two children by index; the classification grid
//! is never owned by a node, every carving method borrows it for the call.
//! The whole tree is discarded and rebuilt on each generation run.

use crate::grid::{Tile, TileGrid};
use crate::sampling::{sample_bool, sample_int_range};
use crate::Vec2;

use rand::Rng;
use std::collections::VecDeque;

const ROOT: usize = 0;

/// One axis-aligned rectangular cell. A node either has no children (a
/// leaf, the only kind that carves a room) or exactly two produced by a
/// single irreversible split.
#[derive(Clone, Debug)]
pub struct PartitionNode {
    centre: Vec2,
    bot_left: Vec2,
    width: i32,
    height: i32,
    children: Vec<usize>,
}

impl PartitionNode {
    fn new(centre: Vec2, width: i32, height: i32, bot_left: Vec2) -> Self {
        PartitionNode {
            centre,
            bot_left,
            width,
            height,
            children: Vec::new(),
        }
    }

    pub fn centre(&self) -> Vec2 {
        self.centre
    }

    /// Bottom-left corner in absolute grid coordinates.
    pub fn bot_left(&self) -> Vec2 {
        self.bot_left
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn children(&self) -> &[usize] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-backed BSP tree over the dungeon rectangle.
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    /// A tree holding only the root cell. The root spans the full dungeon
    /// rectangle with its corner at (1, 1), keeping the outermost grid ring
    /// free for inferred walls; the centre gets the same +1 so child cells
    /// line up with it when corridors are drawn.
    pub fn new(dungeon_size_x: i32, dungeon_size_z: i32) -> Self {
        let bot_left = Vec2::new(1.0, 1.0);
        let centre = Vec2::new(
            dungeon_size_x as f32 / 2.0 + 1.0,
            dungeon_size_z as f32 / 2.0 + 1.0,
        );
        let root = PartitionNode::new(centre, dungeon_size_x, dungeon_size_z, bot_left);

        PartitionTree { nodes: vec![root] }
    }

    pub fn root(&self) -> &PartitionNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, index: usize) -> &PartitionNode {
        &self.nodes[index]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &PartitionNode> {
        self.nodes.iter().filter(|node| node.is_leaf())
    }

    /// Split cells breadth-first so a whole tree level is processed before
    /// the next one starts. Runs `split_amount` iterations; a queue that
    /// empties early (every remaining cell too small to split) just stops,
    /// yielding fewer cells than requested.
    pub fn create_cells(&mut self, split_amount: i32, min_cell_size: i32, rng: &mut impl Rng) {
        let mut split_queue = VecDeque::new();
        split_queue.push_back(ROOT);

        for _ in 0..split_amount {
            let current = match split_queue.pop_front() {
                Some(index) => index,
                None => return,
            };

            self.split_cell(current, min_cell_size, rng);

            for child in self.nodes[current].children.clone() {
                split_queue.push_back(child);
            }
        }
    }

    /// Split one cell in two, if it is big enough on at least one axis.
    ///
    /// An axis qualifies when both halves can still hold the minimum cell
    /// size; with both axes open the orientation is a random bit. A cell
    /// too small on both axes stays a leaf for good.
    pub fn split_cell(&mut self, index: usize, min_cell_size: i32, rng: &mut impl Rng) {
        let (width, height) = {
            let node = &self.nodes[index];
            (node.width, node.height)
        };

        let can_split_vertically = width - min_cell_size > min_cell_size;
        let can_split_horizontally = height - min_cell_size > min_cell_size;

        let split_vertically = match (can_split_horizontally, can_split_vertically) {
            (true, true) => sample_bool(rng),
            (true, false) => false,
            (false, true) => true,
            (false, false) => return,
        };

        let axis_length = if split_vertically { width } else { height };
        let split_location = sample_int_range(rng, min_cell_size, axis_length - min_cell_size);

        if split_vertically {
            // The first child takes the split location as its width; the
            // second gets the remainder on the far side of the cut.
            self.attach_split_children(
                index,
                split_location,
                height,
                width - split_location,
                height,
                true,
                split_location,
            );
        } else {
            self.attach_split_children(
                index,
                width,
                split_location,
                width,
                height - split_location,
                false,
                split_location,
            );
        }
    }

    fn attach_split_children(
        &mut self,
        parent: usize,
        first_width: i32,
        first_height: i32,
        second_width: i32,
        second_height: i32,
        vertically: bool,
        split_pos: i32,
    ) {
        let parent_bot_left = self.nodes[parent].bot_left;

        // Left/bottom child: keeps the parent's corner, centre is half the
        // new extent shifted into absolute coordinates.
        let first_centre = Vec2::new(
            (first_width / 2) as f32 + parent_bot_left.x,
            (first_height / 2) as f32 + parent_bot_left.y,
        );
        let first = PartitionNode::new(first_centre, first_width, first_height, parent_bot_left);

        // Right/top child: corner and centre move past the split line on
        // the cut axis.
        let mut second_centre = Vec2::new((second_width / 2) as f32, (second_height / 2) as f32);
        let mut second_bot_left = parent_bot_left;
        if vertically {
            second_centre.x += split_pos as f32;
            second_bot_left.x += split_pos as f32;
        } else {
            second_centre.y += split_pos as f32;
            second_bot_left.y += split_pos as f32;
        }
        second_centre.x += parent_bot_left.x;
        second_centre.y += parent_bot_left.y;
        let second = PartitionNode::new(second_centre, second_width, second_height, second_bot_left);

        let first_index = self.nodes.len();
        self.nodes.push(first);
        let second_index = self.nodes.len();
        self.nodes.push(second);
        self.nodes[parent].children = vec![first_index, second_index];
    }

    /// Carve one room per leaf cell, centred on the cell centre.
    pub fn create_rooms(&self, min_room_size: i32, grid: &mut TileGrid, rng: &mut impl Rng) {
        self.create_room(ROOT, min_room_size, grid, rng);
    }

    fn create_room(&self, index: usize, min_room_size: i32, grid: &mut TileGrid, rng: &mut impl Rng) {
        let node = &self.nodes[index];

        if !node.is_leaf() {
            for &child in &node.children {
                self.create_room(child, min_room_size, grid, rng);
            }
            return;
        }

        // Half-extents, so the room spans across the cell centre.
        let room_width = sample_int_range(rng, min_room_size, node.width) / 2;
        let room_height = sample_int_range(rng, min_room_size, node.height) / 2;

        let left = (node.centre.x - room_width as f32).floor() as i32;
        let mut right = node.centre.x as i32 + room_width;
        let bot = (node.centre.y - room_height as f32).floor() as i32;
        let mut top = node.centre.y as i32 + room_height;

        // An odd cell axis cannot split evenly around the centre; the spare
        // row/column goes to the upper bound.
        if node.width % 2 == 1 {
            right += 1;
        }
        if node.height % 2 == 1 {
            top += 1;
        }

        for x in left..right {
            for y in bot..top {
                grid.set(x, y, Tile::Room);
            }
        }
    }

    /// Connect every node's room region to its parent with a straight
    /// corridor, children before parents. The root has no parent and
    /// connects nothing.
    pub fn create_corridors(&self, grid: &mut TileGrid) {
        self.create_corridor_to_parent(ROOT, None, grid);
    }

    fn create_corridor_to_parent(&self, index: usize, parent: Option<usize>, grid: &mut TileGrid) {
        let node = &self.nodes[index];

        for &child in &node.children {
            self.create_corridor_to_parent(child, Some(index), grid);
        }

        let parent = match parent {
            Some(parent) => &self.nodes[parent],
            None => return,
        };

        // The split construction keeps one axis of a child's centre equal
        // to its parent's, so the corridor runs straight along the other.
        // A child whose centre coincides with its parent's on both axes
        // lands in the last branch and carves an empty span.
        if node.centre.x < parent.centre.x {
            carve_corridor(grid, node.centre.x, parent.centre.x, true, node.centre.y);
        } else if node.centre.x > parent.centre.x {
            carve_corridor(grid, parent.centre.x, node.centre.x, true, node.centre.y);
        } else if node.centre.y < parent.centre.y {
            carve_corridor(grid, node.centre.y, parent.centre.y, false, node.centre.x);
        } else {
            carve_corridor(grid, parent.centre.y, node.centre.y, false, node.centre.x);
        }
    }
}

/// Write a straight run of corridor tiles between two centres. Rooms have
/// carving priority; a corridor never overwrites a room cell.
fn carve_corridor(grid: &mut TileGrid, lower: f32, upper: f32, along_x: bool, other_axis: f32) {
    let lower = lower.floor() as i32;
    let upper = upper.floor() as i32;
    let other_axis = other_axis.floor() as i32;

    for i in lower..upper {
        let (x, y) = if along_x { (i, other_axis) } else { (other_axis, i) };

        if grid.get(x, y) != Some(Tile::Room) {
            grid.set(x, y, Tile::Corridor);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampling::small_rng;

    fn rect(node: &PartitionNode) -> (i32, i32, i32, i32) {
        (
            node.bot_left().x as i32,
            node.bot_left().y as i32,
            node.width(),
            node.height(),
        )
    }

    fn covered_cells(node: &PartitionNode) -> Vec<(i32, i32)> {
        let (x0, y0, w, h) = rect(node);
        let mut cells = Vec::new();
        for x in x0..x0 + w {
            for y in y0..y0 + h {
                cells.push((x, y));
            }
        }
        cells
    }

    #[test]
    fn split_children_exactly_tile_the_parent() {
        let mut rng = small_rng([3, 1, 4, 1]);

        for _ in 0..20 {
            let mut tree = PartitionTree::new(20, 20);
            tree.split_cell(0, 3, &mut rng);

            let root = tree.root();
            assert_eq!(root.children().len(), 2);

            let mut child_cells: Vec<(i32, i32)> = root
                .children()
                .iter()
                .flat_map(|&c| covered_cells(tree.node(c)))
                .collect();
            child_cells.sort();

            let mut parent_cells = covered_cells(root);
            parent_cells.sort();

            // Same cell set, no duplicates: no gap and no overlap.
            assert_eq!(child_cells, parent_cells);
        }
    }

    #[test]
    fn all_leaves_tile_the_root() {
        let mut rng = small_rng([2, 7, 1, 8]);
        let mut tree = PartitionTree::new(30, 30);
        tree.create_cells(6, 3, &mut rng);

        let mut leaf_cells: Vec<(i32, i32)> = tree
            .leaves()
            .flat_map(|leaf| covered_cells(leaf))
            .collect();
        leaf_cells.sort();

        let mut root_cells = covered_cells(tree.root());
        root_cells.sort();

        assert_eq!(leaf_cells, root_cells);
    }

    #[test]
    fn too_small_cell_stays_a_permanent_leaf() {
        let mut rng = small_rng([1, 1, 1, 1]);
        // 6 - 3 > 3 fails on both axes, so no split can happen.
        let mut tree = PartitionTree::new(6, 6);
        tree.create_cells(5, 3, &mut rng);
        assert_eq!(tree.node_count(), 1);
        assert!(tree.root().is_leaf());
    }

    #[test]
    fn bfs_produces_at_most_split_amount_plus_one_leaves() {
        let mut rng = small_rng([9, 8, 7, 6]);
        let mut tree = PartitionTree::new(20, 20);
        tree.create_cells(3, 3, &mut rng);
        // Each successful split turns one leaf into two.
        assert!(tree.leaves().count() <= 4);
        assert!(tree.node_count() <= 7);
    }

    #[test]
    fn splits_are_deterministic_under_a_fixed_seed() {
        let build = || {
            let mut rng = small_rng([5, 5, 5, 5]);
            let mut tree = PartitionTree::new(40, 40);
            tree.create_cells(10, 3, &mut rng);
            tree
        };

        let a = build();
        let b = build();
        assert_eq!(a.node_count(), b.node_count());
        for i in 0..a.node_count() {
            assert_eq!(rect(a.node(i)), rect(b.node(i)));
            assert_eq!(a.node(i).centre(), b.node(i).centre());
        }
    }

    #[test]
    fn children_share_exactly_one_centre_axis_with_their_parent() {
        let mut rng = small_rng([4, 4, 4, 4]);
        let mut tree = PartitionTree::new(32, 32);
        tree.create_cells(8, 3, &mut rng);

        for index in 0..tree.node_count() {
            let node = tree.node(index);
            for &child in node.children() {
                let child = tree.node(child);
                let same_x = child.centre().x == node.centre().x;
                let same_y = child.centre().y == node.centre().y;
                // At least one shared axis, or the corridor falls back to
                // an empty span; both shared would be the degenerate case.
                assert!(
                    same_x || same_y,
                    "child centre {:?} shares no axis with parent {:?}",
                    child.centre(),
                    node.centre()
                );
            }
        }
    }

    #[test]
    fn rooms_are_carved_only_inside_their_leaf_cells() {
        let mut rng = small_rng([6, 2, 8, 3]);
        let mut tree = PartitionTree::new(20, 20);
        tree.create_cells(3, 3, &mut rng);

        let mut grid = TileGrid::new(22, 22);
        tree.create_rooms(3, &mut grid, &mut rng);

        assert!(grid.count(Tile::Room) > 0);

        let leaf_cells: Vec<(i32, i32)> = tree
            .leaves()
            .flat_map(|leaf| covered_cells(leaf))
            .collect();
        for (x, y, tile) in grid.cells() {
            if tile == Tile::Room {
                assert!(
                    leaf_cells.contains(&(x, y)),
                    "room cell ({}, {}) outside every leaf",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn corridors_never_overwrite_rooms() {
        let mut rng = small_rng([8, 1, 6, 4]);
        let mut tree = PartitionTree::new(20, 20);
        tree.create_cells(3, 3, &mut rng);

        let mut grid = TileGrid::new(22, 22);
        tree.create_rooms(3, &mut grid, &mut rng);

        let rooms_before: Vec<(i32, i32)> = grid
            .cells()
            .filter(|(_, _, t)| *t == Tile::Room)
            .map(|(x, y, _)| (x, y))
            .collect();

        tree.create_corridors(&mut grid);

        for (x, y) in rooms_before {
            assert_eq!(grid.tile(x, y), Tile::Room);
        }
    }

    #[test]
    fn equal_centres_carve_an_empty_corridor_span() {
        let mut grid = TileGrid::new(8, 8);
        carve_corridor(&mut grid, 4.0, 4.0, false, 3.0);
        assert_eq!(grid.count(Tile::Corridor), 0);
    }
}
