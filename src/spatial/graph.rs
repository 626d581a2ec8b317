//! Navigation grid graph over the base grid.

use crate::layer::TileLayer;
use crate::map::Layout;
use crate::spatial::coords::GridCoord;
use std::collections::VecDeque;

const NEIGHBOR_STEPS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// One node per walkable cell, edges between 4-adjacent nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridGraph {
    columns: u32,
    rows: u32,
    present: Vec<bool>,
    count: usize,
}

impl GridGraph {
    /// Fully connected `columns` x `rows` graph.
    pub fn full(columns: u32, rows: u32) -> Self {
        let len = columns as usize * rows as usize;
        Self {
            columns,
            rows,
            present: vec![true; len],
            count: len,
        }
    }

    #[inline]
    fn index(&self, c: GridCoord) -> Option<usize> {
        (c.col < self.columns && c.row < self.rows)
            .then(|| c.row as usize * self.columns as usize + c.col as usize)
    }

    /// Grid width in cells.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Grid height in cells.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Nodes left.
    pub fn node_count(&self) -> usize {
        self.count
    }

    /// Whether `c` is still a node.
    pub fn contains(&self, c: GridCoord) -> bool {
        self.index(c).is_some_and(|i| self.present[i])
    }

    /// Removes a node and its edges. `false` if it was already gone.
    pub fn remove_node(&mut self, c: GridCoord) -> bool {
        match self.index(c) {
            Some(i) if self.present[i] => {
                self.present[i] = false;
                self.count -= 1;
                true
            }
            _ => false,
        }
    }

    /// Remaining nodes, bottom row first.
    pub fn nodes(&self) -> impl Iterator<Item = GridCoord> + '_ {
        let columns = self.columns as usize;
        self.present
            .iter()
            .enumerate()
            .filter(|(_, p)| **p)
            .map(move |(i, _)| coord_of(i, columns))
    }

    /// Remaining 4-adjacent nodes. Empty if `c` itself is not a node.
    pub fn neighbors(&self, c: GridCoord) -> impl Iterator<Item = GridCoord> + '_ {
        let here = self.contains(c);
        NEIGHBOR_STEPS.iter().filter_map(move |&(dc, dr)| {
            if !here {
                return None;
            }
            let col = c.col.checked_add_signed(dc)?;
            let row = c.row.checked_add_signed(dr)?;
            let n = GridCoord::new(col, row);
            self.contains(n).then_some(n)
        })
    }

    /// Shortest 4-connected path, both ends included.
    pub fn find_path(&self, from: GridCoord, to: GridCoord) -> Option<Vec<GridCoord>> {
        let start = self.index(from).filter(|&i| self.present[i])?;
        let goal = self.index(to).filter(|&i| self.present[i])?;

        let mut came_from: Vec<Option<usize>> = vec![None; self.present.len()];
        let mut seen = vec![false; self.present.len()];
        let mut queue = VecDeque::new();
        seen[start] = true;
        queue.push_back(from);

        while let Some(cur) = queue.pop_front() {
            let ci = cur.row as usize * self.columns as usize + cur.col as usize;
            if ci == goal {
                let mut path = vec![cur];
                let mut at = ci;
                while let Some(prev) = came_from[at] {
                    path.push(coord_of(prev, self.columns as usize));
                    at = prev;
                }
                path.reverse();
                return Some(path);
            }
            for n in self.neighbors(cur) {
                let ni = (n.row * self.columns + n.col) as usize;
                if !seen[ni] {
                    seen[ni] = true;
                    came_from[ni] = Some(ci);
                    queue.push_back(n);
                }
            }
        }
        None
    }
}

#[inline]
fn coord_of(index: usize, columns: usize) -> GridCoord {
    GridCoord::new((index % columns) as u32, (index / columns) as u32)
}

/// Full graph of the layout's base grid minus every cell holding a tile in
/// one of `layers`.
pub fn build_graph<T>(layout: &Layout<T>, layers: &[&TileLayer<T>]) -> GridGraph {
    let mut graph = GridGraph::full(layout.number_of_columns(), layout.number_of_rows());
    for layer in layers {
        for (cell, _) in layer.placed() {
            graph.remove_node(cell);
        }
    }
    graph
}

/// [`build_graph`] over the layers whose names appear in `names`.
pub fn build_graph_for_names<T>(layout: &Layout<T>, names: &[&str]) -> GridGraph {
    let subset: Vec<&TileLayer<T>> = layout
        .layers
        .iter()
        .filter(|l| l.name.as_deref().is_some_and(|n| names.contains(&n)))
        .collect();
    for name in names {
        if layout.layer_named(name).is_none() {
            log::warn!("no tile layer named `{name}`, ignoring it for the grid graph");
        }
    }
    build_graph(layout, &subset)
}
