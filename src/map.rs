use crate::error::LoadWarning;
use crate::layer::{ObjectGroup, TileLayer};
use crate::spatial::graph::{build_graph, build_graph_for_names, GridGraph};
use macroquad::prelude::{vec2, Vec2};

/// Map orientation declared by the `map` element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Orthogonal.
    #[default]
    Grid,
    /// Diamond grid.
    Isometric,
    /// Accepted, but objects on hexagonal maps are not placed.
    HexagonalFlat,
}

impl Orientation {
    /// Parses the `orientation` attribute.
    pub fn from_attr(value: &str) -> Option<Self> {
        match value {
            "orthogonal" => Some(Orientation::Grid),
            "isometric" => Some(Orientation::Isometric),
            "hexagonal" => Some(Orientation::HexagonalFlat),
            _ => None,
        }
    }
}

/// Root container sized to the document geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseGrid {
    /// Map `width` in cells.
    pub columns: u32,
    /// Map `height` in cells.
    pub rows: u32,
    /// Tile width in pixels.
    pub tile_w: u32,
    /// Tile height in pixels.
    pub tile_h: u32,
}

impl BaseGrid {
    /// Tile size in pixels.
    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        vec2(self.tile_w as f32, self.tile_h as f32)
    }

    /// Columns times rows.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    /// Whether `(col, row)` lies on the grid.
    #[inline]
    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as u32) < self.columns && (row as u32) < self.rows
    }

    /// Pixel centre of a cell, row 0 at the bottom.
    pub fn cell_center(&self, col: i32, row: i32) -> Vec2 {
        vec2(
            (col as f32 + 0.5) * self.tile_w as f32,
            (row as f32 + 0.5) * self.tile_h as f32,
        )
    }
}

/// Borrowed child of the base grid, in render order.
#[derive(Debug)]
pub enum LayoutChild<'a, T> {
    /// A tile layer.
    Tiles(&'a TileLayer<T>),
    /// An object group.
    Objects(&'a ObjectGroup<T>),
}

/// The loaded document: a base grid with its tile layers and object groups.
#[derive(Debug)]
pub struct Layout<T> {
    /// Document geometry.
    pub base: BaseGrid,
    /// Declared orientation, orthogonal if unknown.
    pub orientation: Orientation,
    /// Tile layers in document order.
    pub layers: Vec<TileLayer<T>>,
    /// Object groups in document order.
    pub object_groups: Vec<ObjectGroup<T>>,
    /// Recoverable problems met while loading, in document order.
    pub warnings: Vec<LoadWarning>,
}

impl<T> Layout<T> {
    /// Assembles a layout from completed layers and groups.
    pub fn finalize(
        base: BaseGrid,
        layers: Vec<TileLayer<T>>,
        object_groups: Vec<ObjectGroup<T>>,
        orientation: Orientation,
    ) -> Self {
        Self {
            base,
            orientation,
            layers,
            object_groups,
            warnings: Vec::new(),
        }
    }

    /// Replaces the recorded warnings.
    pub fn with_warnings(mut self, warnings: Vec<LoadWarning>) -> Self {
        self.warnings = warnings;
        self
    }

    /// Columns of the base grid.
    #[inline]
    pub fn number_of_columns(&self) -> u32 {
        self.base.columns
    }

    /// Rows of the base grid.
    #[inline]
    pub fn number_of_rows(&self) -> u32 {
        self.base.rows
    }

    /// First tile layer called `name`.
    pub fn layer_named(&self, name: &str) -> Option<&TileLayer<T>> {
        self.layers.iter().find(|l| l.name.as_deref() == Some(name))
    }

    /// First object group called `name`.
    pub fn object_group_named(&self, name: &str) -> Option<&ObjectGroup<T>> {
        self.object_groups
            .iter()
            .find(|g| g.name.as_deref() == Some(name))
    }

    /// Tile layers first, then object groups, each in document order.
    pub fn children(&self) -> impl Iterator<Item = LayoutChild<'_, T>> + '_ {
        self.layers
            .iter()
            .map(LayoutChild::Tiles)
            .chain(self.object_groups.iter().map(LayoutChild::Objects))
    }

    /// Navigation graph with every tile of every layer as an obstacle.
    pub fn grid_graph(&self) -> GridGraph {
        let all: Vec<&TileLayer<T>> = self.layers.iter().collect();
        build_graph(self, &all)
    }

    /// Navigation graph with tiles of the named layers as obstacles.
    pub fn grid_graph_for(&self, names: &[&str]) -> GridGraph {
        build_graph_for_names(self, names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orientation_attr_values() {
        assert_eq!(Orientation::from_attr("orthogonal"), Some(Orientation::Grid));
        assert_eq!(Orientation::from_attr("isometric"), Some(Orientation::Isometric));
        assert_eq!(Orientation::from_attr("hexagonal"), Some(Orientation::HexagonalFlat));
        assert_eq!(Orientation::from_attr("staggered"), None);
    }

    #[test]
    fn base_grid_bounds_and_centres() {
        let base = BaseGrid {
            columns: 3,
            rows: 2,
            tile_w: 32,
            tile_h: 16,
        };
        assert!(base.contains(2, 1));
        assert!(!base.contains(3, 0));
        assert!(!base.contains(0, -1));
        assert_eq!(base.cell_center(1, 0), vec2(48.0, 8.0));
        assert_eq!(base.cell_count(), 6);
    }

    #[test]
    fn children_list_layers_before_groups() {
        let base = BaseGrid {
            columns: 1,
            rows: 1,
            tile_w: 8,
            tile_h: 8,
        };
        let layout: Layout<()> = Layout::finalize(
            base,
            vec![TileLayer::new(Some("a".into()), None, 1, 1)],
            vec![ObjectGroup::new(Some("b".into()), None)],
            Orientation::Grid,
        );
        let kinds: Vec<&str> = layout
            .children()
            .map(|c| match c {
                LayoutChild::Tiles(_) => "tiles",
                LayoutChild::Objects(_) => "objects",
            })
            .collect();
        assert_eq!(kinds, vec!["tiles", "objects"]);
        assert_eq!(layout.number_of_columns(), 1);
        assert!(layout.layer_named("a").is_some());
        assert!(layout.object_group_named("a").is_none());
    }
}
