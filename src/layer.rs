use crate::spatial::coords::{layer_fill_order, GridCoord};
use crate::tileset::{TileDefinition, TileSet};
use macroquad::prelude::Vec2;
use std::sync::Arc;

/// A tile put into a layer cell.
#[derive(Debug)]
pub struct PlacedTile<T> {
    /// Gid with flip flags removed.
    pub gid: u32,
    /// Registered definition the gid resolved to.
    pub tile: Arc<TileDefinition<T>>,
}

impl<T> Clone for PlacedTile<T> {
    fn clone(&self) -> Self {
        Self {
            gid: self.gid,
            tile: Arc::clone(&self.tile),
        }
    }
}

impl<T> PlacedTile<T> {
    /// Texture of the placed definition.
    #[inline]
    pub fn texture(&self) -> &T {
        &self.tile.texture
    }
}

/// A grid of tile placements aligned with the base grid.
///
/// All placed tiles come from `tile_source`. A layer that never received a
/// tile has no tile source and keeps a zero position.
#[derive(Debug, Clone)]
pub struct TileLayer<T> {
    /// Layer `name`.
    pub name: Option<String>,
    /// Offset parsed from `offsetx`/`offsety`, y flipped to point up.
    pub offset: Option<Vec2>,
    /// Offset once bound, zero before.
    pub position: Vec2,
    columns: u32,
    rows: u32,
    tile_source: Option<Arc<TileSet>>,
    cells: Vec<Option<PlacedTile<T>>>,
}

impl<T> TileLayer<T> {
    pub(crate) fn new(name: Option<String>, offset: Option<Vec2>, columns: u32, rows: u32) -> Self {
        let mut cells = Vec::new();
        cells.resize_with(columns as usize * rows as usize, || None);
        Self {
            name,
            offset,
            position: Vec2::ZERO,
            columns,
            rows,
            tile_source: None,
            cells,
        }
    }

    pub(crate) fn bind(&mut self, tileset: Arc<TileSet>) {
        self.position = self.offset.unwrap_or(Vec2::ZERO);
        self.tile_source = Some(tileset);
    }

    pub(crate) fn set(&mut self, at: GridCoord, tile: PlacedTile<T>) {
        if let Some(idx) = self.index(at) {
            self.cells[idx] = Some(tile);
        }
    }

    #[inline]
    fn index(&self, at: GridCoord) -> Option<usize> {
        (at.col < self.columns && at.row < self.rows)
            .then(|| at.row as usize * self.columns as usize + at.col as usize)
    }

    /// Cells per row.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of cells tracked, empty ones included.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Tileset of the first placed tile.
    pub fn tile_source(&self) -> Option<&Arc<TileSet>> {
        self.tile_source.as_ref()
    }

    /// Tile in cell `(col, row)`, row 0 at the bottom.
    pub fn tile_at(&self, col: u32, row: u32) -> Option<&PlacedTile<T>> {
        let idx = self.index(GridCoord::new(col, row))?;
        self.cells[idx].as_ref()
    }

    /// Cells in document fill order.
    pub fn cells(&self) -> impl Iterator<Item = (GridCoord, Option<&PlacedTile<T>>)> + '_ {
        layer_fill_order(self.columns, self.rows).map(move |c| (c, self.tile_at(c.col, c.row)))
    }

    /// Occupied cells in document fill order.
    pub fn placed(&self) -> impl Iterator<Item = (GridCoord, &PlacedTile<T>)> + '_ {
        self.cells().filter_map(|(c, t)| t.map(|t| (c, t)))
    }

    /// Occupied cells.
    pub fn placed_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// No tile was ever placed.
    pub fn is_empty(&self) -> bool {
        self.tile_source.is_none()
    }
}

/// Texture and anchor of an object carrying a `gid`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sprite<T> {
    /// Object `gid` with flip flags removed.
    pub gid: u32,
    /// Texture of the referenced tile.
    pub texture: T,
    /// Explicit size, the tile size per missing axis.
    pub size: Vec2,
    /// Normalised anchor; puts the sprite's base on the tile footprint.
    pub anchor: Vec2,
}

/// A freely positioned object.
#[derive(Debug, Clone, PartialEq)]
pub struct MapObject<T> {
    /// Object `id`.
    pub id: Option<u32>,
    /// Object `name`.
    pub name: Option<String>,
    /// Pixel position, or the cell centre on isometric maps.
    pub position: Vec2,
    /// Converted cell, isometric maps only.
    pub cell: Option<(i32, i32)>,
    /// Explicit `width` and `height`, when both are given.
    pub size: Option<Vec2>,
    /// Present when the object carries a registered `gid`.
    pub sprite: Option<Sprite<T>>,
}

/// Freely positioned objects, in document order.
#[derive(Debug, Clone)]
pub struct ObjectGroup<T> {
    /// Group `name`.
    pub name: Option<String>,
    /// Offset, y flipped to point up.
    pub offset: Option<Vec2>,
    /// Offset, or zero.
    pub position: Vec2,
    /// Placed objects in document order.
    pub objects: Vec<MapObject<T>>,
}

impl<T> ObjectGroup<T> {
    pub(crate) fn new(name: Option<String>, offset: Option<Vec2>) -> Self {
        Self {
            name,
            offset,
            position: offset.unwrap_or(Vec2::ZERO),
            objects: Vec::new(),
        }
    }

    /// First object called `name`.
    pub fn object_named(&self, name: &str) -> Option<&MapObject<T>> {
        self.objects.iter().find(|o| o.name.as_deref() == Some(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Orientation;
    use crate::properties::Properties;
    use crate::tileset::TileSetId;
    use macroquad::prelude::vec2;

    fn placed(gid: u32) -> PlacedTile<&'static str> {
        PlacedTile {
            gid,
            tile: Arc::new(TileDefinition {
                local_id: gid - 1,
                texture: "grass",
                properties: Properties::new(),
            }),
        }
    }

    #[test]
    fn offset_applies_on_bind_only() {
        let mut layer: TileLayer<&str> = TileLayer::new(None, Some(vec2(4.0, -8.0)), 2, 2);
        assert_eq!(layer.position, Vec2::ZERO);
        assert_eq!(layer.cell_count(), 4);
        assert!(layer.is_empty());

        layer.bind(Arc::new(TileSet {
            id: TileSetId(0),
            name: None,
            orientation: Orientation::Grid,
        }));
        assert_eq!(layer.position, vec2(4.0, -8.0));
        assert!(!layer.is_empty());
    }

    #[test]
    fn cells_iterate_in_fill_order() {
        let mut layer = TileLayer::new(Some("ground".into()), None, 2, 2);
        layer.set(GridCoord::new(1, 0), placed(1));
        layer.set(GridCoord::new(5, 5), placed(1));

        assert_eq!(layer.placed_count(), 1);
        let last = layer.cells().last().expect("cells");
        assert_eq!(last.0, GridCoord::new(1, 0));
        assert_eq!(last.1.map(|t| *t.texture()), Some("grass"));
        assert!(layer.tile_at(0, 1).is_none());
    }
}
