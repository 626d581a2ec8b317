//! Fill order of layer cells and pixel -> cell conversion.

/// A cell of the base grid. Row 0 is the bottom row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCoord {
    /// Counted from the left.
    pub col: u32,
    /// Counted from the bottom.
    pub row: u32,
}

impl GridCoord {
    /// Cell `(col, row)`.
    #[inline]
    pub const fn new(col: u32, row: u32) -> Self {
        Self { col, row }
    }
}

/// Placement cursor over a layer in raster order: starts at the top-left
/// cell `(0, rows - 1)`, moves right, wraps to the next row down.
#[derive(Debug, Clone)]
pub(crate) struct FillCursor {
    columns: u32,
    next: Option<GridCoord>,
}

impl FillCursor {
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let next = (columns > 0 && rows > 0).then(|| GridCoord::new(0, rows - 1));
        Self { columns, next }
    }

    /// Cell the next tile goes to, `None` once the layer is full.
    #[inline]
    pub(crate) fn current(&self) -> Option<GridCoord> {
        self.next
    }

    pub(crate) fn advance(&mut self) {
        self.next = match self.next {
            Some(c) if c.col + 1 < self.columns => Some(GridCoord::new(c.col + 1, c.row)),
            Some(c) if c.row > 0 => Some(GridCoord::new(0, c.row - 1)),
            _ => None,
        };
    }
}

impl Iterator for FillCursor {
    type Item = GridCoord;

    fn next(&mut self) -> Option<GridCoord> {
        let c = self.current()?;
        self.advance();
        Some(c)
    }
}

/// Every cell of a `columns` x `rows` layer in the order tiles appear in the
/// document.
pub fn layer_fill_order(columns: u32, rows: u32) -> impl Iterator<Item = GridCoord> {
    FillCursor::new(columns, rows)
}

/// Cell under pixel `(x, y)` of an isometric map.
///
/// Both axes are divided by the tile *height*. The result may fall outside
/// the map; callers report it, nothing is clamped.
pub fn isometric_pixel_to_cell(x: f32, y: f32, tile_height: u32, rows: u32) -> (i32, i32) {
    let th = tile_height as f32;
    let col = (x / th).floor() as i32 - 1;
    let row = (rows as f32 - y / th).floor() as i32;
    (col, row)
}
