//! Single-pass TMX state machine.
//!
//! One [`ParserSession`] reads one document. It holds the tile registry, the
//! currently open scope and the placement cursor, and hands completed layers
//! and object groups to the layout once their end tags arrive.

use crate::config::LoadOptions;
use crate::error::{LoadWarning, MapError};
use crate::layer::{MapObject, ObjectGroup, PlacedTile, Sprite, TileLayer};
use crate::loader::events::{Attributes, TmxEvent};
use crate::map::{BaseGrid, Layout, Orientation};
use crate::properties::{Properties, PropertyKind};
use crate::registry::{RegistryEntry, TileRegistry};
use crate::spatial::coords::{isometric_pixel_to_cell, FillCursor, GridCoord};
use crate::tileset::{image_stem, TextureLookup, TileDefinition, TileSet, TileSetId};
use macroquad::prelude::{vec2, Vec2};
use std::mem;
use std::sync::Arc;

/// Flip flags live in the top three bits of a gid; they are not modelled.
pub const GID_MASK: u32 = 0x1FFF_FFFF;

struct OpenTileset {
    first_gid: u32,
    tileset: Arc<TileSet>,
}

struct PendingTile<T> {
    local_id: u32,
    texture: Option<T>,
    properties: Properties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataMode {
    Tiles,
    Csv,
    Unsupported,
}

enum LayerState<T> {
    /// No tile placed yet, so no tile source.
    Pending {
        name: Option<String>,
        offset: Option<Vec2>,
    },
    /// Bound to the tileset of its first placed tile.
    Bound(TileLayer<T>),
}

struct LayerScope<T> {
    state: LayerState<T>,
    cursor: FillCursor,
    data: DataMode,
}

impl<T> LayerScope<T> {
    fn name(&self) -> Option<String> {
        match &self.state {
            LayerState::Pending { name, .. } => name.clone(),
            LayerState::Bound(layer) => layer.name.clone(),
        }
    }

    fn place(&mut self, at: GridCoord, gid: u32, entry: &RegistryEntry<T>, base: BaseGrid) -> Result<(), MapError> {
        if let LayerState::Pending { name, offset } = &mut self.state {
            let mut layer = TileLayer::new(name.take(), *offset, base.columns, base.rows);
            layer.bind(Arc::clone(&entry.tileset));
            self.state = LayerState::Bound(layer);
        }
        let LayerState::Bound(layer) = &mut self.state else {
            return Ok(());
        };
        if let Some(source) = layer.tile_source() {
            if source.id != entry.tileset.id {
                return Err(MapError::TilesetMismatch {
                    layer: layer.name.clone().unwrap_or_default(),
                    column: at.col,
                    row: at.row,
                    expected: source.display_name(),
                    found: entry.tileset.display_name(),
                });
            }
        }
        layer.set(
            at,
            PlacedTile {
                gid,
                tile: Arc::clone(&entry.tile),
            },
        );
        Ok(())
    }

    fn finish(self, base: BaseGrid) -> TileLayer<T> {
        match self.state {
            LayerState::Pending { name, offset } => TileLayer::new(name, offset, base.columns, base.rows),
            LayerState::Bound(layer) => layer,
        }
    }
}

/// The open scope. The TMX scopes never overlap, so only one is open at a
/// time.
enum Context<T> {
    Document,
    Tileset(OpenTileset),
    TileDefinition {
        tileset: OpenTileset,
        tile: PendingTile<T>,
    },
    Layer(LayerScope<T>),
    ObjectGroup(ObjectGroup<T>),
}

/// Parser state for one document.
pub struct ParserSession<L: TextureLookup> {
    textures: L,
    options: LoadOptions,
    base: Option<BaseGrid>,
    orientation: Orientation,
    registry: TileRegistry<L::Texture>,
    context: Context<L::Texture>,
    /// Depth inside a subtree being skipped as a whole.
    skip_depth: usize,
    next_tileset_id: u32,
    layers: Vec<TileLayer<L::Texture>>,
    object_groups: Vec<ObjectGroup<L::Texture>>,
    warnings: Vec<LoadWarning>,
}

impl<L: TextureLookup> ParserSession<L> {
    /// Fresh session for one document.
    pub fn new(textures: L, options: LoadOptions) -> Self {
        Self {
            textures,
            options,
            base: None,
            orientation: Orientation::Grid,
            registry: TileRegistry::new(),
            context: Context::Document,
            skip_depth: 0,
            next_tileset_id: 0,
            layers: Vec::new(),
            object_groups: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Tiles registered so far.
    pub fn registry(&self) -> &TileRegistry<L::Texture> {
        &self.registry
    }

    /// Warnings recorded so far.
    pub fn warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// Dispatches one event to the element handlers.
    pub fn feed(&mut self, event: &TmxEvent) -> Result<(), MapError> {
        match event {
            TmxEvent::Start { name, attributes } => self.start_element(name, attributes),
            TmxEvent::End { name } => self.end_element(name),
            TmxEvent::Text(text) => self.text(text),
        }
    }

    /// Handles a start tag.
    pub fn start_element(&mut self, name: &str, attrs: &Attributes) -> Result<(), MapError> {
        if self.skip_depth > 0 {
            self.skip_depth += 1;
            return Ok(());
        }
        match (name, &self.context) {
            ("map", _) => self.open_map(attrs)?,
            // scopes only open at document level; anything nested (per-tile
            // collision groups included) is dropped with its subtree
            ("tileset" | "layer" | "objectgroup", ctx) if !matches!(ctx, Context::Document) => {
                self.warn(LoadWarning::SkippedSubtree(name.to_owned()));
                self.skip_depth = 1;
            }
            ("tileset", _) => self.open_tileset(attrs),
            ("tile", Context::Tileset(_)) => self.open_tile_definition(attrs),
            ("tile", _) => {
                let gid = attrs.parse::<u32>("gid");
                self.place_tile(gid)?;
            }
            ("image", _) => self.open_image(attrs),
            ("property", _) => self.open_property(attrs),
            ("layer", _) => self.open_layer(attrs)?,
            ("data", _) => self.open_data(attrs),
            ("objectgroup", _) => self.open_object_group(attrs),
            ("object", _) => self.open_object(attrs)?,
            ("tileoffset" | "animation" | "frame", _) => self.warn(LoadWarning::IgnoredElement(name.to_owned())),
            _ => log::debug!("skipping unmodelled element `{name}`"),
        }
        Ok(())
    }

    /// Handles an end tag.
    pub fn end_element(&mut self, name: &str) -> Result<(), MapError> {
        if self.skip_depth > 0 {
            self.skip_depth -= 1;
            return Ok(());
        }
        match name {
            "tileset" => {
                if matches!(self.context, Context::Tileset(_)) {
                    self.context = Context::Document;
                }
            }
            "tile" => self.close_tile_definition(),
            "layer" => self.close_layer(),
            "objectgroup" => self.close_object_group(),
            "data" => {
                if let Context::Layer(scope) = &mut self.context {
                    scope.data = DataMode::Tiles;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Handles character data; only csv layer data is read.
    pub fn text(&mut self, text: &str) -> Result<(), MapError> {
        if self.skip_depth > 0 {
            return Ok(());
        }
        let csv = matches!(&self.context, Context::Layer(scope) if scope.data == DataMode::Csv);
        if !csv {
            return Ok(());
        }
        for raw in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match raw.parse::<u32>() {
                Ok(gid) => self.place_tile(Some(gid))?,
                Err(_) => {
                    self.warn(LoadWarning::InvalidCsvGid(raw.to_owned()));
                    if let Context::Layer(scope) = &mut self.context {
                        scope.cursor.advance();
                    }
                }
            }
        }
        Ok(())
    }

    /// Closes whatever scope is still open and yields the layout.
    pub fn finish(mut self) -> Result<Layout<L::Texture>, MapError> {
        let base = self.base()?;
        match mem::replace(&mut self.context, Context::Document) {
            Context::Layer(scope) => self.layers.push(scope.finish(base)),
            Context::ObjectGroup(group) => self.object_groups.push(group),
            _ => {}
        }
        log::info!(
            "loaded {}x{} map: {} tile layers, {} object groups, {} tiles registered, {} warnings",
            base.columns,
            base.rows,
            self.layers.len(),
            self.object_groups.len(),
            self.registry.len(),
            self.warnings.len()
        );
        Ok(Layout::finalize(base, self.layers, self.object_groups, self.orientation).with_warnings(self.warnings))
    }

    fn warn(&mut self, warning: LoadWarning) {
        push_warning(&mut self.warnings, warning);
    }

    fn base(&self) -> Result<BaseGrid, MapError> {
        self.base.ok_or(MapError::MissingGeometry { attribute: "map" })
    }

    fn open_map(&mut self, attrs: &Attributes) -> Result<(), MapError> {
        let dim = |attribute: &'static str| {
            attrs
                .parse::<u32>(attribute)
                .filter(|v| *v > 0)
                .ok_or(MapError::MissingGeometry { attribute })
        };
        let base = BaseGrid {
            columns: dim("width")?,
            rows: dim("height")?,
            tile_w: dim("tilewidth")?,
            tile_h: dim("tileheight")?,
        };
        if base.columns.checked_mul(base.rows).is_none() {
            return Err(MapError::GridTooLarge {
                columns: base.columns,
                rows: base.rows,
            });
        }

        let declared = attrs.get("orientation");
        self.orientation = match declared.and_then(Orientation::from_attr) {
            Some(o) => o,
            None => {
                self.warn(LoadWarning::UnknownOrientation(declared.map(str::to_owned)));
                Orientation::Grid
            }
        };
        self.base = Some(base);
        Ok(())
    }

    fn open_tileset(&mut self, attrs: &Attributes) {
        let name = attrs.get("name").map(str::to_owned);
        if let Some(source) = attrs.get("source") {
            log::warn!("external tileset `{source}` is not loaded");
        }
        match attrs.parse::<u32>("firstgid") {
            Some(first_gid) => {
                let tileset = Arc::new(TileSet {
                    id: TileSetId(self.next_tileset_id),
                    name,
                    orientation: self.orientation,
                });
                self.next_tileset_id += 1;
                self.context = Context::Tileset(OpenTileset { first_gid, tileset });
            }
            None => {
                // none of its gids can be computed, drop the whole subtree
                self.warn(LoadWarning::TilesetWithoutFirstGid { name });
                self.skip_depth = 1;
            }
        }
    }

    fn open_tile_definition(&mut self, attrs: &Attributes) {
        let Some(local_id) = attrs.parse::<u32>("id") else {
            self.warn(LoadWarning::TileWithoutId);
            self.skip_depth = 1;
            return;
        };
        if !matches!(self.context, Context::Tileset(_)) {
            return;
        }
        if let Context::Tileset(tileset) = mem::replace(&mut self.context, Context::Document) {
            self.context = Context::TileDefinition {
                tileset,
                tile: PendingTile {
                    local_id,
                    texture: None,
                    properties: Properties::new(),
                },
            };
        }
    }

    fn close_tile_definition(&mut self) {
        if !matches!(self.context, Context::TileDefinition { .. }) {
            // placements are complete on their start tag
            return;
        }
        let Context::TileDefinition { tileset, tile } = mem::replace(&mut self.context, Context::Document) else {
            return;
        };
        match tile.texture {
            Some(texture) => {
                let gid = tileset.first_gid.saturating_add(tile.local_id);
                let definition = Arc::new(TileDefinition {
                    local_id: tile.local_id,
                    texture,
                    properties: tile.properties,
                });
                self.registry.register(gid, definition, Arc::clone(&tileset.tileset));
            }
            None => self.warn(LoadWarning::TileWithoutTexture {
                local_id: tile.local_id,
            }),
        }
        self.context = Context::Tileset(tileset);
    }

    fn open_image(&mut self, attrs: &Attributes) {
        let Context::TileDefinition { tileset, tile } = &mut self.context else {
            self.warn(LoadWarning::ImageOutsideTile);
            return;
        };
        let Some(stem) = attrs.get("source").and_then(image_stem) else {
            push_warning(&mut self.warnings, LoadWarning::ImageWithoutSource);
            return;
        };
        let key = self.options.texture_key(tileset.tileset.name.as_deref(), stem);
        match self.textures.resolve(&key) {
            Some(texture) => tile.texture = Some(texture),
            None => push_warning(&mut self.warnings, LoadWarning::TextureNotFound { name: key }),
        }
    }

    fn open_property(&mut self, attrs: &Attributes) {
        let name = attrs.get("name");
        let Context::TileDefinition { tile, .. } = &mut self.context else {
            self.warn(LoadWarning::PropertyOutsideTile {
                name: name.unwrap_or_default().to_owned(),
            });
            return;
        };
        let (Some(name), Some(value)) = (name, attrs.get("value")) else {
            push_warning(&mut self.warnings, LoadWarning::PropertyWithoutNameOrValue);
            return;
        };
        let kind = PropertyKind::from_attr(attrs.get("type"));
        match kind.coerce(value) {
            Some(v) => {
                tile.properties.insert(name, v);
            }
            None => self.warn(LoadWarning::InvalidPropertyValue {
                name: name.to_owned(),
                kind: kind.name().to_owned(),
                value: value.to_owned(),
            }),
        }
    }

    fn open_layer(&mut self, attrs: &Attributes) -> Result<(), MapError> {
        let base = self.base()?;
        self.context = Context::Layer(LayerScope {
            state: LayerState::Pending {
                name: attrs.get("name").map(str::to_owned),
                offset: offset_of(attrs),
            },
            cursor: FillCursor::new(base.columns, base.rows),
            data: DataMode::Tiles,
        });
        Ok(())
    }

    fn open_data(&mut self, attrs: &Attributes) {
        let mode = match attrs.get("encoding") {
            None => DataMode::Tiles,
            Some("csv") if self.options.accept_csv_data => DataMode::Csv,
            Some(other) => {
                self.warn(LoadWarning::UnsupportedEncoding(other.to_owned()));
                DataMode::Unsupported
            }
        };
        if let Context::Layer(scope) = &mut self.context {
            scope.data = mode;
        }
    }

    /// Placement rule for a `tile` outside a tileset, and for every csv gid.
    /// The cursor moves on even when the cell stays empty.
    fn place_tile(&mut self, gid: Option<u32>) -> Result<(), MapError> {
        let Context::Layer(scope) = &mut self.context else {
            self.warn(LoadWarning::PlacementOutsideLayer);
            return Ok(());
        };
        let gid = gid.map(|g| g & GID_MASK);
        let Some(at) = scope.cursor.current() else {
            if let Some(gid) = gid.filter(|g| *g != 0) {
                let warning = LoadWarning::LayerOverflow { gid, layer: scope.name() };
                self.warn(warning);
            }
            return Ok(());
        };
        scope.cursor.advance();

        match gid {
            None => {
                let warning = LoadWarning::TileWithoutGid { layer: scope.name() };
                self.warn(warning);
            }
            Some(0) => {}
            Some(gid) => match self.registry.resolve(gid) {
                Some(entry) => {
                    let base = self.base.ok_or(MapError::MissingGeometry { attribute: "map" })?;
                    scope.place(at, gid, entry, base)?;
                }
                None => {
                    let warning = LoadWarning::UnassignedGid { gid, layer: scope.name() };
                    self.warn(warning);
                }
            },
        }
        Ok(())
    }

    fn close_layer(&mut self) {
        if !matches!(self.context, Context::Layer(_)) {
            return;
        }
        if let Context::Layer(scope) = mem::replace(&mut self.context, Context::Document) {
            if let Some(base) = self.base {
                self.layers.push(scope.finish(base));
            }
        }
    }

    fn open_object_group(&mut self, attrs: &Attributes) {
        let group = ObjectGroup::new(attrs.get("name").map(str::to_owned), offset_of(attrs));
        self.context = Context::ObjectGroup(group);
    }

    fn close_object_group(&mut self) {
        if !matches!(self.context, Context::ObjectGroup(_)) {
            return;
        }
        if let Context::ObjectGroup(group) = mem::replace(&mut self.context, Context::Document) {
            self.object_groups.push(group);
        }
    }

    fn open_object(&mut self, attrs: &Attributes) -> Result<(), MapError> {
        if !matches!(self.context, Context::ObjectGroup(_)) {
            self.warn(LoadWarning::ObjectOutsideGroup);
            return Ok(());
        }
        let base = self.base()?;
        let id = attrs.parse::<u32>("id");

        let (Some(x), Some(y)) = (attrs.parse::<f32>("x"), attrs.parse::<f32>("y")) else {
            self.warn(LoadWarning::ObjectWithoutPosition { id });
            return Ok(());
        };
        let (position, cell) = match self.orientation {
            Orientation::Grid => (vec2(x, y), None),
            Orientation::Isometric => {
                let (col, row) = isometric_pixel_to_cell(x, y, base.tile_h, base.rows);
                if !base.contains(col, row) && self.options.warn_on_object_out_of_bounds {
                    self.warn(LoadWarning::ObjectOutOfBounds { id, column: col, row });
                }
                (base.cell_center(col, row), Some((col, row)))
            }
            Orientation::HexagonalFlat => {
                self.warn(LoadWarning::HexagonalObjectUnsupported { id });
                return Ok(());
            }
        };

        let (width, height) = (attrs.parse::<f32>("width"), attrs.parse::<f32>("height"));
        let size = match (width, height) {
            (Some(w), Some(h)) => Some(vec2(w, h)),
            _ => None,
        };
        let sprite = match attrs.parse::<u32>("gid").map(|g| g & GID_MASK) {
            Some(gid) => match self.registry.texture_of(gid) {
                Some(texture) => Some(sprite_for(gid, texture.clone(), width, height, base)),
                None => {
                    self.warn(LoadWarning::ObjectUnassignedGid { id, gid });
                    None
                }
            },
            None => None,
        };

        if let Context::ObjectGroup(group) = &mut self.context {
            group.objects.push(MapObject {
                id,
                name: attrs.get("name").map(str::to_owned),
                position,
                cell,
                size,
                sprite,
            });
        }
        Ok(())
    }
}

fn push_warning(warnings: &mut Vec<LoadWarning>, warning: LoadWarning) {
    log::warn!("{warning}");
    warnings.push(warning);
}

/// `offsetx`/`offsety` with y flipped: pixels grow down, rows grow up.
fn offset_of(attrs: &Attributes) -> Option<Vec2> {
    let x = attrs.parse::<f32>("offsetx");
    let y = attrs.parse::<f32>("offsety");
    if x.is_none() && y.is_none() {
        return None;
    }
    Some(vec2(x.unwrap_or(0.0), -y.unwrap_or(0.0)))
}

/// Missing `width` or `height` falls back to the tile size on that axis.
fn sprite_for<T>(gid: u32, texture: T, width: Option<f32>, height: Option<f32>, base: BaseGrid) -> Sprite<T> {
    let tile = base.tile_size();
    let size = vec2(width.unwrap_or(tile.x), height.unwrap_or(tile.y));
    let anchor_y = if size.y > 0.0 {
        base.tile_h as f32 * 0.5 / size.y
    } else {
        0.0
    };
    Sprite {
        gid,
        texture,
        size,
        anchor: vec2(0.5, anchor_y),
    }
}
