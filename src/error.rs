use std::path::PathBuf;
use std::{io, str};
use thiserror::Error;

/// Fatal error for a map load. No partial [`Layout`](crate::Layout) is produced.
#[derive(Debug, Error)]
pub enum MapError {
    /// The `map` element is absent or one of its size attributes is missing,
    /// not a number, or zero.
    #[error("map geometry attribute `{attribute}` is missing or invalid")]
    MissingGeometry {
        /// Offending attribute, or `"map"` when the element never opened.
        attribute: &'static str,
    },

    /// `width * height` does not fit the cell index range.
    #[error("map of {columns}x{rows} cells is too large")]
    GridTooLarge {
        /// Declared `width`.
        columns: u32,
        /// Declared `height`.
        rows: u32,
    },

    /// A layer placed tiles coming from two different tilesets.
    #[error(
        "layer `{layer}` mixes tilesets: cell ({column}, {row}) uses `{found}` but the layer is bound to `{expected}`"
    )]
    TilesetMismatch {
        /// Layer name, empty if unnamed.
        layer: String,
        /// Column of the rejected placement.
        column: u32,
        /// Row of the rejected placement.
        row: u32,
        /// Tileset the layer is bound to.
        expected: String,
        /// Tileset of the rejected tile.
        found: String,
    },

    /// No document at the given path.
    #[error("map document not found: {}", path.display())]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The document exists but could not be read.
    #[error("failed to read map document {}: {source}", path.display())]
    Read {
        /// Requested path.
        path: PathBuf,
        /// Underlying IO failure.
        #[source]
        source: io::Error,
    },

    /// Malformed XML.
    #[error("xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute syntax.
    #[error("attribute error: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    /// Text that cannot be decoded.
    #[error("encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Element or attribute name that is not UTF-8.
    #[error("utf8 error: {0}")]
    Utf8(#[from] str::Utf8Error),
}

/// Recoverable problem met while loading. The offending element is skipped
/// and parsing goes on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadWarning {
    /// `orientation` absent or unknown; the map is read as orthogonal.
    #[error("unknown map orientation {0:?}, using orthogonal")]
    UnknownOrientation(Option<String>),

    /// A tileset without `firstgid` is dropped with all its children.
    #[error("tileset {name:?} has no valid firstgid, skipping it")]
    TilesetWithoutFirstGid {
        /// Tileset `name`.
        name: Option<String>,
    },

    /// A tile definition without `id` is dropped with all its children.
    #[error("tile definition without a valid id, skipping it")]
    TileWithoutId,

    /// No texture resolved for the definition, so it is not registered.
    #[error("tile definition {local_id} has no texture, discarding it")]
    TileWithoutTexture {
        /// Definition `id`.
        local_id: u32,
    },

    /// A placement `tile` without a parsable `gid`. The cell stays empty.
    #[error("tile placement without a valid gid in layer {layer:?}")]
    TileWithoutGid {
        /// Layer `name`.
        layer: Option<String>,
    },

    /// The gid is not in the registry. The cell stays empty.
    #[error("unassigned tile gid {gid} in layer {layer:?}")]
    UnassignedGid {
        /// Gid with flip flags removed.
        gid: u32,
        /// Layer `name`.
        layer: Option<String>,
    },

    /// A placement `tile` with no open layer.
    #[error("tile placement outside of any layer")]
    PlacementOutsideLayer,

    /// More placements than cells.
    #[error("layer {layer:?} has more tiles than cells, extra gid {gid} dropped")]
    LayerOverflow {
        /// First dropped gid.
        gid: u32,
        /// Layer `name`.
        layer: Option<String>,
    },

    /// `image` with no `source`, or one without a file stem.
    #[error("image without a usable source")]
    ImageWithoutSource,

    /// `image` with no open tile definition.
    #[error("image outside of a tile definition")]
    ImageOutsideTile,

    /// The texture lookup had nothing under this key.
    #[error("texture `{name}` not found")]
    TextureNotFound {
        /// Full lookup key, prefix and namespace included.
        name: String,
    },

    /// `property` missing `name` or `value`.
    #[error("property without a name or value")]
    PropertyWithoutNameOrValue,

    /// `value` does not parse as the declared `type`.
    #[error("property `{name}` value {value:?} is not a valid {kind}")]
    InvalidPropertyValue {
        /// Property `name`.
        name: String,
        /// Declared type.
        kind: String,
        /// Raw `value`.
        value: String,
    },

    /// Only tile definitions carry properties.
    #[error("property `{name}` outside of a tile definition is ignored")]
    PropertyOutsideTile {
        /// Property `name`, empty if absent.
        name: String,
    },

    /// `object` without both `x` and `y`.
    #[error("object {id:?} has no position, dropping it")]
    ObjectWithoutPosition {
        /// Object `id`.
        id: Option<u32>,
    },

    /// Isometric object whose converted cell is off the grid. It is kept.
    #[error("object {id:?} lands on cell ({column}, {row}) outside the map")]
    ObjectOutOfBounds {
        /// Object `id`.
        id: Option<u32>,
        /// Converted column.
        column: i32,
        /// Converted row.
        row: i32,
    },

    /// Object `gid` not in the registry. The object is kept without sprite.
    #[error("object {id:?} references unassigned gid {gid}")]
    ObjectUnassignedGid {
        /// Object `id`.
        id: Option<u32>,
        /// Gid with flip flags removed.
        gid: u32,
    },

    /// Objects on hexagonal maps are dropped.
    #[error("object {id:?} dropped: hexagonal object placement is not supported")]
    HexagonalObjectUnsupported {
        /// Object `id`.
        id: Option<u32>,
    },

    /// `object` with no open object group.
    #[error("object outside of an object group")]
    ObjectOutsideGroup,

    /// `data` encoding other than csv. The layer stays empty.
    #[error("layer data encoding {0:?} is not supported")]
    UnsupportedEncoding(String),

    /// A csv entry that is not a number. Its cell stays empty.
    #[error("invalid gid {0:?} in csv layer data")]
    InvalidCsvGid(String),

    /// Known TMX element that is not modelled.
    #[error("element `{0}` is not supported and was ignored")]
    IgnoredElement(String),

    /// A scope element nested where no scope can open, dropped with its
    /// children.
    #[error("nested `{0}` element was skipped with its children")]
    SkippedSubtree(String),
}
