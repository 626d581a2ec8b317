use crate::map::Orientation;
use crate::properties::Properties;
use std::collections::HashMap;
use std::hash::BuildHasher;
use std::path::Path;

/// Resolves a namespaced image name to a drawable texture.
///
/// In a Macroquad game this is usually a `HashMap<String, Texture2D>` filled
/// while loading assets.
pub trait TextureLookup {
    /// Handle stored in tile definitions and sprites.
    type Texture: Clone;

    /// Texture registered under `name`, if any.
    fn resolve(&self, name: &str) -> Option<Self::Texture>;
}

impl<T: Clone, S: BuildHasher> TextureLookup for HashMap<String, T, S> {
    type Texture = T;

    fn resolve(&self, name: &str) -> Option<T> {
        self.get(name).cloned()
    }
}

impl<L: TextureLookup + ?Sized> TextureLookup for &L {
    type Texture = L::Texture;

    fn resolve(&self, name: &str) -> Option<Self::Texture> {
        (**self).resolve(name)
    }
}

/// Ordinal of a tileset within its document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileSetId(pub u32);

/// A tileset as seen after loading. Its `firstgid` is gone: tiles are only
/// reachable through the registry by global id.
#[derive(Debug, Clone, PartialEq)]
pub struct TileSet {
    /// Ordinal in declaration order.
    pub id: TileSetId,
    /// Tileset `name`.
    pub name: Option<String>,
    /// Map orientation when the tileset was declared.
    pub orientation: Orientation,
}

impl TileSet {
    /// Name, or `#id` for unnamed tilesets.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", self.id.0),
        }
    }
}

/// One tile of a tileset, with its resolved texture.
#[derive(Debug, Clone, PartialEq)]
pub struct TileDefinition<T> {
    /// Id within the tileset.
    pub local_id: u32,
    /// Resolved texture.
    pub texture: T,
    /// Typed custom properties.
    pub properties: Properties,
}

/// Basename of an image source without its extension.
pub(crate) fn image_stem(source: &str) -> Option<&str> {
    Path::new(source)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
}
