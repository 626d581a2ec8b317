use crate::tileset::{TileDefinition, TileSet};
use std::collections::HashMap;
use std::sync::Arc;

/// Tile group and owning tileset addressed by a global id.
pub struct RegistryEntry<T> {
    /// Registered definition.
    pub tile: Arc<TileDefinition<T>>,
    /// Owning tileset.
    pub tileset: Arc<TileSet>,
}

// Manual impl: cloning only bumps the Arcs, `T` needs no `Clone`.
impl<T> Clone for RegistryEntry<T> {
    fn clone(&self) -> Self {
        Self {
            tile: Arc::clone(&self.tile),
            tileset: Arc::clone(&self.tileset),
        }
    }
}

/// Global id -> (tile definition, tileset). Lives for one parse.
///
/// Id ranges of different tilesets are not checked for overlap; the last
/// registration of a gid wins.
pub struct TileRegistry<T> {
    entries: HashMap<u32, RegistryEntry<T>>,
}

impl<T> Default for TileRegistry<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> TileRegistry<T> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps `gid` to a definition. A later registration replaces an earlier one.
    pub fn register(&mut self, gid: u32, tile: Arc<TileDefinition<T>>, tileset: Arc<TileSet>) {
        if self.entries.contains_key(&gid) {
            log::debug!("gid {gid} registered again by tileset {}", tileset.display_name());
        }
        self.entries.insert(gid, RegistryEntry { tile, tileset });
    }

    /// Definition and tileset for `gid`.
    pub fn resolve(&self, gid: u32) -> Option<&RegistryEntry<T>> {
        self.entries.get(&gid)
    }

    /// Texture registered for `gid`.
    pub fn texture_of(&self, gid: u32) -> Option<&T> {
        self.entries.get(&gid).map(|e| &e.tile.texture)
    }

    /// Registered gids.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Nothing registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Definitions registered for `tileset`, ordered by local id.
    pub fn tiles_of(&self, tileset: &TileSet) -> Vec<Arc<TileDefinition<T>>> {
        let mut tiles: Vec<_> = self
            .entries
            .values()
            .filter(|e| e.tileset.id == tileset.id)
            .map(|e| Arc::clone(&e.tile))
            .collect();
        tiles.sort_unstable_by_key(|t| t.local_id);
        tiles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Orientation;
    use crate::properties::Properties;
    use crate::tileset::TileSetId;

    fn tileset(id: u32) -> Arc<TileSet> {
        Arc::new(TileSet {
            id: TileSetId(id),
            name: Some(format!("ts{id}")),
            orientation: Orientation::Grid,
        })
    }

    fn tile(local_id: u32, texture: &'static str) -> Arc<TileDefinition<&'static str>> {
        Arc::new(TileDefinition {
            local_id,
            texture,
            properties: Properties::new(),
        })
    }

    #[test]
    fn resolves_what_was_registered() {
        let mut reg = TileRegistry::new();
        let ts = tileset(0);
        let grass = tile(0, "grass");
        reg.register(1, Arc::clone(&grass), Arc::clone(&ts));

        let entry = reg.resolve(1).expect("gid 1");
        assert!(Arc::ptr_eq(&entry.tile, &grass));
        assert!(Arc::ptr_eq(&entry.tileset, &ts));
        assert_eq!(reg.texture_of(1), Some(&"grass"));
        assert!(reg.resolve(2).is_none());
    }

    #[test]
    fn last_registration_wins() {
        let mut reg = TileRegistry::new();
        reg.register(5, tile(4, "old"), tileset(0));
        reg.register(5, tile(0, "new"), tileset(1));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.texture_of(5), Some(&"new"));
        assert_eq!(reg.resolve(5).map(|e| e.tileset.id), Some(TileSetId(1)));
    }

    #[test]
    fn lists_tiles_of_a_tileset_in_local_order() {
        let mut reg = TileRegistry::new();
        let a = tileset(0);
        let b = tileset(1);
        reg.register(3, tile(2, "c"), Arc::clone(&a));
        reg.register(1, tile(0, "a"), Arc::clone(&a));
        reg.register(10, tile(0, "x"), Arc::clone(&b));

        let ids: Vec<u32> = reg.tiles_of(&a).iter().map(|t| t.local_id).collect();
        assert_eq!(ids, vec![0, 2]);
        assert_eq!(reg.tiles_of(&b).len(), 1);
    }
}
