#![warn(missing_docs)]

//! Tiled TMX loader producing a layered grid layout and a navigation grid
//! graph for Macroquad games.
//!
//! ```no_run
//! use std::collections::HashMap;
//! use macroquad_tmx_grid::{load_file, LoadOptions};
//!
//! let textures: HashMap<String, u32> = HashMap::from([("grass".to_string(), 0)]);
//! let layout = load_file("assets/demo.tmx", &textures, &LoadOptions::default())?;
//! let graph = layout.grid_graph_for(&["walls"]);
//! println!("{} walkable cells", graph.node_count());
//! # Ok::<(), macroquad_tmx_grid::MapError>(())
//! ```

mod config;
mod error;
mod layer;
mod loader {
    pub mod events;
    pub mod session;
    pub mod tmx_loader;
}
mod map;
mod properties;
mod registry;
mod spatial {
    pub mod coords;
    pub mod graph;
}
mod tileset;

pub use config::{LoadOptions, OptionsError};
pub use error::{LoadWarning, MapError};
pub use layer::{MapObject, ObjectGroup, PlacedTile, Sprite, TileLayer};
pub use loader::events::{Attributes, TmxEvent};
pub use loader::session::{ParserSession, GID_MASK};
pub use loader::tmx_loader::{load_file, parse_events, parse_str};
pub use map::{BaseGrid, Layout, LayoutChild, Orientation};
pub use properties::{Properties, PropertyValue};
pub use registry::{RegistryEntry, TileRegistry};
pub use spatial::coords::{isometric_pixel_to_cell, layer_fill_order, GridCoord};
pub use spatial::graph::{build_graph, build_graph_for_names, GridGraph};
pub use tileset::{TextureLookup, TileDefinition, TileSet, TileSetId};
