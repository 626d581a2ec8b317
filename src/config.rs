//! Loader options.

use crate::error::MapError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Options for a single load call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    /// Prefix prepended to an image stem before asking the texture lookup.
    pub texture_prefix: String,
    /// Insert `<tileset name>/` between the prefix and the stem.
    pub tileset_namespace: bool,
    /// Read gids from `<data encoding="csv">` text as well as `tile` children.
    pub accept_csv_data: bool,
    /// Warn when an isometric object lands outside the map.
    pub warn_on_object_out_of_bounds: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            texture_prefix: String::new(),
            tileset_namespace: false,
            accept_csv_data: true,
            warn_on_object_out_of_bounds: true,
        }
    }
}

impl LoadOptions {
    /// Options from a JSON object; missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Reads [`from_json_str`](Self::from_json_str) input from a file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, OptionsError> {
        let path = path.as_ref();
        let txt = std::fs::read_to_string(path).map_err(|source| {
            OptionsError::Map(MapError::Read {
                path: path.to_path_buf(),
                source,
            })
        })?;
        Ok(Self::from_json_str(&txt)?)
    }

    /// Texture lookup key for an image stem declared in `tileset_name`.
    pub fn texture_key(&self, tileset_name: Option<&str>, stem: &str) -> String {
        match (self.tileset_namespace, tileset_name) {
            (true, Some(ts)) => format!("{}{}/{}", self.texture_prefix, ts, stem),
            _ => format!("{}{}", self.texture_prefix, stem),
        }
    }
}

/// Failure to load [`LoadOptions`].
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    /// The file could not be read.
    #[error(transparent)]
    Map(#[from] MapError),
    /// The file is not valid options JSON.
    #[error("invalid options json: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let opts = LoadOptions::from_json_str(r#"{ "texture_prefix": "tiles/" }"#).expect("parse");
        assert_eq!(opts.texture_prefix, "tiles/");
        assert!(opts.accept_csv_data);
        assert!(!opts.tileset_namespace);
    }

    #[test]
    fn builds_namespaced_keys() {
        let mut opts = LoadOptions::default();
        assert_eq!(opts.texture_key(Some("terrain"), "grass"), "grass");

        opts.texture_prefix = "atlas:".into();
        opts.tileset_namespace = true;
        assert_eq!(opts.texture_key(Some("terrain"), "grass"), "atlas:terrain/grass");
        assert_eq!(opts.texture_key(None, "grass"), "atlas:grass");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(LoadOptions::from_json_str("{ nope").is_err());
    }
}
