use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::AssetError;

/// Everything a game wants loaded before its first frame.
/// Loaded from a JSON file at runtime.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreloadManifest {
    /// Image paths to preload.
    #[serde(default)]
    pub images: Vec<String>,
    /// Named sprite sheets; their `path` is preloaded as well.
    #[serde(default)]
    pub sprite_sheets: HashMap<String, SpriteSheetDescriptor>,
}

/// A sprite sheet laid out as a grid of equally sized frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteSheetDescriptor {
    pub path: String,
    pub frame_width: u32,
    pub frame_height: u32,
    /// Frames per second when the sheet is animated (default: 8).
    #[serde(default = "default_fps")]
    pub fps: f32,
}

fn default_fps() -> f32 {
    8.0
}

impl PreloadManifest {
    pub fn from_json(json: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Every path to preload: plain images, then sheet images, without repeats.
    pub fn preload_list(&self) -> Vec<String> {
        let mut list: Vec<String> = Vec::with_capacity(self.images.len() + self.sprite_sheets.len());
        let mut sheet_paths: Vec<&String> = self.sprite_sheets.values().map(|s| &s.path).collect();
        sheet_paths.sort();
        for path in self.images.iter().chain(sheet_paths) {
            if !list.contains(path) {
                list.push(path.clone());
            }
        }
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_manifest_with_sheets() {
        let json = r#"{
            "images": ["assets/ei.png", "assets/uil.png"],
            "sprite_sheets": {
                "owls": { "path": "assets/small8bitowls.png", "frame_width": 32, "frame_height": 32 },
                "crow": { "path": "assets/uil.png", "frame_width": 64, "frame_height": 48, "fps": 12 }
            }
        }"#;
        let manifest = PreloadManifest::from_json(json).unwrap();
        assert_eq!(manifest.sprite_sheets["owls"].fps, 8.0);
        assert_eq!(manifest.sprite_sheets["crow"].fps, 12.0);
        assert_eq!(
            manifest.preload_list(),
            vec!["assets/ei.png", "assets/uil.png", "assets/small8bitowls.png"]
        );
    }

    #[test]
    fn parse_minimal_manifest() {
        let manifest = PreloadManifest::from_json("{}").unwrap();
        assert!(manifest.preload_list().is_empty());
    }

    #[test]
    fn malformed_json_is_an_asset_error() {
        let err = PreloadManifest::from_json("{ images: ").unwrap_err();
        assert!(matches!(err, AssetError::Manifest(_)));
    }
}
