//! Per-team logo placement overrides, loaded from an optional JSON file:
//!
//! ```json
//! {
//!   "_default": { "_default": { "zoom": 1.0 } },
//!   "KC": {
//!     "_default": { "x_offset": 1 },
//!     "home_logo": { "zoom": 0.8, "y_offset": -2 }
//!   }
//! }
//! ```
//!
//! Keys are upper-cased team abbreviations mapping element names to partial
//! overrides. `_default` acts as a base at both levels; each field resolves
//! element, then team `_default`, then global `_default`.

use log::{info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Fully resolved placement tweak for one logo element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoAdjust {
    pub zoom: f32,
    pub x_offset: i32,
    pub y_offset: i32,
}

impl Default for LogoAdjust {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            x_offset: 0,
            y_offset: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct RawAdjust {
    zoom: Option<f32>,
    x_offset: Option<i32>,
    y_offset: Option<i32>,
}

#[derive(Debug, Default)]
pub struct LogoOffsets {
    teams: HashMap<String, HashMap<String, RawAdjust>>,
}

impl LogoOffsets {
    /// A missing file is the common case and yields no overrides. A malformed
    /// file logs and yields no overrides; logos still draw at defaults.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => return Self::default(),
        };
        match Self::from_json(&text) {
            Ok(offsets) => {
                info!("loaded logo offsets from {}", path.display());
                offsets
            }
            Err(err) => {
                warn!("ignoring malformed logo offsets {}: {err}", path.display());
                Self::default()
            }
        }
    }

    fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let teams = serde_json::from_str(text)?;
        Ok(Self { teams })
    }

    /// Field-wise resolution, most specific layer winning.
    pub fn resolve(&self, abbreviation: &str, element: &str) -> LogoAdjust {
        let team = self.teams.get(&abbreviation.to_uppercase());
        let layers = [
            self.teams.get("_default").and_then(|t| t.get("_default")),
            team.and_then(|t| t.get("_default")),
            team.and_then(|t| t.get(element)),
        ];

        let mut out = LogoAdjust::default();
        for raw in layers.into_iter().flatten() {
            if let Some(zoom) = raw.zoom {
                out.zoom = zoom;
            }
            if let Some(x) = raw.x_offset {
                out.x_offset = x;
            }
            if let Some(y) = raw.y_offset {
                out.y_offset = y;
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OFFSETS_JSON: &str = r#"{
        "_default": { "_default": { "zoom": 0.9, "y_offset": 1 } },
        "KC": {
            "_default": { "x_offset": 2 },
            "home_logo": { "zoom": 0.7 }
        }
    }"#;

    #[test]
    fn element_beats_team_default_beats_global_default() {
        let offsets = LogoOffsets::from_json(OFFSETS_JSON).unwrap();

        // Element zoom wins; x from team default; y from global default.
        let home = offsets.resolve("KC", "home_logo");
        assert_eq!(home, LogoAdjust { zoom: 0.7, x_offset: 2, y_offset: 1 });

        // No element entry: team default over global default.
        let away = offsets.resolve("KC", "away_logo");
        assert_eq!(away, LogoAdjust { zoom: 0.9, x_offset: 2, y_offset: 1 });

        // Unknown team: global default only.
        let other = offsets.resolve("DET", "home_logo");
        assert_eq!(other, LogoAdjust { zoom: 0.9, x_offset: 0, y_offset: 1 });
    }

    #[test]
    fn lookup_is_case_insensitive_on_the_abbreviation() {
        let offsets = LogoOffsets::from_json(OFFSETS_JSON).unwrap();
        assert_eq!(offsets.resolve("kc", "home_logo").zoom, 0.7);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let offsets = LogoOffsets::load(Path::new("/nonexistent/logo_offsets.json"));
        assert_eq!(offsets.resolve("KC", "home_logo"), LogoAdjust::default());
    }

    #[test]
    fn malformed_json_yields_defaults() {
        assert!(LogoOffsets::from_json("not json").is_err());
        let dir = std::env::temp_dir().join(format!("nflboard-offsets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        std::fs::write(&path, "{ definitely broken").unwrap();
        let offsets = LogoOffsets::load(&path);
        assert_eq!(offsets.resolve("KC", "home_logo"), LogoAdjust::default());
    }
}
