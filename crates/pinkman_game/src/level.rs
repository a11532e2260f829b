//! Level geometry: the tile table and the obstacles built from it.
//!
//! Levels are authored as a compact table of tile coordinates, not pixels.
//! Column 0 starts at `base_offset`, row 0 is the row resting on `floor_y`,
//! and rows count upward. Ground blocks fill a whole tile; hazards stand on
//! top of the row below them, so a hazard at row 1 sits on the floor blocks.
//!
//! Building is a pure function of the table: the same table always yields the
//! same obstacles in the same order (ground first, then spikes).

use glam::IVec2;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use pinkman_core::mask::Mask;
use pinkman_core::sprites::SpriteRef;

use crate::obstacle::{Obstacle, ObstacleKind};

/// Spike art is 16x16, shown at 2x.
pub const SPIKE_SIZE: (u32, u32) = (32, 32);
/// Fire art is 16x32, shown at 2x.
pub const FIRE_SIZE: (u32, u32) = (32, 64);

pub const BLOCK_SPRITE: &str = "block";
pub const SPIKE_SPRITE: &str = "spike";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    pub column: i32,
    pub row: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    Spike,
    Fire,
}

impl HazardKind {
    pub fn height(self) -> i32 {
        match self {
            Self::Spike => SPIKE_SIZE.1 as i32,
            Self::Fire => FIRE_SIZE.1 as i32,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct HazardPlacement {
    pub kind: HazardKind,
    pub column: i32,
    pub row: i32,
    /// Pixel nudge inside the column.
    #[serde(default)]
    pub offset_x: i32,
}

/// Half-open run of floor columns, `from..to`, all on row 0.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FloorSpan {
    pub from: i32,
    pub to: i32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStart {
    pub x: i32,
    pub y: i32,
    #[serde(default = "default_player_extent")]
    pub width: i32,
    #[serde(default = "default_player_extent")]
    pub height: i32,
}

impl Default for PlayerStart {
    fn default() -> Self {
        Self {
            x: 100,
            y: 100,
            width: default_player_extent(),
            height: default_player_extent(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LevelFile {
    pub version: String,
    pub level_id: String,
    pub tile_size: i32,
    #[serde(default)]
    pub base_offset: i32,
    pub floor_y: i32,
    #[serde(default)]
    pub floor: Option<FloorSpan>,
    #[serde(default)]
    pub ground: Vec<TileCoord>,
    #[serde(default)]
    pub hazards: Vec<HazardPlacement>,
    #[serde(default)]
    pub player_start: PlayerStart,
}

/// Where tile coordinates land in world pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    pub tile_size: i32,
    pub base_offset: i32,
    pub floor_y: i32,
}

impl TileGrid {
    pub fn ground_position(&self, coord: TileCoord) -> IVec2 {
        IVec2::new(
            self.base_offset + coord.column * self.tile_size,
            self.floor_y - (coord.row + 1) * self.tile_size,
        )
    }

    pub fn hazard_position(&self, placement: &HazardPlacement) -> IVec2 {
        IVec2::new(
            self.base_offset + placement.column * self.tile_size + placement.offset_x,
            self.floor_y - placement.row * self.tile_size - placement.kind.height(),
        )
    }
}

impl LevelFile {
    pub fn grid(&self) -> TileGrid {
        TileGrid {
            tile_size: self.tile_size,
            base_offset: self.base_offset,
            floor_y: self.floor_y,
        }
    }

    /// Floor span expanded, followed by the explicit ground entries.
    pub fn ground_tiles(&self) -> Vec<TileCoord> {
        let mut tiles = self
            .floor
            .map(|span| floor_run(span.from, span.to))
            .unwrap_or_default();
        tiles.extend(self.ground.iter().copied());
        tiles
    }
}

/// Row-0 ground entries for columns `from..to`.
pub fn floor_run(from: i32, to: i32) -> Vec<TileCoord> {
    (from..to).map(|column| TileCoord { column, row: 0 }).collect()
}

/// Ground blocks for `tiles`. All blocks share one solid mask.
pub fn build_ground(grid: &TileGrid, tiles: &[TileCoord]) -> Vec<Obstacle> {
    let size = grid.tile_size as u32;
    let mask = Arc::new(Mask::full(size, size));
    tiles
        .iter()
        .map(|&coord| {
            let pos = grid.ground_position(coord);
            Obstacle::new(
                pos.x,
                pos.y,
                mask.clone(),
                ObstacleKind::Ground,
                SpriteRef::new(BLOCK_SPRITE, 0),
            )
        })
        .collect()
}

/// Static hazards for every spike placement; fire placements are skipped
/// since fire is animated and lives outside the static set.
pub fn build_spikes(grid: &TileGrid, hazards: &[HazardPlacement]) -> Vec<Obstacle> {
    let mask = Arc::new(spike_mask(SPIKE_SIZE.0, SPIKE_SIZE.1));
    hazards
        .iter()
        .filter(|h| h.kind == HazardKind::Spike)
        .map(|placement| {
            let pos = grid.hazard_position(placement);
            Obstacle::new(
                pos.x,
                pos.y,
                mask.clone(),
                ObstacleKind::Hazard,
                SpriteRef::new(SPIKE_SPRITE, 0),
            )
        })
        .collect()
}

pub fn build_obstacles(level: &LevelFile) -> Vec<Obstacle> {
    let grid = level.grid();
    let mut obstacles = build_ground(&grid, &level.ground_tiles());
    obstacles.extend(build_spikes(&grid, &level.hazards));
    obstacles
}

/// Top-left corners of every fire placement.
pub fn fire_positions(level: &LevelFile) -> Vec<IVec2> {
    let grid = level.grid();
    level
        .hazards
        .iter()
        .filter(|h| h.kind == HazardKind::Fire)
        .map(|placement| grid.hazard_position(placement))
        .collect()
}

/// Upward-pointing triangle with its base on the bottom row. Only the pointed
/// silhouette is solid, so brushing the empty top corners is not a hit.
pub fn spike_mask(width: u32, height: u32) -> Mask {
    let half = width as f32 / 2.0;
    Mask::from_fn(width, height, |x, y| {
        let reach = half * (y as f32 + 1.0) / height as f32;
        (x as f32 + 0.5 - half).abs() <= reach
    })
}

/// The starter level: a long floor, a step by the spawn point, a floating
/// block, and a fire burning right under the spawn.
pub fn default_level() -> LevelFile {
    LevelFile {
        version: "0.1".to_string(),
        level_id: "starter".to_string(),
        tile_size: 96,
        base_offset: 0,
        floor_y: 800,
        floor: Some(FloorSpan { from: -11, to: 20 }),
        ground: vec![
            TileCoord { column: 0, row: 1 },
            TileCoord { column: 3, row: 3 },
        ],
        hazards: vec![HazardPlacement {
            kind: HazardKind::Fire,
            column: 1,
            row: 1,
            offset_x: 4,
        }],
        player_start: PlayerStart::default(),
    }
}

pub fn load_level_from_path(path: &Path) -> Result<LevelFile, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let level: LevelFile = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse level JSON {}: {e}", path.display()))?;
    validate_level(&level)?;
    Ok(level)
}

pub fn validate_level(level: &LevelFile) -> Result<(), String> {
    if level.version != "0.1" {
        return Err(format!(
            "Level validation failed: unsupported version '{}'",
            level.version
        ));
    }
    if level.level_id.is_empty() {
        return Err("Level validation failed: level_id is empty".to_string());
    }
    if level.tile_size <= 0 {
        return Err("Level validation failed: tile_size must be > 0".to_string());
    }
    if let Some(span) = level.floor {
        if span.from >= span.to {
            return Err(format!(
                "Level validation failed: floor span {}..{} is empty",
                span.from, span.to
            ));
        }
    }

    let mut seen = HashSet::new();
    for tile in level.ground_tiles() {
        if tile.row < 0 {
            return Err(format!(
                "Level validation failed: ground tile below floor ({}, {})",
                tile.column, tile.row
            ));
        }
        if !seen.insert(tile) {
            return Err(format!(
                "Level validation failed: duplicate ground tile ({}, {})",
                tile.column, tile.row
            ));
        }
    }

    for hazard in &level.hazards {
        if hazard.row < 0 {
            return Err(format!(
                "Level validation failed: hazard below floor ({}, {})",
                hazard.column, hazard.row
            ));
        }
        if hazard.offset_x < 0 || hazard.offset_x >= level.tile_size {
            return Err(format!(
                "Level validation failed: hazard offset_x {} outside its tile",
                hazard.offset_x
            ));
        }
    }

    let start = level.player_start;
    if start.width <= 0 || start.height <= 0 {
        return Err("Level validation failed: player_start size must be > 0".to_string());
    }
    Ok(())
}

const fn default_player_extent() -> i32 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::obstacle::Collider;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "pinkman_level_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn grid() -> TileGrid {
        TileGrid {
            tile_size: 96,
            base_offset: 0,
            floor_y: 800,
        }
    }

    #[test]
    fn ground_blocks_stack_upward_from_floor() {
        let blocks = build_ground(
            &grid(),
            &[
                TileCoord { column: 0, row: 0 },
                TileCoord { column: 3, row: 3 },
                TileCoord { column: -2, row: 1 },
            ],
        );
        assert_eq!(blocks[0].rect.topleft(), IVec2::new(0, 704));
        assert_eq!(blocks[1].rect.topleft(), IVec2::new(288, 416));
        assert_eq!(blocks[2].rect.topleft(), IVec2::new(-192, 608));
        assert!(blocks.iter().all(|b| b.kind() == ObstacleKind::Ground));
        assert_eq!(blocks[0].rect.w, 96);
    }

    #[test]
    fn hazards_stand_on_the_row_below() {
        let g = grid();
        let fire = HazardPlacement {
            kind: HazardKind::Fire,
            column: 1,
            row: 1,
            offset_x: 4,
        };
        assert_eq!(g.hazard_position(&fire), IVec2::new(100, 640));

        let spike = HazardPlacement {
            kind: HazardKind::Spike,
            column: 2,
            row: 1,
            offset_x: 0,
        };
        let pos = g.hazard_position(&spike);
        assert_eq!(pos, IVec2::new(192, 672));
        // Bottom of the spike meets the top of the floor block.
        assert_eq!(pos.y + SPIKE_SIZE.1 as i32, g.ground_position(TileCoord { column: 2, row: 0 }).y);
    }

    #[test]
    fn base_offset_shifts_every_column() {
        let g = TileGrid {
            base_offset: 50,
            ..grid()
        };
        assert_eq!(g.ground_position(TileCoord { column: 1, row: 0 }).x, 146);
    }

    #[test]
    fn build_is_deterministic_and_fresh() {
        let level = default_level();
        let a = build_obstacles(&level);
        let b = build_obstacles(&level);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.rect, y.rect);
            assert_eq!(x.kind, y.kind);
        }
    }

    #[test]
    fn default_level_matches_starter_layout() {
        let level = default_level();
        validate_level(&level).expect("starter level must validate");
        let obstacles = build_obstacles(&level);
        // 31 floor blocks plus the step and the floating block; fire is animated.
        assert_eq!(obstacles.len(), 33);
        assert_eq!(fire_positions(&level), vec![IVec2::new(100, 640)]);
    }

    #[test]
    fn spikes_are_hazards_with_pointed_masks() {
        let spikes = build_spikes(
            &grid(),
            &[
                HazardPlacement {
                    kind: HazardKind::Spike,
                    column: 0,
                    row: 1,
                    offset_x: 0,
                },
                HazardPlacement {
                    kind: HazardKind::Fire,
                    column: 1,
                    row: 1,
                    offset_x: 0,
                },
            ],
        );
        assert_eq!(spikes.len(), 1);
        assert_eq!(spikes[0].kind(), ObstacleKind::Hazard);
        let mask = spikes[0].mask();
        assert!(!mask.get(0, 0));
        assert!(mask.get(16, 0) || mask.get(15, 0));
        assert!(mask.get(0, 31) && mask.get(31, 31));
    }

    #[test]
    fn floor_run_is_half_open() {
        let run = floor_run(-2, 1);
        assert_eq!(run.len(), 3);
        assert_eq!(run[0], TileCoord { column: -2, row: 0 });
        assert_eq!(run[2], TileCoord { column: 0, row: 0 });
    }

    #[test]
    fn load_level_parses_valid_file() {
        let path = temp_file_path("valid");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "level_id": "test",
              "tile_size": 96,
              "floor_y": 800,
              "floor": { "from": 0, "to": 4 },
              "ground": [{ "column": 2, "row": 2 }],
              "hazards": [{ "kind": "spike", "column": 1, "row": 1 }],
              "player_start": { "x": 10, "y": 20 }
            }"#,
        )
        .expect("write temp file");

        let level = load_level_from_path(&path).expect("valid level should load");
        assert_eq!(level.ground_tiles().len(), 5);
        assert_eq!(level.hazards[0].offset_x, 0);
        assert_eq!(level.player_start.width, 50);
        assert_eq!(build_obstacles(&level).len(), 6);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn load_level_rejects_duplicate_ground() {
        let path = temp_file_path("dup");
        fs::write(
            &path,
            r#"{
              "version": "0.1",
              "level_id": "test",
              "tile_size": 96,
              "floor_y": 800,
              "floor": { "from": 0, "to": 4 },
              "ground": [{ "column": 1, "row": 0 }]
            }"#,
        )
        .expect("write temp file");

        let err = load_level_from_path(&path).expect_err("duplicate tile should fail");
        assert!(err.contains("duplicate ground tile"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn validate_rejects_offset_outside_tile() {
        let mut level = default_level();
        level.hazards[0].offset_x = 96;
        let err = validate_level(&level).expect_err("offset too large");
        assert!(err.contains("outside its tile"));
    }
}
