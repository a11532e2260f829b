//! The read-only sprite tables the simulation draws masks from.
//!
//! Tables are loaded once at startup and passed by reference into every step.
//! Art comes from PNG strips when present; otherwise the sprite manifests give
//! frame counts and sizes and every frame is a solid rectangle.

use std::path::Path;

use pinkman_core::sprites::{load_sprite_dir, load_sprite_manifest, parse_sprite_manifest, SpriteCatalog};

use crate::animation::required_player_sheets;
use crate::fire::FIRE_SHEETS;

const BUILTIN_PLAYER_MANIFEST: &str = include_str!("../../../assets/sprites/player.json");
const BUILTIN_FIRE_MANIFEST: &str = include_str!("../../../assets/sprites/fire.json");

const PLAYER_FRAME: (u32, u32) = (32, 32);
const FIRE_FRAME: (u32, u32) = (16, 32);

pub struct SpriteTables {
    pub player: SpriteCatalog,
    pub fire: SpriteCatalog,
}

/// Where to look for each sprite set. Image directories win over manifests.
pub struct SpritePaths<'a> {
    pub player_dir: &'a Path,
    pub player_manifest: &'a Path,
    pub fire_dir: &'a Path,
    pub fire_manifest: &'a Path,
}

impl SpriteTables {
    /// Tables from the manifests compiled into the binary.
    pub fn builtin() -> Result<Self, String> {
        let player = parse_sprite_manifest(BUILTIN_PLAYER_MANIFEST, "<builtin player>")?;
        let fire = parse_sprite_manifest(BUILTIN_FIRE_MANIFEST, "<builtin fire>")?;
        let tables = Self {
            player: player.build_catalog(),
            fire: fire.build_catalog(),
        };
        tables.validate()?;
        Ok(tables)
    }

    pub fn load(paths: &SpritePaths<'_>) -> Result<Self, String> {
        let player = load_catalog(
            "player",
            paths.player_dir,
            paths.player_manifest,
            PLAYER_FRAME,
            true,
            BUILTIN_PLAYER_MANIFEST,
        )?;
        let fire = load_catalog(
            "fire",
            paths.fire_dir,
            paths.fire_manifest,
            FIRE_FRAME,
            false,
            BUILTIN_FIRE_MANIFEST,
        )?;
        let tables = Self { player, fire };
        tables.validate()?;
        Ok(tables)
    }

    pub fn validate(&self) -> Result<(), String> {
        self.player
            .require(&required_player_sheets())
            .map_err(|e| format!("Player sprites: {e}"))?;
        self.fire
            .require(FIRE_SHEETS)
            .map_err(|e| format!("Fire sprites: {e}"))
    }
}

fn load_catalog(
    label: &str,
    dir: &Path,
    manifest: &Path,
    frame: (u32, u32),
    directional: bool,
    builtin: &str,
) -> Result<SpriteCatalog, String> {
    if dir.is_dir() {
        match load_sprite_dir(dir, frame.0, frame.1, directional) {
            Ok(catalog) => {
                log::info!("Loaded {} {} sprite sheets from {}", catalog.len(), label, dir.display());
                return Ok(catalog);
            }
            Err(err) => log::error!("Failed to load {label} sprite images: {err}"),
        }
    }

    if manifest.exists() {
        let catalog = load_sprite_manifest(manifest)?.build_catalog();
        log::info!("Using {} sprite manifest {}", label, manifest.display());
        return Ok(catalog);
    }

    log::warn!(
        "No {} sprites at '{}' or '{}'. Falling back to built-in solid frames.",
        label,
        dir.display(),
        manifest.display()
    );
    Ok(parse_sprite_manifest(builtin, "<builtin>")?.build_catalog())
}
