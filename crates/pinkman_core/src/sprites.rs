//! Sprite sequence catalogs and frame indexing.
//!
//! A catalog maps a sheet key (`run_left`, `on`, ...) to the ordered collision
//! masks of that sheet's frames. Catalogs are built once at startup and then
//! only read, either from PNG strips on disk or from a JSON manifest that
//! describes frame counts and sizes when the art is not available.
//!
//! Frame selection is purely counter based: each logical frame is held for
//! `delay` raw ticks, see [`frame_index`].

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use image::RgbaImage;
use serde::Deserialize;

use crate::mask::Mask;

/// Which frame of which sheet an entity currently shows. Renderers resolve
/// this against their own texture table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteRef {
    pub sheet: Arc<str>,
    pub frame: usize,
}

impl SpriteRef {
    pub fn new(sheet: &str, frame: usize) -> Self {
        Self {
            sheet: Arc::from(sheet),
            frame,
        }
    }
}

/// `(counter / delay) % len`. `delay` and `len` must be non-zero; catalogs and
/// configs are validated so that holds.
pub fn frame_index(counter: u32, delay: u32, len: usize) -> usize {
    (counter / delay) as usize % len
}

#[derive(Debug, Clone, Default)]
pub struct SpriteCatalog {
    sheets: HashMap<Arc<str>, Vec<Arc<Mask>>>,
}

impl SpriteCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: &str, frames: Vec<Mask>) {
        self.sheets
            .insert(Arc::from(key), frames.into_iter().map(Arc::new).collect());
    }

    /// Cut a horizontal strip of `frame_width`-wide frames and register the
    /// 2x-scaled masks. Directional sheets register the strip as `<name>_right`
    /// and a mirrored copy as `<name>_left`.
    pub fn insert_strip(
        &mut self,
        name: &str,
        strip: &RgbaImage,
        frame_width: u32,
        frame_height: u32,
        directional: bool,
    ) {
        let frames = slice_strip(strip, frame_width, frame_height);
        self.insert_frames(name, frames, directional);
    }

    fn insert_frames(&mut self, name: &str, frames: Vec<Mask>, directional: bool) {
        if directional {
            let flipped = frames.iter().map(Mask::flip_horizontal).collect();
            self.insert(&format!("{name}_right"), frames);
            self.insert(&format!("{name}_left"), flipped);
        } else {
            self.insert(name, frames);
        }
    }

    /// The interned key and frames of a sheet.
    pub fn sequence(&self, key: &str) -> Option<(&Arc<str>, &[Arc<Mask>])> {
        self.sheets
            .get_key_value(key)
            .map(|(key, frames)| (key, frames.as_slice()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sheets.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    /// Check that every key an entity may ask for exists and is non-empty.
    pub fn require<S: AsRef<str>>(&self, keys: &[S]) -> Result<(), String> {
        for key in keys {
            let key = key.as_ref();
            match self.sheets.get(key) {
                None => return Err(format!("Sprite catalog is missing sheet '{key}'")),
                Some(frames) if frames.is_empty() => {
                    return Err(format!("Sprite catalog sheet '{key}' has no frames"))
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

fn slice_strip(strip: &RgbaImage, frame_width: u32, frame_height: u32) -> Vec<Mask> {
    let count = strip.width() / frame_width;
    let height = frame_height.min(strip.height());
    (0..count)
        .map(|i| {
            let frame =
                image::imageops::crop_imm(strip, i * frame_width, 0, frame_width, height).to_image();
            Mask::from_rgba(&frame).scale2x()
        })
        .collect()
}

/// Load every `*.png` strip in `dir` into one catalog. Sheet names are the
/// file stems, so `run.png` becomes `run_left`/`run_right` when directional.
pub fn load_sprite_dir(
    dir: &Path,
    frame_width: u32,
    frame_height: u32,
    directional: bool,
) -> Result<SpriteCatalog, String> {
    if frame_width == 0 || frame_height == 0 {
        return Err("Sprite sheet frame size must be > 0".to_string());
    }
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("Failed to read sprite directory {}: {e}", dir.display()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| format!("Failed to list sprite directory {}: {e}", dir.display()))?
            .path();
        if path.extension().and_then(|ext| ext.to_str()) == Some("png") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut catalog = SpriteCatalog::new();
    for path in paths {
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        let strip = image::open(&path)
            .map_err(|e| format!("Failed to decode sprite sheet {}: {e}", path.display()))?
            .to_rgba8();
        if strip.width() < frame_width {
            return Err(format!(
                "Sprite sheet {} is narrower than one {}px frame",
                path.display(),
                frame_width
            ));
        }
        catalog.insert_strip(name, &strip, frame_width, frame_height, directional);
        log::debug!("Loaded sprite sheet '{}' from {}", name, path.display());
    }

    if catalog.is_empty() {
        return Err(format!("No sprite sheets found in {}", dir.display()));
    }
    Ok(catalog)
}

/// Frame counts and sizes for a sprite set whose art is not loaded. Every
/// frame becomes a solid rectangle of the scaled frame size.
#[derive(Debug, Clone, Deserialize)]
pub struct SpriteManifest {
    pub version: String,
    pub manifest_id: String,
    #[serde(default)]
    pub directional: bool,
    pub frame_width: u32,
    pub frame_height: u32,
    pub sheets: BTreeMap<String, u32>,
}

impl SpriteManifest {
    pub fn build_catalog(&self) -> SpriteCatalog {
        let mut catalog = SpriteCatalog::new();
        for (name, &count) in &self.sheets {
            let frames = (0..count)
                .map(|_| Mask::full(self.frame_width, self.frame_height).scale2x())
                .collect();
            catalog.insert_frames(name, frames, self.directional);
        }
        catalog
    }
}

pub fn parse_sprite_manifest(raw: &str, origin: &str) -> Result<SpriteManifest, String> {
    let manifest: SpriteManifest = serde_json::from_str(raw)
        .map_err(|e| format!("Failed to parse sprite manifest {origin}: {e}"))?;
    validate_manifest(&manifest)?;
    Ok(manifest)
}

pub fn load_sprite_manifest(path: &Path) -> Result<SpriteManifest, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read sprite manifest {}: {e}", path.display()))?;
    parse_sprite_manifest(&raw, &path.display().to_string())
}

fn validate_manifest(manifest: &SpriteManifest) -> Result<(), String> {
    if manifest.version != "0.1" {
        return Err(format!(
            "Sprite manifest validation failed: unsupported version '{}'",
            manifest.version
        ));
    }
    if manifest.manifest_id.is_empty() {
        return Err("Sprite manifest validation failed: manifest_id is empty".to_string());
    }
    if manifest.frame_width == 0 || manifest.frame_height == 0 {
        return Err("Sprite manifest validation failed: frame size must be > 0".to_string());
    }
    if manifest.sheets.is_empty() {
        return Err("Sprite manifest validation failed: no sheets declared".to_string());
    }
    for (name, &count) in &manifest.sheets {
        if name.is_empty() {
            return Err("Sprite manifest validation failed: empty sheet name".to_string());
        }
        if count == 0 {
            return Err(format!(
                "Sprite manifest validation failed: sheet '{}' has no frames",
                name
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "pinkman_sprites_test_{}_{}_{}",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn two_frame_strip() -> RgbaImage {
        // Frame 0 has only its left column opaque, frame 1 is fully opaque.
        let mut strip = RgbaImage::new(8, 4);
        for y in 0..4 {
            strip.put_pixel(0, y, Rgba([255, 255, 255, 255]));
            for x in 4..8 {
                strip.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        strip
    }

    #[test]
    fn frame_index_holds_each_frame_for_delay_ticks() {
        let indices: Vec<usize> = (0..12).map(|c| frame_index(c, 3, 2)).collect();
        assert_eq!(indices, vec![0, 0, 0, 1, 1, 1, 0, 0, 0, 1, 1, 1]);
    }

    #[test]
    fn insert_strip_scales_and_mirrors_directional_sheets() {
        let mut catalog = SpriteCatalog::new();
        catalog.insert_strip("run", &two_frame_strip(), 4, 4, true);

        let (_, right) = catalog.sequence("run_right").expect("right sheet");
        let (_, left) = catalog.sequence("run_left").expect("left sheet");
        assert_eq!(right.len(), 2);
        assert_eq!(right[0].size(), (8, 8));
        assert!(right[0].get(0, 0) && right[0].get(1, 7));
        assert!(!right[0].get(2, 0));
        assert!(left[0].get(7, 0) && !left[0].get(0, 0));
        assert_eq!(right[1].count(), 64);
    }

    #[test]
    fn non_directional_strip_keeps_plain_name() {
        let mut catalog = SpriteCatalog::new();
        catalog.insert_strip("on", &two_frame_strip(), 4, 4, false);
        assert!(catalog.contains("on"));
        assert!(!catalog.contains("on_right"));
    }

    #[test]
    fn require_reports_missing_sheet() {
        let mut catalog = SpriteCatalog::new();
        catalog.insert("idle_left", vec![Mask::full(2, 2)]);
        catalog.insert("hit_left", Vec::new());
        assert!(catalog.require(&["idle_left"]).is_ok());
        let err = catalog.require(&["idle_right"]).expect_err("missing");
        assert!(err.contains("missing sheet 'idle_right'"));
        let err = catalog.require(&["hit_left"]).expect_err("empty");
        assert!(err.contains("has no frames"));
    }

    #[test]
    fn manifest_builds_solid_frames() {
        let manifest = parse_sprite_manifest(
            r#"{
              "version": "0.1",
              "manifest_id": "hero",
              "directional": true,
              "frame_width": 32,
              "frame_height": 32,
              "sheets": { "idle": 11, "jump": 1 }
            }"#,
            "inline",
        )
        .expect("manifest should parse");
        let catalog = manifest.build_catalog();
        assert_eq!(catalog.len(), 4);
        let (key, frames) = catalog.sequence("idle_left").expect("idle_left");
        assert_eq!(&**key, "idle_left");
        assert_eq!(frames.len(), 11);
        assert_eq!(frames[0].size(), (64, 64));
        assert_eq!(frames[0].count(), 64 * 64);
    }

    #[test]
    fn manifest_rejects_zero_frame_sheet() {
        let err = parse_sprite_manifest(
            r#"{"version":"0.1","manifest_id":"fire","frame_width":16,"frame_height":32,"sheets":{"on":0}}"#,
            "inline",
        )
        .expect_err("zero frames should fail");
        assert!(err.contains("has no frames"));
    }

    #[test]
    fn manifest_rejects_bad_version() {
        let err = parse_sprite_manifest(
            r#"{"version":"2","manifest_id":"fire","frame_width":16,"frame_height":32,"sheets":{"on":3}}"#,
            "inline",
        )
        .expect_err("bad version should fail");
        assert!(err.contains("unsupported version"));
    }

    #[test]
    fn load_sprite_dir_reads_png_strips() {
        let dir = temp_path("dir");
        fs::create_dir_all(&dir).expect("create temp dir");
        two_frame_strip()
            .save(dir.join("fall.png"))
            .expect("write png strip");
        fs::write(dir.join("notes.txt"), "ignored").expect("write stray file");

        let catalog = load_sprite_dir(&dir, 4, 4, true).expect("dir should load");
        assert_eq!(catalog.len(), 2);
        assert!(catalog.contains("fall_left"));
        assert!(catalog.contains("fall_right"));

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn load_sprite_dir_fails_for_missing_directory() {
        let err = load_sprite_dir(&temp_path("missing"), 32, 32, true).expect_err("missing");
        assert!(err.contains("Failed to read sprite directory"));
    }
}
