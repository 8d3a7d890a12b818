//! Mesh and texture loading.
//!
//! All five objects are loaded from disk before the window opens; any
//! missing or malformed asset is fatal at startup. GPU upload happens later,
//! once a device exists.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glam::{Mat4, Vec3};
use gnomon_obj::{ObjError, ObjModel};
use image::RgbaImage;

use crate::clock::Hand;

/// Environment variable overriding the asset directory.
pub const ASSETS_ENV: &str = "GNOMON_ASSETS";

/// Asset directory shipped with the crate, used when the override is
/// unset.
const DEFAULT_ASSET_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets");

/// An asset failed to load.
#[derive(Debug)]
pub enum AssetError {
    Io { path: PathBuf, source: io::Error },
    Obj { path: PathBuf, source: ObjError },
    Image { path: PathBuf, source: image::ImageError },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            AssetError::Obj { path, source } => {
                write!(f, "cannot parse {}: {source}", path.display())
            }
            AssetError::Image { path, source } => {
                write!(f, "cannot decode {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssetError::Io { source, .. } => Some(source),
            AssetError::Obj { source, .. } => Some(source),
            AssetError::Image { source, .. } => Some(source),
        }
    }
}

/// Description of one clock object on disk.
#[derive(Debug, Clone)]
pub struct ObjectSpec {
    pub name: &'static str,
    pub obj: &'static str,
    pub texture: &'static str,
    pub hand: Option<Hand>,
    pub placement: Mat4,
}

/// Which files make up the clock and where they sit.
#[derive(Debug, Clone)]
pub struct AssetConfig {
    pub dir: PathBuf,
    pub objects: Vec<ObjectSpec>,
}

impl AssetConfig {
    /// The standard five-object clock, honoring the `GNOMON_ASSETS`
    /// override for the asset directory.
    pub fn standard() -> Self {
        let dir = std::env::var_os(ASSETS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSET_DIR));

        // Hands stack just above the face so they never z-fight with it or
        // each other; the shared rotation axis stays on world Y.
        let lift = |y: f32| Mat4::from_translation(Vec3::new(0.0, y, 0.0));

        Self {
            dir,
            objects: vec![
                ObjectSpec {
                    name: "clockface",
                    obj: "clockface.obj",
                    texture: "clockface.png",
                    hand: None,
                    placement: Mat4::IDENTITY,
                },
                ObjectSpec {
                    name: "clocklines",
                    obj: "clocklines.obj",
                    texture: "clocklines.png",
                    hand: None,
                    placement: lift(0.01),
                },
                ObjectSpec {
                    name: "hourhand",
                    obj: "hourhand.obj",
                    texture: "hourhand.png",
                    hand: Some(Hand::Hour),
                    placement: lift(0.02) * Mat4::from_scale(Vec3::splat(0.55)),
                },
                ObjectSpec {
                    name: "minutehand",
                    obj: "minutehand.obj",
                    texture: "minutehand.png",
                    hand: Some(Hand::Minute),
                    placement: lift(0.03) * Mat4::from_scale(Vec3::splat(0.85)),
                },
                ObjectSpec {
                    name: "secondhand",
                    obj: "secondhand.obj",
                    texture: "secondhand.png",
                    hand: Some(Hand::Second),
                    placement: lift(0.04) * Mat4::from_scale(Vec3::splat(0.95)),
                },
            ],
        }
    }
}

/// One object with its CPU-side mesh and texture data, ready for GPU
/// upload.
#[derive(Debug)]
pub struct LoadedObject {
    pub name: &'static str,
    pub hand: Option<Hand>,
    pub placement: Mat4,
    pub model: ObjModel,
    pub texture: RgbaImage,
}

/// Loads every object in `config`, failing on the first broken asset.
pub fn load(config: &AssetConfig) -> Result<Vec<LoadedObject>, AssetError> {
    config
        .objects
        .iter()
        .map(|spec| {
            let model = load_obj(&config.dir.join(spec.obj))?;
            let texture = load_png(&config.dir.join(spec.texture))?;
            log::debug!(
                "loaded {}: {} triangles, {}x{} texture",
                spec.name,
                model.triangle_count(),
                texture.width(),
                texture.height()
            );
            Ok(LoadedObject {
                name: spec.name,
                hand: spec.hand,
                placement: spec.placement,
                model,
                texture,
            })
        })
        .collect()
}

fn load_obj(path: &Path) -> Result<ObjModel, AssetError> {
    let text = fs::read_to_string(path).map_err(|source| AssetError::Io {
        path: path.to_owned(),
        source,
    })?;
    gnomon_obj::parse_str(&text).map_err(|source| AssetError::Obj {
        path: path.to_owned(),
        source,
    })
}

fn load_png(path: &Path) -> Result<RgbaImage, AssetError> {
    let bytes = fs::read(path).map_err(|source| AssetError::Io {
        path: path.to_owned(),
        source,
    })?;
    let img = image::load_from_memory(&bytes).map_err(|source| AssetError::Image {
        path: path.to_owned(),
        source,
    })?;
    Ok(img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_lists_five_objects_in_draw_order() {
        let config = AssetConfig::standard();
        let names: Vec<_> = config.objects.iter().map(|o| o.name).collect();
        assert_eq!(
            names,
            ["clockface", "clocklines", "hourhand", "minutehand", "secondhand"]
        );
    }

    #[test]
    fn exactly_three_objects_follow_hands() {
        let config = AssetConfig::standard();
        let hands: Vec<_> = config.objects.iter().filter_map(|o| o.hand).collect();
        assert_eq!(hands, [Hand::Hour, Hand::Minute, Hand::Second]);
    }

    #[test]
    fn missing_file_reports_its_path() {
        let err = load_obj(Path::new("/nonexistent/clockface.obj")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/clockface.obj"));
    }
}
