//! Gallery environments: room surfaces, dimensions and lighting rig

use serde::{Deserialize, Serialize};

use super::{
    lighting::{default_lighting, LightingConfig},
    material::{MaterialProperties, ResolvedMaterial, WHITE},
};
use crate::error::RecordError;

/// Wall, floor or ceiling appearance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceConfig {
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
    #[serde(default)]
    pub material: MaterialProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reflectivity: Option<f32>,
}

impl SurfaceConfig {
    pub fn new(color: &str, material: MaterialProperties) -> Self {
        Self {
            color: color.to_string(),
            texture: None,
            material,
            reflectivity: None,
        }
    }

    /// Material for the surface mesh
    ///
    /// The stored properties win; anything missing falls back to the
    /// surface's base colour on an opaque, fully rough, non-metallic base.
    pub fn resolve_material(&self) -> ResolvedMaterial {
        let base_color = super::material::parse_color(&self.color).unwrap_or(WHITE);
        self.material.resolve_over(&ResolvedMaterial::matte(base_color))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for RoomDimensions {
    fn default() -> Self {
        Self {
            width: 20.0,
            height: 4.0,
            depth: 15.0,
        }
    }
}

/// Environment record in the API's JSON shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GalleryEnvironment {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_active: bool,
    pub wall_config: SurfaceConfig,
    pub floor_config: SurfaceConfig,
    pub ceiling_config: SurfaceConfig,
    #[serde(default)]
    pub dimensions: RoomDimensions,
    #[serde(default)]
    pub lighting_configs: Vec<LightingConfig>,
}

/// Environment rendered when none is active
pub fn default_environment() -> GalleryEnvironment {
    let base = MaterialProperties::gallery_default();
    GalleryEnvironment {
        id: "default".to_string(),
        name: "Default Gallery".to_string(),
        is_active: true,
        wall_config: SurfaceConfig::new("#f8f8f8", base.clone().with_color("#f8f8f8")),
        floor_config: SurfaceConfig::new(
            "#e8e8e8",
            base.clone().with_color("#e8e8e8").with_roughness(0.3),
        ),
        ceiling_config: SurfaceConfig::new("#ffffff", base.with_color("#ffffff")),
        dimensions: RoomDimensions::default(),
        lighting_configs: default_lighting(),
    }
}

/// All known environments, at most one of them active
#[derive(Debug, Clone, Default)]
pub struct EnvironmentCatalog {
    environments: Vec<GalleryEnvironment>,
}

impl EnvironmentCatalog {
    pub fn new(environments: Vec<GalleryEnvironment>) -> Self {
        Self { environments }
    }

    /// Accepts either a single environment object or a list
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum OneOrMany {
            One(Box<GalleryEnvironment>),
            Many(Vec<GalleryEnvironment>),
        }

        Ok(match serde_json::from_str::<OneOrMany>(json)? {
            OneOrMany::One(env) => Self::new(vec![*env]),
            OneOrMany::Many(list) => Self::new(list),
        })
    }

    /// Deactivates every environment, then activates `id`
    ///
    /// On an unknown id nothing changes.
    pub fn activate(&mut self, id: &str) -> Result<(), RecordError> {
        if !self.environments.iter().any(|env| env.id == id) {
            return Err(RecordError::UnknownEnvironment(id.to_string()));
        }

        for env in &mut self.environments {
            env.is_active = false;
        }
        for env in &mut self.environments {
            if env.id == id {
                env.is_active = true;
            }
        }
        log::info!("Activated environment {}", id);
        Ok(())
    }

    /// The active environment; the first flagged one wins if the source
    /// data violates the single-active rule
    pub fn active(&self) -> Option<&GalleryEnvironment> {
        self.environments.iter().find(|env| env.is_active)
    }

    pub fn get(&self, id: &str) -> Option<&GalleryEnvironment> {
        self.environments.iter().find(|env| env.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GalleryEnvironment> {
        self.environments.iter()
    }

    pub fn len(&self) -> usize {
        self.environments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.environments.is_empty()
    }
}
