//! Frame and pedestal presets
//!
//! Artworks reference a style by id or by name. A [`StyleCatalog`]
//! resolves that reference, falling back to the catalog's default style.

use serde::{Deserialize, Serialize};

use super::material::{MaterialProperties, ResolvedMaterial};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub border_width: f32,
}

impl Default for FrameDimensions {
    fn default() -> Self {
        Self {
            width: 2.0,
            height: 1.5,
            depth: 0.1,
            border_width: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PedestalDimensions {
    pub width: f32,
    pub height: f32,
    pub depth: f32,
}

impl Default for PedestalDimensions {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 0.8,
            depth: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameStyle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model_url: Option<String>,
    pub dimensions: FrameDimensions,
    #[serde(default)]
    pub material: MaterialProperties,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PedestalStyle {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub model_url: Option<String>,
    pub dimensions: PedestalDimensions,
    #[serde(default)]
    pub material: MaterialProperties,
    #[serde(default)]
    pub is_default: bool,
}

/// Frame geometry and material after style resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLook {
    pub dimensions: FrameDimensions,
    pub material: ResolvedMaterial,
}

impl Default for FrameLook {
    fn default() -> Self {
        Self {
            dimensions: FrameDimensions::default(),
            material: ResolvedMaterial::solid([0x55 as f32 / 255.0; 3], 0.2, 0.6),
        }
    }
}

/// Pedestal geometry and material after style resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PedestalLook {
    pub dimensions: PedestalDimensions,
    pub material: ResolvedMaterial,
}

impl Default for PedestalLook {
    fn default() -> Self {
        Self {
            dimensions: PedestalDimensions::default(),
            material: ResolvedMaterial::solid([0xf8 as f32 / 255.0; 3], 0.1, 0.3),
        }
    }
}

/// Shared accessors so one catalog type serves both style kinds
pub trait Style {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn is_default(&self) -> bool;
}

impl Style for FrameStyle {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn is_default(&self) -> bool {
        self.is_default
    }
}

impl Style for PedestalStyle {
    fn id(&self) -> &str {
        &self.id
    }
    fn name(&self) -> &str {
        &self.name
    }
    fn is_default(&self) -> bool {
        self.is_default
    }
}

#[derive(Debug, Clone)]
pub struct StyleCatalog<S> {
    styles: Vec<S>,
}

impl<S> Default for StyleCatalog<S> {
    fn default() -> Self {
        Self { styles: Vec::new() }
    }
}

impl<S: Style> StyleCatalog<S> {
    pub fn new(styles: Vec<S>) -> Self {
        Self { styles }
    }

    /// Looks up `reference` by id, then by name; otherwise the default style
    pub fn resolve(&self, reference: Option<&str>) -> Option<&S> {
        let reference = reference.map(str::trim).filter(|r| !r.is_empty());
        if let Some(reference) = reference {
            let found = self
                .styles
                .iter()
                .find(|s| s.id() == reference)
                .or_else(|| self.styles.iter().find(|s| s.name() == reference));
            if found.is_some() {
                return found;
            }
            log::debug!("Style '{}' not in catalog, using default", reference);
        }
        self.styles.iter().find(|s| s.is_default())
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

pub type FrameCatalog = StyleCatalog<FrameStyle>;
pub type PedestalCatalog = StyleCatalog<PedestalStyle>;

impl FrameCatalog {
    /// Frame look for a reference; built-in look when nothing resolves
    pub fn look_for(&self, reference: Option<&str>) -> FrameLook {
        let builtin = FrameLook::default();
        match self.resolve(reference) {
            Some(style) => FrameLook {
                dimensions: style.dimensions,
                material: style.material.resolve_over(&builtin.material),
            },
            None => builtin,
        }
    }
}

impl PedestalCatalog {
    /// Pedestal look for a reference; built-in look when nothing resolves
    pub fn look_for(&self, reference: Option<&str>) -> PedestalLook {
        let builtin = PedestalLook::default();
        match self.resolve(reference) {
            Some(style) => PedestalLook {
                dimensions: style.dimensions,
                material: style.material.resolve_over(&builtin.material),
            },
            None => builtin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame_styles() -> Vec<FrameStyle> {
        let frame = |id: &str, name: &str, dims: [f32; 4], color: &str, metal: f32, rough: f32, default: bool| FrameStyle {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            model_url: None,
            dimensions: FrameDimensions {
                width: dims[0],
                height: dims[1],
                depth: dims[2],
                border_width: dims[3],
            },
            material: MaterialProperties {
                color: Some(color.to_string()),
                metalness: Some(metal),
                roughness: Some(rough),
                ..Default::default()
            },
            is_default: default,
        };

        vec![
            frame("classic-gold", "Classic Gold", [2.2, 1.7, 0.1, 0.1], "#d4af37", 0.8, 0.2, true),
            frame("modern-black", "Modern Black", [2.0, 1.5, 0.05, 0.05], "#1a1a1a", 0.1, 0.8, false),
            frame("natural-wood", "Natural Wood", [2.1, 1.6, 0.08, 0.08], "#8b4513", 0.0, 0.9, false),
        ]
    }

    fn sample_pedestal_styles() -> Vec<PedestalStyle> {
        let pedestal = |id: &str, name: &str, dims: [f32; 3], color: &str, metal: f32, rough: f32, default: bool| PedestalStyle {
            id: id.to_string(),
            name: name.to_string(),
            description: None,
            model_url: None,
            dimensions: PedestalDimensions {
                width: dims[0],
                height: dims[1],
                depth: dims[2],
            },
            material: MaterialProperties {
                color: Some(color.to_string()),
                metalness: Some(metal),
                roughness: Some(rough),
                ..Default::default()
            },
            is_default: default,
        };

        vec![
            pedestal("classic-white", "Classic White", [1.0, 1.0, 1.0], "#f8f8f8", 0.1, 0.3, true),
            pedestal("industrial-steel", "Industrial Steel", [0.8, 1.2, 0.8], "#c0c0c0", 0.9, 0.1, false),
            pedestal("dark-stone", "Dark Stone", [1.2, 0.8, 1.2], "#2f2f2f", 0.2, 0.4, false),
        ]
    }

    #[test]
    fn resolves_by_id_then_name_then_default() {
        let catalog = PedestalCatalog::new(sample_pedestal_styles());

        assert_eq!(catalog.resolve(Some("dark-stone")).unwrap().name, "Dark Stone");
        assert_eq!(catalog.resolve(Some("Industrial Steel")).unwrap().id, "industrial-steel");
        assert_eq!(catalog.resolve(Some("missing")).unwrap().id, "classic-white");
        assert_eq!(catalog.resolve(None).unwrap().id, "classic-white");
    }

    #[test]
    fn empty_catalog_uses_builtin_look() {
        let frames = FrameCatalog::default();
        let look = frames.look_for(Some("Classic Gold"));
        assert_eq!(look, FrameLook::default());
        assert_eq!(look.dimensions.border_width, 0.05);
    }

    #[test]
    fn style_material_layers_over_builtin() {
        let catalog = FrameCatalog::new(sample_frame_styles());
        let look = catalog.look_for(Some("modern-black"));
        assert_eq!(look.dimensions.depth, 0.05);
        assert_eq!(look.material.metalness, 0.1);
        assert!(look.material.color[0] < 0.11);
        assert!(!look.material.transparent);
    }
}
