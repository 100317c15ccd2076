//! Material parameter records
//!
//! [`MaterialProperties`] is the stored, partially filled record the API
//! hands out for surfaces, frames, pedestals and per-artwork overrides.
//! [`ResolvedMaterial`] is the fully populated parameter set the renderer
//! consumes. Resolution always layers a record over an explicit base so
//! every caller states its own fallback defaults.

use serde::{Deserialize, Serialize};

/// RGB colour with components in `0.0..=1.0`
pub type Rgb = [f32; 3];

pub const WHITE: Rgb = [1.0, 1.0, 1.0];
pub const BLACK: Rgb = [0.0, 0.0, 0.0];

/// Shading parameters as stored on records; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emissive_intensity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transparent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal_map_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roughness_map_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metalness_map_url: Option<String>,
}

impl MaterialProperties {
    /// The gallery-wide default material record
    pub fn gallery_default() -> Self {
        Self {
            color: Some("#ffffff".to_string()),
            metalness: Some(0.1),
            roughness: Some(0.8),
            emissive: Some("#000000".to_string()),
            emissive_intensity: Some(0.0),
            transparent: Some(false),
            opacity: Some(1.0),
            ..Default::default()
        }
    }

    /// Builder pattern: replace the colour
    pub fn with_color(mut self, color: &str) -> Self {
        self.color = Some(color.to_string());
        self
    }

    /// Builder pattern: replace the roughness
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = Some(roughness);
        self
    }

    /// Colour string if present and non-blank
    pub fn color_str(&self) -> Option<&str> {
        self.color.as_deref().map(str::trim).filter(|c| !c.is_empty())
    }

    /// Layers this record over `base`, field by field
    ///
    /// Unparseable colours keep the base colour. Scalars are clamped to
    /// their valid range.
    pub fn resolve_over(&self, base: &ResolvedMaterial) -> ResolvedMaterial {
        ResolvedMaterial {
            color: self.color_str().and_then(parse_color).unwrap_or(base.color),
            metalness: self
                .metalness
                .map_or(base.metalness, |m| m.clamp(0.0, 1.0)),
            roughness: self
                .roughness
                .map_or(base.roughness, |r| r.clamp(0.0, 1.0)),
            emissive: self
                .emissive
                .as_deref()
                .and_then(parse_color)
                .unwrap_or(base.emissive),
            emissive_intensity: self
                .emissive_intensity
                .map_or(base.emissive_intensity, |i| i.max(0.0)),
            transparent: self.transparent.unwrap_or(base.transparent),
            opacity: self.opacity.map_or(base.opacity, |o| o.clamp(0.0, 1.0)),
        }
    }
}

/// Fully populated shading parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedMaterial {
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: Rgb,
    pub emissive_intensity: f32,
    pub transparent: bool,
    pub opacity: f32,
}

impl Default for ResolvedMaterial {
    fn default() -> Self {
        Self::MODEL_DEFAULT
    }
}

impl ResolvedMaterial {
    /// Defaults applied to model placeholders and overridden model meshes
    pub const MODEL_DEFAULT: Self = Self {
        color: WHITE,
        metalness: 0.1,
        roughness: 0.8,
        emissive: BLACK,
        emissive_intensity: 0.0,
        transparent: false,
        opacity: 1.0,
    };

    /// Opaque, fully rough, non-metallic material of the given colour
    pub const fn matte(color: Rgb) -> Self {
        Self {
            color,
            metalness: 0.0,
            roughness: 1.0,
            emissive: BLACK,
            emissive_intensity: 0.0,
            transparent: false,
            opacity: 1.0,
        }
    }

    /// Opaque material with explicit metalness and roughness
    pub const fn solid(color: Rgb, metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            metalness,
            roughness,
            emissive: BLACK,
            emissive_intensity: 0.0,
            transparent: false,
            opacity: 1.0,
        }
    }

    /// Builder pattern: translucent variant of this material
    pub const fn translucent(mut self, opacity: f32) -> Self {
        self.transparent = true;
        self.opacity = opacity;
        self
    }

    /// Builder pattern: self-lit variant of this material
    pub const fn glowing(mut self, emissive: Rgb, intensity: f32) -> Self {
        self.emissive = emissive;
        self.emissive_intensity = intensity;
        self
    }

    /// Whether the renderer must blend this material
    pub fn is_blended(&self) -> bool {
        self.transparent && self.opacity < 1.0
    }
}

/// Parses `#rgb`, `#rrggbb` or a handful of CSS colour names
pub fn parse_color(value: &str) -> Option<Rgb> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let named = match value.to_ascii_lowercase().as_str() {
        "white" => "ffffff",
        "black" => "000000",
        "gray" | "grey" => "808080",
        "silver" => "c0c0c0",
        "red" => "ff0000",
        "green" => "008000",
        "blue" => "0000ff",
        "orange" => "ffa500",
        "gold" => "ffd700",
        _ => return None,
    };
    parse_hex(named)
}

fn parse_hex(hex: &str) -> Option<Rgb> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok().map(|v| v as f32 / 255.0);

    match hex.len() {
        3 => {
            let mut rgb = [0.0; 3];
            for (i, c) in hex.chars().enumerate() {
                rgb[i] = channel(&format!("{c}{c}"))?;
            }
            Some(rgb)
        }
        6 => Some([
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        ]),
        _ => None,
    }
}

/// `#rrggbb` form of a colour, as the editor writes it back to records
pub fn format_color(rgb: Rgb) -> String {
    let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("#{:02x}{:02x}{:02x}", r, g, b)
}
