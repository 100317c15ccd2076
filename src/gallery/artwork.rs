//! Artwork records
//!
//! An [`Artwork`] is either a painting (image on a framed plane) or a
//! sculpture (model on a pedestal). The `type` and `modelFormat` strings
//! of the API are resolved into closed enums here so every later match is
//! exhaustive.

use serde::{Deserialize, Serialize};

use super::material::MaterialProperties;

/// Artwork identity as issued by the resource API
pub type ArtworkId = String;

/// `{x, y, z}` triple as stored on records
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3Record {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3Record {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<[f32; 3]> for Vec3Record {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl From<cgmath::Vector3<f32>> for Vec3Record {
    fn from(v: cgmath::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vec3Record> for cgmath::Vector3<f32> {
    fn from(v: Vec3Record) -> Self {
        cgmath::Vector3::new(v.x, v.y, v.z)
    }
}

/// Position, Euler rotation (radians, XYZ order) and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub position: Vec3Record,
    pub rotation: Vec3Record,
    pub scale: Vec3Record,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self {
            position: Vec3Record::ZERO,
            rotation: Vec3Record::ZERO,
            scale: Vec3Record::ONE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtworkKind {
    Painting,
    Sculpture,
}

/// Model file formats the catalog can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelFormat {
    Gltf,
    Glb,
    Obj,
    Fbx,
    Stl,
}

impl ModelFormat {
    /// Case-insensitive parse; `None` for anything outside the closed set
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "gltf" => Some(Self::Gltf),
            "glb" => Some(Self::Glb),
            "obj" => Some(Self::Obj),
            "fbx" => Some(Self::Fbx),
            "stl" => Some(Self::Stl),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gltf => "gltf",
            Self::Glb => "glb",
            Self::Obj => "obj",
            Self::Fbx => "fbx",
            Self::Stl => "stl",
        }
    }
}

impl std::fmt::Display for ModelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Artwork record in the API's JSON shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artwork {
    pub id: ArtworkId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub medium: String,
    #[serde(default)]
    pub dimensions: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(rename = "type")]
    pub kind: ArtworkKind,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub model_url: Option<String>,
    /// Raw format string; see [`Artwork::model_format`]
    #[serde(default)]
    pub model_format: Option<String>,
    #[serde(default)]
    pub position: Option<Vec3Record>,
    #[serde(default)]
    pub rotation: Option<Vec3Record>,
    #[serde(default)]
    pub scale: Option<Vec3Record>,
    #[serde(default)]
    pub material_properties: Option<MaterialProperties>,
    #[serde(default)]
    pub frame_style: Option<String>,
    #[serde(default)]
    pub pedestal_style: Option<String>,

    /// Fields this crate does not interpret (timestamps, relations),
    /// carried so a rewritten record loses nothing
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Artwork {
    /// Minimal record, mostly useful for tests and tooling
    pub fn new(id: &str, title: &str, kind: ArtworkKind) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            artist: String::new(),
            year: 0,
            medium: String::new(),
            dimensions: String::new(),
            description: String::new(),
            price: 0.0,
            kind,
            image_url: None,
            model_url: None,
            model_format: None,
            position: None,
            rotation: None,
            scale: None,
            material_properties: None,
            frame_style: None,
            pedestal_style: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Builder pattern: explicit position
    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Some(Vec3Record::new(x, y, z));
        self
    }

    /// Builder pattern: model URL and raw format string
    pub fn with_model(mut self, url: &str, format: &str) -> Self {
        self.model_url = Some(url.to_string());
        self.model_format = Some(format.to_string());
        self
    }

    /// Builder pattern: painting image
    pub fn with_image(mut self, url: &str) -> Self {
        self.image_url = Some(url.to_string());
        self
    }

    pub fn is_painting(&self) -> bool {
        self.kind == ArtworkKind::Painting
    }

    pub fn is_sculpture(&self) -> bool {
        self.kind == ArtworkKind::Sculpture
    }

    /// Image URL if present and non-blank
    pub fn image_url(&self) -> Option<&str> {
        non_blank(self.image_url.as_deref())
    }

    /// Model URL if present and non-blank
    pub fn model_url(&self) -> Option<&str> {
        non_blank(self.model_url.as_deref())
    }

    pub fn model_format(&self) -> Option<ModelFormat> {
        self.model_format.as_deref().and_then(ModelFormat::parse)
    }

    /// Stored rotation and scale with their defaults filled in
    ///
    /// Position is left to the layout step, which knows the list context.
    pub fn stored_rotation(&self) -> Vec3Record {
        self.rotation.unwrap_or(Vec3Record::ZERO)
    }

    pub fn stored_scale(&self) -> Vec3Record {
        self.scale.unwrap_or(Vec3Record::ONE)
    }

    /// Writes a committed transform into the record
    pub fn apply_transform(&mut self, transform: &Transform3D) {
        self.position = Some(transform.position);
        self.rotation = Some(transform.rotation);
        self.scale = Some(transform.scale);
    }

    /// Short label for lists and logs
    pub fn display_name(&self) -> String {
        if self.artist.is_empty() {
            self.title.clone()
        } else {
            format!("{} ({})", self.title, self.artist)
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCULPTURE_JSON: &str = r##"{
        "id": "clx1",
        "title": "Bronze Figure",
        "artist": "A. Maker",
        "year": 1921,
        "medium": "Bronze",
        "dimensions": "60cm",
        "description": "",
        "price": 12000,
        "imageUrl": null,
        "modelUrl": "/models/figure.GLB",
        "modelFormat": "GLB",
        "type": "sculpture",
        "position": {"x": 1, "y": 0, "z": 2},
        "rotation": null,
        "scale": null,
        "materialProperties": {"color": "#b08d57", "metalness": 0.9},
        "frameStyle": null,
        "pedestalStyle": "Industrial Steel",
        "createdAt": "2024-05-01T10:00:00.000Z",
        "updatedAt": "2024-05-02T10:00:00.000Z"
    }"##;

    #[test]
    fn parses_api_record() {
        let artwork: Artwork = serde_json::from_str(SCULPTURE_JSON).unwrap();
        assert_eq!(artwork.kind, ArtworkKind::Sculpture);
        assert_eq!(artwork.model_format(), Some(ModelFormat::Glb));
        assert_eq!(artwork.position, Some(Vec3Record::new(1.0, 0.0, 2.0)));
        assert_eq!(artwork.stored_scale(), Vec3Record::ONE);
        assert_eq!(artwork.pedestal_style.as_deref(), Some("Industrial Steel"));
        assert!(artwork.extra.contains_key("createdAt"));
    }

    #[test]
    fn round_trip_keeps_unknown_fields() {
        let mut artwork: Artwork = serde_json::from_str(SCULPTURE_JSON).unwrap();
        artwork.apply_transform(&Transform3D {
            position: Vec3Record::new(3.0, 0.0, 1.0),
            rotation: Vec3Record::new(0.0, 0.5, 0.0),
            scale: Vec3Record::ONE,
        });

        let value = serde_json::to_value(&artwork).unwrap();
        assert_eq!(value["type"], "sculpture");
        assert_eq!(value["updatedAt"], "2024-05-02T10:00:00.000Z");
        assert_eq!(value["rotation"]["y"], 0.5);
        assert_eq!(value["modelFormat"], "GLB");
    }

    #[test]
    fn model_format_parse_is_closed() {
        assert_eq!(ModelFormat::parse("gltf"), Some(ModelFormat::Gltf));
        assert_eq!(ModelFormat::parse(" FBX "), Some(ModelFormat::Fbx));
        assert_eq!(ModelFormat::parse(".stl"), Some(ModelFormat::Stl));
        assert_eq!(ModelFormat::parse("usdz"), None);
        assert_eq!(ModelFormat::parse(""), None);
    }

    #[test]
    fn blank_urls_count_as_missing() {
        let artwork = Artwork::new("p1", "Blank", ArtworkKind::Painting).with_image("   ");
        assert_eq!(artwork.image_url(), None);
        assert_eq!(artwork.model_url(), None);
        assert_eq!(artwork.model_format(), None);
    }
}
