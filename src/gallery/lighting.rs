//! Lighting records

use serde::{Deserialize, Serialize};

use super::artwork::Vec3Record;

/// The closed set of light kinds a record may name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LightKind {
    Ambient,
    Directional,
    Point,
    Spot,
}

impl LightKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ambient" => Some(Self::Ambient),
            "directional" => Some(Self::Directional),
            "point" => Some(Self::Point),
            "spot" => Some(Self::Spot),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ambient => "ambient",
            Self::Directional => "directional",
            Self::Point => "point",
            Self::Spot => "spot",
        }
    }
}

fn default_enabled() -> bool {
    true
}

fn default_color() -> String {
    "#ffffff".to_string()
}

fn default_intensity() -> f32 {
    1.0
}

/// One light belonging to an environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingConfig {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub environment_id: String,
    #[serde(default)]
    pub name: String,
    /// Raw type string; see [`LightingConfig::kind`]
    #[serde(rename = "type")]
    pub light_type: String,
    #[serde(default)]
    pub position: Option<Vec3Record>,
    #[serde(default)]
    pub rotation: Option<Vec3Record>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_intensity")]
    pub intensity: f32,
    #[serde(default)]
    pub distance: Option<f32>,
    #[serde(default)]
    pub angle: Option<f32>,
    #[serde(default)]
    pub penumbra: Option<f32>,
    #[serde(default)]
    pub cast_shadow: bool,
    #[serde(default)]
    pub shadow_map_size: Option<u32>,
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

impl LightingConfig {
    pub fn new(name: &str, kind: LightKind, intensity: f32) -> Self {
        Self {
            id: String::new(),
            environment_id: String::new(),
            name: name.to_string(),
            light_type: kind.as_str().to_string(),
            position: None,
            rotation: None,
            color: default_color(),
            intensity,
            distance: None,
            angle: None,
            penumbra: None,
            cast_shadow: false,
            shadow_map_size: None,
            is_enabled: true,
        }
    }

    /// Builder pattern: position
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Some(Vec3Record::new(x, y, z));
        self
    }

    /// Builder pattern: range for point and spot lights
    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = Some(distance);
        self
    }

    /// Builder pattern: shadow casting with the given map size
    pub fn with_shadow(mut self, map_size: u32) -> Self {
        self.cast_shadow = true;
        self.shadow_map_size = Some(map_size);
        self
    }

    /// Builder pattern: disabled entry
    pub fn disabled(mut self) -> Self {
        self.is_enabled = false;
        self
    }

    pub fn kind(&self) -> Option<LightKind> {
        LightKind::parse(&self.light_type)
    }
}

/// Lighting rig used when no environment is active
pub fn default_lighting() -> Vec<LightingConfig> {
    vec![
        LightingConfig::new("Ambient Light", LightKind::Ambient, 0.4),
        LightingConfig::new("Main Light", LightKind::Directional, 1.0)
            .at(10.0, 15.0, 5.0)
            .with_shadow(1024),
        LightingConfig::new("Fill Light", LightKind::Point, 0.5)
            .at(0.0, 8.0, 0.0)
            .with_distance(20.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_light_kinds() {
        assert_eq!(LightKind::parse("Spot"), Some(LightKind::Spot));
        assert_eq!(LightKind::parse("hemisphere"), None);
    }

    #[test]
    fn deserializes_with_defaults() {
        let json = r#"{"type": "point", "intensity": 0.3, "position": {"x": 0, "y": 4, "z": 0}}"#;
        let light: LightingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(light.kind(), Some(LightKind::Point));
        assert!(light.is_enabled);
        assert_eq!(light.color, "#ffffff");
        assert_eq!(light.distance, None);
    }

    #[test]
    fn default_rig_matches_gallery_defaults() {
        let rig = default_lighting();
        assert_eq!(rig.len(), 3);
        assert_eq!(rig[0].kind(), Some(LightKind::Ambient));
        assert_eq!(rig[1].shadow_map_size, Some(1024));
        assert_eq!(rig[2].distance, Some(20.0));
    }
}
