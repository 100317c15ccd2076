//! Light rig construction

use std::f32::consts::FRAC_PI_3;

use crate::{
    gallery::{
        material::{parse_color, WHITE},
        LightKind, LightingConfig, Vec3Record,
    },
    gfx::scene::{Light, NodeId, NodeTransform, Scene, SceneNode},
};

/// Where a directional light sits when its record has no position
const DIRECTIONAL_FALLBACK: Vec3Record = Vec3Record::new(0.0, 1.0, 0.0);
/// Cone half-angle of a spot light without one
const DEFAULT_SPOT_ANGLE: f32 = FRAC_PI_3;

/// Scene node for one light record
///
/// Disabled records and records of an unknown type produce nothing.
pub fn build_light(config: &LightingConfig) -> Option<SceneNode> {
    if !config.is_enabled {
        return None;
    }
    let Some(kind) = config.kind() else {
        log::debug!(
            "Skipping light '{}' with unknown type '{}'",
            config.name,
            config.light_type
        );
        return None;
    };

    let color = parse_color(&config.color).unwrap_or(WHITE);
    let intensity = config.intensity;
    let distance = config.distance.unwrap_or(0.0).max(0.0);

    let (light, position) = match kind {
        LightKind::Ambient => (Light::Ambient { color, intensity }, Vec3Record::ZERO),
        LightKind::Directional => (
            Light::Directional {
                color,
                intensity,
                cast_shadow: config.cast_shadow,
                shadow_map_size: config.shadow_map_size,
            },
            config.position.unwrap_or(DIRECTIONAL_FALLBACK),
        ),
        LightKind::Point => (
            Light::Point {
                color,
                intensity,
                distance,
                cast_shadow: config.cast_shadow,
            },
            config.position.unwrap_or(Vec3Record::ZERO),
        ),
        LightKind::Spot => (
            Light::Spot {
                color,
                intensity,
                distance,
                angle: config.angle.unwrap_or(DEFAULT_SPOT_ANGLE),
                penumbra: config.penumbra.unwrap_or(0.0).clamp(0.0, 1.0),
                cast_shadow: config.cast_shadow,
                shadow_map_size: config.shadow_map_size,
            },
            config.position.unwrap_or(Vec3Record::ZERO),
        ),
    };

    let rotation = config.rotation.unwrap_or(Vec3Record::ZERO);
    let name = if config.name.is_empty() {
        kind.as_str().to_string()
    } else {
        config.name.clone()
    };
    Some(
        SceneNode::light(name, light).with_transform(
            NodeTransform::at(position.x, position.y, position.z)
                .rotated(rotation.x, rotation.y, rotation.z),
        ),
    )
}

/// Adds every buildable light under a new `lighting` group
pub fn build_lighting(scene: &mut Scene, configs: &[LightingConfig]) -> NodeId {
    let root = scene.add_group(None, "lighting", NodeTransform::default());
    let mut count = 0;
    for node in configs.iter().filter_map(build_light) {
        scene.add(Some(root), node);
        count += 1;
    }
    log::debug!("Built {} of {} lights", count, configs.len());
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_point_light_is_not_built() {
        let configs = vec![
            LightingConfig::new("Fill A", LightKind::Point, 0.5).at(0.0, 3.0, 0.0),
            LightingConfig::new("Fill B", LightKind::Point, 0.3)
                .at(2.0, 3.0, 0.0)
                .disabled(),
        ];
        let mut scene = Scene::new();
        build_lighting(&mut scene, &configs);

        let lights = scene.lights();
        assert_eq!(lights.len(), 1);
        assert_eq!(lights[0].light.kind(), LightKind::Point);
        assert_eq!(lights[0].light.intensity(), 0.5);
    }

    #[test]
    fn unknown_type_is_skipped() {
        let mut config = LightingConfig::new("Odd", LightKind::Point, 1.0);
        config.light_type = "hemisphere".to_string();
        assert!(build_light(&config).is_none());
    }

    #[test]
    fn spot_parameters_pass_through() {
        let mut config = LightingConfig::new("Spot", LightKind::Spot, 2.0)
            .at(1.0, 4.0, 1.0)
            .with_distance(12.0)
            .with_shadow(2048);
        config.angle = Some(0.4);
        config.penumbra = Some(0.25);
        config.color = "#ff0000".to_string();

        let node = build_light(&config).unwrap();
        assert_eq!(
            node.as_light(),
            Some(&Light::Spot {
                color: [1.0, 0.0, 0.0],
                intensity: 2.0,
                distance: 12.0,
                angle: 0.4,
                penumbra: 0.25,
                cast_shadow: true,
                shadow_map_size: Some(2048),
            })
        );
        assert_eq!(node.transform.position.y, 4.0);
    }

    #[test]
    fn default_rig_builds_all_three() {
        let mut scene = Scene::new();
        build_lighting(&mut scene, &crate::gallery::lighting::default_lighting());
        let kinds: Vec<LightKind> = scene.lights().iter().map(|l| l.light.kind()).collect();
        assert_eq!(kinds, vec![LightKind::Ambient, LightKind::Directional, LightKind::Point]);
    }
}
