//! Room surfaces: floor, ceiling and three walls
//!
//! All surfaces are single planes drawn double sided, sized straight from
//! the environment's dimensions. The front of the room stays open.

use std::{f32::consts::FRAC_PI_2, sync::Arc};

use crate::{
    gallery::{GalleryEnvironment, SurfaceConfig},
    gfx::{
        geometry::generate_plane,
        scene::{NodeId, NodeTransform, Scene, SceneMaterial, SceneNode},
    },
};

/// Adds the room under a new `environment` group and returns the group
pub fn build_surfaces(scene: &mut Scene, environment: &GalleryEnvironment) -> NodeId {
    let root = scene.add_group(None, "environment", NodeTransform::default());
    let dims = environment.dimensions;
    let (w, h, d) = (dims.width, dims.height, dims.depth);

    let planes = [
        ("floor", &environment.floor_config, (w, d), NodeTransform::default().rotated(-FRAC_PI_2, 0.0, 0.0)),
        ("ceiling", &environment.ceiling_config, (w, d), NodeTransform::at(0.0, h, 0.0).rotated(FRAC_PI_2, 0.0, 0.0)),
        ("wall-back", &environment.wall_config, (w, h), NodeTransform::at(0.0, h / 2.0, -d / 2.0)),
        ("wall-left", &environment.wall_config, (d, h), NodeTransform::at(-w / 2.0, h / 2.0, 0.0).rotated(0.0, FRAC_PI_2, 0.0)),
        ("wall-right", &environment.wall_config, (d, h), NodeTransform::at(w / 2.0, h / 2.0, 0.0).rotated(0.0, -FRAC_PI_2, 0.0)),
    ];

    for (name, config, (width, height), transform) in planes {
        scene.add(Some(root), surface_node(name, config, width, height, transform));
    }

    log::debug!("Room {}x{}x{} for '{}'", w, h, d, environment.name);
    root
}

fn surface_node(
    name: &str,
    config: &SurfaceConfig,
    width: f32,
    height: f32,
    transform: NodeTransform,
) -> SceneNode {
    let mesh = Arc::new(generate_plane(width, height).into_mesh());
    SceneNode::mesh(name, mesh, SceneMaterial::new(config.resolve_material()))
        .with_transform(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::{default_environment, MaterialProperties, ResolvedMaterial};
    use cgmath::{Matrix4, Vector4};

    fn facing(scene: &Scene, name: &str) -> Vector4<f32> {
        let id = scene.find_by_name(name).unwrap();
        let world: Matrix4<f32> = scene.world_matrix(id).unwrap();
        world * Vector4::new(0.0, 0.0, 1.0, 0.0)
    }

    #[test]
    fn surfaces_face_into_the_room() {
        let mut scene = Scene::new();
        build_surfaces(&mut scene, &default_environment());

        assert!(facing(&scene, "floor").y > 0.99);
        assert!(facing(&scene, "ceiling").y < -0.99);
        assert!(facing(&scene, "wall-back").z > 0.99);
        assert!(facing(&scene, "wall-left").x > 0.99);
        assert!(facing(&scene, "wall-right").x < -0.99);

        let back = scene.find_by_name("wall-back").unwrap();
        assert_eq!(scene.world_position(back).unwrap().z, -7.5);
    }

    #[test]
    fn default_surface_materials() {
        let mut scene = Scene::new();
        build_surfaces(&mut scene, &default_environment());
        let material = |name| {
            let id = scene.find_by_name(name).unwrap();
            scene.get(id).unwrap().as_mesh().unwrap().material.params
        };

        let floor = material("floor");
        assert_eq!(floor.roughness, 0.3);
        assert_eq!(floor.metalness, 0.1);
        assert_eq!(floor.color, [0xe8 as f32 / 255.0; 3]);
        assert_eq!(material("ceiling").color, [1.0, 1.0, 1.0]);
        assert_eq!(material("wall-left").roughness, 0.8);
    }

    #[test]
    fn sparse_surface_record_falls_back_to_base_colour() {
        let config = SurfaceConfig::new("#336699", MaterialProperties::default());
        let resolved = config.resolve_material();
        assert_eq!(
            resolved,
            ResolvedMaterial::matte([0x33 as f32 / 255.0, 0x66 as f32 / 255.0, 0x99 as f32 / 255.0])
        );
    }
}
