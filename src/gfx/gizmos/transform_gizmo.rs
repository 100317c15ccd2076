//! Axis handles for moving, rotating and scaling one node
//!
//! The gizmo lives in the scene as a root group with three overlay bars
//! (X red, Y green, Z blue). It follows its target's world position and is
//! hidden while detached. Handle hits use the regular ray picker.

use std::sync::Arc;

use cgmath::{InnerSpace, Vector2, Vector3, Vector4};

use crate::{
    gallery::material::{ResolvedMaterial, Rgb},
    gfx::{
        camera::OrbitCamera,
        geometry::generate_box,
        picking::{ObjectPicker, Ray},
        scene::{MeshData, NodeId, NodeKind, NodeTransform, Scene, SceneMaterial, SceneNode},
    },
};

/// Handle length relative to the camera distance
const SCREEN_SCALE: f32 = 0.12;
const HANDLE_THICKNESS: f32 = 0.08;
const ACTIVE_COLOR: Rgb = [1.0, 0.85, 0.1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    pub fn index(self) -> usize {
        match self {
            GizmoAxis::X => 0,
            GizmoAxis::Y => 1,
            GizmoAxis::Z => 2,
        }
    }

    pub fn unit(self) -> Vector3<f32> {
        match self {
            GizmoAxis::X => Vector3::unit_x(),
            GizmoAxis::Y => Vector3::unit_y(),
            GizmoAxis::Z => Vector3::unit_z(),
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            GizmoAxis::X => [0.9, 0.2, 0.2],
            GizmoAxis::Y => [0.2, 0.8, 0.2],
            GizmoAxis::Z => [0.2, 0.4, 0.95],
        }
    }
}

/// Scene nodes of the axis handles
#[derive(Debug)]
pub struct TransformGizmo {
    root: NodeId,
    handles: [NodeId; 3],
}

impl TransformGizmo {
    /// Adds the (hidden) handle nodes to `scene`
    pub fn new(scene: &mut Scene) -> Self {
        let mut root_node = SceneNode::group("transform-gizmo");
        root_node.visible = false;
        let root = scene.add(None, root_node);

        let handles = GizmoAxis::ALL.map(|axis| {
            let (mesh, offset) = handle_mesh(axis);
            let material = SceneMaterial::new(handle_material(axis.color()));
            scene.add(
                Some(root),
                SceneNode::mesh(format!("gizmo-{:?}", axis), mesh, material)
                    .with_transform(NodeTransform::at(offset.x, offset.y, offset.z))
                    .on_overlay(),
            )
        });

        Self { root, handles }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn handle(&self, axis: GizmoAxis) -> NodeId {
        self.handles[axis.index()]
    }

    /// Moves the handles onto `target` and sizes them for the current view
    ///
    /// Hides the gizmo when `target` is `None` or no longer in the scene.
    pub fn follow(&self, scene: &mut Scene, target: Option<NodeId>, camera: &OrbitCamera) {
        let center = target.and_then(|t| scene.world_position(t));
        let Some(root) = scene.get_mut(self.root) else {
            return;
        };

        match center {
            Some(center) => {
                let size = ((center - camera.eye).magnitude() * SCREEN_SCALE).max(0.05);
                root.visible = true;
                root.transform = NodeTransform {
                    position: center,
                    rotation: Vector3::new(0.0, 0.0, 0.0),
                    scale: Vector3::new(size, size, size),
                };
            }
            None => root.visible = false,
        }
    }

    pub fn is_visible(&self, scene: &Scene) -> bool {
        scene.is_visible(self.root)
    }

    /// Tints the dragged handle, restores the others
    pub fn highlight(&self, scene: &mut Scene, active: Option<GizmoAxis>) {
        for axis in GizmoAxis::ALL {
            let color = if active == Some(axis) {
                ACTIVE_COLOR
            } else {
                axis.color()
            };
            if let Some(mesh) = scene
                .get_mut(self.handle(axis))
                .and_then(|node| match &mut node.kind {
                    NodeKind::Mesh(mesh) => Some(mesh),
                    _ => None,
                })
            {
                mesh.material.params.color = color;
            }
        }
    }

    /// Axis whose handle the ray hits first
    pub fn hit_test(&self, ray: &Ray, scene: &Scene) -> Option<GizmoAxis> {
        if !self.is_visible(scene) {
            return None;
        }
        let hit = ObjectPicker::new().pick(ray, scene, self.handles)?;
        GizmoAxis::ALL
            .into_iter()
            .find(|axis| self.handle(*axis) == hit.node)
    }
}

/// Unit-length bar along `axis`, plus the offset that makes it start at the origin
fn handle_mesh(axis: GizmoAxis) -> (Arc<MeshData>, Vector3<f32>) {
    let t = HANDLE_THICKNESS;
    let (w, h, d) = match axis {
        GizmoAxis::X => (1.0, t, t),
        GizmoAxis::Y => (t, 1.0, t),
        GizmoAxis::Z => (t, t, 1.0),
    };
    (
        Arc::new(generate_box(w, h, d).into_mesh()),
        axis.unit() * 0.5,
    )
}

fn handle_material(color: Rgb) -> ResolvedMaterial {
    ResolvedMaterial::matte(color)
}

/// Projects a world point to physical pixel coordinates
pub fn world_to_screen(
    camera: &OrbitCamera,
    point: Vector3<f32>,
    screen_size: (f32, f32),
) -> Option<Vector2<f32>> {
    let clip = camera.view_projection() * Vector4::new(point.x, point.y, point.z, 1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = Vector2::new(clip.x / clip.w, clip.y / clip.w);
    Some(Vector2::new(
        (ndc.x + 1.0) * 0.5 * screen_size.0,
        (1.0 - ndc.y) * 0.5 * screen_size.1,
    ))
}

/// On-screen direction of `axis` at `center`, in pixels per world unit
pub fn screen_axis(
    camera: &OrbitCamera,
    center: Vector3<f32>,
    axis: GizmoAxis,
    screen_size: (f32, f32),
) -> Option<Vector2<f32>> {
    let a = world_to_screen(camera, center, screen_size)?;
    let b = world_to_screen(camera, center + axis.unit(), screen_size)?;
    let along = b - a;
    (along.magnitude2() > 1e-6).then_some(along)
}

/// World units along `axis` that keep the handle under a cursor moved by `delta`
pub fn axis_drag_amount(
    camera: &OrbitCamera,
    center: Vector3<f32>,
    axis: GizmoAxis,
    delta: Vector2<f32>,
    screen_size: (f32, f32),
) -> f32 {
    match screen_axis(camera, center, axis, screen_size) {
        Some(along) => delta.dot(along) / along.magnitude2(),
        None => 0.0,
    }
}

/// Cursor travel along the projected axis, in pixels
pub fn axis_drag_pixels(
    camera: &OrbitCamera,
    center: Vector3<f32>,
    axis: GizmoAxis,
    delta: Vector2<f32>,
    screen_size: (f32, f32),
) -> f32 {
    match screen_axis(camera, center, axis, screen_size) {
        Some(along) => delta.dot(along.normalize()),
        None => 0.0,
    }
}

/// Cursor travel across the projected axis, for turning about it
///
/// Falls back to horizontal travel when the axis points at the camera.
pub fn axis_rotation_pixels(
    camera: &OrbitCamera,
    center: Vector3<f32>,
    axis: GizmoAxis,
    delta: Vector2<f32>,
    screen_size: (f32, f32),
) -> f32 {
    match screen_axis(camera, center, axis, screen_size) {
        Some(along) if along.magnitude() > 1.0 => {
            let across = Vector2::new(-along.y, along.x).normalize();
            delta.dot(across)
        }
        _ => delta.x,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn front_camera() -> OrbitCamera {
        OrbitCamera::new(10.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0)
    }

    #[test]
    fn gizmo_starts_hidden_and_follows_target() {
        let mut scene = Scene::new();
        let target = scene.add_group(None, "artwork-1", NodeTransform::at(2.0, 1.0, 0.0));
        let gizmo = TransformGizmo::new(&mut scene);
        let camera = front_camera();

        assert!(!gizmo.is_visible(&scene));
        gizmo.follow(&mut scene, Some(target), &camera);
        assert!(gizmo.is_visible(&scene));
        assert_eq!(scene.world_position(gizmo.root()), Some(Vector3::new(2.0, 1.0, 0.0)));

        scene.remove_subtree(target);
        gizmo.follow(&mut scene, Some(target), &camera);
        assert!(!gizmo.is_visible(&scene));
    }

    #[test]
    fn ray_along_x_handle_hits_x() {
        let mut scene = Scene::new();
        let target = scene.add_group(None, "artwork-1", NodeTransform::default());
        let gizmo = TransformGizmo::new(&mut scene);
        gizmo.follow(&mut scene, Some(target), &front_camera());

        let size = 10.0 * SCREEN_SCALE;
        let ray = Ray::new(Vector3::new(size * 0.8, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(gizmo.hit_test(&ray, &scene), Some(GizmoAxis::X));

        let miss = Ray::new(Vector3::new(-3.0, -3.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert_eq!(gizmo.hit_test(&miss, &scene), None);
    }

    #[test]
    fn horizontal_drag_moves_along_x_only() {
        let camera = front_camera();
        let screen = (800.0, 800.0);
        let center = Vector3::new(0.0, 0.0, 0.0);

        let x = axis_drag_amount(&camera, center, GizmoAxis::X, Vector2::new(40.0, 0.0), screen);
        let y = axis_drag_amount(&camera, center, GizmoAxis::Y, Vector2::new(40.0, 0.0), screen);
        assert!(x > 0.0);
        assert!(y.abs() < 1e-5);

        // dragging back by the same amount returns to the start
        let back = axis_drag_amount(&camera, center, GizmoAxis::X, Vector2::new(-40.0, 0.0), screen);
        assert!((x + back).abs() < 1e-5);

        // screen y grows downwards
        let up = axis_drag_amount(&camera, center, GizmoAxis::Y, Vector2::new(0.0, -40.0), screen);
        assert!(up > 0.0);
    }

    #[test]
    fn highlight_recolors_only_the_active_handle() {
        let mut scene = Scene::new();
        let gizmo = TransformGizmo::new(&mut scene);
        gizmo.highlight(&mut scene, Some(GizmoAxis::Y));

        let color = |axis| {
            scene
                .get(gizmo.handle(axis))
                .and_then(|n| n.as_mesh())
                .map(|m| m.material.params.color)
        };
        assert_eq!(color(GizmoAxis::Y), Some(ACTIVE_COLOR));
        assert_eq!(color(GizmoAxis::X), Some(GizmoAxis::X.color()));
    }
}
