use cgmath::Vector2;

use super::{GalleryEvent, TransformMode};
use crate::{
    config::EditorConfig,
    gallery::ArtworkId,
    gfx::{
        camera::OrbitCamera,
        gizmos::{
            axis_drag_amount, axis_drag_pixels, axis_rotation_pixels, GizmoAxis, TransformGizmo,
        },
        picking::Ray,
        scene::{NodeId, Scene},
    },
};

const MIN_SCALE: f32 = 0.01;

/// Where the editor is in a gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditPhase {
    /// Edit mode off or nothing selected; the gizmo is hidden
    Detached,
    /// Gizmo on the selected artwork, waiting for a handle grab
    Idle,
    /// A handle is held; only the live node changes
    Dragging {
        axis: GizmoAxis,
        last_cursor: Vector2<f32>,
    },
}

#[derive(Debug, Clone)]
struct EditTarget {
    artwork_id: ArtworkId,
    node: NodeId,
}

/// Transform edit state machine for one scene
pub struct TransformEditor {
    gizmo: TransformGizmo,
    mode: TransformMode,
    enabled: bool,
    sensitivity: f32,
    target: Option<EditTarget>,
    phase: EditPhase,
}

impl TransformEditor {
    /// Creates the editor and its (hidden) gizmo nodes in `scene`
    pub fn new(scene: &mut Scene, config: &EditorConfig) -> Self {
        Self {
            gizmo: TransformGizmo::new(scene),
            mode: config.transform_mode,
            enabled: config.edit_mode,
            sensitivity: config.drag_sensitivity,
            target: None,
            phase: EditPhase::Detached,
        }
    }

    pub fn gizmo(&self) -> &TransformGizmo {
        &self.gizmo
    }

    pub fn edit_mode(&self) -> bool {
        self.enabled
    }

    /// Turning edit mode off drops any gesture in progress
    pub fn set_edit_mode(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::debug!("Edit mode {}", if enabled { "on" } else { "off" });
        }
        self.enabled = enabled;
        self.refresh_phase();
    }

    pub fn mode(&self) -> TransformMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: TransformMode) {
        self.mode = mode;
    }

    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, EditPhase::Dragging { .. })
    }

    pub fn target(&self) -> Option<(&str, NodeId)> {
        self.target
            .as_ref()
            .map(|t| (t.artwork_id.as_str(), t.node))
    }

    /// Changes the selected artwork; `None` deselects
    ///
    /// Any gesture on the previous target is discarded.
    pub fn select(&mut self, target: Option<(ArtworkId, NodeId)>) {
        if self.is_dragging() {
            self.discard("selection changed");
        }
        self.target = target.map(|(artwork_id, node)| EditTarget { artwork_id, node });
        self.refresh_phase();
    }

    /// Starts a drag when `ray` hits a handle; returns whether it did
    pub fn grab(&mut self, scene: &Scene, ray: &Ray, cursor: Vector2<f32>) -> bool {
        if self.phase != EditPhase::Idle {
            return false;
        }
        match self.gizmo.hit_test(ray, scene) {
            Some(axis) => {
                self.phase = EditPhase::Dragging {
                    axis,
                    last_cursor: cursor,
                };
                true
            }
            None => false,
        }
    }

    /// Applies cursor motion to the live node; returns whether it moved
    pub fn drag(
        &mut self,
        scene: &mut Scene,
        camera: &OrbitCamera,
        cursor: Vector2<f32>,
        screen_size: (f32, f32),
    ) -> bool {
        let EditPhase::Dragging { axis, last_cursor } = self.phase else {
            return false;
        };
        let Some(node) = self.target.as_ref().map(|t| t.node) else {
            self.detach();
            return false;
        };
        let (Some(center), Some(current)) = (
            scene.world_position(node),
            scene.get(node).map(|n| n.transform),
        ) else {
            self.discard("target node removed");
            self.detach();
            return false;
        };

        let delta = cursor - last_cursor;
        let i = axis.index();
        let mut transform = current;
        match self.mode {
            TransformMode::Translate => {
                transform.position[i] += axis_drag_amount(camera, center, axis, delta, screen_size);
            }
            TransformMode::Rotate => {
                let pixels = axis_rotation_pixels(camera, center, axis, delta, screen_size);
                transform.rotation[i] += pixels * self.sensitivity;
            }
            TransformMode::Scale => {
                let pixels = axis_drag_pixels(camera, center, axis, delta, screen_size);
                transform.scale[i] = (transform.scale[i] + pixels * self.sensitivity).max(MIN_SCALE);
            }
        }

        self.phase = EditPhase::Dragging {
            axis,
            last_cursor: cursor,
        };
        scene.set_transform(node, transform)
    }

    /// Ends a drag and reports the node's transform as it is now
    pub fn release(&mut self, scene: &Scene) -> Option<GalleryEvent> {
        if !self.is_dragging() {
            return None;
        }
        let target = self.target.clone()?;
        let Some(node) = scene.get(target.node) else {
            self.discard("target node removed");
            self.detach();
            return None;
        };

        self.phase = EditPhase::Idle;
        let transform = node.transform.to_record();
        log::info!(
            "Transform committed for {}: position ({:.3}, {:.3}, {:.3})",
            target.artwork_id,
            transform.position.x,
            transform.position.y,
            transform.position.z
        );
        Some(GalleryEvent::TransformCommitted {
            artwork_id: target.artwork_id,
            transform,
        })
    }

    /// Per-frame upkeep: drops a vanished target, moves and tints the gizmo
    pub fn sync(&mut self, scene: &mut Scene, camera: &OrbitCamera) {
        if let Some(target) = &self.target {
            if !scene.contains(target.node) {
                if self.is_dragging() {
                    self.discard("target node removed");
                }
                self.detach();
            }
        }

        let attached = match self.phase {
            EditPhase::Detached => None,
            _ => self.target.as_ref().map(|t| t.node),
        };
        self.gizmo.follow(scene, attached, camera);
        let active = match self.phase {
            EditPhase::Dragging { axis, .. } => Some(axis),
            _ => None,
        };
        self.gizmo.highlight(scene, active);
    }

    fn refresh_phase(&mut self) {
        let attachable = self.enabled && self.target.is_some();
        self.phase = match self.phase {
            EditPhase::Dragging { .. } if attachable => self.phase,
            EditPhase::Dragging { .. } => {
                self.discard("edit mode off");
                EditPhase::Detached
            }
            _ if attachable => EditPhase::Idle,
            _ => EditPhase::Detached,
        };
    }

    fn detach(&mut self) {
        self.target = None;
        self.phase = EditPhase::Detached;
    }

    fn discard(&self, reason: &str) {
        if let Some(target) = &self.target {
            log::debug!("Discarding drag on {}: {}", target.artwork_id, reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        gallery::Vec3Record,
        gfx::scene::NodeTransform,
    };
    use cgmath::Vector3;

    fn front_camera() -> OrbitCamera {
        OrbitCamera::new(10.0, 0.0, 0.0, Vector3::new(0.0, 0.0, 0.0), 1.0)
    }

    fn editing_config() -> EditorConfig {
        EditorConfig {
            edit_mode: true,
            ..Default::default()
        }
    }

    /// Ray straight down -Z through the middle of the X handle
    fn x_handle_ray() -> Ray {
        Ray::new(Vector3::new(1.0, 0.0, 10.0), Vector3::new(0.0, 0.0, -1.0))
    }

    fn setup() -> (Scene, TransformEditor, NodeId, OrbitCamera) {
        let mut scene = Scene::new();
        let root = scene.add_group(None, "artwork-s1", NodeTransform::default());
        let mut editor = TransformEditor::new(&mut scene, &editing_config());
        let camera = front_camera();
        editor.select(Some(("s1".to_string(), root)));
        editor.sync(&mut scene, &camera);
        (scene, editor, root, camera)
    }

    #[test]
    fn release_commits_live_transform_once() {
        let (mut scene, mut editor, root, camera) = setup();
        assert_eq!(editor.phase(), EditPhase::Idle);
        assert!(editor.grab(&scene, &x_handle_ray(), Vector2::new(400.0, 400.0)));

        // drag feedback changes the node but reports nothing
        assert!(editor.drag(&mut scene, &camera, Vector2::new(430.0, 400.0), (800.0, 800.0)));
        let live = NodeTransform {
            position: Vector3::new(1.0, 2.0, 3.0),
            rotation: Vector3::new(0.0, 0.5, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        };
        scene.set_transform(root, live);

        let event = editor.release(&scene);
        assert_eq!(
            event,
            Some(GalleryEvent::TransformCommitted {
                artwork_id: "s1".to_string(),
                transform: crate::gallery::Transform3D {
                    position: Vec3Record::new(1.0, 2.0, 3.0),
                    rotation: Vec3Record::new(0.0, 0.5, 0.0),
                    scale: Vec3Record::new(1.0, 1.0, 1.0),
                },
            })
        );
        assert_eq!(editor.phase(), EditPhase::Idle);
        assert_eq!(editor.release(&scene), None);
    }

    #[test]
    fn translate_drag_moves_along_grabbed_axis_only() {
        let (mut scene, mut editor, root, camera) = setup();
        assert!(editor.grab(&scene, &x_handle_ray(), Vector2::new(400.0, 400.0)));
        editor.drag(&mut scene, &camera, Vector2::new(440.0, 420.0), (800.0, 800.0));

        let position = scene.get(root).unwrap().transform.position;
        assert!(position.x > 0.0);
        assert_eq!(position.y, 0.0);
        assert_eq!(position.z, 0.0);
    }

    #[test]
    fn scale_drag_never_collapses() {
        let (mut scene, mut editor, root, camera) = setup();
        editor.set_mode(TransformMode::Scale);
        assert!(editor.grab(&scene, &x_handle_ray(), Vector2::new(400.0, 400.0)));
        editor.drag(&mut scene, &camera, Vector2::new(-5000.0, 400.0), (800.0, 800.0));

        let scale = scene.get(root).unwrap().transform.scale;
        assert_eq!(scale.x, MIN_SCALE);
        assert_eq!(scale.y, 1.0);
    }

    #[test]
    fn edit_mode_off_discards_the_gesture() {
        let (mut scene, mut editor, _root, camera) = setup();
        assert!(editor.grab(&scene, &x_handle_ray(), Vector2::new(400.0, 400.0)));

        editor.set_edit_mode(false);
        assert_eq!(editor.phase(), EditPhase::Detached);
        assert_eq!(editor.release(&scene), None);

        editor.sync(&mut scene, &camera);
        assert!(!editor.gizmo().is_visible(&scene));
    }

    #[test]
    fn vanished_node_discards_the_gesture() {
        let (mut scene, mut editor, root, camera) = setup();
        assert!(editor.grab(&scene, &x_handle_ray(), Vector2::new(400.0, 400.0)));

        scene.remove_subtree(root);
        assert!(!editor.drag(&mut scene, &camera, Vector2::new(420.0, 400.0), (800.0, 800.0)));
        assert_eq!(editor.release(&scene), None);
        assert_eq!(editor.phase(), EditPhase::Detached);
        assert_eq!(editor.target(), None);
    }

    #[test]
    fn nothing_attaches_outside_edit_mode() {
        let mut scene = Scene::new();
        let root = scene.add_group(None, "artwork-p1", NodeTransform::default());
        let mut editor = TransformEditor::new(&mut scene, &EditorConfig::default());
        let camera = front_camera();
        editor.select(Some(("p1".to_string(), root)));
        editor.sync(&mut scene, &camera);

        assert_eq!(editor.phase(), EditPhase::Detached);
        assert!(!editor.grab(&scene, &x_handle_ray(), Vector2::new(0.0, 0.0)));

        editor.set_edit_mode(true);
        assert_eq!(editor.phase(), EditPhase::Idle);
    }

    #[test]
    fn missing_the_handles_does_not_grab() {
        let (scene, mut editor, _root, _camera) = setup();
        let miss = Ray::new(Vector3::new(-4.0, -4.0, 10.0), Vector3::new(0.0, 0.0, -1.0));
        assert!(!editor.grab(&scene, &miss, Vector2::new(0.0, 0.0)));
        assert_eq!(editor.phase(), EditPhase::Idle);
    }
}
