//! # Gizmos
//!
//! On-screen handles for direct manipulation. The [`TransformGizmo`]
//! exposes one bar per axis; the editor turns cursor motion over a bar
//! into translation, rotation or scale of the attached node.

pub mod transform_gizmo;

pub use transform_gizmo::{
    axis_drag_amount, axis_drag_pixels, axis_rotation_pixels, world_to_screen, GizmoAxis,
    TransformGizmo,
};
