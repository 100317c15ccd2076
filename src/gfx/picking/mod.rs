//! # Object Picking System
//!
//! Mouse ray-casting against world-space bounding boxes.
//!
//! ## How it works
//!
//! 1. **Mouse to Ray**: unproject the cursor through the camera into a world ray
//! 2. **Ray-Box Intersection**: slab test against each candidate subtree's bounds
//! 3. **Selection**: the closest hit wins
//!
//! Artwork selection and gizmo handle grabbing both go through
//! [`ObjectPicker::pick`], each with its own candidate set.

use cgmath::{ElementWise, InnerSpace, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::{
    camera::OrbitCamera,
    scene::{NodeId, Scene},
};

/// A 3D ray for intersection testing
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vector3<f32>,
    /// Normalized
    pub direction: Vector3<f32>,
}

impl Ray {
    pub fn new(origin: Vector3<f32>, direction: Vector3<f32>) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vector3<f32> {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Bounds of a point set; a degenerate box at the origin when empty
    pub fn from_vertices(vertices: &[[f32; 3]]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 0.0));
        };

        let mut min = Vector3::from(*first);
        let mut max = min;
        for vertex in &vertices[1..] {
            min.x = min.x.min(vertex[0]);
            min.y = min.y.min(vertex[1]);
            min.z = min.z.min(vertex[2]);
            max.x = max.x.max(vertex[0]);
            max.y = max.y.max(vertex[1]);
            max.z = max.z.max(vertex[2]);
        }
        Self::new(min, max)
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb::new(
            Vector3::new(
                self.min.x.min(other.min.x),
                self.min.y.min(other.min.y),
                self.min.z.min(other.min.z),
            ),
            Vector3::new(
                self.max.x.max(other.max.x),
                self.max.y.max(other.max.y),
                self.max.z.max(other.max.z),
            ),
        )
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Distance along `ray` to the first hit, or `None`
    ///
    /// A ray starting inside the box hits at its exit point.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let inv_dir = Vector3::new(
            1.0 / ray.direction.x,
            1.0 / ray.direction.y,
            1.0 / ray.direction.z,
        );

        let t_min = (self.min - ray.origin).mul_element_wise(inv_dir);
        let t_max = (self.max - ray.origin).mul_element_wise(inv_dir);

        let t_near = t_min.x.min(t_max.x).max(t_min.y.min(t_max.y)).max(t_min.z.min(t_max.z));
        let t_far = t_min.x.max(t_max.x).min(t_min.y.max(t_max.y)).min(t_min.z.max(t_max.z));

        if t_near <= t_far && t_far >= 0.0 {
            Some(if t_near >= 0.0 { t_near } else { t_far })
        } else {
            None
        }
    }

    /// Bounds of the eight transformed corners
    pub fn transform(&self, matrix: &Matrix4<f32>) -> Self {
        let corners: Vec<[f32; 3]> = (0..8)
            .map(|i| {
                let corner = Vector4::new(
                    if i & 1 == 0 { self.min.x } else { self.max.x },
                    if i & 2 == 0 { self.min.y } else { self.max.y },
                    if i & 4 == 0 { self.min.z } else { self.max.z },
                    1.0,
                );
                let p = matrix * corner;
                [p.x / p.w, p.y / p.w, p.z / p.w]
            })
            .collect();
        Self::from_vertices(&corners)
    }
}

/// Result of a picking query
#[derive(Debug, Clone, Copy)]
pub struct PickResult {
    /// Candidate whose subtree was hit
    pub node: NodeId,
    /// Distance along the ray
    pub distance: f32,
    /// World space intersection point
    pub intersection_point: Vector3<f32>,
}

/// Ray picker over scene subtrees
#[derive(Debug, Default)]
pub struct ObjectPicker;

impl ObjectPicker {
    pub fn new() -> Self {
        Self
    }

    /// Converts a cursor position in physical pixels to a world-space ray
    pub fn screen_to_ray(
        &self,
        screen_pos: (f32, f32),
        screen_size: (f32, f32),
        camera: &OrbitCamera,
    ) -> Ray {
        let (mouse_x, mouse_y) = screen_pos;
        let (screen_width, screen_height) = screen_size;

        let ndc_x = (2.0 * mouse_x) / screen_width.max(1.0) - 1.0;
        let ndc_y = 1.0 - (2.0 * mouse_y) / screen_height.max(1.0);

        let inv_view_proj = camera
            .view_projection()
            .invert()
            .unwrap_or_else(Matrix4::identity);

        // wgpu clip depth runs from 0 at the near plane to 1 at the far plane
        let unproject = |z: f32| {
            let p = inv_view_proj * Vector4::new(ndc_x, ndc_y, z, 1.0);
            Vector3::new(p.x / p.w, p.y / p.w, p.z / p.w)
        };
        let near = unproject(0.0);
        let far = unproject(1.0);
        Ray::new(near, far - near)
    }

    /// Closest candidate whose subtree bounds the ray hits
    pub fn pick(
        &self,
        ray: &Ray,
        scene: &Scene,
        candidates: impl IntoIterator<Item = NodeId>,
    ) -> Option<PickResult> {
        candidates
            .into_iter()
            .filter_map(|node| {
                let distance = scene.subtree_bounds(node)?.intersect_ray(ray)?;
                Some(PickResult {
                    node,
                    distance,
                    intersection_point: ray.point_at(distance),
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
