//! # Primitive Shape Generation
//!
//! Boxes and planes are all the gallery needs: frames, pedestals and
//! placeholders are boxes; paintings and room surfaces are planes.

use super::GeometryData;

/// Generate a unit cube centered at the origin
///
/// Vertices span -0.5 to 0.5 on all axes.
pub fn generate_cube() -> GeometryData {
    generate_box(1.0, 1.0, 1.0)
}

/// Generate a `width` x `height` x `depth` box centered at the origin
///
/// Each face has its own four vertices so normals stay flat.
pub fn generate_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let (x, y, z) = (width * 0.5, height * 0.5, depth * 0.5);
    let mut data = GeometryData::new();

    #[rustfmt::skip]
    let faces: [([f32; 3], [[f32; 3]; 4]); 6] = [
        // +Z
        ([0.0, 0.0, 1.0], [[-x, -y, z], [x, -y, z], [x, y, z], [-x, y, z]]),
        // -Z
        ([0.0, 0.0, -1.0], [[x, -y, -z], [-x, -y, -z], [-x, y, -z], [x, y, -z]]),
        // -X
        ([-1.0, 0.0, 0.0], [[-x, -y, -z], [-x, -y, z], [-x, y, z], [-x, y, -z]]),
        // +X
        ([1.0, 0.0, 0.0], [[x, -y, z], [x, -y, -z], [x, y, -z], [x, y, z]]),
        // +Y
        ([0.0, 1.0, 0.0], [[-x, y, z], [x, y, z], [x, y, -z], [-x, y, -z]]),
        // -Y
        ([0.0, -1.0, 0.0], [[-x, -y, -z], [x, -y, -z], [x, -y, z], [-x, -y, z]]),
    ];

    for (normal, corners) in faces {
        data.push_quad(normal, corners);
    }
    data
}

/// Generate a `width` x `height` plane in the XY plane facing +Z
///
/// Texture coordinates put the top of an image at +Y.
pub fn generate_plane(width: f32, height: f32) -> GeometryData {
    let (x, y) = (width * 0.5, height * 0.5);
    let mut data = GeometryData::new();
    data.push_quad(
        [0.0, 0.0, 1.0],
        [[-x, -y, 0.0], [x, -y, 0.0], [x, y, 0.0], [-x, y, 0.0]],
    );
    data
}

/// Smooth per-vertex normals from triangle faces
///
/// Face normals are area weighted; vertices no triangle touches get +Y.
pub fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    use cgmath::{InnerSpace, Vector3};

    let mut sums = vec![Vector3::new(0.0f32, 0.0, 0.0); positions.len()];
    for triangle in indices.chunks_exact(3) {
        let [a, b, c] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        let v0 = Vector3::from(positions[a]);
        let face = (Vector3::from(positions[b]) - v0).cross(Vector3::from(positions[c]) - v0);
        sums[a] += face;
        sums[b] += face;
        sums[c] += face;
    }

    sums.into_iter()
        .map(|n| {
            if n.magnitude2() > f32::EPSILON {
                n.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}
