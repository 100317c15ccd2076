//! Scene nodes: transforms, materials and lights

use std::sync::Arc;

use cgmath::{Matrix4, Rad, Vector3};

use super::mesh::MeshData;
use crate::gallery::{
    artwork::{Transform3D, Vec3Record},
    lighting::LightKind,
    material::{ResolvedMaterial, Rgb},
};

/// Handle to a node in a [`Scene`](super::Scene)
///
/// Slots are never reused, so a stale id simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

/// Local transform: translation, Euler rotation (radians, XYZ order), scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl NodeTransform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            ..Default::default()
        }
    }

    /// Builder pattern: Euler rotation
    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vector3::new(x, y, z);
        self
    }

    /// T * Rx * Ry * Rz * S
    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_record(&self) -> Transform3D {
        Transform3D {
            position: self.position.into(),
            rotation: self.rotation.into(),
            scale: self.scale.into(),
        }
    }

    pub fn from_record(record: &Transform3D) -> Self {
        Self {
            position: record.position.into(),
            rotation: record.rotation.into(),
            scale: record.scale.into(),
        }
    }
}

impl From<Vec3Record> for NodeTransform {
    fn from(position: Vec3Record) -> Self {
        Self {
            position: position.into(),
            ..Default::default()
        }
    }
}

/// RGBA8 image decoded on a worker and shared with the renderer
#[derive(Debug, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Material attached to a mesh node
#[derive(Debug, Clone, PartialEq)]
pub struct SceneMaterial {
    pub params: ResolvedMaterial,
    /// Base colour texture multiplied with `params.color`
    pub texture: Option<Arc<TextureImage>>,
}

impl SceneMaterial {
    pub fn new(params: ResolvedMaterial) -> Self {
        Self {
            params,
            texture: None,
        }
    }

    pub fn textured(params: ResolvedMaterial, texture: Arc<TextureImage>) -> Self {
        Self {
            params,
            texture: Some(texture),
        }
    }
}

/// Which pass draws a mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderLayer {
    #[default]
    World,
    /// Drawn after the world without depth testing (gizmo handles)
    Overlay,
}

#[derive(Debug, Clone)]
pub struct MeshNode {
    pub mesh: Arc<MeshData>,
    pub material: SceneMaterial,
    pub layer: RenderLayer,
}

/// Light sources; position and orientation come from the owning node
///
/// Directional and spot lights aim at the world origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Light {
    Ambient {
        color: Rgb,
        intensity: f32,
    },
    Directional {
        color: Rgb,
        intensity: f32,
        cast_shadow: bool,
        shadow_map_size: Option<u32>,
    },
    Point {
        color: Rgb,
        intensity: f32,
        /// 0 means unlimited range
        distance: f32,
        cast_shadow: bool,
    },
    Spot {
        color: Rgb,
        intensity: f32,
        distance: f32,
        /// Cone half-angle in radians
        angle: f32,
        /// Fraction of the cone that fades, 0..=1
        penumbra: f32,
        cast_shadow: bool,
        shadow_map_size: Option<u32>,
    },
}

impl Light {
    pub fn kind(&self) -> LightKind {
        match self {
            Self::Ambient { .. } => LightKind::Ambient,
            Self::Directional { .. } => LightKind::Directional,
            Self::Point { .. } => LightKind::Point,
            Self::Spot { .. } => LightKind::Spot,
        }
    }

    pub fn color(&self) -> Rgb {
        match *self {
            Self::Ambient { color, .. }
            | Self::Directional { color, .. }
            | Self::Point { color, .. }
            | Self::Spot { color, .. } => color,
        }
    }

    pub fn intensity(&self) -> f32 {
        match *self {
            Self::Ambient { intensity, .. }
            | Self::Directional { intensity, .. }
            | Self::Point { intensity, .. }
            | Self::Spot { intensity, .. } => intensity,
        }
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Mesh(MeshNode),
    Light(Light),
}

#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: NodeTransform,
    pub kind: NodeKind,
    pub visible: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            transform: NodeTransform::default(),
            kind,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Group)
    }

    pub fn mesh(name: impl Into<String>, mesh: Arc<MeshData>, material: SceneMaterial) -> Self {
        Self::new(
            name,
            NodeKind::Mesh(MeshNode {
                mesh,
                material,
                layer: RenderLayer::World,
            }),
        )
    }

    pub fn light(name: impl Into<String>, light: Light) -> Self {
        Self::new(name, NodeKind::Light(light))
    }

    /// Builder pattern: local transform
    pub fn with_transform(mut self, transform: NodeTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder pattern: draw in the overlay pass
    pub fn on_overlay(mut self) -> Self {
        if let NodeKind::Mesh(mesh) = &mut self.kind {
            mesh.layer = RenderLayer::Overlay;
        }
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn as_mesh(&self) -> Option<&MeshNode> {
        match &self.kind {
            NodeKind::Mesh(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn as_light(&self) -> Option<&Light> {
        match &self.kind {
            NodeKind::Light(light) => Some(light),
            _ => None,
        }
    }
}
