//! Per-artwork display geometry
//!
//! Paintings are a frame box with an image plane on its front face.
//! Sculptures are a pedestal with a model slot above it; the slot's
//! children are swapped between placeholders and the loaded model.

use std::sync::Arc;

use crate::{
    gallery::{
        material::{parse_color, ResolvedMaterial, Rgb, WHITE},
        styles::{FrameLook, PedestalLook},
        MaterialProperties,
    },
    gfx::{
        geometry::{generate_box, generate_plane},
        scene::{MeshData, NodeId, NodeKind, NodeTransform, Scene, SceneMaterial, SceneNode, TextureImage},
    },
    models::LoadedModel,
};

/// Height of the model slot above the artwork root
pub const MODEL_SLOT_HEIGHT: f32 = 1.5;
/// Gap between the frame's front face and the image plane
const CANVAS_OFFSET: f32 = 0.001;
const MIN_CANVAS_SIZE: f32 = 0.01;

/// What a model slot shows instead of a model
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placeholder {
    /// Fetch or decode in flight
    Loading,
    /// Fetch or decode failed
    Failed,
    /// Format that is never loaded, or no model at all
    Neutral(ResolvedMaterial),
}

impl Placeholder {
    pub fn material(&self) -> ResolvedMaterial {
        match self {
            Placeholder::Loading => ResolvedMaterial::matte(hex("#cccccc")).translucent(0.5),
            Placeholder::Failed => ResolvedMaterial::matte(hex("#ff6b6b")).translucent(0.7),
            Placeholder::Neutral(material) => *material,
        }
    }
}

fn hex(value: &str) -> Rgb {
    parse_color(value).unwrap_or(WHITE)
}

/// Material for a sculpture's model meshes
///
/// An editor override wins over the stored record. `None` means the
/// model keeps the materials its file defines.
pub fn model_material(
    editor_override: Option<&MaterialProperties>,
    stored: Option<&MaterialProperties>,
) -> Option<ResolvedMaterial> {
    editor_override
        .or(stored)
        .map(|properties| properties.resolve_over(&ResolvedMaterial::MODEL_DEFAULT))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaintingNodes {
    pub frame: NodeId,
    pub canvas: NodeId,
}

/// Frame box plus a blank canvas waiting for its image
pub fn build_painting(scene: &mut Scene, root: NodeId, look: &FrameLook) -> PaintingNodes {
    let dims = look.dimensions;
    let frame_mesh = Arc::new(generate_box(dims.width, dims.height, dims.depth).into_mesh());
    let frame = scene.add(
        Some(root),
        SceneNode::mesh("frame", frame_mesh, SceneMaterial::new(look.material)),
    );

    let inner_w = (dims.width - 2.0 * dims.border_width).max(MIN_CANVAS_SIZE);
    let inner_h = (dims.height - 2.0 * dims.border_width).max(MIN_CANVAS_SIZE);
    let canvas_mesh = Arc::new(generate_plane(inner_w, inner_h).into_mesh());
    let canvas = scene.add(
        Some(root),
        SceneNode::mesh(
            "canvas",
            canvas_mesh,
            SceneMaterial::new(ResolvedMaterial::matte(WHITE)),
        )
        .with_transform(NodeTransform::at(0.0, 0.0, dims.depth / 2.0 + CANVAS_OFFSET)),
    );

    PaintingNodes { frame, canvas }
}

/// Puts the decoded image on the canvas; false when the canvas is gone
pub fn set_canvas_image(scene: &mut Scene, canvas: NodeId, image: Arc<TextureImage>) -> bool {
    match scene.get_mut(canvas).map(|n| &mut n.kind) {
        Some(NodeKind::Mesh(mesh)) => {
            mesh.material.texture = Some(image);
            true
        }
        _ => false,
    }
}

/// Pedestal box resting on the root's floor level
pub fn build_pedestal(scene: &mut Scene, root: NodeId, look: &PedestalLook) -> NodeId {
    let dims = look.dimensions;
    let mesh = Arc::new(generate_box(dims.width, dims.height, dims.depth).into_mesh());
    scene.add(
        Some(root),
        SceneNode::mesh("pedestal", mesh, SceneMaterial::new(look.material))
            .with_transform(NodeTransform::at(0.0, dims.height / 2.0, 0.0)),
    )
}

/// Empty group the model or its placeholder hangs from
pub fn build_model_slot(scene: &mut Scene, root: NodeId) -> NodeId {
    scene.add_group(
        Some(root),
        "model-slot",
        NodeTransform::at(0.0, MODEL_SLOT_HEIGHT, 0.0),
    )
}

/// Replaces the slot's contents with a unit placeholder box
pub fn show_placeholder(scene: &mut Scene, slot: NodeId, placeholder: Placeholder) {
    scene.clear_children(slot);
    let name = match placeholder {
        Placeholder::Loading => "placeholder-loading",
        Placeholder::Failed => "placeholder-error",
        Placeholder::Neutral(_) => "placeholder",
    };
    scene.add(
        Some(slot),
        SceneNode::mesh(
            name,
            unit_box(),
            SceneMaterial::new(placeholder.material()),
        ),
    );
}

/// Replaces the slot's contents with the model's parts
///
/// `material` replaces every part's own material, textures included.
pub fn show_model(
    scene: &mut Scene,
    slot: NodeId,
    model: &LoadedModel,
    material: Option<ResolvedMaterial>,
) {
    scene.clear_children(slot);
    for part in &model.parts {
        let scene_material = match (material, &part.texture) {
            (Some(params), _) => SceneMaterial::new(params),
            (None, Some(texture)) => SceneMaterial::textured(part.material, Arc::clone(texture)),
            (None, None) => SceneMaterial::new(part.material),
        };
        scene.add(
            Some(slot),
            SceneNode::mesh(part.name.clone(), Arc::clone(&part.mesh), scene_material),
        );
    }
}

fn unit_box() -> Arc<MeshData> {
    Arc::new(generate_box(1.0, 1.0, 1.0).into_mesh())
}
