//! glTF 2.0 and GLB decoding
//!
//! Flattens the default scene (or the first one) into triangle parts in
//! model space. Buffers and images may live in the GLB binary chunk, in
//! base64 data URIs, or next to the model file; the latter are fetched
//! through the same [`AssetSource`] as the model itself.

use std::{collections::HashMap, sync::Arc};

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4};
use gltf::{buffer, Document};

use super::{
    decode_image,
    source::{decode_data_uri, resolve_relative, AssetSource},
    LoadedModel, ModelPart,
};
use crate::{
    error::{ModelError, ModelResult},
    gallery::material::{ResolvedMaterial, Rgb},
    gfx::{
        geometry::compute_normals,
        scene::{MeshData, TextureImage, Vertex3D},
    },
};

/// Decodes a `.gltf` or `.glb` file fetched from `url`
pub fn load(source: &dyn AssetSource, url: &str, bytes: &[u8]) -> ModelResult<LoadedModel> {
    let gltf::Gltf { document, mut blob } = gltf::Gltf::from_slice(bytes)?;
    let buffers = load_buffers(&document, &mut blob, source, url)?;

    let mut decoder = Decoder {
        source,
        url,
        buffers: &buffers,
        textures: HashMap::new(),
        parts: Vec::new(),
        path: Vec::new(),
    };

    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or(ModelError::Empty)?;
    for node in scene.nodes() {
        decoder.visit(&node, Matrix4::identity())?;
    }

    if decoder.parts.is_empty() {
        return Err(ModelError::Empty);
    }
    log::debug!("Decoded {} glTF parts from {}", decoder.parts.len(), url);
    Ok(LoadedModel {
        parts: decoder.parts,
    })
}

fn load_buffers(
    document: &Document,
    blob: &mut Option<Vec<u8>>,
    source: &dyn AssetSource,
    url: &str,
) -> ModelResult<Vec<Vec<u8>>> {
    let mut buffers = Vec::new();
    for buffer in document.buffers() {
        let data = match buffer.source() {
            buffer::Source::Bin => blob.take().ok_or(ModelError::MissingBuffer(buffer.index()))?,
            buffer::Source::Uri(uri) => fetch_uri(source, url, uri)?,
        };
        if data.len() < buffer.length() {
            return Err(ModelError::MissingBuffer(buffer.index()));
        }
        buffers.push(data);
    }
    Ok(buffers)
}

fn fetch_uri(source: &dyn AssetSource, url: &str, uri: &str) -> ModelResult<Vec<u8>> {
    if uri.starts_with("data:") {
        return Ok(decode_data_uri(uri)?);
    }
    Ok(source.fetch(&resolve_relative(url, uri))?)
}

struct Decoder<'a> {
    source: &'a dyn AssetSource,
    url: &'a str,
    buffers: &'a [Vec<u8>],
    /// Decoded images by glTF image index, `None` when decoding failed
    textures: HashMap<usize, Option<Arc<TextureImage>>>,
    parts: Vec<ModelPart>,
    /// Node indices from the scene root down to the node being visited
    path: Vec<usize>,
}

/// Deepest node hierarchy accepted
const MAX_DEPTH: usize = 128;

impl Decoder<'_> {
    fn visit(&mut self, node: &gltf::Node, parent: Matrix4<f32>) -> ModelResult<()> {
        if self.path.len() >= MAX_DEPTH || self.path.contains(&node.index()) {
            return Err(ModelError::NodeHierarchy(node.index()));
        }
        let world = parent * Matrix4::from(node.transform().matrix());

        if let Some(mesh) = node.mesh() {
            let name = node
                .name()
                .or_else(|| mesh.name())
                .map(str::to_string)
                .unwrap_or_else(|| format!("mesh-{}", mesh.index()));
            for primitive in mesh.primitives() {
                self.add_primitive(&name, &primitive, world);
            }
        }

        self.path.push(node.index());
        for child in node.children() {
            self.visit(&child, world)?;
        }
        self.path.pop();
        Ok(())
    }

    fn add_primitive(&mut self, name: &str, primitive: &gltf::Primitive, world: Matrix4<f32>) {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            log::debug!("Skipping {:?} primitive in {}", primitive.mode(), name);
            return;
        }

        let buffers = self.buffers;
        let reader = primitive.reader(|b| buffers.get(b.index()).map(Vec::as_slice));
        let Some(positions) = reader.read_positions() else {
            return;
        };
        let positions: Vec<[f32; 3]> = positions.collect();
        let indices: Vec<u32> = match reader.read_indices() {
            Some(indices) => indices.into_u32().collect(),
            None => (0..positions.len() as u32).collect(),
        };
        if indices.len() < 3 || indices.iter().any(|&i| i as usize >= positions.len()) {
            log::debug!("Skipping malformed primitive in {}", name);
            return;
        }

        let normals: Vec<[f32; 3]> = match reader.read_normals() {
            Some(normals) => normals.collect(),
            None => compute_normals(&positions, &indices),
        };
        let tex_coords: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|uv| uv.into_f32().collect())
            .unwrap_or_default();

        let normal_matrix = normal_matrix(&world);
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let p = world * Vector4::new(p[0], p[1], p[2], 1.0);
                let n = normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]);
                let n = normal_matrix * Vector3::new(n[0], n[1], n[2]);
                let n = if n.x == 0.0 && n.y == 0.0 && n.z == 0.0 {
                    Vector3::unit_y()
                } else {
                    n.normalize()
                };
                Vertex3D {
                    position: [p.x, p.y, p.z],
                    normal: n.into(),
                    tex_coords: tex_coords.get(i).copied().unwrap_or([0.0, 0.0]),
                }
            })
            .collect();

        let (material, texture) = self.material(&primitive.material());
        self.parts.push(ModelPart {
            name: name.to_string(),
            mesh: Arc::new(MeshData::new(vertices, indices)),
            material,
            texture,
        });
    }

    fn material(
        &mut self,
        material: &gltf::Material,
    ) -> (ResolvedMaterial, Option<Arc<TextureImage>>) {
        let pbr = material.pbr_metallic_roughness();
        let [r, g, b, a] = pbr.base_color_factor();
        let mut resolved = ResolvedMaterial::solid(
            linear_to_display([r, g, b]),
            pbr.metallic_factor(),
            pbr.roughness_factor(),
        );
        if material.alpha_mode() == gltf::material::AlphaMode::Blend {
            resolved = resolved.translucent(a);
        }
        let [er, eg, eb] = material.emissive_factor();
        if er > 0.0 || eg > 0.0 || eb > 0.0 {
            resolved = resolved.glowing(linear_to_display([er, eg, eb]), 1.0);
        }

        let texture = pbr
            .base_color_texture()
            .and_then(|info| self.texture(&info.texture().source()));
        (resolved, texture)
    }

    fn texture(&mut self, image: &gltf::Image) -> Option<Arc<TextureImage>> {
        if let Some(cached) = self.textures.get(&image.index()) {
            return cached.clone();
        }

        let bytes = match image.source() {
            gltf::image::Source::View { view, .. } => self
                .buffers
                .get(view.buffer().index())
                .and_then(|data| data.get(view.offset()..view.offset() + view.length()))
                .map(<[u8]>::to_vec)
                .ok_or(ModelError::MissingBuffer(view.buffer().index())),
            gltf::image::Source::Uri { uri, .. } => fetch_uri(self.source, self.url, uri),
        };
        let decoded = bytes.and_then(|b| decode_image(&b));
        let texture = match decoded {
            Ok(texture) => Some(Arc::new(texture)),
            Err(e) => {
                log::warn!("Texture {} of {} not loaded: {}", image.index(), self.url, e);
                None
            }
        };
        self.textures.insert(image.index(), texture.clone());
        texture
    }
}

/// Inverse transpose of the upper 3x3, the matrix itself when singular
fn normal_matrix(world: &Matrix4<f32>) -> Matrix3<f32> {
    let m = Matrix3::from_cols(world.x.truncate(), world.y.truncate(), world.z.truncate());
    m.invert().map(|inv| inv.transpose()).unwrap_or(m)
}

/// glTF factors are linear, gallery colours are display values
fn linear_to_display(c: Rgb) -> Rgb {
    c.map(|v| v.clamp(0.0, 1.0).powf(1.0 / 2.2))
}
