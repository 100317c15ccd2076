//! Binary FBX geometry
//!
//! Reads the node tree of binary FBX 7.x files (32-bit node headers before
//! version 7500, 64-bit from 7500 on) and turns every `Geometry` node's
//! `Vertices` and `PolygonVertexIndex` arrays into a triangle mesh.
//! Polygons are fan triangulated; a negative index closes a polygon.
//! ASCII FBX is rejected.

use std::{io::Read, sync::Arc};

use flate2::read::ZlibDecoder;

use super::{LoadedModel, ModelPart};
use crate::{
    error::{ModelError, ModelResult},
    gallery::material::ResolvedMaterial,
    gfx::{
        geometry::compute_normals,
        scene::{MeshData, Vertex3D},
    },
};

const MAGIC: &[u8] = b"Kaydara FBX Binary  \0";
const HEADER_LEN: usize = 27;
/// First version with 64-bit node record fields
const WIDE_HEADER_VERSION: u32 = 7500;
/// Deepest node nesting accepted; real exports stay far below this
const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq)]
enum Property {
    Integer(i64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Integers(Vec<i64>),
    Floats(Vec<f64>),
}

#[derive(Debug, Clone)]
struct FbxNode {
    name: String,
    properties: Vec<Property>,
    children: Vec<FbxNode>,
}

impl FbxNode {
    fn child(&self, name: &str) -> Option<&FbxNode> {
        self.children.iter().find(|c| c.name == name)
    }

    fn collect<'a>(&'a self, name: &str, out: &mut Vec<&'a FbxNode>) {
        if self.name == name {
            out.push(self);
        }
        for child in &self.children {
            child.collect(name, out);
        }
    }
}

/// Decodes every geometry in a binary FBX file
pub fn load(bytes: &[u8]) -> ModelResult<LoadedModel> {
    let nodes = parse(bytes)?;

    let mut geometries = Vec::new();
    for node in &nodes {
        node.collect("Geometry", &mut geometries);
    }

    let mut parts = Vec::new();
    for (i, geometry) in geometries.into_iter().enumerate() {
        if let Some(mesh) = geometry_mesh(geometry)? {
            parts.push(ModelPart {
                name: geometry_name(geometry).unwrap_or_else(|| format!("geometry-{i}")),
                mesh: Arc::new(mesh),
                material: ResolvedMaterial::MODEL_DEFAULT,
                texture: None,
            });
        }
    }

    if parts.is_empty() {
        return Err(ModelError::Empty);
    }
    Ok(LoadedModel { parts })
}

fn parse(bytes: &[u8]) -> ModelResult<Vec<FbxNode>> {
    if !bytes.starts_with(MAGIC) {
        let text = bytes.iter().take(64).all(|b| b.is_ascii());
        return Err(ModelError::Fbx(if text {
            "ASCII FBX is not supported".to_string()
        } else {
            "not an FBX file".to_string()
        }));
    }

    let mut reader = Reader {
        data: bytes,
        pos: MAGIC.len() + 2,
        wide: false,
    };
    let version = reader.u32()?;
    reader.wide = version >= WIDE_HEADER_VERSION;
    debug_assert_eq!(reader.pos, HEADER_LEN);
    log::debug!("FBX version {}", version);

    let mut nodes = Vec::new();
    while reader.pos < bytes.len() {
        match reader.node(0)? {
            Some(node) => nodes.push(node),
            None => break,
        }
    }
    Ok(nodes)
}

fn geometry_name(geometry: &FbxNode) -> Option<String> {
    geometry.properties.iter().find_map(|p| match p {
        Property::Text(s) => {
            let name = s.split('\0').next().unwrap_or_default();
            (!name.is_empty()).then(|| name.to_string())
        }
        _ => None,
    })
}

fn geometry_mesh(geometry: &FbxNode) -> ModelResult<Option<MeshData>> {
    let (Some(vertices), Some(polygons)) = (
        geometry.child("Vertices"),
        geometry.child("PolygonVertexIndex"),
    ) else {
        return Ok(None);
    };

    let positions: Vec<[f32; 3]> = match vertices.properties.first() {
        Some(Property::Floats(values)) => values
            .chunks_exact(3)
            .map(|v| [v[0] as f32, v[1] as f32, v[2] as f32])
            .collect(),
        _ => return Err(ModelError::Fbx("Vertices is not a float array".into())),
    };
    let polygon_indices = match polygons.properties.first() {
        Some(Property::Integers(values)) => values,
        _ => return Err(ModelError::Fbx("PolygonVertexIndex is not an integer array".into())),
    };

    let indices = triangulate(polygon_indices, positions.len())?;
    if indices.is_empty() {
        return Ok(None);
    }

    let normals = compute_normals(&positions, &indices);
    let vertices = positions
        .into_iter()
        .zip(normals)
        .map(|(position, normal)| Vertex3D {
            position,
            normal,
            tex_coords: [0.0, 0.0],
        })
        .collect();
    Ok(Some(MeshData::new(vertices, indices)))
}

/// Fan triangulation of FBX polygon index lists
fn triangulate(polygon_indices: &[i64], vertex_count: usize) -> ModelResult<Vec<u32>> {
    let mut indices = Vec::new();
    let mut polygon: Vec<u32> = Vec::new();

    let mut close = |polygon: &mut Vec<u32>| {
        for k in 1..polygon.len().saturating_sub(1) {
            indices.extend_from_slice(&[polygon[0], polygon[k], polygon[k + 1]]);
        }
        polygon.clear();
    };

    for &raw in polygon_indices {
        let (index, last) = if raw < 0 { (!raw, true) } else { (raw, false) };
        if index as usize >= vertex_count {
            return Err(ModelError::Fbx(format!("vertex index {index} out of range")));
        }
        polygon.push(index as u32);
        if last {
            close(&mut polygon);
        }
    }
    close(&mut polygon);

    Ok(indices)
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
    wide: bool,
}

impl<'a> Reader<'a> {
    fn bytes(&mut self, len: usize) -> ModelResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| ModelError::Fbx(format!("unexpected end of file at {}", self.pos)))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn array<const N: usize>(&mut self) -> ModelResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.bytes(N)?);
        Ok(out)
    }

    fn u8(&mut self) -> ModelResult<u8> {
        Ok(self.array::<1>()?[0])
    }

    fn u32(&mut self) -> ModelResult<u32> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    /// Node header field, 32 or 64 bits wide depending on the version
    fn offset(&mut self) -> ModelResult<u64> {
        if self.wide {
            Ok(u64::from_le_bytes(self.array()?))
        } else {
            Ok(u64::from(self.u32()?))
        }
    }

    fn node(&mut self, depth: usize) -> ModelResult<Option<FbxNode>> {
        if depth > MAX_DEPTH {
            return Err(ModelError::Fbx("nesting too deep".to_string()));
        }
        let end = self.offset()? as usize;
        let property_count = self.offset()?;
        let _property_len = self.offset()?;
        let name_len = self.u8()? as usize;
        if end == 0 {
            return Ok(None);
        }
        if end > self.data.len() || end < self.pos {
            return Err(ModelError::Fbx(format!("bad node end offset {end}")));
        }

        let name = String::from_utf8_lossy(self.bytes(name_len)?).into_owned();
        let mut properties = Vec::new();
        for _ in 0..property_count {
            properties.push(self.property()?);
        }

        let mut children = Vec::new();
        while self.pos < end {
            match self.node(depth + 1)? {
                Some(child) => children.push(child),
                None => break,
            }
        }
        self.pos = end;

        Ok(Some(FbxNode {
            name,
            properties,
            children,
        }))
    }

    fn property(&mut self) -> ModelResult<Property> {
        let code = self.u8()?;
        let property = match code {
            b'Y' => Property::Integer(i16::from_le_bytes(self.array()?).into()),
            b'C' => Property::Integer(self.u8()?.into()),
            b'I' => Property::Integer(i32::from_le_bytes(self.array()?).into()),
            b'L' => Property::Integer(i64::from_le_bytes(self.array()?)),
            b'F' => Property::Float(f32::from_le_bytes(self.array()?).into()),
            b'D' => Property::Float(f64::from_le_bytes(self.array()?)),
            b'S' => {
                let len = self.u32()? as usize;
                Property::Text(String::from_utf8_lossy(self.bytes(len)?).into_owned())
            }
            b'R' => {
                let len = self.u32()? as usize;
                Property::Bytes(self.bytes(len)?.to_vec())
            }
            b'f' => Property::Floats(
                self.array_data(4)?
                    .chunks_exact(4)
                    .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]).into())
                    .collect(),
            ),
            b'd' => Property::Floats(
                self.array_data(8)?
                    .chunks_exact(8)
                    .map(|c| f64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                    .collect(),
            ),
            b'i' => Property::Integers(
                self.array_data(4)?
                    .chunks_exact(4)
                    .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]).into())
                    .collect(),
            ),
            b'l' => Property::Integers(
                self.array_data(8)?
                    .chunks_exact(8)
                    .map(|c| i64::from_le_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                    .collect(),
            ),
            b'b' => Property::Integers(self.array_data(1)?.iter().map(|&b| b.into()).collect()),
            other => {
                return Err(ModelError::Fbx(format!(
                    "unknown property type {:?} at {}",
                    other as char,
                    self.pos - 1
                )))
            }
        };
        Ok(property)
    }

    /// Raw element bytes of an array property, inflated when compressed
    fn array_data(&mut self, element_size: usize) -> ModelResult<Vec<u8>> {
        let count = self.u32()? as usize;
        let encoding = self.u32()?;
        let stored_len = self.u32()? as usize;
        let stored = self.bytes(stored_len)?;
        let expected = count
            .checked_mul(element_size)
            .ok_or_else(|| ModelError::Fbx("array too large".into()))?;

        let data = match encoding {
            0 => stored.to_vec(),
            1 => {
                let mut out = Vec::new();
                ZlibDecoder::new(stored)
                    .take(expected as u64)
                    .read_to_end(&mut out)
                    .map_err(|e| ModelError::Fbx(format!("bad compressed array: {e}")))?;
                out
            }
            other => return Err(ModelError::Fbx(format!("unknown array encoding {other}"))),
        };
        if data.len() != expected {
            return Err(ModelError::Fbx(format!(
                "array holds {} bytes, expected {}",
                data.len(),
                expected
            )));
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::{write::ZlibEncoder, Compression};
    use std::io::Write;

    struct TestNode {
        name: &'static str,
        properties: Vec<Vec<u8>>,
        children: Vec<TestNode>,
    }

    fn leaf(name: &'static str, properties: Vec<Vec<u8>>) -> TestNode {
        TestNode {
            name,
            properties,
            children: Vec::new(),
        }
    }

    fn text(value: &str) -> Vec<u8> {
        let mut out = vec![b'S'];
        out.extend_from_slice(&(value.len() as u32).to_le_bytes());
        out.extend_from_slice(value.as_bytes());
        out
    }

    fn array(code: u8, count: usize, raw: Vec<u8>, compress: bool) -> Vec<u8> {
        let stored = if compress {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(&raw).unwrap();
            encoder.finish().unwrap()
        } else {
            raw
        };
        let mut out = vec![code];
        out.extend_from_slice(&(count as u32).to_le_bytes());
        out.extend_from_slice(&(compress as u32).to_le_bytes());
        out.extend_from_slice(&(stored.len() as u32).to_le_bytes());
        out.extend_from_slice(&stored);
        out
    }

    fn doubles(values: &[f64], compress: bool) -> Vec<u8> {
        let raw = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        array(b'd', values.len(), raw, compress)
    }

    fn ints(values: &[i32], compress: bool) -> Vec<u8> {
        let raw = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        array(b'i', values.len(), raw, compress)
    }

    fn write_field(out: &mut Vec<u8>, at: usize, value: u64, wide: bool) {
        if wide {
            out[at..at + 8].copy_from_slice(&value.to_le_bytes());
        } else {
            out[at..at + 4].copy_from_slice(&(value as u32).to_le_bytes());
        }
    }

    fn write_node(out: &mut Vec<u8>, node: &TestNode, wide: bool) {
        let field = if wide { 8 } else { 4 };
        let start = out.len();
        out.resize(start + field * 3, 0);
        out.push(node.name.len() as u8);
        out.extend_from_slice(node.name.as_bytes());
        let props_start = out.len();
        for p in &node.properties {
            out.extend_from_slice(p);
        }
        let props_len = out.len() - props_start;
        for child in &node.children {
            write_node(out, child, wide);
        }
        if !node.children.is_empty() {
            out.resize(out.len() + field * 3 + 1, 0);
        }
        let end = out.len() as u64;
        write_field(out, start, end, wide);
        write_field(out, start + field, node.properties.len() as u64, wide);
        write_field(out, start + field * 2, props_len as u64, wide);
    }

    fn fbx_file(version: u32, nodes: &[TestNode]) -> Vec<u8> {
        let wide = version >= WIDE_HEADER_VERSION;
        let mut out = MAGIC.to_vec();
        out.extend_from_slice(&[0x1a, 0x00]);
        out.extend_from_slice(&version.to_le_bytes());
        for node in nodes {
            write_node(&mut out, node, wide);
        }
        out.resize(out.len() + if wide { 25 } else { 13 }, 0);
        out
    }

    /// Unit quad in the XY plane as one four-sided polygon
    fn quad_file(version: u32, compress: bool) -> Vec<u8> {
        let geometry = TestNode {
            name: "Geometry",
            properties: vec![text("Plinth\0\u{1}Geometry"), text("Mesh")],
            children: vec![
                leaf(
                    "Vertices",
                    vec![doubles(
                        &[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0],
                        compress,
                    )],
                ),
                leaf("PolygonVertexIndex", vec![ints(&[0, 1, 2, -4], compress)]),
            ],
        };
        let objects = TestNode {
            name: "Objects",
            properties: Vec::new(),
            children: vec![geometry],
        };
        fbx_file(version, &[leaf("FBXHeaderExtension", Vec::new()), objects])
    }

    fn assert_quad(model: &LoadedModel) {
        assert_eq!(model.parts.len(), 1);
        let part = &model.parts[0];
        assert_eq!(part.name, "Plinth");
        assert_eq!(part.mesh.indices(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(part.mesh.vertices().len(), 4);
        assert_eq!(part.mesh.vertices()[2].position, [1.0, 1.0, 0.0]);
        assert!((part.mesh.vertices()[0].normal[2] - 1.0).abs() < 1e-5);
        assert_eq!(part.material, ResolvedMaterial::MODEL_DEFAULT);
    }

    #[test]
    fn narrow_headers_decode_with_polygon_fan() {
        assert_quad(&load(&quad_file(7400, false)).unwrap());
    }

    #[test]
    fn wide_headers_and_compressed_arrays_decode() {
        assert_quad(&load(&quad_file(7500, true)).unwrap());
    }

    #[test]
    fn pentagon_fans_into_three_triangles() {
        let indices = triangulate(&[0, 1, 2, 3, -5, 0, 1, -3], 5).unwrap();
        assert_eq!(indices, vec![0, 1, 2, 0, 2, 3, 0, 3, 4, 0, 1, 2]);
        assert!(triangulate(&[0, 1, -10], 3).is_err());
    }

    #[test]
    fn ascii_fbx_is_rejected() {
        let ascii = b"; FBX 7.4.0 project file\nFBXHeaderExtension:  {\n}";
        assert!(matches!(
            load(ascii),
            Err(ModelError::Fbx(message)) if message.contains("ASCII")
        ));
    }

    #[test]
    fn file_without_geometry_is_empty() {
        let file = fbx_file(7400, &[leaf("FBXHeaderExtension", Vec::new())]);
        assert!(matches!(load(&file), Err(ModelError::Empty)));
    }

    #[test]
    fn truncated_file_is_an_error() {
        let mut file = quad_file(7400, false);
        file.truncate(file.len() / 2);
        assert!(matches!(load(&file), Err(ModelError::Fbx(_))));
    }

    #[test]
    fn runaway_nesting_is_an_error() {
        let mut node = leaf("Leaf", Vec::new());
        for _ in 0..200 {
            node = TestNode {
                name: "Wrap",
                properties: Vec::new(),
                children: vec![node],
            };
        }
        let file = fbx_file(7400, &[node]);
        assert!(matches!(
            load(&file),
            Err(ModelError::Fbx(message)) if message.contains("too deep")
        ));
    }
}
