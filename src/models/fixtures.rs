//! Hand-built model files shared by loader and composition tests

use base64::Engine;

/// One triangle: three positions then three u16 indices, padded to 44 bytes
pub fn triangle_buffer() -> Vec<u8> {
    let mut data = Vec::new();
    for v in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0] {
        data.extend_from_slice(&v.to_le_bytes());
    }
    for i in [0u16, 1, 2] {
        data.extend_from_slice(&i.to_le_bytes());
    }
    data.extend_from_slice(&[0, 0]);
    data
}

pub fn triangle_json(buffer_uri: Option<&str>) -> String {
    let uri = buffer_uri
        .map(|u| format!(r#", "uri": "{u}""#))
        .unwrap_or_default();
    format!(
        r#"{{
            "asset": {{ "version": "2.0" }},
            "scene": 0,
            "scenes": [{{ "nodes": [0] }}],
            "nodes": [{{ "name": "root", "children": [1], "translation": [0, 1, 0] }},
                      {{ "name": "bust", "mesh": 0 }}],
            "meshes": [{{ "primitives": [{{ "attributes": {{ "POSITION": 0 }}, "indices": 1, "material": 0 }}] }}],
            "materials": [{{ "pbrMetallicRoughness": {{ "baseColorFactor": [1, 0, 0, 1], "metallicFactor": 0.5, "roughnessFactor": 0.25 }} }}],
            "buffers": [{{ "byteLength": 44{uri} }}],
            "bufferViews": [{{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
                            {{ "buffer": 0, "byteOffset": 36, "byteLength": 6 }}],
            "accessors": [{{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0, 0, 0], "max": [1, 1, 0] }},
                          {{ "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }}]
        }}"#
    )
}

/// Triangle glTF with its buffer embedded as a data URI
pub fn triangle_gltf() -> Vec<u8> {
    let encoded = base64::engine::general_purpose::STANDARD.encode(triangle_buffer());
    triangle_json(Some(&format!("data:application/octet-stream;base64,{encoded}"))).into_bytes()
}
