//! JSON record files
//!
//! The viewer reads artworks, environments and styles from JSON documents
//! in the resource API's shape. [`ArtworkFile`] also persists committed
//! transforms back into the artwork document, editing the JSON tree in
//! place so fields this crate does not model survive untouched.

use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

use crate::{
    error::StoreError,
    gallery::{Artwork, EnvironmentCatalog, Transform3D},
};

fn read(path: &Path) -> Result<String, StoreError> {
    std::fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn json_error(path: &Path, source: serde_json::Error) -> StoreError {
    StoreError::Json {
        path: path.display().to_string(),
        source,
    }
}

/// Parses a JSON document of any record type
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    serde_json::from_str(&read(path)?).map_err(|e| json_error(path, e))
}

/// Environments file holding a single environment or a list
pub fn load_environments(path: &Path) -> Result<EnvironmentCatalog, StoreError> {
    EnvironmentCatalog::from_json(&read(path)?).map_err(|e| json_error(path, e))
}

/// The artwork list document
#[derive(Debug, Clone)]
pub struct ArtworkFile {
    path: PathBuf,
}

impl ArtworkFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<Artwork>, StoreError> {
        load_json(&self.path)
    }

    /// Writes a committed transform into the artwork's record
    ///
    /// Returns false, leaving the file untouched, when no record has `id`.
    pub fn write_transform(&self, id: &str, transform: &Transform3D) -> Result<bool, StoreError> {
        let mut document: serde_json::Value =
            serde_json::from_str(&read(&self.path)?).map_err(|e| json_error(&self.path, e))?;
        let records = document
            .as_array_mut()
            .ok_or_else(|| StoreError::NotAList {
                path: self.path.display().to_string(),
            })?;

        let Some(record) = records
            .iter_mut()
            .filter_map(|r| r.as_object_mut())
            .find(|r| r.get("id").and_then(|v| v.as_str()) == Some(id))
        else {
            return Ok(false);
        };

        for (key, value) in [
            ("position", transform.position),
            ("rotation", transform.rotation),
            ("scale", transform.scale),
        ] {
            let value = serde_json::to_value(value).map_err(|e| json_error(&self.path, e))?;
            record.insert(key.to_string(), value);
        }

        let text =
            serde_json::to_string_pretty(&document).map_err(|e| json_error(&self.path, e))?;
        std::fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        })?;
        log::info!("Saved transform of {} to {}", id, self.path.display());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gallery::{ArtworkKind, FrameStyle, Vec3Record};
    use std::io::Write;

    const ARTWORKS: &str = r#"[
        {"id": "s1", "title": "Bust", "type": "sculpture", "createdAt": "2024-03-01T10:00:00Z"},
        {"id": "p1", "title": "Dunes", "type": "painting", "imageUrl": "/img/dunes.jpg",
         "position": {"x": 1, "y": 2, "z": -7}}
    ]"#;

    fn file_with(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_artwork_list() {
        let file = file_with(ARTWORKS);
        let artworks = ArtworkFile::new(file.path()).load().unwrap();
        assert_eq!(artworks.len(), 2);
        assert_eq!(artworks[0].kind, ArtworkKind::Sculpture);
        assert_eq!(artworks[1].position, Some(Vec3Record::new(1.0, 2.0, -7.0)));
    }

    #[test]
    fn write_back_updates_one_record_and_keeps_unknown_fields() {
        let file = file_with(ARTWORKS);
        let store = ArtworkFile::new(file.path());
        let transform = Transform3D {
            position: Vec3Record::new(1.0, 2.0, 3.0),
            rotation: Vec3Record::new(0.0, 0.5, 0.0),
            scale: Vec3Record::ONE,
        };

        assert!(store.write_transform("s1", &transform).unwrap());

        let artworks = store.load().unwrap();
        assert_eq!(artworks[0].position, Some(transform.position));
        assert_eq!(artworks[0].rotation, Some(transform.rotation));
        assert_eq!(artworks[0].scale, Some(Vec3Record::ONE));
        assert_eq!(
            artworks[0].extra.get("createdAt").and_then(|v| v.as_str()),
            Some("2024-03-01T10:00:00Z")
        );
        assert_eq!(artworks[1].position, Some(Vec3Record::new(1.0, 2.0, -7.0)));
        assert_eq!(artworks[1].rotation, None);
    }

    #[test]
    fn write_back_to_unknown_id_changes_nothing() {
        let file = file_with(ARTWORKS);
        let store = ArtworkFile::new(file.path());
        assert!(!store.write_transform("zzz", &Transform3D::default()).unwrap());
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), ARTWORKS);
    }

    #[test]
    fn reports_bad_documents() {
        let not_json = file_with("{ nope");
        assert!(matches!(
            ArtworkFile::new(not_json.path()).load(),
            Err(StoreError::Json { .. })
        ));

        let object = file_with(r#"{"id": "s1"}"#);
        assert!(matches!(
            ArtworkFile::new(object.path()).write_transform("s1", &Transform3D::default()),
            Err(StoreError::NotAList { .. })
        ));

        assert!(matches!(
            load_json::<Vec<FrameStyle>>(Path::new("/definitely/not/here.json")),
            Err(StoreError::Io { .. })
        ));
    }
}
