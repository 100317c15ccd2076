//! Default artwork placement
//!
//! Sculptures stand in a row across the middle of the room, paintings hang
//! in a row along the back wall. Each artwork's slot is its ordinal among
//! artworks of the same kind, counted in list order, so the result depends
//! only on the list and never on load or insertion order.

use crate::gallery::{Artwork, ArtworkKind, Transform3D, Vec3Record};

pub const SCULPTURE_SPACING: f32 = 3.0;
pub const PAINTING_SPACING: f32 = 4.0;

const SCULPTURE_ROW: Vec3Record = Vec3Record::new(-3.0, 0.0, 2.0);
const PAINTING_ROW: Vec3Record = Vec3Record::new(-8.0, 2.0, -7.0);

/// Zero-based position of `artworks[index]` among artworks of its kind
pub fn kind_ordinal(artworks: &[Artwork], index: usize) -> Option<usize> {
    let kind = artworks.get(index)?.kind;
    Some(
        artworks[..index]
            .iter()
            .filter(|a| a.kind == kind)
            .count(),
    )
}

/// Computed position of `artworks[index]`, ignoring any stored one
pub fn default_position(artworks: &[Artwork], index: usize) -> Option<Vec3Record> {
    let ordinal = kind_ordinal(artworks, index)? as f32;
    let position = match artworks[index].kind {
        ArtworkKind::Sculpture => Vec3Record::new(
            SCULPTURE_ROW.x + ordinal * SCULPTURE_SPACING,
            SCULPTURE_ROW.y,
            SCULPTURE_ROW.z,
        ),
        ArtworkKind::Painting => Vec3Record::new(
            PAINTING_ROW.x + ordinal * PAINTING_SPACING,
            PAINTING_ROW.y,
            PAINTING_ROW.z,
        ),
    };
    Some(position)
}

/// Root transform of `artworks[index]`
///
/// A stored position is used verbatim; only a missing one is computed.
pub fn placement(artworks: &[Artwork], index: usize) -> Option<Transform3D> {
    let artwork = artworks.get(index)?;
    let position = match artwork.position {
        Some(position) => position,
        None => default_position(artworks, index)?,
    };
    Some(Transform3D {
        position,
        rotation: artwork.stored_rotation(),
        scale: artwork.stored_scale(),
    })
}
