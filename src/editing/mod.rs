//! # Transform Editing
//!
//! Gizmo-driven editing of artwork placement. The [`TransformEditor`]
//! mutates the live scene node while a handle is dragged and reports the
//! node's final transform once, on release, as a [`GalleryEvent`]. It does
//! no I/O; whoever receives the event persists it.

pub mod editor;

use serde::Deserialize;

use crate::gallery::{ArtworkId, Offer, Transform3D};

pub use editor::{EditPhase, TransformEditor};

/// Which manipulation the gizmo handles perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

impl TransformMode {
    pub const ALL: [TransformMode; 3] = [
        TransformMode::Translate,
        TransformMode::Rotate,
        TransformMode::Scale,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TransformMode::Translate => "Move",
            TransformMode::Rotate => "Rotate",
            TransformMode::Scale => "Scale",
        }
    }
}

/// Everything the gallery reports to its host application
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryEvent {
    ArtworkClicked(ArtworkId),
    TransformCommitted {
        artwork_id: ArtworkId,
        transform: Transform3D,
    },
    OfferSubmitted(Offer),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        mode: TransformMode,
    }

    #[test]
    fn modes_parse_lowercase() {
        let holder: Holder = toml::from_str("mode = \"rotate\"").unwrap();
        assert_eq!(holder.mode, TransformMode::Rotate);
        assert!(toml::from_str::<Holder>("mode = \"Rotate\"").is_err());
        assert_eq!(TransformMode::default(), TransformMode::Translate);
    }
}
