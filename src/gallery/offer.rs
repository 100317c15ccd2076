//! Purchase offers on artworks

use serde::{Deserialize, Serialize};

use super::artwork::ArtworkId;
use crate::error::RecordError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl OfferStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Pending offers may be decided once; decided offers are final
    pub fn can_become(&self, next: OfferStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted) | (Self::Pending, Self::Rejected)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    #[serde(default)]
    pub id: String,
    pub artwork_id: ArtworkId,
    pub user_name: String,
    pub user_email: String,
    pub offer_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub status: OfferStatus,
}

impl Offer {
    pub fn set_status(&mut self, next: OfferStatus) -> Result<(), RecordError> {
        if !self.status.can_become(next) {
            return Err(RecordError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

/// The public offer form before submission
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OfferDraft {
    pub artwork_id: ArtworkId,
    pub user_name: String,
    pub user_email: String,
    pub offer_amount: f64,
    pub message: String,
}

impl OfferDraft {
    pub fn for_artwork(artwork_id: &str) -> Self {
        Self {
            artwork_id: artwork_id.to_string(),
            ..Default::default()
        }
    }

    /// Validates the form and produces a pending offer
    pub fn submit(&self) -> Result<Offer, RecordError> {
        let name = self.user_name.trim();
        let email = self.user_email.trim();

        if self.artwork_id.trim().is_empty() {
            return Err(RecordError::InvalidOffer("no artwork selected".into()));
        }
        if name.is_empty() {
            return Err(RecordError::InvalidOffer("name is required".into()));
        }
        let valid_email = email
            .split_once('@')
            .is_some_and(|(user, domain)| !user.is_empty() && !domain.is_empty());
        if !valid_email {
            return Err(RecordError::InvalidOffer(format!("invalid e-mail '{}'", email)));
        }
        if !self.offer_amount.is_finite() || self.offer_amount <= 0.0 {
            return Err(RecordError::InvalidOffer("amount must be positive".into()));
        }

        let message = self.message.trim();
        Ok(Offer {
            id: String::new(),
            artwork_id: self.artwork_id.clone(),
            user_name: name.to_string(),
            user_email: email.to_string(),
            offer_amount: self.offer_amount,
            message: (!message.is_empty()).then(|| message.to_string()),
            status: OfferStatus::Pending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> OfferDraft {
        OfferDraft {
            artwork_id: "a1".into(),
            user_name: " Ada ".into(),
            user_email: "ada@example.org".into(),
            offer_amount: 2500.0,
            message: String::new(),
        }
    }

    #[test]
    fn valid_draft_becomes_pending_offer() {
        let offer = draft().submit().unwrap();
        assert_eq!(offer.status, OfferStatus::Pending);
        assert_eq!(offer.user_name, "Ada");
        assert_eq!(offer.message, None);
    }

    #[test]
    fn rejects_bad_drafts() {
        let mut no_name = draft();
        no_name.user_name = "  ".into();
        assert!(no_name.submit().is_err());

        let mut bad_email = draft();
        bad_email.user_email = "ada.example.org".into();
        assert!(bad_email.submit().is_err());

        let mut zero = draft();
        zero.offer_amount = 0.0;
        assert!(zero.submit().is_err());

        let mut nan = draft();
        nan.offer_amount = f64::NAN;
        assert!(nan.submit().is_err());
    }

    #[test]
    fn decided_offers_are_final() {
        let mut offer = draft().submit().unwrap();
        offer.set_status(OfferStatus::Accepted).unwrap();

        let err = offer.set_status(OfferStatus::Rejected).unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidTransition {
                from: "accepted".into(),
                to: "rejected".into()
            }
        );
        assert!(offer.set_status(OfferStatus::Pending).is_err());
        assert_eq!(offer.status, OfferStatus::Accepted);
    }

    #[test]
    fn status_serializes_lowercase() {
        let offer = draft().submit().unwrap();
        let value = serde_json::to_value(&offer).unwrap();
        assert_eq!(value["status"], "pending");
        assert_eq!(value["offerAmount"], 2500.0);
    }
}
