//! Inbound contact messages

use serde::{Deserialize, Serialize};

use crate::error::RecordError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactStatus {
    #[default]
    Unread,
    Read,
    Replied,
}

impl ContactStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unread => "unread",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(default)]
    pub status: ContactStatus,
}

impl Contact {
    /// Status only moves forward: unread, read, replied
    pub fn set_status(&mut self, next: ContactStatus) -> Result<(), RecordError> {
        if next <= self.status {
            return Err(RecordError::InvalidTransition {
                from: self.status.as_str().to_string(),
                to: next.as_str().to_string(),
            });
        }
        self.status = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact() -> Contact {
        Contact {
            id: "c1".into(),
            name: "Bo".into(),
            email: "bo@example.org".into(),
            subject: "Opening hours".into(),
            message: "When?".into(),
            status: ContactStatus::Unread,
        }
    }

    #[test]
    fn moves_forward_only() {
        let mut c = contact();
        c.set_status(ContactStatus::Read).unwrap();
        c.set_status(ContactStatus::Replied).unwrap();
        assert!(c.set_status(ContactStatus::Read).is_err());
        assert!(c.set_status(ContactStatus::Replied).is_err());
        assert_eq!(c.status, ContactStatus::Replied);
    }

    #[test]
    fn unread_can_be_replied_directly() {
        let mut c = contact();
        c.set_status(ContactStatus::Replied).unwrap();
        assert_eq!(c.status, ContactStatus::Replied);
    }
}
