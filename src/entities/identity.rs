use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single typed party reference.
///
/// Older ride documents spelled the same relationship three ways: a raw id
/// (`creator_id`/`createdBy`), a bare email (`creator`), or both. The serde
/// aliases below normalize all of them into this one shape when a document
/// is read back from the store, so business logic never sees the legacy
/// spellings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identity {
    #[serde(
        default,
        alias = "creator_id",
        alias = "createdBy",
        alias = "created_by",
        alias = "driverId",
        alias = "driver_id",
        alias = "rider_id"
    )]
    pub id: Option<Uuid>,
    #[serde(
        default,
        alias = "creator",
        alias = "creator_email",
        alias = "rider_email"
    )]
    pub email: String,
}

impl Identity {
    pub fn new(id: Uuid, email: String) -> Self {
        Self {
            id: Some(id),
            email,
        }
    }

    /// Whether `other` refers to the same party. Id equality is checked
    /// first; an email match is equally authoritative, covering records
    /// written before ids were recorded.
    pub fn matches(&self, other: &Identity) -> bool {
        if let (Some(a), Some(b)) = (self.id, other.id) {
            if a == b {
                return true;
            }
        }

        !self.email.is_empty() && self.email.eq_ignore_ascii_case(&other.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(id: Uuid, email: &str) -> Identity {
        Identity::new(id, email.into())
    }

    #[test]
    fn matches_on_id() {
        let id = Uuid::new_v4();
        let a = identity(id, "a@example.com");
        let b = identity(id, "b@example.com");

        assert!(a.matches(&b));
    }

    #[test]
    fn falls_back_to_email() {
        let a = identity(Uuid::new_v4(), "same@example.com");
        let b = identity(Uuid::new_v4(), "Same@Example.com");

        assert!(a.matches(&b));
    }

    #[test]
    fn matches_email_when_id_missing() {
        let a = Identity {
            id: None,
            email: "legacy@example.com".into(),
        };
        let b = identity(Uuid::new_v4(), "legacy@example.com");

        assert!(a.matches(&b));
    }

    #[test]
    fn rejects_unrelated_parties() {
        let a = identity(Uuid::new_v4(), "a@example.com");
        let b = identity(Uuid::new_v4(), "b@example.com");

        assert!(!a.matches(&b));
        assert!(!Identity {
            id: None,
            email: "".into()
        }
        .matches(&Identity {
            id: None,
            email: "".into()
        }));
    }

    #[test]
    fn deserializes_legacy_creator_spellings() {
        let by_id: Identity =
            serde_json::from_str(r#"{"createdBy":"9f9c41e6-25fa-4d8a-9a2a-2e63c2a0b7f0"}"#)
                .unwrap();
        assert!(by_id.id.is_some());
        assert_eq!(by_id.email, "");

        let by_email: Identity =
            serde_json::from_str(r#"{"creator":"legacy@example.com"}"#).unwrap();
        assert_eq!(by_email.id, None);
        assert_eq!(by_email.email, "legacy@example.com");
    }
}
