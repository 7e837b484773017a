//! Family members.

use serde::{Deserialize, Serialize};

/// A member of the family. Read-only reference data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Role in the family, e.g. "Father".
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Country whose holidays are relevant to this member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

impl FamilyMember {
    /// Creates a member with only a name and role.
    pub fn new(name: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            role: role.into(),
            avatar: None,
            email: None,
            phone: None,
            country: None,
        }
    }

    /// Builder method to set the id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method to set the country.
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_member() {
        let json = r#"{"name": "Luis García", "role": "Son"}"#;
        let member: FamilyMember = serde_json::from_str(json).unwrap();
        assert_eq!(member.name, "Luis García");
        assert!(member.id.is_none());
        assert!(member.country.is_none());
    }

    #[test]
    fn builder_and_skip_empty_fields() {
        let member = FamilyMember::new("María López", "Mother")
            .with_id("2")
            .with_country("ES");

        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value["id"], "2");
        assert_eq!(value["country"], "ES");
        assert!(value.get("email").is_none());
    }
}
