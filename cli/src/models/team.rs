//! Team directory records.

use serde::{Deserialize, Serialize};

use super::{default_true, flexible_bool, null_as_default};

/// A profile link shown on a team member's card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    #[serde(rename = "red")]
    pub network: String,
    pub url: String,
}

/// A member of the firm's team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: u64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "cargo", default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Storage path or URL of the portrait.
    #[serde(rename = "foto", default)]
    pub photo: Option<String>,
    #[serde(rename = "orden", default)]
    pub order: Option<i64>,
    #[serde(rename = "activo", default = "default_true", deserialize_with = "flexible_bool")]
    pub active: bool,
    #[serde(rename = "redes", default, deserialize_with = "null_as_default")]
    pub links: Vec<SocialLink>,
}

/// Fields sent when creating or updating a team member.
///
/// Unset fields are left out of the request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TeamMemberInput {
    #[serde(rename = "nombre", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "cargo", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(rename = "orden", skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(rename = "redes", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<SocialLink>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::listing::normalize_list;
    use serde_json::json;

    #[test]
    fn minimal_record_uses_defaults() {
        let member: TeamMember =
            serde_json::from_value(json!({ "id": 1, "nombre": "Ana Ruiz" })).unwrap();
        assert_eq!(member.name, "Ana Ruiz");
        assert!(member.active);
        assert!(member.links.is_empty());
        assert!(member.photo.is_none());
    }

    #[test]
    fn null_links_are_empty() {
        let member: TeamMember =
            serde_json::from_value(json!({ "id": 1, "nombre": "Ana Ruiz", "redes": null }))
                .unwrap();
        assert!(member.links.is_empty());
    }

    #[test]
    fn list_keeps_member_with_null_links() {
        let page = normalize_list::<TeamMember>(json!({
            "data": [
                { "id": 1, "nombre": "Ana Ruiz", "redes": null },
                { "id": 2, "nombre": "Luis", "redes": [{ "red": "linkedin", "url": "https://x.test/l" }] }
            ]
        }));
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].name, "Ana Ruiz");
        assert_eq!(page.items[1].links[0].network, "linkedin");
    }

    #[test]
    fn active_flag_accepts_integers() {
        let member: TeamMember =
            serde_json::from_value(json!({ "id": 2, "nombre": "Luis", "activo": 0 })).unwrap();
        assert!(!member.active);
    }

    #[test]
    fn input_skips_unset_fields() {
        let input = TeamMemberInput {
            name: Some("Ana Ruiz".to_string()),
            active: Some(true),
            ..TeamMemberInput::default()
        };
        assert_eq!(
            serde_json::to_value(&input).unwrap(),
            json!({ "nombre": "Ana Ruiz", "activo": true })
        );
    }
}
