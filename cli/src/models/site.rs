//! Site-wide settings and the public contact form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Firm details shown in the header and footer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(rename = "nombre_despacho", default)]
    pub firm_name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
    #[serde(rename = "telefono", default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "horario", default)]
    pub hours: Option<String>,
    #[serde(rename = "redes", default, deserialize_with = "super::null_as_default")]
    pub social: BTreeMap<String, String>,
    /// Settings this client does not model.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SiteSettingsInput {
    #[serde(rename = "nombre_despacho", skip_serializing_if = "Option::is_none")]
    pub firm_name: Option<String>,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "direccion", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "horario", skip_serializing_if = "Option::is_none")]
    pub hours: Option<String>,
}

/// A message submitted through the public contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessage {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: String,
    #[serde(rename = "telefono", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(rename = "asunto", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "mensaje")]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_social_links_are_empty() {
        let settings: SiteSettings =
            serde_json::from_value(json!({ "nombre_despacho": "Ruiz & Asociados", "redes": null }))
                .unwrap();
        assert_eq!(settings.firm_name.as_deref(), Some("Ruiz & Asociados"));
        assert!(settings.social.is_empty());
        assert!(settings.extra.is_empty());
    }
}
