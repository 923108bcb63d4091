//! Practice areas and blog articles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{default_true, flexible_bool, lenient_datetime, string_list};

/// An area of legal practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeArea {
    pub id: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    /// Storage path or URL of the icon.
    #[serde(rename = "icono", default)]
    pub icon: Option<String>,
    /// Short selling points; the backend stores them as a JSON array.
    #[serde(default, deserialize_with = "string_list")]
    pub bullets: Vec<String>,
    #[serde(rename = "orden", default)]
    pub order: Option<i64>,
    #[serde(rename = "activo", default = "default_true", deserialize_with = "flexible_bool")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct PracticeAreaInput {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bullets: Option<Vec<String>>,
    #[serde(rename = "orden", skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// A blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(rename = "extracto", default)]
    pub excerpt: Option<String>,
    #[serde(rename = "contenido", default)]
    pub body: Option<String>,
    /// Storage path or URL of the cover image.
    #[serde(rename = "portada", default)]
    pub cover: Option<String>,
    #[serde(rename = "autor", default)]
    pub author: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tags: Vec<String>,
    #[serde(rename = "publicado", default, deserialize_with = "flexible_bool")]
    pub published: bool,
    #[serde(rename = "fecha_publicacion", default, deserialize_with = "lenient_datetime")]
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleInput {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(rename = "extracto", skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(rename = "contenido", skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(rename = "categoria", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "publicado", skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn practice_area_bullets_may_be_encoded() {
        let area: PracticeArea = serde_json::from_value(json!({
            "id": 3,
            "titulo": "Derecho laboral",
            "bullets": "[\"Despidos\",\"Convenios\"]",
            "activo": "1"
        }))
        .unwrap();
        assert_eq!(area.bullets, vec!["Despidos", "Convenios"]);
        assert!(area.active);
    }

    #[test]
    fn article_parses_backend_timestamp() {
        let article: Article = serde_json::from_value(json!({
            "id": 8,
            "titulo": "Reforma laboral 2024",
            "publicado": 1,
            "fecha_publicacion": "2024-03-15T09:30:00.000000Z",
            "tags": ["laboral"]
        }))
        .unwrap();
        assert!(article.published);
        assert_eq!(
            article.published_at.unwrap().to_rfc3339(),
            "2024-03-15T09:30:00+00:00"
        );
        assert_eq!(article.tags, vec!["laboral"]);
    }
}
