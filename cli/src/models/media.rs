//! Media slots and carousel images.

use serde::{Deserialize, Serialize};

use super::{default_true, flexible_bool};

/// A named image placeholder on the public site (e.g. `home_hero`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaSlot {
    pub id: u64,
    #[serde(rename = "clave")]
    pub key: String,
    #[serde(rename = "etiqueta", default)]
    pub label: Option<String>,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
}

/// An image in the home page carousel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarouselImage {
    pub id: u64,
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    #[serde(rename = "subtitulo", default)]
    pub subtitle: Option<String>,
    #[serde(rename = "imagen", default)]
    pub image: Option<String>,
    #[serde(rename = "orden", default)]
    pub order: Option<i64>,
    #[serde(rename = "activo", default = "default_true", deserialize_with = "flexible_bool")]
    pub active: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CarouselImageInput {
    #[serde(rename = "titulo", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "subtitulo", skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(rename = "orden", skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(rename = "activo", skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}
