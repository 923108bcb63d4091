//! Multipart form payloads for create/update endpoints that accept uploads.
//!
//! [`MultipartBuilder`] flattens a [`FormObject`] into a [`MultipartPayload`]
//! using the backend's field naming:
//! - scalars under their own key
//! - nested objects and arrays as `field[0][sub]`
//! - files as binary parts that keep their filename
//! - `null` values omitted
//!
//! Building a payload performs no I/O; [`MultipartPayload::to_form`] converts
//! it into a `reqwest` form right before sending.

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;

use crate::error::{BufeteError, Result};

/// How booleans are written into text fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolEncoding {
    /// `"1"` / `"0"`
    #[default]
    Numeric,
    /// `"true"` / `"false"`
    Literal,
}

impl BoolEncoding {
    #[must_use]
    pub const fn encode(self, value: bool) -> &'static str {
        match (self, value) {
            (Self::Numeric, true) => "1",
            (Self::Numeric, false) => "0",
            (Self::Literal, true) => "true",
            (Self::Literal, false) => "false",
        }
    }
}

/// How an array field is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayEncoding {
    /// One field per element: `tags[0]`, `tags[1]`, ...
    #[default]
    Indexed,
    /// A single field holding the JSON-encoded array.
    Json,
}

/// A binary file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    #[must_use]
    pub fn new(
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| BufeteError::Config(format!("Not a file: {}", path.display())))?;
        let mime_type = mime_guess::from_path(path).first_or_octet_stream().to_string();
        Ok(Self::new(file_name, mime_type, bytes))
    }

    /// Size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// A value in a form object.
#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<FormValue>),
    Object(Vec<(String, FormValue)>),
    File(FileUpload),
}

impl From<Value> for FormValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<FileUpload> for FormValue {
    fn from(file: FileUpload) -> Self {
        Self::File(file)
    }
}

impl FormValue {
    /// JSON view of the value; files are represented by their filename.
    fn to_json(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Number(n) => Value::Number(n.clone()),
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::File(f) => Value::String(f.file_name.clone()),
        }
    }
}

/// Whether a value can be sent as a binary part: it is a file with a name and
/// a MIME type.
#[must_use]
pub fn is_file_like(value: &FormValue) -> bool {
    matches!(value, FormValue::File(f) if !f.file_name.is_empty() && !f.mime_type.is_empty())
}

/// Top-level fields of a form, in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormObject {
    fields: Vec<(String, FormValue)>,
}

impl FormObject {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a form object from any value that serializes to a JSON object.
    pub fn from_serialize<T: Serialize>(value: &T) -> Result<Self> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(Self {
                fields: map.into_iter().map(|(k, v)| (k, FormValue::from(v))).collect(),
            }),
            other => Err(BufeteError::Serialization(format!(
                "form payload must be an object, got {other}"
            ))),
        }
    }

    /// Sets a field, replacing any previous value under the same key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FormValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Attaches a file under `key` when one is given.
    #[must_use]
    pub fn with_file(mut self, key: impl Into<String>, file: Option<FileUpload>) -> Self {
        if let Some(file) = file {
            self.set(key, file);
        }
        self
    }

    /// Looks up a top-level field.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&FormValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

/// Body of a single part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartBody {
    Text(String),
    File(FileUpload),
}

/// A named part of a multipart payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub body: PartBody,
}

/// A flattened multipart payload, ready to be turned into a request body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartPayload {
    parts: Vec<FormPart>,
}

impl MultipartPayload {
    /// All parts in the order they will be sent.
    #[must_use]
    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    /// Field names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().map(|p| p.name.as_str())
    }

    /// Value of the first text part named `name`.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match &p.body {
            PartBody::Text(value) if p.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// The first file part named `name`.
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FileUpload> {
        self.parts.iter().find_map(|p| match &p.body {
            PartBody::File(file) if p.name == name => Some(file),
            _ => None,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Converts the payload into a `reqwest` multipart form.
    ///
    /// # Errors
    ///
    /// Returns an error if a file part carries an invalid MIME type.
    pub fn to_form(&self) -> Result<Form> {
        let mut form = Form::new();
        for part in &self.parts {
            form = match &part.body {
                PartBody::Text(value) => form.text(part.name.clone(), value.clone()),
                PartBody::File(file) => {
                    let body = Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime_type)?;
                    form.part(part.name.clone(), body)
                }
            };
        }
        Ok(form)
    }

    fn push_text(&mut self, name: String, value: impl Into<String>) {
        self.parts.push(FormPart {
            name,
            body: PartBody::Text(value.into()),
        });
    }
}

/// Flattens form objects into multipart payloads.
#[derive(Debug, Clone, Default)]
pub struct MultipartBuilder {
    booleans: BoolEncoding,
    json_fields: Vec<String>,
    method: Option<String>,
}

impl MultipartBuilder {
    #[must_use]
    pub fn new(booleans: BoolEncoding) -> Self {
        Self {
            booleans,
            ..Self::default()
        }
    }

    /// Chooses how the top-level array field `field` is written.
    #[must_use]
    pub fn array_encoding(mut self, field: impl Into<String>, encoding: ArrayEncoding) -> Self {
        let field = field.into();
        self.json_fields.retain(|f| *f != field);
        if encoding == ArrayEncoding::Json {
            self.json_fields.push(field);
        }
        self
    }

    /// Adds a `_method` field so POST bodies can stand in for PUT/PATCH.
    #[must_use]
    pub fn method_override(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Flattens `object` into a payload.
    #[must_use]
    pub fn build(&self, object: &FormObject) -> MultipartPayload {
        let mut payload = MultipartPayload::default();

        if let Some(method) = &self.method {
            payload.push_text("_method".to_string(), method.clone());
        }

        for (key, value) in &object.fields {
            if self.json_fields.contains(key) && *value != FormValue::Null {
                payload.push_text(key.clone(), value.to_json().to_string());
            } else {
                self.append(&mut payload, key.clone(), value);
            }
        }

        payload
    }

    fn append(&self, payload: &mut MultipartPayload, key: String, value: &FormValue) {
        match value {
            FormValue::Null => {}
            FormValue::Bool(b) => payload.push_text(key, self.booleans.encode(*b)),
            FormValue::Number(n) => payload.push_text(key, n.to_string()),
            FormValue::Text(s) => payload.push_text(key, s.clone()),
            FormValue::File(file) if is_file_like(value) => payload.parts.push(FormPart {
                name: key,
                body: PartBody::File(file.clone()),
            }),
            FormValue::File(_) => {
                tracing::warn!(field = %key, "Skipping file without name or MIME type");
            }
            FormValue::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.append(payload, format!("{key}[{index}]"), item);
                }
            }
            FormValue::Object(fields) => {
                for (sub, item) in fields {
                    self.append(payload, format!("{key}[{sub}]"), item);
                }
            }
        }
    }
}
