//! Multipart payloads for file uploads.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};

/// A single multipart field.
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

/// Multipart form contents, kept transport-independent until the request is sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPayload {
    parts: Vec<FormPart>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: None,
            bytes,
        });
        self
    }

    /// Like [`FormPayload::file`] but with an explicit MIME type.
    pub fn file_with_mime(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: Some(mime.into()),
            bytes,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Builds the reqwest form. The transport picks the multipart boundary.
    pub fn into_form(self) -> Result<Form> {
        let mut form = Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let mut file_part = Part::bytes(bytes).file_name(file_name);
                    if let Some(mime) = mime {
                        file_part = file_part
                            .mime_str(&mime)
                            .with_context(|| format!("Invalid MIME type: {}", mime))?;
                    }
                    form.part(name, file_part)
                }
            };
        }
        Ok(form)
    }
}
