use std::collections::HashMap;

use axum::extract::Multipart;
use bytes::Bytes;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub data: Bytes,
}

/// A multipart registration form: text fields plus at most one file.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart, file_field: &str) -> Result<Self> {
        let mut form = MultipartForm::default();
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            if name == file_field {
                let file_name = field.file_name().unwrap_or("upload.bin").to_string();
                let data = field.bytes().await?;
                if !data.is_empty() {
                    form.file = Some(UploadedFile { file_name, data });
                }
            } else if !name.is_empty() {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    /// Trimmed value, `None` when absent or blank.
    pub fn text(&self, name: &str) -> Option<String> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub fn required(&self, name: &str, label: &str) -> Result<String> {
        self.text(name)
            .ok_or_else(|| Error::Validation(format!("{} is required", label)))
    }

    /// Passwords are taken verbatim, surrounding spaces included.
    pub fn password(&self, name: &str) -> Result<String> {
        match self.fields.get(name) {
            Some(p) if p.chars().count() >= 8 => Ok(p.clone()),
            Some(p) if !p.is_empty() => Err(Error::Validation(
                "Password must be at least 8 characters".to_string(),
            )),
            _ => Err(Error::Validation("Password is required".to_string())),
        }
    }
}
