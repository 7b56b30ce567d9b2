use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::{Error, Result};

pub const RESUME_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "txt", "rtf"];
pub const LOGO_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "svg"];

/// Where an uploaded file ended up: the name the client sent, the public
/// path it is served under and its location on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub original_name: String,
    pub public_path: String,
    pub disk_path: PathBuf,
}

fn extension_of(filename: &str) -> Option<String> {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Keeps only characters safe in a file name.
fn sanitize(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload");
    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn check_content(ext: &str, data: &[u8]) -> Result<()> {
    let ok = match ext {
        "pdf" => data.starts_with(b"%PDF"),
        "jpg" | "jpeg" => data.starts_with(&[0xFF, 0xD8]),
        "png" => data.starts_with(&[0x89, 0x50, 0x4E, 0x47]),
        _ => true,
    };
    if ok {
        Ok(())
    } else {
        Err(Error::Validation(format!("Invalid .{} file content", ext)))
    }
}

/// Writes `data` under `{root}/{category}` as `{uuid}-{name}`.
pub async fn store_upload(
    root: &str,
    category: &str,
    filename: &str,
    data: &[u8],
    allowed: &[&str],
) -> Result<StoredFile> {
    if data.is_empty() {
        return Err(Error::Validation("Uploaded file is empty".to_string()));
    }
    let ext = extension_of(filename).unwrap_or_default();
    if !allowed.contains(&ext.as_str()) {
        return Err(Error::Validation(format!("File type .{} is not allowed", ext)));
    }
    check_content(&ext, data)?;

    let dir = Path::new(root).join(category);
    fs::create_dir_all(&dir).await?;

    let stored_name = format!("{}-{}", uuid::Uuid::new_v4(), sanitize(filename));
    let disk_path = dir.join(&stored_name);
    fs::write(&disk_path, data).await.map_err(|e| {
        tracing::error!(error = %e, category, "Failed to write uploaded file");
        Error::Io(e)
    })?;

    Ok(StoredFile {
        original_name: filename.to_string(),
        public_path: format!("/uploads/{}/{}", category, stored_name),
        disk_path,
    })
}

/// Removes a stored file whose owning record was never created.
pub async fn discard_upload(stored: &StoredFile) {
    if let Err(e) = fs::remove_file(&stored.disk_path).await {
        tracing::warn!(
            error = %e,
            path = %stored.disk_path.display(),
            "Failed to remove orphaned upload"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_directories_and_odd_characters() {
        assert_eq!(sanitize("../../etc/passwd"), "passwd");
        assert_eq!(sanitize("my cv (final).pdf"), "my_cv__final_.pdf");
    }

    #[tokio::test]
    async fn rejects_disallowed_extension_and_fake_pdf() {
        let root = std::env::temp_dir().join("interview-manager-upload-test");
        let root = root.to_string_lossy();

        let err = store_upload(&root, "resumes", "run.exe", b"MZ", RESUME_EXTENSIONS).await;
        assert!(matches!(err, Err(Error::Validation(_))));

        let err = store_upload(&root, "resumes", "cv.pdf", b"hello", RESUME_EXTENSIONS).await;
        assert!(matches!(err, Err(Error::Validation(_))));
    }

    #[tokio::test]
    async fn stores_under_category_with_unique_name() {
        let root = std::env::temp_dir().join("interview-manager-upload-test");
        let root = root.to_string_lossy();

        let stored = store_upload(&root, "resumes", "cv.pdf", b"%PDF-1.4", RESUME_EXTENSIONS)
            .await
            .unwrap();
        assert_eq!(stored.original_name, "cv.pdf");
        assert!(stored.public_path.starts_with("/uploads/resumes/"));
        assert!(stored.public_path.ends_with("-cv.pdf"));
        assert!(stored.disk_path.exists());
    }

    #[tokio::test]
    async fn discarded_upload_is_gone_and_second_discard_is_harmless() {
        let root = std::env::temp_dir().join("interview-manager-upload-test");
        let root = root.to_string_lossy();

        let stored = store_upload(&root, "logos", "logo.png", &[0x89, 0x50, 0x4E, 0x47], LOGO_EXTENSIONS)
            .await
            .unwrap();
        discard_upload(&stored).await;
        assert!(!stored.disk_path.exists());

        discard_upload(&stored).await;
    }
}
