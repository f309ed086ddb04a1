//! File storage capability: store bytes, return a retrievable URL.
//!
//! Files land under `<data_dir>/uploads` with a millisecond-timestamp prefix
//! and a sanitized name; the returned URL is served by the static route.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

use crate::error::ApiError;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9.\-]").unwrap());

#[derive(Debug, Clone)]
pub struct StoredFile {
    pub file_name: String,
    pub url: String,
}

/// Persist an uploaded file. Rejects empty and oversized payloads before
/// touching the filesystem.
pub async fn store(
    uploads_dir: &Path,
    original_name: &str,
    bytes: &[u8],
    max_bytes: u64,
) -> Result<StoredFile, ApiError> {
    if bytes.is_empty() {
        return Err(ApiError::Validation("Aucun fichier fourni".into()));
    }
    if bytes.len() as u64 > max_bytes {
        return Err(ApiError::Validation(
            "Le fichier est trop volumineux (max 10MB)".into(),
        ));
    }

    let sanitized = sanitize_name(original_name);
    let file_name = format!("{}_{}", chrono::Utc::now().timestamp_millis(), sanitized);

    tokio::fs::create_dir_all(uploads_dir)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;
    tokio::fs::write(uploads_dir.join(&file_name), bytes)
        .await
        .map_err(|e| ApiError::Internal(e.into()))?;

    let url = format!("/uploads/{file_name}");
    Ok(StoredFile { file_name, url })
}

/// Replace anything outside `[a-zA-Z0-9.-]` with `_`. Strips path separators
/// along the way, so a hostile name can't escape the uploads directory.
fn sanitize_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = UNSAFE_CHARS.replace_all(base, "_").to_string();
    if cleaned.trim_matches('_').is_empty() {
        "fichier".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("relevé de notes.pdf"), "relev__de_notes.pdf");
        assert_eq!(sanitize_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_name("diplome.pdf"), "diplome.pdf");
        assert_eq!(sanitize_name("///"), "fichier");
    }

    #[tokio::test]
    async fn test_store_writes_file() {
        let dir = TempDir::new().unwrap();
        let stored = store(dir.path(), "diplome.pdf", b"contenu", 1024)
            .await
            .unwrap();
        assert!(stored.file_name.ends_with("_diplome.pdf"));
        assert!(stored.url.starts_with("/uploads/"));
        let on_disk = std::fs::read(dir.path().join(&stored.file_name)).unwrap();
        assert_eq!(on_disk, b"contenu");
    }

    #[tokio::test]
    async fn test_store_rejects_oversized() {
        let dir = TempDir::new().unwrap();
        let err = store(dir.path(), "gros.bin", &[0u8; 2048], 1024)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_store_rejects_empty() {
        let dir = TempDir::new().unwrap();
        let err = store(dir.path(), "vide.bin", &[], 1024).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }
}
