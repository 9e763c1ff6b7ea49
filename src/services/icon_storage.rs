use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "ico"];

/// Icon files kept in a single flat directory.
#[derive(Debug, Clone)]
pub struct IconStorage {
    dir: PathBuf,
}

impl IconStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn ensure_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dir)
    }

    /// Saves an upload under a fresh unique name and returns that name.
    pub async fn store(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        if bytes.is_empty() {
            return Err(AppError::Validation("Uploaded icon is empty".into()));
        }

        let base = sanitize_file_name(original_name)
            .ok_or_else(|| AppError::Validation("Icon upload needs a file name".into()))?;
        let extension = extension_of(&base).unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(AppError::Validation(format!(
                "Unsupported icon type '{}'",
                extension
            )));
        }

        let file_name = format!("{}-{}", Uuid::new_v4().simple(), base);
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        info!(file = %file_name, size = bytes.len(), "Stored icon");
        Ok(file_name)
    }

    pub async fn load(&self, file_name: &str) -> AppResult<Vec<u8>> {
        if !is_plain_file_name(file_name) {
            return Err(AppError::Validation(format!(
                "Invalid icon file name '{}'",
                file_name
            )));
        }

        let path = self.dir.join(file_name);
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                debug!(file = %file_name, "Serving icon");
                Ok(bytes)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound("File not found".into()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains("..")
}

/// Last path component with anything outside `[A-Za-z0-9._-]` replaced by `_`.
fn sanitize_file_name(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next().unwrap_or("");
    let cleaned: String = last
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.').to_string();
    if cleaned.is_empty() || cleaned.contains("..") {
        None
    } else {
        Some(cleaned)
    }
}

fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
}

pub fn content_type(file_name: &str) -> &'static str {
    match extension_of(file_name).as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}
