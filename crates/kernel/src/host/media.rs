//! Media library backed by the uploads directory.

use std::path::PathBuf;

use async_trait::async_trait;
use base64::Engine;
use tokio::fs;
use tracing::{debug, info};
use wx_sdk::types::{Media, MediaKind};
use wx_sdk::{HostError, HostResult, MediaLibrary};

/// Maximum decoded upload size (10 MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Stores uploaded media as files and serves them under `base_url`.
#[derive(Debug)]
pub struct LocalMediaLibrary {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaLibrary {
    pub fn new(base_path: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            base_url: base_url.into(),
        }
    }

    pub fn public_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }
}

/// Split a `data:<mime>;base64,<payload>` URL.
pub fn decode_data_url(url: &str) -> HostResult<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| HostError::Upload("media source must be a data: URL".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| HostError::Upload("malformed data: URL".into()))?;
    let mime = meta
        .strip_suffix(";base64")
        .ok_or_else(|| HostError::Upload("only base64 data: URLs are supported".into()))?;
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| HostError::Upload(format!("invalid base64 payload: {e}")))?;
    Ok((mime.to_string(), bytes))
}

/// Whether sniffed (or, failing that, declared) type fits the media kind.
fn accepts(kind: MediaKind, mime: &str) -> bool {
    match kind {
        MediaKind::Image => mime.starts_with("image/"),
        MediaKind::Video => mime.starts_with("video/"),
        MediaKind::File => true,
    }
}

#[async_trait]
impl MediaLibrary for LocalMediaLibrary {
    async fn add_media(&self, media: Media) -> HostResult<String> {
        let (declared, bytes) = decode_data_url(&media.url)?;
        if bytes.len() > MAX_FILE_SIZE {
            return Err(HostError::Upload(format!(
                "file too large: {} bytes (max {MAX_FILE_SIZE} bytes)",
                bytes.len()
            )));
        }

        // Trust the bytes over the declared type when they can be identified.
        let (mime, extension) = match infer::get(&bytes) {
            Some(sniffed) => (sniffed.mime_type().to_string(), sniffed.extension().to_string()),
            None => {
                let ext = declared.rsplit('/').next().unwrap_or("bin").to_string();
                (declared.clone(), ext)
            }
        };
        if !accepts(media.kind, &mime) {
            return Err(HostError::Upload(format!(
                "{mime} is not a valid {:?} upload",
                media.kind
            )));
        }

        let name = format!("{}.{extension}", uuid::Uuid::now_v7().simple());
        fs::create_dir_all(&self.base_path).await?;
        fs::write(self.base_path.join(&name), &bytes).await?;

        debug!(media_id = %media.id, %mime, size = bytes.len(), "media written");
        info!(media_id = %media.id, file = %name, "media uploaded");
        Ok(self.public_url(&name))
    }
}
