use std::path::PathBuf;

use tracing::error;
use uuid::Uuid;

use crate::{Error, Result};

/// Local-disk file store for uploaded images. The returned id is an
/// opaque filename; posts store it in `featuredImage` and the public
/// router serves the directory at `/api/images`.
#[derive(Clone)]
pub struct ImageService {
    upload_dir: PathBuf,
}

impl ImageService {
    pub fn new(upload_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
        }
    }

    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|err| {
                error!("failed to create upload dir: {err:?}");
                Error::InternalServerError
            })
    }

    /// Stores the bytes under a fresh id. The payload must decode as a
    /// known image format; anything else is rejected before touching disk.
    pub async fn store(&self, bytes: &[u8]) -> Result<String> {
        let format = image::guess_format(bytes)
            .map_err(|_| Error::BadRequest("Please select an image file".to_string()))?;
        let ext = format.extensions_str().first().copied().unwrap_or("img");

        let id = format!("{}.{ext}", Uuid::now_v7());
        tokio::fs::write(self.upload_dir.join(&id), bytes)
            .await
            .map_err(|err| {
                error!("failed to write uploaded image: {err:?}");
                Error::InternalServerError
            })?;

        Ok(id)
    }
}
