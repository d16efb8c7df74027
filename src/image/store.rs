use super::ImageStore;
use crate::Result;
use async_trait::async_trait;
use chrono::Local;
use std::path::{Path, PathBuf};

/// Writes `image{index}_{timestamp}.png` files into one directory.
pub struct DebugImageStore {
    output_dir: PathBuf,
}

impl DebugImageStore {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn file_name(index: usize) -> String {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S_%f");
        format!("image{}_{}.png", index, timestamp)
    }
}

#[async_trait]
impl ImageStore for DebugImageStore {
    async fn save_image(&self, index: usize, image_data: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.output_dir).await?;

        let path = self.output_dir.join(Self::file_name(index));
        tokio::fs::write(&path, image_data).await?;

        tracing::info!("Saved image to {}", path.display());
        Ok(path)
    }
}
