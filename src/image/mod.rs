//! Debug persistence of generated illustrations
//!
//! Every generated image is written to disk for inspection. The files are
//! never read back by the service.

pub mod mock;
pub mod store;

pub use mock::MockImageStore;
pub use store::DebugImageStore;

use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist the image generated for prompt `index`, returning where it went.
    async fn save_image(&self, index: usize, image_data: &[u8]) -> Result<PathBuf>;
}
