use super::ImageStore;
use crate::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// Records saved images in memory instead of touching the filesystem.
#[derive(Clone)]
pub struct MockImageStore {
    saved: Arc<Mutex<Vec<(usize, Vec<u8>)>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockImageStore {
    pub fn new() -> Self {
        Self {
            saved: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
        }
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn saved(&self) -> Vec<(usize, Vec<u8>)> {
        self.saved.lock().unwrap().clone()
    }

    pub fn get_save_count(&self) -> usize {
        self.saved.lock().unwrap().len()
    }
}

impl Default for MockImageStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageStore for MockImageStore {
    async fn save_image(&self, index: usize, image_data: &[u8]) -> Result<PathBuf> {
        if *self.should_fail.lock().unwrap() {
            return Err(crate::Error::Io(std::io::Error::other("Mock failure")));
        }

        self.saved
            .lock()
            .unwrap()
            .push((index, image_data.to_vec()));

        Ok(PathBuf::from(format!("/mock/image{}.png", index)))
    }
}
