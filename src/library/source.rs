use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use super::{Entry, Library};
use crate::core::collaborators::PageError;

/// Produces page content. Loads run on background tasks.
#[async_trait]
pub trait PassageSource: Send + Sync {
    async fn load(&self, volume: usize, entry: usize) -> Result<Entry, PageError>;
}

/// Serves entries from an in-memory [`Library`], optionally after a delay
/// so the progress indicator is visible.
pub struct LibrarySource {
    library: Arc<Library>,
    delay: Duration,
}

impl LibrarySource {
    pub fn new(library: Arc<Library>, delay: Duration) -> Self {
        Self { library, delay }
    }
}

#[async_trait]
impl PassageSource for LibrarySource {
    async fn load(&self, volume: usize, entry: usize) -> Result<Entry, PageError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let volume = self.library.volume(volume).ok_or(PageError::NoDocument)?;
        let loaded = volume
            .entries
            .get(entry)
            .cloned()
            .ok_or_else(|| PageError::KeyNotFound(format!("{}#{}", volume.document.id, entry)))?;
        debug!("Loaded {} {}", volume.document.id, loaded.key);
        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_existing_entry() {
        let source = LibrarySource::new(Arc::new(Library::builtin()), Duration::ZERO);
        let entry = source.load(0, 1).await.unwrap();
        assert_eq!(entry.key, "Psalm 23");
        assert_eq!(entry.verses.len(), 6);
    }

    #[tokio::test]
    async fn test_load_missing_entry() {
        let source = LibrarySource::new(Arc::new(Library::builtin()), Duration::ZERO);
        assert_eq!(source.load(9, 0).await, Err(PageError::NoDocument));
        assert!(matches!(source.load(0, 99).await, Err(PageError::KeyNotFound(_))));
    }
}
