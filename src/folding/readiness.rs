use crate::host::{BufferId, Document, DocumentRegistry};
use crate::utils::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Waits, once, for the host to attach a buffer's document.
pub struct DocumentReadinessWaiter {
    documents: Arc<dyn DocumentRegistry>,
    retry_delay: Duration,
}

impl DocumentReadinessWaiter {
    pub fn new(documents: Arc<dyn DocumentRegistry>, retry_delay: Duration) -> Self {
        Self {
            documents,
            retry_delay,
        }
    }

    /// Returns the attached document, or `None` if the buffer is still not
    /// attached after one retry.
    pub async fn wait_for_ready(&self, buffer: BufferId) -> Result<Option<Document>> {
        if let Some(doc) = self.attached(buffer).await? {
            return Ok(Some(doc));
        }

        debug!(
            "Buffer {} not attached, retrying in {:?}",
            buffer, self.retry_delay
        );
        tokio::time::sleep(self.retry_delay).await;

        let doc = self.attached(buffer).await?;
        if doc.is_none() {
            debug!("Buffer {} still not attached, abandoning", buffer);
        }
        Ok(doc)
    }

    async fn attached(&self, buffer: BufferId) -> Result<Option<Document>> {
        let doc = self.documents.get_document(buffer).await?;
        Ok(doc.filter(|doc| doc.attached))
    }
}
