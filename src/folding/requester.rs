use crate::folding::{BufferRequestRegistry, FoldingRange};
use crate::host::{Document, DocumentRegistry, FoldingRangeOptions, FoldingRangeProvider};
use crate::utils::{Error, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Issues the provider call for one attempt, tracked in the buffer registry.
pub struct FoldingRangeRequester {
    documents: Arc<dyn DocumentRegistry>,
    provider: Arc<dyn FoldingRangeProvider>,
    registry: Arc<BufferRequestRegistry>,
}

impl FoldingRangeRequester {
    pub fn new(
        documents: Arc<dyn DocumentRegistry>,
        provider: Arc<dyn FoldingRangeProvider>,
        registry: Arc<BufferRequestRegistry>,
    ) -> Self {
        Self {
            documents,
            provider,
            registry,
        }
    }

    /// Raw ranges for `document`. Cancelled or null results come back empty.
    pub async fn request(&self, document: &Document) -> Result<Vec<FoldingRange>> {
        // Provider must see the latest buffer content
        self.documents.synchronize(document).await?;

        let token = CancellationToken::new();
        let registration = match self.registry.register(document.buffer, token.clone()) {
            Ok(registration) => registration,
            Err(Error::Disposed) => {
                debug!(
                    "Disposed before buffer {} was requested, dropping attempt",
                    document.buffer
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let response = self
            .provider
            .provide_folding_ranges(
                &document.text_document,
                &FoldingRangeOptions::default(),
                &token,
            )
            .await;
        self.registry.evict(&registration);

        let ranges = response?;
        if token.is_cancelled() {
            debug!(
                "Folding request for buffer {} cancelled, dropping result",
                document.buffer
            );
            return Ok(Vec::new());
        }

        Ok(ranges.unwrap_or_default())
    }
}
