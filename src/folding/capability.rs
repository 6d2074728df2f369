use crate::host::{CapabilityRegistry, TextDocument, FOLDING_RANGE_CAPABILITY};
use crate::utils::{Error, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Checks for a folding-range provider, waiting once for a late registration.
///
/// Providers register asynchronously after a buffer attaches and the host offers
/// no capability-changed signal, so a single bounded recheck stands in for one.
pub struct CapabilityProbe {
    capabilities: Arc<dyn CapabilityRegistry>,
    retry_delay: Duration,
}

impl CapabilityProbe {
    pub fn new(capabilities: Arc<dyn CapabilityRegistry>, retry_delay: Duration) -> Self {
        Self {
            capabilities,
            retry_delay,
        }
    }

    pub async fn ensure_capability(&self, document: &TextDocument) -> Result<()> {
        if self.has_provider(document).await? {
            return Ok(());
        }

        debug!(
            "No folding provider for {} yet, rechecking in {:?}",
            document.uri, self.retry_delay
        );
        tokio::time::sleep(self.retry_delay).await;

        if self.has_provider(document).await? {
            return Ok(());
        }

        warn!("No folding provider for {}", document.uri);
        Err(Error::ProviderUnavailable)
    }

    async fn has_provider(&self, document: &TextDocument) -> Result<bool> {
        self.capabilities
            .has_provider(FOLDING_RANGE_CAPABILITY, document)
            .await
    }
}
