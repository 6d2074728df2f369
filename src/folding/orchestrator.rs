use crate::folding::{
    BufferRequestRegistry, CapabilityProbe, DocumentReadinessWaiter, FoldingRange,
    FoldingRangeRequester, LifecycleNotifier, RangeFilterSorter,
};
use crate::host::{
    BufferId, CapabilityRegistry, DocumentRegistry, FoldingRangeProvider, MutationEvent,
    RenderEngine,
};
use crate::utils::config::FoldingConfig;
use crate::utils::{Error, Result};
use std::sync::Arc;
use tracing::{debug, info};

/// Everything the orchestrator consumes from the editor side
#[derive(Clone)]
pub struct Collaborators {
    pub documents: Arc<dyn DocumentRegistry>,
    pub capabilities: Arc<dyn CapabilityRegistry>,
    pub provider: Arc<dyn FoldingRangeProvider>,
    pub render: Arc<dyn RenderEngine>,
}

impl Collaborators {
    /// One host object playing every role.
    pub fn from_host<H>(host: Arc<H>) -> Self
    where
        H: DocumentRegistry + CapabilityRegistry + FoldingRangeProvider + RenderEngine + 'static,
    {
        Self {
            documents: host.clone(),
            capabilities: host.clone(),
            provider: host.clone(),
            render: host,
        }
    }
}

pub struct FoldingOrchestrator {
    registry: Arc<BufferRequestRegistry>,
    readiness: DocumentReadinessWaiter,
    probe: CapabilityProbe,
    requester: FoldingRangeRequester,
    lifecycle: LifecycleNotifier,
}

impl FoldingOrchestrator {
    pub fn new(collaborators: Collaborators, config: &FoldingConfig) -> Self {
        let registry = Arc::new(BufferRequestRegistry::new());

        Self {
            readiness: DocumentReadinessWaiter::new(
                collaborators.documents.clone(),
                config.readiness_retry_delay(),
            ),
            probe: CapabilityProbe::new(
                collaborators.capabilities,
                config.capability_retry_delay(),
            ),
            requester: FoldingRangeRequester::new(
                collaborators.documents,
                collaborators.provider,
                registry.clone(),
            ),
            lifecycle: LifecycleNotifier::new(collaborators.render),
            registry,
        }
    }

    /// Announce startup to the renderer. Must precede the first command.
    pub async fn start(&self) -> Result<()> {
        self.lifecycle.notify_init().await
    }

    /// Cancel the buffer's in-flight request; it was computed for stale text.
    pub fn handle_event(&self, event: MutationEvent) {
        if self.registry.cancel_and_evict(event.buffer) {
            debug!(
                "{} on buffer {} cancelled pending folding request",
                event.kind.as_str(),
                event.buffer
            );
        }
    }

    /// Folding ranges for a buffer, ordered bottom-up.
    ///
    /// `Ok(None)` means the buffer never attached and the request was dropped;
    /// `Err(Error::ProviderUnavailable)` tells the caller to use another fold source.
    pub async fn folding_range(
        &self,
        buffer: BufferId,
        kind: Option<&str>,
    ) -> Result<Option<Vec<FoldingRange>>> {
        if self.registry.is_closed() {
            return Err(Error::Disposed);
        }

        let document = match self.readiness.wait_for_ready(buffer).await? {
            Some(document) => document,
            None => return Ok(None),
        };

        self.probe.ensure_capability(&document.text_document).await?;

        let raw = self.requester.request(&document).await?;
        let ranges = RangeFilterSorter::process(raw, kind);
        debug!("Buffer {}: {} folding ranges", buffer, ranges.len());
        Ok(Some(ranges))
    }

    /// Tear down: cancel in-flight work, then await the renderer's dispose.
    pub async fn dispose(&self) -> Result<()> {
        info!("Disposing folding orchestrator");
        self.registry.close();
        self.lifecycle.notify_dispose().await
    }

    pub fn registry(&self) -> &BufferRequestRegistry {
        &self.registry
    }

    pub fn lifecycle(&self) -> &LifecycleNotifier {
        &self.lifecycle
    }
}
