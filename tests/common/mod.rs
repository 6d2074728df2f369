//! In-memory editor host for orchestrator tests

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use ufo_fold::folding::{Collaborators, FoldingOrchestrator};
use ufo_fold::host::{
    BufferId, CapabilityRegistry, Document, DocumentRegistry, FoldingRangeOptions,
    FoldingRangeProvider, RenderEngine, TextDocument,
};
use ufo_fold::utils::config::FoldingConfig;
use ufo_fold::{Error, FoldingRange, Result};

pub struct FakeHost {
    documents: Mutex<HashMap<BufferId, Document>>,
    capability_script: Mutex<VecDeque<bool>>,
    capability_default: Mutex<bool>,
    ranges: Mutex<Option<Vec<FoldingRange>>>,
    provider_error: Mutex<Option<String>>,
    gate: Option<Semaphore>,
    provided_tx: mpsc::UnboundedSender<CancellationToken>,
    provided_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<CancellationToken>>,
    start: Instant,
    /// Every collaborator call in order, e.g. "synchronize:1"
    pub calls: Mutex<Vec<String>>,
    /// Elapsed time at each capability query
    pub capability_queries: Mutex<Vec<Duration>>,
    /// Tokens handed to the provider, in call order
    pub tokens: Mutex<Vec<CancellationToken>>,
}

impl FakeHost {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::build(None))
    }

    /// Provider calls block until `release` hands out a permit.
    pub fn gated() -> Arc<Self> {
        Arc::new(Self::build(Some(Semaphore::new(0))))
    }

    fn build(gate: Option<Semaphore>) -> Self {
        let (provided_tx, provided_rx) = mpsc::unbounded_channel();
        Self {
            documents: Mutex::new(HashMap::new()),
            capability_script: Mutex::new(VecDeque::new()),
            capability_default: Mutex::new(true),
            ranges: Mutex::new(Some(Vec::new())),
            provider_error: Mutex::new(None),
            gate,
            provided_tx,
            provided_rx: tokio::sync::Mutex::new(provided_rx),
            start: Instant::now(),
            calls: Mutex::new(Vec::new()),
            capability_queries: Mutex::new(Vec::new()),
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn document(buffer: BufferId, attached: bool) -> Document {
        Document {
            buffer,
            attached,
            text_document: TextDocument {
                uri: lsp_types::Url::parse(&format!("file:///workspace/buf{}.rs", buffer))
                    .unwrap(),
                language_id: "rust".to_string(),
                version: 1,
            },
        }
    }

    pub fn attach(&self, buffer: BufferId) {
        self.documents
            .lock()
            .insert(buffer, Self::document(buffer, true));
    }

    pub fn load_unattached(&self, buffer: BufferId) {
        self.documents
            .lock()
            .insert(buffer, Self::document(buffer, false));
    }

    /// Answers for successive capability queries; `default` once exhausted.
    pub fn script_capability(&self, answers: &[bool], default: bool) {
        *self.capability_script.lock() = answers.iter().copied().collect();
        *self.capability_default.lock() = default;
    }

    pub fn set_ranges(&self, ranges: Option<Vec<FoldingRange>>) {
        *self.ranges.lock() = ranges;
    }

    pub fn fail_provider(&self, message: &str) {
        *self.provider_error.lock() = Some(message.to_string());
    }

    pub fn release(&self, permits: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(permits);
        }
    }

    /// Wait until the provider has been entered once more; returns that call's token.
    pub async fn provider_entered(&self) -> CancellationToken {
        self.provided_rx
            .lock()
            .await
            .recv()
            .await
            .expect("provider channel closed")
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl DocumentRegistry for FakeHost {
    async fn get_document(&self, buffer: BufferId) -> Result<Option<Document>> {
        self.record(format!("get_document:{}", buffer));
        Ok(self.documents.lock().get(&buffer).cloned())
    }

    async fn synchronize(&self, document: &Document) -> Result<()> {
        self.record(format!("synchronize:{}", document.buffer));
        Ok(())
    }
}

#[async_trait]
impl CapabilityRegistry for FakeHost {
    async fn has_provider(&self, capability: &str, _document: &TextDocument) -> Result<bool> {
        self.record(format!("has_provider:{}", capability));
        self.capability_queries.lock().push(self.start.elapsed());
        let scripted = self.capability_script.lock().pop_front();
        Ok(scripted.unwrap_or_else(|| *self.capability_default.lock()))
    }
}

#[async_trait]
impl FoldingRangeProvider for FakeHost {
    async fn provide_folding_ranges(
        &self,
        document: &TextDocument,
        _options: &FoldingRangeOptions,
        token: &CancellationToken,
    ) -> Result<Option<Vec<FoldingRange>>> {
        self.record(format!("provide:{}", document.uri.path()));
        self.tokens.lock().push(token.clone());
        let _ = self.provided_tx.send(token.clone());

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|_| Error::host("gate closed"))?
                .forget();
        }

        if let Some(message) = self.provider_error.lock().clone() {
            return Err(Error::host(message));
        }
        Ok(self.ranges.lock().clone())
    }
}

#[async_trait]
impl RenderEngine for FakeHost {
    async fn notify_init(&self) -> Result<()> {
        self.record("render:init".to_string());
        Ok(())
    }

    async fn notify_dispose(&self) -> Result<()> {
        self.record("render:dispose".to_string());
        Ok(())
    }
}

pub fn orchestrator(host: &Arc<FakeHost>) -> Arc<FoldingOrchestrator> {
    Arc::new(FoldingOrchestrator::new(
        Collaborators::from_host(host.clone()),
        &FoldingConfig::default(),
    ))
}

pub fn spans(ranges: &[FoldingRange]) -> Vec<(u32, u32)> {
    ranges.iter().map(|r| (r.start_line, r.end_line)).collect()
}
