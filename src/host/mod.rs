//! Editor-side collaborators consumed by the folding orchestrator.
//!
//! The orchestrator never owns buffers, language servers or the fold renderer; it
//! reaches them through these traits. `channel` implements all of them over the
//! Vim channel protocol.

pub mod channel;

pub use channel::ChannelHost;

use crate::folding::FoldingRange;
use crate::utils::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

/// Editor buffer number
pub type BufferId = i64;

/// Capability name queried before issuing a folding request
pub const FOLDING_RANGE_CAPABILITY: &str = "foldingRange";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextDocument {
    pub uri: lsp_types::Url,
    pub language_id: String,
    pub version: i32,
}

/// A buffer as the host's document registry sees it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(rename = "bufnr")]
    pub buffer: BufferId,
    pub attached: bool,
    pub text_document: TextDocument,
}

/// Request options for `textDocument/foldingRange`; always sent empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoldingRangeOptions {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    TextChanged,
    InsertLeave,
    BufWritePost,
}

impl MutationKind {
    pub fn from_event_name(name: &str) -> Option<Self> {
        match name {
            "TextChanged" => Some(Self::TextChanged),
            "InsertLeave" => Some(Self::InsertLeave),
            "BufWritePost" => Some(Self::BufWritePost),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TextChanged => "TextChanged",
            Self::InsertLeave => "InsertLeave",
            Self::BufWritePost => "BufWritePost",
        }
    }
}

/// A buffer edit that invalidates any in-flight folding request for it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationEvent {
    pub kind: MutationKind,
    pub buffer: BufferId,
}

impl MutationEvent {
    pub fn new(kind: MutationKind, buffer: BufferId) -> Self {
        Self { kind, buffer }
    }
}

#[async_trait]
pub trait DocumentRegistry: Send + Sync {
    /// Look up the document for a buffer; `None` when the host has not loaded it.
    async fn get_document(&self, buffer: BufferId) -> Result<Option<Document>>;

    /// Push pending editor-side edits to the provider-visible state.
    async fn synchronize(&self, document: &Document) -> Result<()>;
}

#[async_trait]
pub trait CapabilityRegistry: Send + Sync {
    async fn has_provider(&self, capability: &str, document: &TextDocument) -> Result<bool>;
}

#[async_trait]
pub trait FoldingRangeProvider: Send + Sync {
    /// Ask the language provider for folding ranges. The token is advisory:
    /// callers discard results produced after cancellation.
    async fn provide_folding_ranges(
        &self,
        document: &TextDocument,
        options: &FoldingRangeOptions,
        token: &CancellationToken,
    ) -> Result<Option<Vec<FoldingRange>>>;
}

/// The external fold-rendering engine.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn notify_init(&self) -> Result<()>;
    async fn notify_dispose(&self) -> Result<()>;
}
