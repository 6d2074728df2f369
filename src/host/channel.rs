use crate::bridge::Channel;
use crate::folding::FoldingRange;
use crate::host::{
    BufferId, CapabilityRegistry, Document, DocumentRegistry, FoldingRangeOptions,
    FoldingRangeProvider, RenderEngine, TextDocument,
};
use crate::utils::{Error, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Collaborators implemented by Lua modules in the editor, reached with
/// `luaeval` over the channel.
pub struct ChannelHost {
    channel: Arc<Channel>,
    host_module: String,
    render_module: String,
}

impl ChannelHost {
    pub fn new(
        channel: Arc<Channel>,
        host_module: impl Into<String>,
        render_module: impl Into<String>,
    ) -> Self {
        Self {
            channel,
            host_module: host_module.into(),
            render_module: render_module.into(),
        }
    }

    fn lua_expr(module: &str, function: &str) -> String {
        format!("require('{}').{}(_A)", module, function)
    }

    async fn host_call<T: DeserializeOwned>(&self, function: &str, arg: Value) -> Result<T> {
        let expr = Self::lua_expr(&self.host_module, function);
        let result = self.channel.call("luaeval", vec![json!(expr), arg]).await?;

        if let Some(message) = result.get("error").and_then(Value::as_str) {
            return Err(Error::host(format!("{}: {}", function, message)));
        }
        Ok(serde_json::from_value(result)?)
    }
}

#[async_trait]
impl DocumentRegistry for ChannelHost {
    async fn get_document(&self, buffer: BufferId) -> Result<Option<Document>> {
        self.host_call("getDocument", json!(buffer)).await
    }

    async fn synchronize(&self, document: &Document) -> Result<()> {
        let _: Value = self
            .host_call("synchronize", json!(document.buffer))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl CapabilityRegistry for ChannelHost {
    async fn has_provider(&self, capability: &str, document: &TextDocument) -> Result<bool> {
        let present: Option<bool> = self
            .host_call(
                "hasProvider",
                json!({"capability": capability, "textDocument": document}),
            )
            .await?;
        Ok(present.unwrap_or(false))
    }
}

#[async_trait]
impl FoldingRangeProvider for ChannelHost {
    async fn provide_folding_ranges(
        &self,
        document: &TextDocument,
        options: &FoldingRangeOptions,
        token: &CancellationToken,
    ) -> Result<Option<Vec<FoldingRange>>> {
        // The editor cannot observe our token; skip the round trip if it is already moot
        if token.is_cancelled() {
            debug!("Skipping folding request for {}: cancelled", document.uri);
            return Ok(None);
        }
        self.host_call(
            "provideFoldingRanges",
            json!({"textDocument": document, "options": options}),
        )
        .await
    }
}

#[async_trait]
impl RenderEngine for ChannelHost {
    async fn notify_init(&self) -> Result<()> {
        let expr = Self::lua_expr(&self.render_module, "handleInitNotify");
        self.channel
            .call_async("luaeval", vec![json!(expr), json!([])])
            .await
    }

    async fn notify_dispose(&self) -> Result<()> {
        let expr = Self::lua_expr(&self.render_module, "handleDisposeNotify");
        self.channel
            .call_async("luaeval", vec![json!(expr), json!([])])
            .await
    }
}
