use crate::bridge::{Channel, ChannelCodec, ChannelMessage};
use crate::folding::{Collaborators, FoldingOrchestrator};
use crate::host::{BufferId, ChannelHost, MutationEvent, MutationKind};
use crate::utils::{Config, Error, Result};
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::FramedRead;
use tracing::{debug, error, info, warn};

/// Notification the editor sends before it goes away
const EXIT_NOTIFICATION: &str = "exit";

#[derive(Debug, Deserialize)]
pub struct FoldingRangeParams {
    pub bufnr: BufferId,
    #[serde(default)]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BufferParams {
    bufnr: BufferId,
}

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Serves the folding command over a Vim channel.
///
/// Mutation notifications are handled inline, so an edit is fully processed
/// before any later line is read; command invocations run as tasks so replies
/// to our own calls keep flowing while they wait.
pub struct BridgeServer {
    config: Config,
    channel: Arc<Channel>,
    orchestrator: Arc<FoldingOrchestrator>,
}

impl BridgeServer {
    pub fn new<W>(config: Config, writer: W) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let channel = Arc::new(Channel::new(writer, config.channel.call_timeout()));
        let host = Arc::new(ChannelHost::new(
            channel.clone(),
            config.host.module.clone(),
            config.render.module.clone(),
        ));
        let orchestrator = Arc::new(FoldingOrchestrator::new(
            Collaborators::from_host(host),
            &config.folding,
        ));

        Self {
            config,
            channel,
            orchestrator,
        }
    }

    pub fn orchestrator(&self) -> &Arc<FoldingOrchestrator> {
        &self.orchestrator
    }

    /// Run until the editor exits or closes the stream.
    pub async fn run<R>(&self, reader: R) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        self.orchestrator.start().await?;

        let codec = ChannelCodec::new(self.config.channel.max_message_size);
        let mut lines = FramedRead::new(reader, codec);

        while let Some(line) = lines.next().await {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    error!("Channel read error: {}", e);
                    break;
                }
            };

            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match ChannelMessage::parse(line) {
                Ok(msg) => {
                    if self.dispatch(msg).await == Flow::Exit {
                        info!("Editor requested exit");
                        break;
                    }
                }
                Err(e) => warn!("Ignoring malformed message {}: {}", line, e),
            }
        }

        if let Err(e) = self.orchestrator.dispose().await {
            warn!("Dispose notification failed: {}", e);
        }
        self.channel.close();
        info!("Bridge stopped");
        Ok(())
    }

    async fn dispatch(&self, msg: ChannelMessage) -> Flow {
        match msg {
            ChannelMessage::Request { id, method, params } => {
                self.handle_request(id, method, params).await;
            }
            ChannelMessage::Response { id, result } => {
                self.channel.resolve(id, result);
            }
            ChannelMessage::Notification { method, params } => {
                return self.handle_notification(&method, params);
            }
            ChannelMessage::Call { .. } | ChannelMessage::CallAsync { .. } => {
                warn!("Received outgoing command message, ignoring");
            }
        }
        Flow::Continue
    }

    async fn handle_request(&self, id: u64, method: String, params: Value) {
        if method != self.config.folding.command {
            let reply = json!({"error": format!("Unknown method: {}", method)});
            if let Err(e) = self.channel.respond(id, reply).await {
                error!("Failed to reply to request {}: {}", id, e);
            }
            return;
        }

        let params: FoldingRangeParams = match serde_json::from_value(params) {
            Ok(params) => params,
            Err(e) => {
                let reply = error_reply(&Error::from(e));
                if let Err(e) = self.channel.respond(id, reply).await {
                    error!("Failed to reply to request {}: {}", id, e);
                }
                return;
            }
        };

        let orchestrator = self.orchestrator.clone();
        let channel = self.channel.clone();
        tokio::spawn(async move {
            debug!("Folding request {} for buffer {}", id, params.bufnr);
            let reply = match orchestrator
                .folding_range(params.bufnr, params.kind.as_deref())
                .await
            {
                Ok(Some(ranges)) => json!(ranges),
                Ok(None) => Value::Null,
                Err(e) => {
                    if !e.is_fallback() {
                        warn!("Folding request {} failed: {}", id, e);
                    }
                    error_reply(&e)
                }
            };
            if let Err(e) = channel.respond(id, reply).await {
                error!("Failed to reply to request {}: {}", id, e);
            }
        });
    }

    fn handle_notification(&self, method: &str, params: Value) -> Flow {
        if method == EXIT_NOTIFICATION {
            return Flow::Exit;
        }

        let Some(kind) = MutationKind::from_event_name(method) else {
            debug!("Ignoring notification {}", method);
            return Flow::Continue;
        };

        match serde_json::from_value::<BufferParams>(params) {
            Ok(params) => self
                .orchestrator
                .handle_event(MutationEvent::new(kind, params.bufnr)),
            Err(e) => warn!("Invalid {} params: {}", method, e),
        }
        Flow::Continue
    }
}

fn error_reply(e: &Error) -> Value {
    json!({"error": e.to_string()})
}
