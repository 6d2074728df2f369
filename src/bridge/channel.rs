use crate::bridge::message::ChannelMessage;
use crate::utils::{Error, Result};
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::time::Duration;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tracing::{debug, warn};

type Writer = Box<dyn AsyncWrite + Send + Unpin>;

/// Outgoing half of the Vim channel.
///
/// Writes one JSON line per message and correlates `[id, result]` replies to
/// pending calls. The read loop feeds replies in through [`Channel::resolve`].
pub struct Channel {
    writer: tokio::sync::Mutex<Writer>,
    pending: Mutex<HashMap<i64, oneshot::Sender<Value>>>,
    next_id: AtomicI64,
    closed: AtomicBool,
    call_timeout: Duration,
}

impl Channel {
    pub fn new<W>(writer: W, call_timeout: Duration) -> Self
    where
        W: AsyncWrite + Send + Unpin + 'static,
    {
        Self {
            writer: tokio::sync::Mutex::new(Box::new(writer)),
            pending: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(0),
            closed: AtomicBool::new(false),
            call_timeout,
        }
    }

    pub async fn send(&self, msg: &ChannelMessage) -> Result<()> {
        let line = format!("{}\n", msg.encode());
        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    /// Call a Vim function and wait for its result.
    pub async fn call(&self, func: &str, args: Vec<Value>) -> Result<Value> {
        if self.is_closed() {
            return Err(Error::ChannelClosed);
        }

        // Vim expects negative ids on channel commands
        let id = self.next_id.fetch_sub(1, Ordering::SeqCst) - 1;
        let (tx, rx) = oneshot::channel();
        self.pending.lock().insert(id, tx);

        let msg = ChannelMessage::Call {
            func: func.to_string(),
            args,
            id,
        };
        if let Err(e) = self.send(&msg).await {
            self.pending.lock().remove(&id);
            return Err(e);
        }

        match tokio::time::timeout(self.call_timeout, rx).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(_)) => Err(Error::ChannelClosed),
            Err(_) => {
                self.pending.lock().remove(&id);
                warn!("Call {} ({}) timed out", id, func);
                Err(Error::timeout())
            }
        }
    }

    /// Call a Vim function without waiting for a result.
    pub async fn call_async(&self, func: &str, args: Vec<Value>) -> Result<()> {
        if self.is_closed() {
            return Err(Error::ChannelClosed);
        }
        let msg = ChannelMessage::CallAsync {
            func: func.to_string(),
            args,
        };
        self.send(&msg).await
    }

    /// Answer a request Vim sent us.
    pub async fn respond(&self, id: u64, result: Value) -> Result<()> {
        let msg = ChannelMessage::Response {
            id: id as i64,
            result,
        };
        self.send(&msg).await
    }

    /// Hand a reply to the call waiting on `id`.
    pub fn resolve(&self, id: i64, result: Value) -> bool {
        match self.pending.lock().remove(&id) {
            Some(sender) => sender.send(result).is_ok(),
            None => {
                debug!("Reply for unknown call id {}", id);
                false
            }
        }
    }

    /// Fail every pending call and refuse new ones.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.pending.lock().clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn pending_calls(&self) -> usize {
        self.pending.lock().len()
    }
}
