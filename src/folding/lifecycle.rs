use crate::host::RenderEngine;
use crate::utils::Result;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Running,
    Disposed,
}

/// Sends the renderer its init and dispose notifications, each at most once.
pub struct LifecycleNotifier {
    engine: Arc<dyn RenderEngine>,
    state: Mutex<LifecycleState>,
}

impl LifecycleNotifier {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self {
            engine,
            state: Mutex::new(LifecycleState::Idle),
        }
    }

    pub fn state(&self) -> LifecycleState {
        *self.state.lock()
    }

    pub async fn notify_init(&self) -> Result<()> {
        if !self.transition(LifecycleState::Idle, LifecycleState::Running) {
            debug!("Render engine already initialized, skipping");
            return Ok(());
        }
        info!("Notifying render engine of startup");
        self.engine.notify_init().await
    }

    /// Awaits the dispose notification. Valid from any state but only sent once.
    pub async fn notify_dispose(&self) -> Result<()> {
        {
            let mut state = self.state.lock();
            if *state == LifecycleState::Disposed {
                debug!("Render engine already disposed, skipping");
                return Ok(());
            }
            *state = LifecycleState::Disposed;
        }
        info!("Notifying render engine of teardown");
        self.engine.notify_dispose().await
    }

    fn transition(&self, from: LifecycleState, to: LifecycleState) -> bool {
        let mut state = self.state.lock();
        if *state != from {
            return false;
        }
        *state = to;
        true
    }
}
