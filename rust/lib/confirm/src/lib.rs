//! Await-able confirmation prompts.
//!
//! A caller that needs a yes/no decision posts a [`ConfirmOptions`] to
//! the [`Confirmer`] and awaits the returned [`PendingConfirm`]. The
//! side that owns the screen observes [`Confirmer::pending`], renders
//! the prompt, and settles it with [`Confirmer::resolve`]. The two
//! sides share only the `Confirmer` handle, so business code never
//! touches the terminal and the renderer never sees business logic.
//!
//! One prompt can be open at a time. A second request while one is
//! pending is rejected with [`ConfirmError::AlreadyPending`] instead of
//! silently replacing the first prompt and leaving its caller hanging.
//! Dropping the `Confirmer` settles any open prompt as declined.

use tokio::sync::{oneshot, watch};

/// Visual weight of the confirm action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    /// The action is irreversible; renderers show the confirm choice
    /// as dangerous and default to declining.
    Destructive,
}

/// What the prompt shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOptions {
    pub title: String,
    pub description: Option<String>,
    pub confirm_label: String,
    pub cancel_label: String,
    pub tone: Tone,
}

impl ConfirmOptions {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            tone: Tone::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn labels(mut self, confirm: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.confirm_label = confirm.into();
        self.cancel_label = cancel.into();
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfirmError {
    #[error("another confirmation is already waiting for an answer")]
    AlreadyPending,
}

struct PendingState {
    options: ConfirmOptions,
    reply: oneshot::Sender<bool>,
}

/// The caller's half of an open prompt. Await [`PendingConfirm::wait`]
/// for the decision; a prompt torn down without an answer reads as
/// declined.
#[derive(Debug)]
pub struct PendingConfirm {
    rx: oneshot::Receiver<bool>,
}

impl PendingConfirm {
    pub async fn wait(self) -> bool {
        self.rx.await.unwrap_or(false)
    }
}

/// Single-slot confirmation broker.
pub struct Confirmer {
    pending: std::sync::Mutex<Option<PendingState>>,
    visible: watch::Sender<bool>,
}

impl Confirmer {
    pub fn new() -> Self {
        let (visible, _) = watch::channel(false);
        Self {
            pending: std::sync::Mutex::new(None),
            visible,
        }
    }

    /// Open a prompt. Fails if one is already waiting.
    pub fn request(&self, options: ConfirmOptions) -> Result<PendingConfirm, ConfirmError> {
        let mut slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return Err(ConfirmError::AlreadyPending);
        }
        let (reply, rx) = oneshot::channel();
        *slot = Some(PendingState { options, reply });
        self.visible.send_replace(true);
        Ok(PendingConfirm { rx })
    }

    /// The prompt currently waiting for an answer, if any.
    pub fn pending(&self) -> Option<ConfirmOptions> {
        let slot = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        slot.as_ref().map(|state| state.options.clone())
    }

    pub fn is_open(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    /// Settle the open prompt. Returns false when nothing was pending.
    pub fn resolve(&self, accepted: bool) -> bool {
        let state = self
            .pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        match state {
            Some(state) => {
                // The caller may have stopped waiting; that is fine.
                let _ = state.reply.send(accepted);
                self.visible.send_replace(false);
                true
            }
            None => false,
        }
    }

    /// Settle the open prompt as declined.
    pub fn dismiss(&self) -> bool {
        self.resolve(false)
    }

    /// Watch channel that flips to true while a prompt is open.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.visible.subscribe()
    }
}

impl Default for Confirmer {
    fn default() -> Self {
        Self::new()
    }
}
