//! Poll loop connecting the chat transport to the dialogue controller
//!
//! Updates are handled strictly in order, one message at a time.

use crate::dialogue::{CashbackStore, DialogueController};
use crate::session::{SessionStore, UserId};
use crate::state_machine::Reply;
use crate::telegram::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Pause before polling again after a transport failure
const POLL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// A text message from a user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inbound {
    pub chat_id: i64,
    pub user_id: UserId,
    pub text: String,
}

/// One transport update. `message` is `None` for anything that is not text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub id: i64,
    pub message: Option<Inbound>,
}

/// Chat delivery mechanism
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Wait for updates with ids at or above `offset`
    async fn poll(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError>;

    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<(), TransportError>;
}

pub struct BotRunner<T, C, S>
where
    T: ChatTransport,
    C: CashbackStore,
    S: SessionStore,
{
    transport: T,
    controller: DialogueController<C, S>,
    cancel: CancellationToken,
    retry_delay: Duration,
}

impl<T, C, S> BotRunner<T, C, S>
where
    T: ChatTransport,
    C: CashbackStore,
    S: SessionStore,
{
    pub fn new(transport: T, controller: DialogueController<C, S>, cancel: CancellationToken) -> Self {
        Self {
            transport,
            controller,
            cancel,
            retry_delay: POLL_RETRY_DELAY,
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Poll until cancelled. A batch in progress is finished first.
    pub async fn run(&self) {
        tracing::info!("Bot polling started");
        let mut offset = None;

        loop {
            let batch = tokio::select! {
                biased;
                () = self.cancel.cancelled() => break,
                batch = self.transport.poll(offset) => batch,
            };

            match batch {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.id + 1);
                        if let Some(message) = update.message {
                            self.dispatch(message).await;
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Polling failed");
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => break,
                        () = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
        }

        tracing::info!("Bot polling stopped");
    }

    async fn dispatch(&self, message: Inbound) {
        let replies = self.controller.handle(message.user_id, &message.text).await;
        for reply in &replies {
            if let Err(e) = self.transport.send(message.chat_id, reply).await {
                tracing::warn!(chat_id = message.chat_id, error = %e, "Failed to send reply");
            }
        }
    }
}
