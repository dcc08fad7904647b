//! Per-user conversation state
//!
//! State is replaced wholesale on every transition. The in-memory store is
//! scoped to process uptime; nothing expires.

use crate::state_machine::DialogState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Chat-platform user identifier
pub type UserId = i64;

#[derive(Debug, Error)]
#[error("Session backend error: {0}")]
pub struct SessionError(pub String);

/// Storage for per-user dialogue state
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Current state, `None` when the user is at the top level
    async fn get(&self, user: UserId) -> Result<Option<DialogState>, SessionError>;

    /// Replace the stored state
    async fn set(&self, user: UserId, state: DialogState) -> Result<(), SessionError>;

    /// Return the user to the top level
    async fn clear(&self, user: UserId) -> Result<(), SessionError>;
}

#[async_trait]
impl<T: SessionStore + ?Sized> SessionStore for Arc<T> {
    async fn get(&self, user: UserId) -> Result<Option<DialogState>, SessionError> {
        (**self).get(user).await
    }

    async fn set(&self, user: UserId, state: DialogState) -> Result<(), SessionError> {
        (**self).set(user, state).await
    }

    async fn clear(&self, user: UserId) -> Result<(), SessionError> {
        (**self).clear(user).await
    }
}

/// Process-local session map
#[derive(Default)]
pub struct InMemorySessions {
    states: RwLock<HashMap<UserId, DialogState>>,
}

impl InMemorySessions {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)] // Used in tests
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessions {
    async fn get(&self, user: UserId) -> Result<Option<DialogState>, SessionError> {
        Ok(self.states.read().await.get(&user).cloned())
    }

    async fn set(&self, user: UserId, state: DialogState) -> Result<(), SessionError> {
        self.states.write().await.insert(user, state);
        Ok(())
    }

    async fn clear(&self, user: UserId) -> Result<(), SessionError> {
        self.states.write().await.remove(&user);
        Ok(())
    }
}
