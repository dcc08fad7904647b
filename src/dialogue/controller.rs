//! Per-message processing loop

use super::traits::CashbackStore;
use crate::menu::text;
use crate::session::{SessionError, SessionStore, UserId};
use crate::state_machine::{
    classify, transition, DialogState, Effect, Event, NextState, Reply, StoreOp, StoreOutcome,
    StoreRequest,
};
use std::collections::VecDeque;
use thiserror::Error;

/// Failures that escape the state machine
#[derive(Debug, Error)]
pub enum DialogueError {
    /// `committed` names a store write that already went through
    #[error("session store failed: {source}")]
    Session {
        #[source]
        source: SessionError,
        committed: Option<StoreOp>,
    },
}

impl DialogueError {
    fn after(committed: Option<StoreOp>) -> impl FnOnce(SessionError) -> Self {
        move |source| DialogueError::Session { source, committed }
    }

    pub fn committed_write(&self) -> Option<StoreOp> {
        match self {
            DialogueError::Session { committed, .. } => *committed,
        }
    }
}

impl From<SessionError> for DialogueError {
    fn from(source: SessionError) -> Self {
        DialogueError::Session {
            source,
            committed: None,
        }
    }
}

/// Drives one user message through classification, transitions and store calls
pub struct DialogueController<C, S>
where
    C: CashbackStore,
    S: SessionStore,
{
    store: C,
    sessions: S,
}

impl<C, S> DialogueController<C, S>
where
    C: CashbackStore,
    S: SessionStore,
{
    pub fn new(store: C, sessions: S) -> Self {
        Self { store, sessions }
    }

    #[allow(dead_code)] // Used in tests
    pub fn sessions(&self) -> &S {
        &self.sessions
    }

    /// Handle one inbound text message and return the replies to send.
    ///
    /// Never fails: unexpected errors are logged and turned into a generic
    /// notice so the process keeps serving other users.
    pub async fn handle(&self, user: UserId, message: &str) -> Vec<Reply> {
        match self.process(user, message).await {
            Ok(replies) => replies,
            Err(e) => {
                tracing::error!(
                    user_id = user,
                    error = %e,
                    committed_write = ?e.committed_write(),
                    "Failed to handle message"
                );
                vec![Reply {
                    text: text::UNEXPECTED_FAILURE.to_string(),
                    keyboard: None,
                }]
            }
        }
    }

    async fn process(&self, user: UserId, message: &str) -> Result<Vec<Reply>, DialogueError> {
        let mut state = self.sessions.get(user).await?;

        let Some(command) = classify(message, state.as_ref()) else {
            tracing::debug!(
                user_id = user,
                state = state.as_ref().map_or("none", DialogState::name),
                "Ignoring message"
            );
            return Ok(vec![]);
        };

        let mut replies = Vec::new();
        let mut events = VecDeque::from([Event::Command(command)]);
        let mut committed = None;

        while let Some(event) = events.pop_front() {
            let result = transition(state.as_ref(), event);

            match result.next {
                NextState::Keep => {}
                NextState::Set(next) => {
                    tracing::debug!(
                        user_id = user,
                        from = state.as_ref().map_or("none", DialogState::name),
                        to = next.name(),
                        "State transition"
                    );
                    self.sessions
                        .set(user, next.clone())
                        .await
                        .map_err(DialogueError::after(committed))?;
                    state = Some(next);
                }
                NextState::Clear => {
                    tracing::debug!(user_id = user, "Session cleared");
                    self.sessions
                        .clear(user)
                        .await
                        .map_err(DialogueError::after(committed))?;
                    state = None;
                }
            }

            for effect in result.effects {
                match effect {
                    Effect::Reply(reply) => replies.push(reply),
                    Effect::Store(request) => {
                        let write = request.is_write().then(|| request.op());
                        let event = self.execute_store(request).await;
                        if matches!(event, Event::StoreCompleted(_)) {
                            committed = committed.or(write);
                        }
                        events.push_back(event);
                    }
                }
            }
        }

        Ok(replies)
    }

    /// Run a store request and report its result as an event.
    async fn execute_store(&self, request: StoreRequest) -> Event {
        let op = request.op();
        let outcome = match request {
            StoreRequest::Upsert {
                bank,
                category,
                percentage,
            } => self
                .store
                .upsert(bank, &category, percentage)
                .await
                .map(|()| StoreOutcome::Upserted {
                    bank,
                    category,
                    percentage,
                }),

            StoreRequest::UpdatePercentage {
                bank,
                category,
                percentage,
            } => self
                .store
                .update_percentage(bank, &category, percentage)
                .await
                .map(|rows| {
                    if rows == 0 {
                        // entry vanished between lookup and update
                        tracing::warn!(%bank, %category, "Percentage update matched no rows");
                    }
                    StoreOutcome::Updated {
                        bank,
                        category,
                        percentage,
                        rows,
                    }
                }),

            StoreRequest::Delete { bank, category } => self
                .store
                .delete(bank, &category)
                .await
                .map(|_| StoreOutcome::Deleted { bank, category }),

            StoreRequest::ListByBank { bank, listing } => self
                .store
                .list_by_bank(bank)
                .await
                .map(|entries| StoreOutcome::BankListed {
                    bank,
                    listing,
                    entries,
                }),

            StoreRequest::ListDistinctCategories => self
                .store
                .list_distinct_categories()
                .await
                .map(|categories| StoreOutcome::CategoriesListed { categories }),

            StoreRequest::FindOne { bank, category } => self
                .store
                .find_one(bank, &category)
                .await
                .map(|entry| StoreOutcome::EntryLookedUp {
                    bank,
                    category,
                    entry,
                }),

            StoreRequest::ListByCategoryRanked { category } => self
                .store
                .list_by_category_ranked(&category)
                .await
                .map(|entries| StoreOutcome::Ranked { category, entries }),
        };

        match outcome {
            Ok(outcome) => Event::StoreCompleted(outcome),
            Err(e) => {
                tracing::error!(error = %e, ?op, "Store request failed");
                Event::StoreFailed { op }
            }
        }
    }
}
