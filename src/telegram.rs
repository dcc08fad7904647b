//! Telegram Bot API transport
//!
//! Long polling via `getUpdates` and replies via `sendMessage`.

mod types;

use crate::bot::{ChatTransport, Inbound, Update};
use crate::state_machine::Reply;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use types::{GetUpdatesRequest, ReplyKeyboardMarkup, SendMessageRequest, TgResponse, TgUpdate};

/// Extra time on top of the long-poll timeout before the HTTP call gives up
const HTTP_GRACE: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum TransportError {
    /// Request URL is stripped: it contains the bot token
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),
    #[error("Telegram API error: {description}")]
    Api { description: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        TransportError::Http(e.without_url())
    }
}

/// Bot API client bound to one token
pub struct TelegramClient {
    client: Client,
    base_url: String,
    poll_timeout: Duration,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str, poll_timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(poll_timeout + HTTP_GRACE).build()?;
        Ok(Self {
            client,
            base_url: format!("{}/bot{token}", api_url.trim_end_matches('/')),
            poll_timeout,
        })
    }

    async fn call<B, R>(&self, method: &str, body: &B) -> Result<R, TransportError>
    where
        B: Serialize + Sync + ?Sized,
        R: DeserializeOwned + Send,
    {
        let url = format!("{}/{method}", self.base_url);
        let response: TgResponse<R> = self.client.post(&url).json(body).send().await?.json().await?;
        into_result(response)
    }
}

fn into_result<R>(response: TgResponse<R>) -> Result<R, TransportError> {
    if !response.ok {
        return Err(TransportError::Api {
            description: response
                .description
                .unwrap_or_else(|| "unknown error".to_string()),
        });
    }
    response.result.ok_or_else(|| TransportError::Api {
        description: "response without result".to_string(),
    })
}

/// Keep only text messages that have a sender; other updates still advance the offset.
fn to_update(update: TgUpdate) -> Update {
    let message = update.message.and_then(|message| {
        let from = message.from?;
        let text = message.text?;
        Some(Inbound {
            chat_id: message.chat.id,
            user_id: from.id,
            text,
        })
    });
    Update {
        id: update.update_id,
        message,
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn poll(&self, offset: Option<i64>) -> Result<Vec<Update>, TransportError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: self.poll_timeout.as_secs(),
            allowed_updates: &["message"],
        };
        let updates: Vec<TgUpdate> = self.call("getUpdates", &request).await?;
        Ok(updates.into_iter().map(to_update).collect())
    }

    async fn send(&self, chat_id: i64, reply: &Reply) -> Result<(), TransportError> {
        let request = SendMessageRequest {
            chat_id,
            text: &reply.text,
            reply_markup: reply.keyboard.as_ref().map(ReplyKeyboardMarkup::from),
        };
        let _: serde_json::Value = self.call("sendMessage", &request).await?;
        Ok(())
    }
}
