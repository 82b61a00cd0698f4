//! Telegram Bot API: sending plain-text messages to one chat

use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{BotError, BotResult};

pub const API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    description: Option<String>,
}

#[derive(Clone)]
pub struct TelegramBot {
    client: reqwest::Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramBot {
    pub fn new(
        client: reqwest::Client,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self::with_api_base(client, API_BASE, token, chat_id)
    }

    pub fn with_api_base(
        client: reqwest::Client,
        api_base: impl Into<String>,
        token: impl Into<String>,
        chat_id: impl Into<String>,
    ) -> Self {
        Self { client, api_base: api_base.into(), token: token.into(), chat_id: chat_id.into() }
    }

    /// Sends `text` to the configured chat. No retry.
    pub async fn send_message(&self, text: &str) -> BotResult<()> {
        debug!(chat_id = %self.chat_id, "sending Telegram message");

        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = SendMessage { chat_id: &self.chat_id, text };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            // the URL carries the bot token, keep it out of the error text
            .map_err(|e| fail(format!("request failed: {}", e.without_url())))?;

        let status = resp.status();
        let reply: ApiReply = resp
            .json()
            .await
            .map_err(|e| fail(format!("unreadable reply ({status}): {}", e.without_url())))?;

        if !status.is_success() || !reply.ok {
            let reason = reply.description.unwrap_or_else(|| "no description".into());
            return Err(fail(format!("Telegram answered {status}: {reason}")));
        }

        debug!("Telegram message sent");
        Ok(())
    }
}

fn fail(reason: String) -> BotError {
    let err = BotError::Notify(reason);
    error!("{err}");
    err
}
