//! Practicum homework API client

use reqwest::StatusCode;
use reqwest::header::AUTHORIZATION;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::{BotError, BotResult};

pub const ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";

#[derive(Clone)]
pub struct PracticumApi {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl PracticumApi {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self { client, endpoint: endpoint.into(), token: token.into() }
    }

    /// Fetches homework statuses changed since `from_date` (Unix seconds).
    ///
    /// Returns the decoded body as-is; shape checks happen in `homework::check_response`.
    pub async fn homework_statuses(&self, from_date: i64) -> BotResult<Value> {
        debug!(from_date, endpoint = %self.endpoint, "requesting homework statuses");

        let resp = self
            .client
            .get(&self.endpoint)
            .header(AUTHORIZATION, format!("OAuth {}", self.token))
            .query(&[("from_date", from_date)])
            .send()
            .await
            .map_err(|e| fail(format!("request to {} failed: {e}", self.endpoint)))?;

        let status = resp.status();
        if status != StatusCode::OK {
            let text = resp.text().await.unwrap_or_default();
            return Err(fail(format!("{} answered {status}: {text}", self.endpoint)));
        }

        resp.json::<Value>()
            .await
            .map_err(|e| fail(format!("response body is not JSON: {e}")))
    }
}

fn fail(reason: String) -> BotError {
    error!("{reason}");
    BotError::Fetch(reason)
}
