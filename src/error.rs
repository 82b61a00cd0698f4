//! Error kinds raised while polling the homework API and talking to Telegram.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    /// Required environment is missing; fatal before the loop starts.
    #[error("configuration error: {0}")]
    Config(String),

    #[error("homework API request failed: {0}")]
    Fetch(String),

    #[error("unexpected API response: {0}")]
    Schema(String),

    #[error("missing value: {0}")]
    MissingValue(String),

    #[error("type mismatch: {0}")]
    Type(String),

    #[error("unknown homework status: {0}")]
    UnknownStatus(String),

    #[error("failed to send Telegram message: {0}")]
    Notify(String),
}

pub type BotResult<T> = Result<T, BotError>;
