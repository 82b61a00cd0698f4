use crate::config::{Redacted, env_parsing};
use crate::error::{BotError, BotResult};

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Clone)]
pub struct BotConfig {
    /// OAuth token for the Practicum homework API
    pub practicum_token: String,
    pub telegram_token: String,
    /// Chat that receives every notification
    pub telegram_chat_id: String,
}

impl BotConfig {
    pub fn from_env() -> BotResult<Self> {
        let _ = dotenvy::from_filename(".env");
        Self::from_lookup(env_parsing::opt)
    }

    /// Builds the config from any key lookup; every absent key is reported at once.
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let missing =
            env_parsing::missing(&[PRACTICUM_TOKEN, TELEGRAM_TOKEN, TELEGRAM_CHAT_ID], &lookup);
        if !missing.is_empty() {
            return Err(BotError::Config(format!(
                "missing required env: {}",
                missing.join(", ")
            )));
        }

        let required = |key: &str| {
            lookup(key).ok_or_else(|| BotError::Config(format!("missing required env: {key}")))
        };

        Ok(Self {
            practicum_token: required(PRACTICUM_TOKEN)?,
            telegram_token: required(TELEGRAM_TOKEN)?,
            telegram_chat_id: required(TELEGRAM_CHAT_ID)?,
        })
    }

    pub fn redacted(&self) -> Redacted<'_> {
        Redacted(self)
    }
}
