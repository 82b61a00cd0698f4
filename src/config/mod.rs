mod bot_config;
mod env_parsing;
mod redacted;

pub use bot_config::BotConfig;
pub use redacted::Redacted;
