mod config;
mod error;
mod homework;
mod logging;
mod poller;
mod practicum;
mod telegram;

use anyhow::Result;
use config::BotConfig;
use poller::{RETRY_PERIOD, ctrl_c, run_poll_loop};
use practicum::PracticumApi;
use std::time::Duration;
use telegram::TelegramBot;
use tracing::{error, info};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let _log_guard = logging::init(logging::LOG_FILE_PATH)?;

    let config = BotConfig::from_env().inspect_err(|e| error!("{e}"))?;
    info!(config = ?config.redacted(), "starting homework status bot");

    let client = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;

    let api = PracticumApi::new(client.clone(), practicum::ENDPOINT, &config.practicum_token);
    let bot = TelegramBot::new(client, &config.telegram_token, &config.telegram_chat_id);

    run_poll_loop(&api, &bot, RETRY_PERIOD, ctrl_c()).await;
    Ok(())
}
