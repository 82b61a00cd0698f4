use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::practicum::PracticumApi;
use crate::telegram::TelegramBot;

mod cycle;
mod dedup;

use cycle::run_cycle;
use dedup::DedupState;

pub const RETRY_PERIOD: Duration = Duration::from_secs(600);

/// How far back the first (and every) request looks.
pub const OBSERVATION_WINDOW: Duration = Duration::from_secs(60 * 60 * 24 * 120);

/// Lower bound for `from_date`, computed once at startup.
pub fn initial_cursor(now: SystemTime) -> i64 {
    let now = now.duration_since(UNIX_EPOCH).unwrap_or_default().as_secs() as i64;
    now - OBSERVATION_WINDOW.as_secs() as i64
}

/// Polls until `shutdown` completes. The cursor is never advanced, every
/// cycle asks for the same window.
///
/// `shutdown` is polled once for the whole run and raced against both the
/// cycle and the sleep, so a signal arriving mid-request is not lost.
pub async fn run_poll_loop<F>(
    api: &PracticumApi,
    bot: &TelegramBot,
    retry_period: Duration,
    shutdown: F,
) where
    F: Future<Output = ()>,
{
    let from_date = initial_cursor(SystemTime::now());
    let mut state = DedupState::default();

    info!(from_date, retry_secs = retry_period.as_secs(), "polling homework statuses");

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                info!("interrupted, stopping");
                return;
            }
            _ = async {
                run_cycle(api, bot, from_date, &mut state).await;
                sleep(retry_period).await;
            } => {}
        }
    }
}

/// Completes on Ctrl-C; never completes if the handler cannot be installed.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
}
