use tracing::{debug, error, info};

use super::dedup::DedupState;
use crate::error::{BotError, BotResult};
use crate::homework::{check_response, parse_status};
use crate::practicum::PracticumApi;
use crate::telegram::TelegramBot;

const FAILURE_PREFIX: &str = "Program failure: ";

/// One fetch → check → parse → notify pass. Never fails; errors are reported.
pub(crate) async fn run_cycle(
    api: &PracticumApi,
    bot: &TelegramBot,
    from_date: i64,
    state: &mut DedupState,
) {
    if let Err(e) = check_and_notify(api, bot, from_date, state).await {
        report_error(bot, state, &e).await;
    }
}

async fn check_and_notify(
    api: &PracticumApi,
    bot: &TelegramBot,
    from_date: i64,
    state: &mut DedupState,
) -> BotResult<()> {
    let body = api.homework_statuses(from_date).await?;

    let Some(homework) = check_response(&body)? else {
        debug!(from_date, "no homework in the observation window");
        return Ok(());
    };

    let message = parse_status(&homework)?;
    if !state.is_new_status(&message) {
        debug!("status unchanged");
        return Ok(());
    }

    bot.send_message(&message).await?;
    info!(%message, "status change reported");
    state.previous_status = message;
    Ok(())
}

async fn report_error(bot: &TelegramBot, state: &mut DedupState, err: &BotError) {
    let text = err.to_string();
    error!("{FAILURE_PREFIX}{text}");

    if !state.is_new_error(&text) {
        debug!("same failure as last reported, not re-sending");
        return;
    }

    // a failed notice leaves previous_error untouched so the next cycle retries it
    match bot.send_message(&format!("{FAILURE_PREFIX}{text}")).await {
        Ok(()) => state.previous_error = text,
        Err(e) => error!(error = %e, "could not report failure to Telegram"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const STATUSES_PATH: &str = "/api/user_api/homework_statuses/";
    const SEND_PATH: &str = "/bottg-token/sendMessage";

    struct Harness {
        practicum: MockServer,
        telegram: MockServer,
        api: PracticumApi,
        bot: TelegramBot,
    }

    impl Harness {
        async fn start() -> Self {
            let practicum = MockServer::start().await;
            let telegram = MockServer::start().await;
            let client = reqwest::Client::new();
            let api = PracticumApi::new(
                client.clone(),
                format!("{}{STATUSES_PATH}", practicum.uri()),
                "p-token",
            );
            let bot = TelegramBot::with_api_base(client, telegram.uri(), "tg-token", "42");
            Self { practicum, telegram, api, bot }
        }

        async fn cycle(&self, state: &mut DedupState) {
            run_cycle(&self.api, &self.bot, 1000, state).await;
        }

        async fn sent_texts(&self) -> Vec<String> {
            self.telegram
                .received_requests()
                .await
                .unwrap_or_default()
                .iter()
                .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
                .filter_map(|v| v["text"].as_str().map(str::to_string))
                .collect()
        }
    }

    fn statuses(body: Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(body)
    }

    fn telegram_ok() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({"ok": true, "result": {}}))
    }

    #[tokio::test]
    async fn unchanged_status_is_sent_once() {
        let h = Harness::start().await;
        Mock::given(method("GET"))
            .and(path(STATUSES_PATH))
            .respond_with(statuses(json!({
                "homeworks": [{"status": "approved", "homework_name": "Proj1"}],
                "current_date": 1000
            })))
            .mount(&h.practicum)
            .await;
        Mock::given(method("POST"))
            .and(path(SEND_PATH))
            .respond_with(telegram_ok())
            .expect(1)
            .mount(&h.telegram)
            .await;

        let mut state = DedupState::default();
        h.cycle(&mut state).await;
        h.cycle(&mut state).await;

        let expected =
            "Status changed for submission \"Proj1\". Работа проверена: ревьюеру всё понравилось. Ура!";
        assert_eq!(h.sent_texts().await, vec![expected.to_string()]);
        assert_eq!(state.previous_status, expected);
    }

    #[tokio::test]
    async fn new_status_is_sent_again() {
        let h = Harness::start().await;
        Mock::given(method("GET"))
            .respond_with(statuses(json!({
                "homeworks": [{"status": "reviewing", "homework_name": "Proj1"}],
                "current_date": 1000
            })))
            .up_to_n_times(1)
            .mount(&h.practicum)
            .await;
        Mock::given(method("GET"))
            .respond_with(statuses(json!({
                "homeworks": [{"status": "rejected", "homework_name": "Proj1"}],
                "current_date": 1000
            })))
            .mount(&h.practicum)
            .await;
        Mock::given(method("POST")).respond_with(telegram_ok()).expect(2).mount(&h.telegram).await;

        let mut state = DedupState::default();
        h.cycle(&mut state).await;
        h.cycle(&mut state).await;

        let sent = h.sent_texts().await;
        assert!(sent[0].ends_with("Работа взята на проверку ревьюером."));
        assert!(sent[1].ends_with("Работа проверена: у ревьюера есть замечания."));
    }

    #[tokio::test]
    async fn empty_homeworks_sends_nothing() {
        let h = Harness::start().await;
        Mock::given(method("GET"))
            .respond_with(statuses(json!({"homeworks": [], "current_date": 1000})))
            .mount(&h.practicum)
            .await;
        Mock::given(method("POST")).respond_with(telegram_ok()).expect(0).mount(&h.telegram).await;

        let mut state = DedupState::default();
        h.cycle(&mut state).await;

        assert!(state.previous_status.is_empty());
        assert!(state.previous_error.is_empty());
    }

    #[tokio::test]
    async fn repeated_error_is_reported_once_until_it_changes() {
        let h = Harness::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .up_to_n_times(2)
            .mount(&h.practicum)
            .await;
        Mock::given(method("GET"))
            .respond_with(statuses(json!({"homeworks": []})))
            .mount(&h.practicum)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"chat_id": "42"})))
            .respond_with(telegram_ok())
            .expect(2)
            .mount(&h.telegram)
            .await;

        let mut state = DedupState::default();
        for _ in 0..3 {
            h.cycle(&mut state).await;
        }

        let sent = h.sent_texts().await;
        assert_eq!(sent.len(), 2);
        assert!(sent[0].starts_with("Program failure: homework API request failed"));
        assert_eq!(sent[1], "Program failure: unexpected API response: 'current_date' is absent");
        assert_eq!(state.previous_error, "unexpected API response: 'current_date' is absent");
    }

    #[tokio::test]
    async fn unknown_status_is_reported_as_failure() {
        let h = Harness::start().await;
        Mock::given(method("GET"))
            .respond_with(statuses(json!({
                "homeworks": [{"status": "lost", "homework_name": "Proj1"}],
                "current_date": 1000
            })))
            .mount(&h.practicum)
            .await;
        Mock::given(method("POST")).respond_with(telegram_ok()).expect(1).mount(&h.telegram).await;

        let mut state = DedupState::default();
        h.cycle(&mut state).await;
        h.cycle(&mut state).await;

        assert_eq!(h.sent_texts().await, vec!["Program failure: unknown homework status: lost"]);
        assert!(state.previous_status.is_empty());
    }

    #[tokio::test]
    async fn failed_status_delivery_is_retried_next_cycle() {
        let h = Harness::start().await;
        Mock::given(method("GET"))
            .respond_with(statuses(json!({
                "homeworks": [{"status": "approved", "homework_name": "Proj1"}],
                "current_date": 1000
            })))
            .mount(&h.practicum)
            .await;
        // status send fails, the failure notice fails too, then Telegram recovers
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_json(json!({"ok": false})))
            .up_to_n_times(2)
            .mount(&h.telegram)
            .await;
        Mock::given(method("POST")).respond_with(telegram_ok()).mount(&h.telegram).await;

        let mut state = DedupState::default();
        h.cycle(&mut state).await;
        assert!(state.previous_status.is_empty());
        assert!(state.previous_error.is_empty());

        h.cycle(&mut state).await;
        assert!(state.previous_status.starts_with("Status changed for submission \"Proj1\""));
        assert_eq!(h.sent_texts().await.len(), 3);
    }
}
