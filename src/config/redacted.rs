use super::BotConfig;

pub struct Redacted<'a>(pub(crate) &'a BotConfig);

impl std::fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = self.0;
        f.debug_struct("BotConfig")
            .field("practicum_token", &mask(&c.practicum_token))
            .field("telegram_token", &mask(&c.telegram_token))
            .field("telegram_chat_id", &c.telegram_chat_id)
            .finish()
    }
}

fn mask(s: &str) -> String {
    match s.char_indices().nth(3) {
        Some((cut, _)) if s.chars().count() > 6 => format!("{}***", &s[..cut]),
        _ => "***".into(),
    }
}
