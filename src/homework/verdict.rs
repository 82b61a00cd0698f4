use std::fmt::Display;
use std::str::FromStr;

use serde_json::Value;
use tracing::{debug, error};

use super::Homework;
use crate::error::{BotError, BotResult};

/// Stand-in for a record that arrives without `homework_name`.
pub const UNNAMED_HOMEWORK: &str = "unnamed";

/// Review outcome reported by the API.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    /// Localized text sent to the chat.
    pub fn text(self) -> &'static str {
        match self {
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Reviewing => "Работа взята на проверку ревьюером.",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for Verdict {
    type Err = BotError;

    fn from_str(s: &str) -> BotResult<Self> {
        match s {
            "approved" => Ok(Self::Approved),
            "reviewing" => Ok(Self::Reviewing),
            "rejected" => Ok(Self::Rejected),
            other => Err(BotError::UnknownStatus(other.to_string())),
        }
    }
}

impl Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Verdict::Approved => "approved",
            Verdict::Reviewing => "reviewing",
            Verdict::Rejected => "rejected",
        };

        write!(f, "{}", s)
    }
}

/// Builds the chat message for a homework record.
pub fn parse_status(homework: &Homework) -> BotResult<String> {
    let Some(status) = homework.status.as_ref() else {
        let err = BotError::Schema("'status' is absent in homework record".into());
        error!("{err}");
        return Err(err);
    };

    let name = match homework.homework_name.as_deref() {
        Some(name) => name,
        None => {
            error!("'homework_name' is absent in homework record");
            UNNAMED_HOMEWORK
        }
    };

    // null or a non-string status is just another value outside the table
    let verdict = match status {
        Value::String(s) => s.parse::<Verdict>(),
        other => Err(BotError::UnknownStatus(other.to_string())),
    }
    .inspect_err(|e| error!("{e}"))?;
    debug!(%verdict, name, "parsed homework status");
    Ok(format!("Status changed for submission \"{name}\". {}", verdict.text()))
}
