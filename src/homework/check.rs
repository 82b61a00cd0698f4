use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::{error, warn};

use crate::error::{BotError, BotResult};

/// One entry of the `homeworks` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Homework {
    /// Raw value: `None` when the key is absent, `Some(Value::Null)` when it is null.
    #[serde(default, deserialize_with = "present")]
    pub status: Option<Value>,
    pub homework_name: Option<String>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Kind {
    List,
    Integer,
}

impl Kind {
    fn matches(self, value: &Value) -> bool {
        match self {
            Kind::List => value.is_array(),
            Kind::Integer => value.is_i64() || value.is_u64(),
        }
    }

    fn name(self) -> &'static str {
        match self {
            Kind::List => "list",
            Kind::Integer => "integer",
        }
    }
}

/// Checked in this order; the first failing key decides the error.
const REQUIRED_KEYS: [(&str, Kind); 2] =
    [("homeworks", Kind::List), ("current_date", Kind::Integer)];

/// Validates the API body and returns the most recent homework, or `None`
/// when the list is empty.
pub fn check_response(body: &Value) -> BotResult<Option<Homework>> {
    let object = body.as_object().ok_or_else(|| {
        logged(BotError::Type("response body is not a JSON object".into()))
    })?;

    let mut homework = None;
    for (key, kind) in REQUIRED_KEYS {
        let value = required_field(object, key)?;
        warn_if_empty(key, value);
        check_kind(key, value, kind)?;
        if kind == Kind::List {
            homework = first_homework(value)?;
        }
    }
    Ok(homework)
}

fn required_field<'a>(object: &'a Map<String, Value>, key: &str) -> BotResult<&'a Value> {
    match object.get(key) {
        None => Err(logged(BotError::Schema(format!("'{key}' is absent")))),
        Some(Value::Null) => Err(logged(BotError::MissingValue(format!("null value in '{key}'")))),
        Some(value) => Ok(value),
    }
}

fn warn_if_empty(key: &str, value: &Value) {
    let empty = match value {
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Bool(b) => !b,
        Value::Null => true,
    };
    if empty {
        warn!("'{key}' value is empty");
    }
}

fn check_kind(key: &str, value: &Value, kind: Kind) -> BotResult<()> {
    if kind.matches(value) {
        Ok(())
    } else {
        Err(logged(BotError::Type(format!("'{key}' value is not a {}", kind.name()))))
    }
}

fn first_homework(list: &Value) -> BotResult<Option<Homework>> {
    let Some(first) = list.as_array().and_then(|items| items.first()) else {
        return Ok(None);
    };
    serde_json::from_value(first.clone())
        .map(Some)
        .map_err(|e| logged(BotError::Type(format!("malformed homework record: {e}"))))
}

fn logged(err: BotError) -> BotError {
    error!("{err}");
    err
}
