use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single temperature value as reported by the upstream service.
///
/// The upstream answers `"unknown"` (or omits the field) when its sensor
/// file cannot be read, so anything that is not a JSON number is kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    Number(f64),
    Other(Value),
}

impl Measurement {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Measurement::Number(v) => Some(*v),
            Measurement::Other(_) => None,
        }
    }
}

impl Default for Measurement {
    fn default() -> Self {
        Measurement::Other(Value::Null)
    }
}

impl From<f64> for Measurement {
    fn from(value: f64) -> Self {
        Measurement::Number(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    #[serde(default)]
    pub celsius: Measurement,
    #[serde(default)]
    pub fahrenheit: Measurement,
    /// ISO-8601, `YYYY-MM-DD HH:MM:SS`, or the literal `"unknown"`.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// A question as the browser sent it. `query` is forwarded untouched:
/// `None` when the body had no such field, otherwise whatever JSON it held.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
}

impl Question {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: Some(Value::String(query.into())),
        }
    }

    /// Build from a request body without validating it; anything that is
    /// not a JSON object carrying `query` forwards as `{}`.
    pub fn from_body(body: Option<&Value>) -> Self {
        Self {
            query: body.and_then(|b| b.get("query")).cloned(),
        }
    }
}

/// Upstream reply to a question. Extra fields (the upstream also echoes
/// the current reading) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub response: Option<String>,
}

impl Answer {
    /// A non-empty `error` wins; otherwise the response text, empty if absent or null.
    pub fn into_result(self) -> Result<String, String> {
        match self.error {
            Some(error) if !error.is_empty() => Err(error),
            _ => Ok(self.response.unwrap_or_default()),
        }
    }
}

/// Display category derived from a celsius value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Cold,
    Cool,
    Comfortable,
    Warm,
    Hot,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Cold => "cold",
            Tier::Cool => "cool",
            Tier::Comfortable => "comfortable",
            Tier::Warm => "warm",
            Tier::Hot => "hot",
        }
    }

    /// CSS class applied to the celsius display.
    pub fn css_class(&self) -> &'static str {
        match self {
            Tier::Cold => "temp-cold",
            Tier::Cool => "temp-cool",
            Tier::Comfortable => "temp-comfortable",
            Tier::Warm => "temp-warm",
            Tier::Hot => "temp-hot",
        }
    }

    pub const fn all() -> &'static [Tier] {
        &[Tier::Cold, Tier::Cool, Tier::Comfortable, Tier::Warm, Tier::Hot]
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
