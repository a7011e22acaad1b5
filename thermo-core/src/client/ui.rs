use std::{
    fmt,
    time::{Duration, Instant},
};

use crate::{TemperatureReading, Tier};

use super::format::{
    PLACEHOLDER, escape_html, format_response, format_temperature, format_timestamp,
    temperature_tier,
};

pub const LOADING: &str = "Loading...";
pub const THINKING: &str = "Thinking... (this may take 30-60 seconds)";

/// How long an error banner stays on screen.
pub const BANNER_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
    pub raised_at: Instant,
}

impl Banner {
    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.raised_at) >= BANNER_LIFETIME
    }
}

/// Contents of the answer area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ResponseView {
    #[default]
    Empty,
    Thinking,
    Answer(String),
    Error(String),
}

/// Everything the page displays. Only the `show_*` methods mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    celsius: String,
    fahrenheit: String,
    timestamp: String,
    tier: Option<Tier>,
    question_input: String,
    response: ResponseView,
    banners: Vec<Banner>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            celsius: PLACEHOLDER.to_string(),
            fahrenheit: PLACEHOLDER.to_string(),
            timestamp: PLACEHOLDER.to_string(),
            tier: None,
            question_input: String::new(),
            response: ResponseView::Empty,
            banners: Vec::new(),
        }
    }
}

impl UiState {
    pub fn celsius(&self) -> &str {
        &self.celsius
    }

    pub fn fahrenheit(&self) -> &str {
        &self.fahrenheit
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn tier(&self) -> Option<Tier> {
        self.tier
    }

    /// Class attribute of the celsius display; empty when no tier applies.
    pub fn celsius_class(&self) -> &'static str {
        self.tier.map(|t| t.css_class()).unwrap_or("")
    }

    pub fn question_input(&self) -> &str {
        &self.question_input
    }

    pub fn response(&self) -> &ResponseView {
        &self.response
    }

    pub fn banners(&self) -> &[Banner] {
        &self.banners
    }

    /// Markup for the answer area. Answer and error text is escaped.
    pub fn response_html(&self) -> String {
        match &self.response {
            ResponseView::Empty => String::new(),
            ResponseView::Thinking => format!(r#"<p class="loading">{THINKING}</p>"#),
            ResponseView::Answer(text) => format!("<div>{}</div>", format_response(text)),
            ResponseView::Error(message) => {
                format!(r#"<p class="error">Error: {}</p>"#, escape_html(message))
            }
        }
    }

    pub fn show_loading(&mut self) {
        self.celsius = LOADING.to_string();
        self.fahrenheit = String::new();
    }

    /// A non-numeric celsius (e.g. `"unknown"`) leaves the display without a tier.
    pub fn show_reading(&mut self, reading: &TemperatureReading) {
        self.celsius = format_temperature(&reading.celsius);
        self.fahrenheit = format_temperature(&reading.fahrenheit);
        self.timestamp = format_timestamp(reading.timestamp.as_deref());
        self.tier = reading.celsius.as_f64().map(temperature_tier);
    }

    /// Numeric fields fall back to `--`; the last timestamp is kept.
    pub fn show_temperature_failure(&mut self, message: &str, now: Instant) {
        self.celsius = PLACEHOLDER.to_string();
        self.fahrenheit = PLACEHOLDER.to_string();
        self.tier = None;
        self.raise_banner(message, now);
    }

    pub fn raise_banner(&mut self, message: &str, now: Instant) {
        self.banners.push(Banner {
            message: message.to_string(),
            raised_at: now,
        });
    }

    /// Drop banners older than [`BANNER_LIFETIME`]. Returns whether any were removed.
    pub fn expire_banners(&mut self, now: Instant) -> bool {
        let before = self.banners.len();
        self.banners.retain(|b| !b.is_expired(now));
        self.banners.len() != before
    }

    pub fn set_question_input(&mut self, text: &str) {
        self.question_input = text.to_string();
    }

    pub fn show_thinking(&mut self) {
        self.response = ResponseView::Thinking;
    }

    pub fn show_answer(&mut self, text: &str) {
        self.response = ResponseView::Answer(text.to_string());
    }

    pub fn show_error(&mut self, message: &str) {
        self.response = ResponseView::Error(message.to_string());
    }
}

/// Plain-text rendering for terminals.
impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Temperature: {} °C / {} °F", self.celsius, self.fahrenheit)?;
        if let Some(tier) = self.tier {
            write!(f, " [{tier}]")?;
        }
        writeln!(f)?;
        writeln!(f, "Updated:     {}", self.timestamp)?;

        for banner in &self.banners {
            writeln!(f, "! {}", banner.message)?;
        }

        if !self.question_input.is_empty() {
            writeln!(f, "Question:    {}", self.question_input)?;
        }

        match &self.response {
            ResponseView::Empty => {}
            ResponseView::Thinking => writeln!(f, "{THINKING}")?,
            ResponseView::Answer(text) if text.is_empty() => {
                writeln!(f, "{}", super::format::NO_RESPONSE)?
            }
            ResponseView::Answer(text) => writeln!(f, "{text}")?,
            ResponseView::Error(message) => writeln!(f, "Error: {message}")?,
        }

        Ok(())
    }
}
