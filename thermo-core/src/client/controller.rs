use std::time::{Duration, Instant};

use crate::{TemperatureReading, relay::TEMPERATURE_FAILURE};

use super::{
    api::{ClientError, RelayApi},
    ui::UiState,
};

/// Period of the automatic temperature refresh.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// A labeled preset question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamplePrompt {
    pub label: &'static str,
    pub question: &'static str,
}

pub const EXAMPLE_PROMPTS: &[ExamplePrompt] = &[
    ExamplePrompt {
        label: "current",
        question: "What's the temperature right now?",
    },
    ExamplePrompt {
        label: "comfort",
        question: "Is it comfortable in here?",
    },
    ExamplePrompt {
        label: "window",
        question: "Should I open a window?",
    },
];

pub fn example_by_label(label: &str) -> Option<&'static ExamplePrompt> {
    EXAMPLE_PROMPTS
        .iter()
        .find(|p| p.label.eq_ignore_ascii_case(label.trim()))
}

/// Issued when a temperature fetch starts. Responses are only applied if
/// no newer fetch has already been applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

/// Drives a [`UiState`] from relay responses.
#[derive(Debug)]
pub struct Controller<A> {
    api: A,
    state: UiState,
    issued: u64,
    applied: u64,
}

impl<A: RelayApi> Controller<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: UiState::default(),
            issued: 0,
            applied: 0,
        }
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn begin_temperature_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.state.show_loading();
        FetchTicket(self.issued)
    }

    /// Apply the outcome of the fetch identified by `ticket`.
    /// Returns `false` if a newer fetch already landed.
    pub fn finish_temperature_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<TemperatureReading, ClientError>,
        now: Instant,
    ) -> bool {
        if ticket.0 <= self.applied {
            tracing::debug!(ticket = ticket.0, applied = self.applied, "Discarding stale reading");
            return false;
        }
        self.applied = ticket.0;

        match result {
            Ok(reading) => self.state.show_reading(&reading),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching temperature");
                self.state.show_temperature_failure(TEMPERATURE_FAILURE, now);
            }
        }
        true
    }

    pub async fn fetch_temperature(&mut self) {
        let ticket = self.begin_temperature_fetch();
        let result = self.api.temperature().await;
        self.finish_temperature_fetch(ticket, result, Instant::now());
    }

    /// Manual refresh; same as the timer.
    pub async fn refresh(&mut self) {
        self.fetch_temperature().await;
    }

    pub fn expire_banners(&mut self, now: Instant) -> bool {
        self.state.expire_banners(now)
    }

    pub fn set_input(&mut self, text: &str) {
        self.state.set_question_input(text);
    }

    /// Ask button: submits the trimmed input field.
    pub async fn submit_input(&mut self) -> bool {
        let question = self.state.question_input().trim().to_string();
        self.ask_question(&question).await
    }

    /// Returns `false` without touching anything when `question` is blank.
    pub async fn ask_question(&mut self, question: &str) -> bool {
        if question.trim().is_empty() {
            return false;
        }

        self.state.show_thinking();

        match self.api.ask(question).await {
            Ok(text) => self.state.show_answer(&text),
            Err(e) => {
                tracing::error!(error = %e, "Error asking question");
                self.state.show_error(&e.to_string());
            }
        }
        true
    }

    pub async fn press_example(&mut self, example: &ExamplePrompt) -> bool {
        self.state.set_question_input(example.question);
        self.ask_question(example.question).await
    }
}
