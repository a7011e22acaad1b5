//! Browser-side behavior, expressed against an explicit display state so it
//! can run from a terminal or under test without a page.

pub mod api;
pub mod controller;
pub mod format;
pub mod ui;

pub use api::{ClientError, HttpRelayClient, RelayApi};
pub use controller::{
    Controller, EXAMPLE_PROMPTS, ExamplePrompt, FetchTicket, REFRESH_INTERVAL, example_by_label,
};
pub use ui::{BANNER_LIFETIME, ResponseView, UiState};
