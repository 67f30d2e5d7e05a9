//! Result page: fetch the analysis document for a route id, render it, optionally
//! re-fetch on a timer.
//!
//! Every fetch carries a [`FetchTicket`]. A completion is applied only when its ticket
//! still matches the page (same id generation, newer than the last applied fetch), so
//! a slow response for a previous id can never overwrite the current one.

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::mpsc;
use vidinsight_api_client::{Gateway, GatewayError};
use vidinsight_core::routes::validate_route_id;
use vidinsight_core::AnalysisResult;

use crate::refresh::AutoRefresh;

/// Why the page is showing its error view.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResultError {
    /// The gateway answered HTTP 500.
    #[error("The gateway failed to produce results")]
    Server,

    #[error("Could not reach the gateway: {0}")]
    Transport(String),

    #[error("Unreadable result document: {0}")]
    Decode(String),
}

impl From<GatewayError> for ResultError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::ServerError { .. } => ResultError::Server,
            GatewayError::Decode { .. } | GatewayError::Document { .. } => {
                ResultError::Decode(err.to_string())
            }
            other => ResultError::Transport(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    /// No fetch has completed for the current id.
    Loading,
    Error(ResultError),
    Loaded(AnalysisResult),
}

/// Tag carried by a fetch so its completion can be matched against the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub id: String,
    pub generation: u64,
    pub sequence: u64,
}

/// Input to [`ResultPage::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Retry,
    SetAutoRefresh(bool),
    ToggleAutoRefresh,
    Navigate(String),
    Quit,
}

impl Command {
    /// Parse a line typed at the interactive prompt.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map(|(w, r)| (w, r.trim()))
            .unwrap_or((line, ""));

        match word.to_ascii_lowercase().as_str() {
            "r" | "retry" => Some(Command::Retry),
            "a" | "auto" => Some(Command::ToggleAutoRefresh),
            "on" => Some(Command::SetAutoRefresh(true)),
            "off" => Some(Command::SetAutoRefresh(false)),
            "o" | "open" if !rest.is_empty() => {
                Some(Command::Navigate(rest.trim_start_matches('/').to_string()))
            }
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

type FetchOutcome = (FetchTicket, Result<AnalysisResult, GatewayError>);

pub struct ResultPage {
    gateway: Arc<dyn Gateway>,
    id: String,
    generation: u64,
    issued: u64,
    applied: u64,
    state: ViewState,
    refresh: AutoRefresh,
}

impl ResultPage {
    pub fn new(gateway: Arc<dyn Gateway>, id: impl Into<String>, refresh_interval: Duration) -> Self {
        Self {
            gateway,
            id: id.into(),
            generation: 0,
            issued: 0,
            applied: 0,
            state: ViewState::Loading,
            refresh: AutoRefresh::new(refresh_interval),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn auto_refresh_enabled(&self) -> bool {
        self.refresh.is_enabled()
    }

    pub fn set_auto_refresh(&mut self, enabled: bool) {
        self.refresh.set_enabled(enabled);
    }

    /// Switch to another id. Returns false (and changes nothing) for the current id
    /// or an invalid one.
    pub fn navigate(&mut self, id: &str) -> bool {
        if id == self.id {
            return false;
        }
        if let Err(e) = validate_route_id(id) {
            tracing::warn!(error = %e, "Ignoring navigation");
            return false;
        }

        tracing::info!(from = %self.id, to = %id, "Result page navigated");
        self.id = id.to_string();
        self.generation += 1;
        self.state = ViewState::Loading;
        self.refresh.restart();
        true
    }

    /// Tag a new fetch for the current id.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        FetchTicket {
            id: self.id.clone(),
            generation: self.generation,
            sequence: self.issued,
        }
    }

    /// Apply a completed fetch. Returns false when the ticket is stale.
    pub fn apply(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<AnalysisResult, GatewayError>,
    ) -> bool {
        if ticket.generation != self.generation || ticket.id != self.id {
            tracing::debug!(id = %ticket.id, generation = ticket.generation, "Discarding result for previous id");
            return false;
        }
        if ticket.sequence <= self.applied {
            tracing::debug!(id = %ticket.id, sequence = ticket.sequence, "Discarding out-of-order result");
            return false;
        }
        self.applied = ticket.sequence;

        self.state = match outcome {
            Ok(result) => {
                tracing::info!(
                    id = %ticket.id,
                    complete = result.is_complete(),
                    pending = ?result.pending_sections(),
                    "Result loaded"
                );
                ViewState::Loaded(result)
            }
            Err(e) => {
                tracing::warn!(id = %ticket.id, error = %e, "Result fetch failed");
                ViewState::Error(ResultError::from(e))
            }
        };
        true
    }

    /// Fetch once and apply the outcome.
    pub async fn refresh(&mut self) -> &ViewState {
        let ticket = self.begin_fetch();
        let outcome = self.gateway.fetch_result(&ticket.id).await;
        self.apply(&ticket, outcome);
        &self.state
    }

    /// Re-issue the fetch for the current id.
    pub async fn retry(&mut self) -> &ViewState {
        self.refresh().await
    }

    fn spawn_fetch(&mut self) -> BoxFuture<'static, FetchOutcome> {
        let ticket = self.begin_fetch();
        let gateway = Arc::clone(&self.gateway);
        tracing::debug!(id = %ticket.id, sequence = ticket.sequence, "Fetching result");
        Box::pin(async move {
            let outcome = gateway.fetch_result(&ticket.id).await;
            (ticket, outcome)
        })
    }

    /// Drive the page until `Quit` or the command channel closes.
    ///
    /// Fetches on entry, then on every retry, navigation and timer tick. `render` is
    /// called after every change that affects what is shown. The timer is released
    /// before returning.
    pub async fn run<F>(&mut self, mut commands: mpsc::Receiver<Command>, mut render: F)
    where
        F: FnMut(&ResultPage),
    {
        let mut in_flight: FuturesUnordered<BoxFuture<'static, FetchOutcome>> =
            FuturesUnordered::new();
        in_flight.push(self.spawn_fetch());
        render(self);

        loop {
            tokio::select! {
                command = commands.recv() => {
                    match command {
                        None | Some(Command::Quit) => break,
                        Some(Command::Retry) => {
                            in_flight.push(self.spawn_fetch());
                        }
                        Some(Command::SetAutoRefresh(enabled)) => {
                            self.set_auto_refresh(enabled);
                        }
                        Some(Command::ToggleAutoRefresh) => {
                            let enabled = !self.auto_refresh_enabled();
                            self.set_auto_refresh(enabled);
                        }
                        Some(Command::Navigate(id)) => {
                            if self.navigate(&id) {
                                in_flight.push(self.spawn_fetch());
                            }
                        }
                    }
                    render(self);
                }
                _ = self.refresh.tick() => {
                    in_flight.push(self.spawn_fetch());
                }
                Some((ticket, outcome)) = in_flight.next(), if !in_flight.is_empty() => {
                    if self.apply(&ticket, outcome) {
                        render(self);
                    }
                }
            }
        }

        self.refresh.disable();
        tracing::debug!(id = %self.id, abandoned = in_flight.len(), "Result page closed");
    }
}
