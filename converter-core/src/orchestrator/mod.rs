//! Request Orchestrator
//!
//! Turns noisy UI input into a minimal stream of conversion requests. All
//! mutable state lives in one spawned task (the pipeline); the cloneable
//! [`ConversionOrchestrator`] handle only sends commands to it and reads the
//! published [`ViewState`].
//!
//! Settable inputs: amount text, source/target currency names, the direction
//! toggle. Published outputs: pending flag, result text, direction icon, alert.

mod pipeline;
mod state;

use std::sync::Arc;
use std::time::Duration;

use converter_types::{Currency, CurrencyConversion};
use tokio::sync::{mpsc, watch};
use tracing::debug;

use crate::interactor::ConverterInteractor;
use pipeline::Pipeline;

pub use state::{Alert, ViewState};

/// Orchestrator timing and initial selection.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Quiet period after the last edit before inputs are committed.
    pub debounce: Duration,
    /// Period of the refresh that re-issues the last successful request.
    pub refresh_interval: Duration,
    pub initial_source: Currency,
    pub initial_target: Currency,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            refresh_interval: Duration::from_secs(10),
            initial_source: Currency::USD,
            initial_target: Currency::EUR,
        }
    }
}

#[derive(Debug)]
pub(crate) enum Command {
    AmountText(String),
    SourceName(String),
    TargetName(String),
    ToggleDirection,
    DismissAlert(u64),
    Shutdown,
}

/// Handle to a running orchestration pipeline.
///
/// Setters never block. The pipeline shuts down when [`shutdown`](Self::shutdown)
/// is called or every handle has been dropped.
#[derive(Debug, Clone)]
pub struct ConversionOrchestrator {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ViewState>,
}

impl ConversionOrchestrator {
    /// Spawns the pipeline on the current tokio runtime.
    pub fn spawn<C: CurrencyConversion>(
        interactor: Arc<ConverterInteractor<C>>,
        config: OrchestratorConfig,
    ) -> Self {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ViewState::default());
        let pipeline = Pipeline::new(interactor, config, state_tx);
        tokio::spawn(pipeline.run(commands_rx));
        Self {
            commands: commands_tx,
            state: state_rx,
        }
    }

    /// Currency codes in catalog order, for populating pickers.
    pub fn currency_titles() -> Vec<&'static str> {
        Currency::all().iter().map(Currency::code).collect()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Current state snapshot.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn set_amount_text(&self, text: impl Into<String>) {
        self.send(Command::AmountText(text.into()));
    }

    pub fn set_source_currency_name(&self, name: impl Into<String>) {
        self.send(Command::SourceName(name.into()));
    }

    pub fn set_target_currency_name(&self, name: impl Into<String>) {
        self.send(Command::TargetName(name.into()));
    }

    /// Flips the direction and re-evaluates the inputs immediately, without debouncing.
    pub fn toggle_direction(&self) {
        self.send(Command::ToggleDirection);
    }

    /// Dismisses the alert with `id`; a stale id is ignored.
    pub fn dismiss_alert(&self, id: u64) {
        self.send(Command::DismissAlert(id));
    }

    /// Stops the pipeline, cancelling any in-flight request and the refresh timer.
    pub fn shutdown(&self) {
        self.send(Command::Shutdown);
    }

    fn send(&self, command: Command) {
        if let Err(err) = self.commands.send(command) {
            debug!(command = ?err.0, "pipeline already stopped");
        }
    }
}
