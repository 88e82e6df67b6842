//! The orchestration pipeline task.
//!
//! State machine per "current request" slot:
//! - an edit (re)starts the debounce window;
//! - when the window elapses the canonical request is recomputed. An
//!   ineligible request clears the output and stops the refresh timer. An
//!   eligible request that differs from the last fired one is fired;
//! - a success publishes the formatted result and arms the refresh timer, and
//!   a failure raises an alert and stops it;
//! - a refresh tick re-fires the last request, and a direction toggle
//!   re-evaluates immediately.

use std::future;
use std::sync::Arc;

use converter_client::PendingRequestHandle;
use converter_types::{
    AlertInfo, ConversionOutcome, ConversionRequest, Currency, CurrencyConversion, Direction,
    InteractorError, parse_amount,
};
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at, sleep_until};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{Alert, Command, OrchestratorConfig, ViewState};
use crate::interactor::ConverterInteractor;

/// Result of one fired request, marshalled back onto the pipeline task.
#[derive(Debug)]
struct Completion {
    key: Uuid,
    request: ConversionRequest,
    result: Result<f64, InteractorError>,
}

pub(crate) struct Pipeline<C: CurrencyConversion> {
    config: OrchestratorConfig,
    interactor: Arc<ConverterInteractor<C>>,
    state: watch::Sender<ViewState>,
    pending_rx: watch::Receiver<bool>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,

    amount_text: String,
    source: Option<Currency>,
    target: Option<Currency>,
    direction: Direction,

    debounce_deadline: Option<Instant>,
    refresh: Option<Interval>,
    last_fired: Option<ConversionRequest>,
    in_flight: Option<PendingRequestHandle>,
    next_alert_id: u64,
}

impl<C: CurrencyConversion> Pipeline<C> {
    pub(crate) fn new(
        interactor: Arc<ConverterInteractor<C>>,
        config: OrchestratorConfig,
        state: watch::Sender<ViewState>,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let pending_rx = interactor.pending();
        Self {
            source: Some(config.initial_source),
            target: Some(config.initial_target),
            config,
            interactor,
            state,
            pending_rx,
            completions_tx,
            completions_rx,
            amount_text: String::new(),
            direction: Direction::Forward,
            debounce_deadline: None,
            refresh: None,
            last_fired: None,
            in_flight: None,
            next_alert_id: 0,
        }
    }

    pub(crate) async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        info!(
            debounce_ms = self.config.debounce.as_millis() as u64,
            refresh_secs = self.config.refresh_interval.as_secs(),
            "conversion pipeline started"
        );
        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(done) = self.completions_rx.recv() => self.handle_completion(done),
                Ok(()) = self.pending_rx.changed() => {
                    let pending = *self.pending_rx.borrow_and_update();
                    self.state.send_if_modified(|s| replace(&mut s.pending, pending));
                }
                () = wait_until(self.debounce_deadline) => {
                    self.debounce_deadline = None;
                    self.commit_inputs();
                }
                () = next_tick(&mut self.refresh) => self.on_refresh_tick(),
            }
        }
        self.teardown();
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::AmountText(text) => {
                if text != self.amount_text {
                    self.amount_text = text;
                    self.restart_debounce();
                }
            }
            Command::SourceName(name) => {
                let parsed = parse_currency_name(&name);
                if parsed != self.source {
                    self.source = parsed;
                    self.restart_debounce();
                }
            }
            Command::TargetName(name) => {
                let parsed = parse_currency_name(&name);
                if parsed != self.target {
                    self.target = parsed;
                    self.restart_debounce();
                }
            }
            Command::ToggleDirection => {
                self.direction = self.direction.toggled();
                let direction = self.direction;
                self.state.send_modify(|s| {
                    s.direction = direction;
                    s.direction_icon = direction.icon_name();
                });
                // Bypasses the debounce window: the toggle commits current inputs now.
                self.debounce_deadline = None;
                self.commit_inputs();
            }
            Command::DismissAlert(id) => {
                self.state.send_if_modified(|s| {
                    if s.alert.as_ref().is_some_and(|alert| alert.id == id) {
                        s.alert = None;
                        true
                    } else {
                        false
                    }
                });
            }
            Command::Shutdown => {}
        }
    }

    fn restart_debounce(&mut self) {
        self.debounce_deadline = Some(Instant::now() + self.config.debounce);
    }

    fn canonical_request(&self) -> Option<ConversionRequest> {
        Some(ConversionRequest::new(
            parse_amount(&self.amount_text),
            self.source?,
            self.target?,
            self.direction,
        ))
    }

    fn commit_inputs(&mut self) {
        match self.canonical_request().filter(ConversionRequest::is_eligible) {
            None => {
                debug!(amount_text = %self.amount_text, "inputs not eligible, clearing output");
                self.reset_output();
            }
            Some(request) if self.last_fired == Some(request) => {
                debug!(?request, "duplicate request dropped");
            }
            Some(request) => self.fire(request),
        }
    }

    fn fire(&mut self, request: ConversionRequest) {
        self.stop_refresh();
        if let Some(previous) = self.in_flight.take() {
            debug!(key = %previous.key(), "cancelling superseded request");
            previous.cancel();
        }

        let key = Uuid::new_v4();
        let query = request.query();
        info!(
            amount = query.amount,
            from = %query.from,
            to = %query.to,
            %key,
            "firing conversion"
        );

        let interactor = Arc::clone(&self.interactor);
        let completions = self.completions_tx.clone();
        let task = tokio::spawn(async move {
            let result = interactor.convert(query.amount, query.from, query.to).await;
            // The pipeline owns the receiver for as long as it can care about this result.
            let _ = completions.send(Completion {
                key,
                request,
                result,
            });
        });

        self.last_fired = Some(request);
        self.in_flight = Some(PendingRequestHandle::new(key, task.abort_handle()));
    }

    fn handle_completion(&mut self, done: Completion) {
        let is_current = self
            .in_flight
            .as_ref()
            .is_some_and(|handle| handle.key() == done.key);
        if !is_current {
            debug!(key = %done.key, "stale completion ignored");
            return;
        }
        self.in_flight = None;

        match ConversionOutcome::from_result(done.result, done.request.effective_target()) {
            None => debug!(key = %done.key, "conversion cancelled"),
            Some(outcome @ ConversionOutcome::Success { .. }) => {
                let text = outcome.display_text().unwrap_or_default();
                debug!(result = %text, "conversion succeeded");
                self.state.send_modify(|s| {
                    s.result_text = text;
                    s.alert = None;
                });
                self.start_refresh();
            }
            Some(ConversionOutcome::Failure {
                category,
                title,
                details,
            }) => {
                warn!(?category, %title, %details, "conversion failed");
                self.stop_refresh();
                self.raise_alert(AlertInfo::default_alert(title, details));
            }
        }
    }

    fn on_refresh_tick(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        if let Some(request) = self.last_fired {
            debug!(?request, "refreshing last conversion");
            self.fire(request);
        }
    }

    fn start_refresh(&mut self) {
        if self.in_flight.is_some() {
            return;
        }
        let period = self.config.refresh_interval;
        // A zero period disables refreshing.
        if period.is_zero() {
            return;
        }
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.refresh = Some(interval);
    }

    fn stop_refresh(&mut self) {
        self.refresh = None;
    }

    fn reset_output(&mut self) {
        self.stop_refresh();
        self.cancel_in_flight();
        self.last_fired = None;
        self.state
            .send_if_modified(|s| !std::mem::take(&mut s.result_text).is_empty());
    }

    fn cancel_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.cancel();
            self.interactor.cancel();
        }
    }

    fn raise_alert(&mut self, info: AlertInfo) {
        self.next_alert_id += 1;
        let alert = Alert {
            id: self.next_alert_id,
            info,
        };
        self.state.send_modify(|s| s.alert = Some(alert));
    }

    fn teardown(&mut self) {
        info!("conversion pipeline stopped");
        self.stop_refresh();
        self.debounce_deadline = None;
        self.cancel_in_flight();
    }
}

fn parse_currency_name(name: &str) -> Option<Currency> {
    let parsed = Currency::parse(name);
    if parsed.is_none() {
        debug!(%name, "unrecognized currency name");
    }
    parsed
}

fn replace(slot: &mut bool, value: bool) -> bool {
    let changed = *slot != value;
    *slot = value;
    changed
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => future::pending().await,
    }
}

async fn next_tick(refresh: &mut Option<Interval>) {
    match refresh {
        Some(interval) => {
            interval.tick().await;
        }
        None => future::pending().await,
    }
}
