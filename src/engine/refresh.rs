//! The `RefreshController` owns a single periodic task that fetches a fresh
//! alert collection from an [`AlertSource`] on a fixed interval, with an
//! at-most-one-refresh-in-flight guarantee and a deterministic stop.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::filtering;
use crate::models::{Alert, AlertStatus, FilterCriteria};
use crate::providers::{AlertSource, AlertSourceError};

/// Callback invoked with a specific alert when the presentation layer
/// requests its detail view.
pub type SelectionHandler = Box<dyn Fn(Alert) + Send + Sync>;

/// State shared between the controller handle and its periodic task.
struct Shared {
    /// Current alert collection, most-recent refresh result, in producer
    /// order. Watch subscribers observe every replacement.
    data_tx: watch::Sender<Vec<Alert>>,

    /// Last producer failure, cleared on the next successful refresh.
    error_tx: watch::Sender<Option<Arc<AlertSourceError>>>,

    /// True strictly while a producer invocation is in flight. Doubles as
    /// the guard that drops overlapping refreshes.
    in_flight: AtomicBool,

    /// Detail-view callback registered by the presentation layer.
    on_select: Mutex<Option<SelectionHandler>>,
}

/// A per-view refresh controller.
///
/// One instance per mounted view: created on activation, stopped on
/// deactivation. When refresh is enabled in the configuration, a single
/// periodic task is spawned whose first tick fires one full interval after
/// construction; construction itself never invokes the producer. A tick that
/// elapses while a refresh is still in flight is dropped, never queued.
///
/// Known limitation: there is no internal producer timeout. A source that
/// never completes leaves `is_updating` true indefinitely and blocks all
/// further refreshes.
pub struct RefreshController<S: AlertSource + ?Sized> {
    source: Arc<S>,
    shared: Arc<Shared>,
    cancellation_token: CancellationToken,
}

impl<S: AlertSource + ?Sized + 'static> RefreshController<S> {
    /// Creates a controller seeded with `initial` data.
    ///
    /// Must be called within a Tokio runtime when `config.refresh_enabled`
    /// is true, since the periodic task is spawned here. When disabled, no
    /// task exists and `data` stays at `initial` until [`trigger`] is
    /// called.
    ///
    /// [`trigger`]: RefreshController::trigger
    pub fn new(source: Arc<S>, initial: Vec<Alert>, config: &AppConfig) -> Self {
        let (data_tx, _) = watch::channel(initial);
        let (error_tx, _) = watch::channel(None);
        let shared = Arc::new(Shared {
            data_tx,
            error_tx,
            in_flight: AtomicBool::new(false),
            on_select: Mutex::new(None),
        });
        let cancellation_token = CancellationToken::new();

        if config.refresh_enabled {
            // Anchor the first tick one full interval after construction,
            // regardless of when the task is first polled.
            let first_tick = tokio::time::Instant::now() + config.refresh_interval_ms;
            tokio::spawn(run_refresh_loop(
                Arc::clone(&shared),
                Arc::clone(&source),
                first_tick,
                config.refresh_interval_ms,
                cancellation_token.clone(),
            ));
        }

        Self { source, shared, cancellation_token }
    }

    /// A snapshot of the current alert collection, in producer order.
    pub fn data(&self) -> Vec<Alert> {
        self.shared.data_tx.borrow().clone()
    }

    /// Subscribes to data replacements for reactive consumers.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Alert>> {
        self.shared.data_tx.subscribe()
    }

    /// Subscribes to reported producer failures.
    pub fn errors(&self) -> watch::Receiver<Option<Arc<AlertSourceError>>> {
        self.shared.error_tx.subscribe()
    }

    /// The most recent producer failure, if the last refresh failed.
    pub fn last_error(&self) -> Option<Arc<AlertSourceError>> {
        self.shared.error_tx.borrow().clone()
    }

    /// True strictly while a producer invocation is in flight.
    pub fn is_updating(&self) -> bool {
        self.shared.in_flight.load(Ordering::Acquire)
    }

    /// Forces an out-of-schedule refresh.
    ///
    /// If a refresh is already in flight this is a no-op that returns
    /// immediately; at most one refresh is ever in flight.
    pub async fn trigger(&self) {
        refresh_cycle(&self.shared, self.source.as_ref()).await;
    }

    /// Applies `criteria` to the current snapshot.
    ///
    /// Recomputed on every call from the live data, never a stale cache.
    pub fn filtered(&self, criteria: &FilterCriteria) -> Vec<Alert> {
        filtering::apply(&self.shared.data_tx.borrow(), criteria)
    }

    /// Replaces the status of the alert with the given id, preserving all
    /// other fields and the collection's order.
    ///
    /// An unknown id is a silent no-op: the selection UI may legitimately
    /// race a refresh that removed the alert. No change notification is
    /// published when nothing changed. If a refresh overwrite races this
    /// call, writes serialize through the same channel and the later one
    /// wins.
    pub fn update_status(&self, alert_id: &str, new_status: AlertStatus) {
        self.shared.data_tx.send_if_modified(|alerts| {
            match alerts.iter_mut().find(|a| a.id == alert_id) {
                Some(alert) => {
                    alert.status = new_status;
                    true
                }
                None => {
                    tracing::debug!(alert_id, "Status update for unknown alert id, ignoring.");
                    false
                }
            }
        });
    }

    /// Registers the callback invoked by [`select`].
    ///
    /// [`select`]: RefreshController::select
    pub fn set_selection_handler(&self, handler: SelectionHandler) {
        *self.shared.on_select.lock().unwrap_or_else(|e| e.into_inner()) = Some(handler);
    }

    /// Invokes the registered selection callback with a clone of the alert
    /// with the given id. Unknown ids and a missing handler are no-ops; the
    /// controller tracks no selected state itself.
    pub fn select(&self, alert_id: &str) {
        let alert = self.shared.data_tx.borrow().iter().find(|a| a.id == alert_id).cloned();
        let Some(alert) = alert else {
            tracing::debug!(alert_id, "Selection of unknown alert id, ignoring.");
            return;
        };
        let guard = self.shared.on_select.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(handler) = guard.as_ref() {
            handler(alert);
        }
    }

    /// Cancels the periodic task. Idempotent; safe after teardown.
    ///
    /// No tick callback executes after this returns, including a tick that
    /// had already elapsed but not yet run.
    pub fn stop(&self) {
        self.cancellation_token.cancel();
    }
}

impl<S: AlertSource + ?Sized> Drop for RefreshController<S> {
    fn drop(&mut self) {
        self.cancellation_token.cancel();
    }
}

/// The long-running periodic task. The first tick fires one full interval
/// after start; elapsed ticks are skipped, never queued.
async fn run_refresh_loop<S: AlertSource + ?Sized>(
    shared: Arc<Shared>,
    source: Arc<S>,
    first_tick: tokio::time::Instant,
    interval: Duration,
    cancellation_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(first_tick, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = cancellation_token.cancelled() => {
                tracing::debug!("Refresh loop cancellation signal received, shutting down.");
                break;
            }

            _ = ticker.tick() => {
                refresh_cycle(&shared, source.as_ref()).await;
            }
        }
    }
}

/// Performs one refresh cycle, or returns immediately if one is in flight.
///
/// A failed fetch leaves the data untouched, publishes the error, and lets
/// the schedule continue.
async fn refresh_cycle<S: AlertSource + ?Sized>(shared: &Shared, source: &S) {
    if shared
        .in_flight
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        tracing::debug!("Refresh already in flight, dropping this invocation.");
        return;
    }

    match source.fetch_alerts().await {
        Ok(alerts) => {
            tracing::debug!(count = alerts.len(), "Refresh cycle completed.");
            shared.error_tx.send_replace(None);
            shared.data_tx.send_replace(alerts);
        }
        Err(e) => {
            tracing::error!(error = %e, "Alert refresh failed; keeping previous data.");
            shared.error_tx.send_replace(Some(Arc::new(e)));
        }
    }

    shared.in_flight.store(false, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Severity;
    use crate::providers::MockAlertSource;
    use crate::test_helpers::AlertBuilder;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Semaphore;

    fn disabled_config() -> AppConfig {
        AppConfig::builder().refresh_enabled(false).build()
    }

    fn enabled_config(interval: Duration) -> AppConfig {
        AppConfig::builder().refresh_interval(interval).build()
    }

    /// A source whose fetches block until a permit is released, counting
    /// every invocation.
    struct GatedSource {
        calls: AtomicUsize,
        gate: Semaphore,
    }

    impl GatedSource {
        fn new() -> Self {
            Self { calls: AtomicUsize::new(0), gate: Semaphore::new(0) }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AlertSource for GatedSource {
        async fn fetch_alerts(&self) -> Result<Vec<Alert>, AlertSourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let permit = self.gate.acquire().await.map_err(|e| {
                AlertSourceError::Unavailable(e.to_string())
            })?;
            permit.forget();
            Ok(vec![AlertBuilder::new("gated").build()])
        }
    }

    #[tokio::test]
    async fn disabled_controller_never_fetches_until_triggered() {
        let mut source = MockAlertSource::new();
        source
            .expect_fetch_alerts()
            .times(1)
            .returning(|| Ok(vec![AlertBuilder::new("1").build()]));

        let controller = RefreshController::new(Arc::new(source), vec![], &disabled_config());
        assert!(controller.data().is_empty());

        controller.trigger().await;
        assert_eq!(controller.data().len(), 1);
        assert!(!controller.is_updating());
    }

    #[tokio::test]
    async fn initial_data_is_the_constructor_argument() {
        let source = MockAlertSource::new();
        let initial = vec![AlertBuilder::new("seed").build()];
        let controller =
            RefreshController::new(Arc::new(source), initial.clone(), &disabled_config());
        assert_eq!(controller.data(), initial);
    }

    #[tokio::test(start_paused = true)]
    async fn periodic_task_first_fires_after_one_full_interval() {
        let mut source = MockAlertSource::new();
        source
            .expect_fetch_alerts()
            .returning(|| Ok(vec![AlertBuilder::new("tick").build()]));

        let controller = RefreshController::new(
            Arc::new(source),
            vec![],
            &enabled_config(Duration::from_secs(15)),
        );

        tokio::time::advance(Duration::from_secs(14)).await;
        tokio::task::yield_now().await;
        assert!(controller.data().is_empty());

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(controller.data().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_prevents_any_further_ticks() {
        let mut source = MockAlertSource::new();
        source.expect_fetch_alerts().times(0);

        let controller = RefreshController::new(
            Arc::new(source),
            vec![],
            &enabled_config(Duration::from_secs(5)),
        );

        controller.stop();
        // Idempotent, including repeated calls.
        controller.stop();

        tokio::time::advance(Duration::from_secs(30)).await;
        tokio::task::yield_now().await;
        assert!(controller.data().is_empty());
    }

    #[tokio::test]
    async fn overlapping_trigger_is_dropped() {
        let source = Arc::new(GatedSource::new());
        let controller =
            RefreshController::new(Arc::clone(&source), vec![], &disabled_config());
        let controller = Arc::new(controller);

        let first = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.trigger().await })
        };

        // Let the first trigger reach the gated fetch.
        while source.calls() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(controller.is_updating());

        // Two rapid triggers while in flight complete immediately without a
        // second producer invocation.
        controller.trigger().await;
        controller.trigger().await;
        assert_eq!(source.calls(), 1);

        source.gate.add_permits(1);
        first.await.unwrap();
        assert!(!controller.is_updating());
        assert_eq!(controller.data().len(), 1);

        // Once the first completes, the next trigger runs again.
        source.gate.add_permits(1);
        controller.trigger().await;
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_data_and_reports_error() {
        let mut source = MockAlertSource::new();
        source
            .expect_fetch_alerts()
            .times(1)
            .returning(|| Err(AlertSourceError::Unavailable("backend down".into())));

        let initial = vec![AlertBuilder::new("kept").build()];
        let controller =
            RefreshController::new(Arc::new(source), initial.clone(), &disabled_config());

        controller.trigger().await;

        assert_eq!(controller.data(), initial);
        assert!(!controller.is_updating());
        let error = controller.last_error().expect("failure should be reported");
        assert!(error.to_string().contains("backend down"));
    }

    #[tokio::test]
    async fn successful_refresh_clears_reported_error() {
        let mut source = MockAlertSource::new();
        let mut failed_once = false;
        source.expect_fetch_alerts().times(2).returning(move || {
            if !failed_once {
                failed_once = true;
                Err(AlertSourceError::Unavailable("transient".into()))
            } else {
                Ok(vec![AlertBuilder::new("fresh").build()])
            }
        });

        let controller = RefreshController::new(Arc::new(source), vec![], &disabled_config());
        controller.trigger().await;
        assert!(controller.last_error().is_some());

        controller.trigger().await;
        assert!(controller.last_error().is_none());
        assert_eq!(controller.data().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn schedule_survives_a_failed_cycle() {
        let mut source = MockAlertSource::new();
        let mut calls = 0u32;
        source.expect_fetch_alerts().returning(move || {
            calls += 1;
            if calls == 1 {
                Err(AlertSourceError::Unavailable("first tick fails".into()))
            } else {
                Ok(vec![AlertBuilder::new("recovered").build()])
            }
        });

        let controller = RefreshController::new(
            Arc::new(source),
            vec![],
            &enabled_config(Duration::from_secs(5)),
        );

        tokio::time::advance(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;
        assert!(controller.data().is_empty());
        assert!(controller.last_error().is_some());

        tokio::time::advance(Duration::from_secs(5)).await;
        tokio::task::yield_now().await;
        assert_eq!(controller.data().len(), 1);
        assert!(controller.last_error().is_none());
    }

    #[tokio::test]
    async fn update_status_replaces_only_the_matching_alert() {
        let source = MockAlertSource::new();
        let initial = vec![
            AlertBuilder::new("1").severity(Severity::Critical).build(),
            AlertBuilder::new("2").status(AlertStatus::Active).build(),
        ];
        let controller = RefreshController::new(Arc::new(source), initial, &disabled_config());

        controller.update_status("2", AlertStatus::Resolved);

        let data = controller.data();
        assert_eq!(data[0].status, AlertStatus::Active);
        assert_eq!(data[1].status, AlertStatus::Resolved);
        assert_eq!(data[1].severity, Severity::Medium);
    }

    #[tokio::test]
    async fn update_status_with_unknown_id_is_a_silent_noop() {
        let source = MockAlertSource::new();
        let initial = vec![AlertBuilder::new("1").build()];
        let controller =
            RefreshController::new(Arc::new(source), initial.clone(), &disabled_config());

        let mut rx = controller.subscribe();
        controller.update_status("missing", AlertStatus::Resolved);

        assert_eq!(controller.data(), initial);
        // No change notification was published for the no-op.
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn filtered_view_recomputes_from_live_data() {
        let source = MockAlertSource::new();
        let initial = vec![
            AlertBuilder::new("1").status(AlertStatus::Active).build(),
            AlertBuilder::new("2").status(AlertStatus::Resolved).build(),
        ];
        let controller = RefreshController::new(Arc::new(source), initial, &disabled_config());

        let criteria = FilterCriteria::new().with_statuses(vec![AlertStatus::Resolved]);
        assert_eq!(controller.filtered(&criteria).len(), 1);

        controller.update_status("1", AlertStatus::Resolved);
        assert_eq!(controller.filtered(&criteria).len(), 2);
    }

    #[tokio::test]
    async fn selection_invokes_handler_with_the_matching_alert() {
        let source = MockAlertSource::new();
        let initial = vec![AlertBuilder::new("1").title("DDoS attack detected").build()];
        let controller = RefreshController::new(Arc::new(source), initial, &disabled_config());

        let (tx, rx) = std::sync::mpsc::channel();
        controller.set_selection_handler(Box::new(move |alert| {
            tx.send(alert).unwrap();
        }));

        controller.select("1");
        let selected = rx.try_recv().unwrap();
        assert_eq!(selected.id, "1");
        assert_eq!(selected.title, "DDoS attack detected");

        // Unknown id invokes nothing.
        controller.select("missing");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn subscribers_observe_periodic_replacements() {
        let mut source = MockAlertSource::new();
        source
            .expect_fetch_alerts()
            .returning(|| Ok(vec![AlertBuilder::new("tick").build()]));

        let controller = RefreshController::new(
            Arc::new(source),
            vec![],
            &enabled_config(Duration::from_secs(1)),
        );
        let mut rx = controller.subscribe();

        tokio::time::advance(Duration::from_secs(1)).await;
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow_and_update().len(), 1);
    }
}
