//! Session poller - interval-based pull of remote session state.
//!
//! There is no persistent connection to the game server; the client learns
//! about joins by re-reading the session on a fixed cadence. The poller
//! stops itself when the completion predicate holds and notifies its owner
//! exactly once.
//!
//! Cadence is wall-clock based: each tick spawns its read instead of
//! awaiting it inline, so a response slower than the interval can overlap
//! the next tick. Every completion re-checks the handle's state before
//! acting, which makes late or stale arrivals (after completion or an
//! explicit stop) harmless no-ops.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use lobbyhero_shared::{SessionId, SessionStateResponse};

use crate::ports::outbound::SessionApiPort;

/// Poll cadence inherited from the source client.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(4000);

/// Lifecycle of one polling cycle.
///
/// `Idle` is the pre-start state: it exists only before a handle does, so a
/// live handle is always observed in one of the other three states. The two
/// end states are terminal; starting again always produces a fresh handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Completed,
    Cancelled,
}

const STATE_POLLING: u8 = 1;
const STATE_COMPLETED: u8 = 2;
const STATE_CANCELLED: u8 = 3;

type ReadyPredicate = Arc<dyn Fn(&SessionStateResponse) -> bool + Send + Sync>;
type ThresholdCallback = Box<dyn FnOnce() + Send>;

struct PollShared {
    state: AtomicU8,
    cancel: CancellationToken,
    // Consumed on the first of {completion, stop} so the callback can never
    // fire into (or keep alive) a torn-down owner.
    on_threshold: Mutex<Option<ThresholdCallback>>,
}

impl PollShared {
    fn state(&self) -> PollState {
        match self.state.load(Ordering::SeqCst) {
            STATE_POLLING => PollState::Polling,
            STATE_COMPLETED => PollState::Completed,
            _ => PollState::Cancelled,
        }
    }

    fn take_callback(&self) -> Option<ThresholdCallback> {
        match self.on_threshold.lock() {
            Ok(mut slot) => slot.take(),
            Err(_) => None,
        }
    }

    /// Transition `Polling -> Completed`. Returns the callback exactly once.
    fn complete(&self) -> Option<ThresholdCallback> {
        if self
            .state
            .compare_exchange(
                STATE_POLLING,
                STATE_COMPLETED,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
        {
            self.cancel.cancel();
            self.take_callback()
        } else {
            None
        }
    }

    /// Transition `Polling -> Cancelled`. No-op in any other state.
    fn stop(&self) {
        if self
            .state
            .compare_exchange(
                STATE_POLLING,
                STATE_CANCELLED,
                Ordering::SeqCst,
                Ordering::SeqCst,
            )
            .is_ok()
        {
            self.cancel.cancel();
            drop(self.take_callback());
        }
    }
}

/// Handle over one active polling cycle.
///
/// Owned exclusively by the screen that started it; dropped or stopped on
/// unmount. Stopping is idempotent and race-free against in-flight reads.
pub struct PollHandle {
    session_id: SessionId,
    interval: Duration,
    shared: Arc<PollShared>,
}

impl PollHandle {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> PollState {
        self.shared.state()
    }

    pub fn is_active(&self) -> bool {
        self.shared.state() == PollState::Polling
    }

    /// Stop polling. Safe to call any number of times, from teardown paths
    /// that race an in-flight tick; a stale result arriving afterwards is
    /// discarded.
    pub fn stop(&self) {
        self.shared.stop();
    }
}

/// Issues periodic session-state reads until a completion predicate holds.
pub struct SessionPoller {
    api: Arc<dyn SessionApiPort>,
}

impl SessionPoller {
    pub fn new(api: Arc<dyn SessionApiPort>) -> Self {
        Self { api }
    }

    /// Begin polling `session_id` every `interval`.
    ///
    /// On each tick the session state is read; when the read succeeds and
    /// `predicate` holds, polling stops and `on_threshold` is invoked — at
    /// most once per handle, never after [`PollHandle::stop`]. A failed
    /// read is logged and treated as a no-op tick: cadence is unchanged, no
    /// backoff, no retry budget (inherited source behavior).
    pub fn start(
        &self,
        session_id: SessionId,
        predicate: impl Fn(&SessionStateResponse) -> bool + Send + Sync + 'static,
        on_threshold: impl FnOnce() + Send + 'static,
        interval: Duration,
    ) -> PollHandle {
        let shared = Arc::new(PollShared {
            state: AtomicU8::new(STATE_POLLING),
            cancel: CancellationToken::new(),
            on_threshold: Mutex::new(Some(Box::new(on_threshold))),
        });
        let predicate: ReadyPredicate = Arc::new(predicate);

        let api = Arc::clone(&self.api);
        let driver_shared = Arc::clone(&shared);
        let driver_session = session_id.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = driver_shared.cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let api = Arc::clone(&api);
                let shared = Arc::clone(&driver_shared);
                let predicate = Arc::clone(&predicate);
                let session_id = driver_session.clone();
                tokio::spawn(async move {
                    let result = api.session_state(&session_id).await;

                    // Liveness first: a completion or stop that happened
                    // while this read was in flight makes the result stale.
                    if shared.state() != PollState::Polling {
                        tracing::debug!(session_id = %session_id, "dropping stale poll result");
                        return;
                    }

                    match result {
                        Ok(state) => {
                            if predicate(&state) {
                                tracing::info!(
                                    session_id = %session_id,
                                    players = state.player_count(),
                                    "session threshold reached"
                                );
                                if let Some(callback) = shared.complete() {
                                    callback();
                                }
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                session_id = %session_id,
                                error = %e,
                                "session state read failed; retrying at next tick"
                            );
                        }
                    }
                });
            }
        });

        PollHandle {
            session_id,
            interval,
            shared,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;

    use lobbyhero_shared::{PlayerInfo, ScoreEntry};

    use super::*;
    use crate::ports::outbound::ApiError;

    fn players(n: usize) -> SessionStateResponse {
        SessionStateResponse {
            players: (0..n)
                .map(|i| PlayerInfo {
                    name: format!("p{i}"),
                })
                .collect(),
        }
    }

    /// Scripted API double: pops one result per read, with optional
    /// per-read latency. Reads past the end of the script repeat the last
    /// scripted result.
    struct ScriptedApi {
        script: Mutex<VecDeque<Result<SessionStateResponse, ApiError>>>,
        latency: Duration,
        reads: AtomicUsize,
    }

    impl ScriptedApi {
        fn new(script: Vec<Result<SessionStateResponse, ApiError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                latency: Duration::ZERO,
                reads: AtomicUsize::new(0),
            })
        }

        fn with_latency(
            script: Vec<Result<SessionStateResponse, ApiError>>,
            latency: Duration,
        ) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                latency,
                reads: AtomicUsize::new(0),
            })
        }

        fn reads(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SessionApiPort for ScriptedApi {
        async fn create_session(&self, _name: &str) -> Result<SessionId, ApiError> {
            unimplemented!("not exercised by poller tests")
        }

        async fn session_state(
            &self,
            _id: &SessionId,
        ) -> Result<SessionStateResponse, ApiError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let result = {
                let mut script = self.script.lock().expect("script lock");
                if script.len() > 1 {
                    script.pop_front().expect("non-empty script")
                } else {
                    script.front().cloned().expect("non-empty script")
                }
            };
            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }
            result
        }

        async fn start_game(&self, _id: &SessionId) -> Result<(), ApiError> {
            unimplemented!("not exercised by poller tests")
        }

        async fn scores(&self) -> Result<Vec<ScoreEntry>, ApiError> {
            unimplemented!("not exercised by poller tests")
        }
    }

    fn session() -> SessionId {
        SessionId::parse("sess-1").expect("valid id")
    }

    fn start_counting(
        api: Arc<ScriptedApi>,
        interval: Duration,
    ) -> (PollHandle, Arc<AtomicUsize>) {
        let fired = Arc::new(AtomicUsize::new(0));
        let fired_in_cb = Arc::clone(&fired);
        let poller = SessionPoller::new(api);
        let handle = poller.start(
            session(),
            |state| state.player_count() > 1,
            move || {
                fired_in_cb.fetch_add(1, Ordering::SeqCst);
            },
            interval,
        );
        (handle, fired)
    }

    #[tokio::test(start_paused = true)]
    async fn threshold_fires_once_and_polling_stops() {
        let api = ScriptedApi::new(vec![Ok(players(1)), Ok(players(2))]);
        let (handle, fired) = start_counting(Arc::clone(&api), DEFAULT_POLL_INTERVAL);

        // t=0: first tick, predicate false, no observable effect.
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(api.reads(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(handle.state(), PollState::Polling);

        // t=4000: second tick, predicate true.
        tokio::time::sleep(Duration::from_millis(4000)).await;
        assert_eq!(api.reads(), 2);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), PollState::Completed);
        assert!(!handle.is_active());

        // t=8000 and beyond: no further ticks, no second callback.
        tokio::time::sleep(Duration::from_millis(8000)).await;
        assert_eq!(api.reads(), 2);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_read_is_a_noop_tick_at_same_cadence() {
        let api = ScriptedApi::new(vec![
            Err(ApiError::transport("connection refused")),
            Ok(players(2)),
        ]);
        let (handle, fired) = start_counting(Arc::clone(&api), DEFAULT_POLL_INTERVAL);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(api.reads(), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        assert_eq!(handle.state(), PollState::Polling);

        tokio::time::sleep(Duration::from_millis(4000)).await;
        assert_eq!(api.reads(), 2);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), PollState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_discards_in_flight_result() {
        // The read takes longer than the stop arrives: its (predicate-true)
        // result must be dropped.
        let api =
            ScriptedApi::with_latency(vec![Ok(players(2))], Duration::from_millis(1000));
        let (handle, fired) = start_counting(Arc::clone(&api), DEFAULT_POLL_INTERVAL);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(api.reads(), 1);

        handle.stop();
        handle.stop();
        handle.stop();
        assert_eq!(handle.state(), PollState::Cancelled);

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(api.reads(), 1, "no tick after stop");
        assert_eq!(fired.load(Ordering::SeqCst), 0, "stale result discarded");
    }

    #[tokio::test(start_paused = true)]
    async fn stop_after_completion_is_a_noop() {
        let api = ScriptedApi::new(vec![Ok(players(3))]);
        let (handle, fired) = start_counting(Arc::clone(&api), DEFAULT_POLL_INTERVAL);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), PollState::Completed);

        handle.stop();
        assert_eq!(handle.state(), PollState::Completed, "terminal state sticks");
    }

    #[tokio::test(start_paused = true)]
    async fn slow_read_overlaps_next_tick_without_double_fire() {
        // Latency longer than the interval: the t=0 read lands after the
        // t=4000 read. Both satisfy the predicate; the callback still fires
        // exactly once.
        let api =
            ScriptedApi::with_latency(vec![Ok(players(2))], Duration::from_millis(6000));
        let (handle, fired) = start_counting(Arc::clone(&api), Duration::from_millis(4000));

        tokio::time::sleep(Duration::from_millis(4100)).await;
        assert_eq!(api.reads(), 2, "second tick started while first in flight");

        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(handle.state(), PollState::Completed);
    }
}
