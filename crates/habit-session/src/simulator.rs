//! # Goal Session Simulator
//!
//! Owns one [`SessionState`] and plays the assistant's side of the
//! conversation: every accepted user message schedules a single scripted
//! reply after a fixed delay.
//!
//! The reply runs as a tokio task racing the delay against a cancellation
//! token. Shutting the simulator down, or dropping it, cancels the token so a
//! pending reply can never write into an abandoned session. All methods
//! except [`GoalSessionSimulator::wait_for_reply`] are synchronous and must
//! be called from inside a tokio runtime.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::clock::{Clock, LocalClock};
use crate::error::Rejection;
use crate::script::ReplyScript;
use crate::state::SessionState;
use crate::suggestions::{suggestion_message, StaticSuggestions, SuggestionSource};
use crate::types::{MessageId, SessionSnapshot, Stage};

/// Simulator settings
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Time between a user message and the scripted reply
    pub reply_delay: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(1500),
        }
    }
}

impl SimulatorConfig {
    /// Set the reply delay
    pub fn with_reply_delay(mut self, delay: Duration) -> Self {
        self.reply_delay = delay;
        self
    }

    /// Set the reply delay in milliseconds
    pub fn with_reply_delay_ms(self, millis: u64) -> Self {
        self.with_reply_delay(Duration::from_millis(millis))
    }
}

/// State shared with the reply task
struct Shared {
    state: Mutex<SessionState>,
    script: ReplyScript,
    rng: Mutex<Box<dyn RngCore + Send>>,
    clock: Arc<dyn Clock>,
}

impl Shared {
    /// Runs only from the task scheduled by `submit_user_message`.
    fn produce_scripted_reply(&self, token: &CancellationToken) {
        let text = {
            let mut rng = self.rng.lock();
            self.script.choose(&mut **rng).to_string()
        };

        let mut state = self.state.lock();
        // shutdown may have won the race while we were waiting on the lock
        if token.is_cancelled() {
            return;
        }
        let id = state.complete_reply(text, self.clock.now_display());
        debug!(message_id = %id, stage = %state.stage(), "Scripted reply delivered");
    }
}

/// Builder for [`GoalSessionSimulator`]
pub struct SimulatorBuilder {
    config: SimulatorConfig,
    state: SessionState,
    script: ReplyScript,
    suggestions: Arc<dyn SuggestionSource>,
    rng: Option<Box<dyn RngCore + Send>>,
    clock: Arc<dyn Clock>,
}

impl SimulatorBuilder {
    fn new() -> Self {
        Self {
            config: SimulatorConfig::default(),
            state: SessionState::seeded(),
            script: ReplyScript::default(),
            suggestions: Arc::new(StaticSuggestions::default()),
            rng: None,
            clock: Arc::new(LocalClock),
        }
    }

    pub fn config(mut self, config: SimulatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Start from `state` instead of the seeded session
    pub fn initial_state(mut self, state: SessionState) -> Self {
        self.state = state;
        self
    }

    pub fn script(mut self, script: ReplyScript) -> Self {
        self.script = script;
        self
    }

    pub fn suggestions(mut self, suggestions: impl SuggestionSource + 'static) -> Self {
        self.suggestions = Arc::new(suggestions);
        self
    }

    /// Random source for reply selection
    pub fn rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Some(Box::new(rng));
        self
    }

    /// Seeded random source, for reproducible sessions
    pub fn seed(self, seed: u64) -> Self {
        self.rng(StdRng::seed_from_u64(seed))
    }

    pub fn clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn build(mut self) -> GoalSessionSimulator {
        if self.state.awaiting_reply() {
            // no task exists for a reply pending in a borrowed state
            warn!("Initial state had a pending reply, clearing it");
            self.state.cancel_reply();
        }

        let rng = self
            .rng
            .unwrap_or_else(|| Box::new(StdRng::from_entropy()));

        info!(
            reply_delay_ms = self.config.reply_delay.as_millis() as u64,
            replies = self.script.len(),
            "Goal session started"
        );

        GoalSessionSimulator {
            shared: Arc::new(Shared {
                state: Mutex::new(self.state),
                script: self.script,
                rng: Mutex::new(rng),
                clock: self.clock,
            }),
            suggestions: self.suggestions,
            config: self.config,
            shutdown: CancellationToken::new(),
            pending: Mutex::new(None),
        }
    }
}

/// Goal-setting conversation with a scripted assistant
pub struct GoalSessionSimulator {
    shared: Arc<Shared>,
    suggestions: Arc<dyn SuggestionSource>,
    config: SimulatorConfig,
    shutdown: CancellationToken,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl GoalSessionSimulator {
    /// Seeded session with default settings
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::new()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Append a user message and schedule the scripted reply.
    ///
    /// Returns the new message id, or `None` when the text is blank, a reply
    /// is already pending, or the session has been shut down.
    pub fn submit_user_message(&self, text: &str) -> Option<MessageId> {
        if self.shutdown.is_cancelled() {
            debug!("Session closed, user message ignored");
            return None;
        }

        let id = {
            let mut state = self.shared.state.lock();
            // shutdown cancels before taking the lock, so this sees any
            // shutdown that raced the check above
            if self.shutdown.is_cancelled() {
                debug!("Session closed, user message ignored");
                return None;
            }
            match state.submit_user_message(text, self.shared.clock.now_display()) {
                Ok(id) => id,
                Err(reason) => {
                    log_rejection(reason);
                    return None;
                }
            }
        };

        debug!(message_id = %id, "User message accepted");
        self.schedule_reply();
        Some(id)
    }

    /// Submit `I want to {label}` for a quick-pick suggestion
    pub fn select_suggestion(&self, label: &str) -> Option<MessageId> {
        self.submit_user_message(&suggestion_message(label))
    }

    /// Override the stage, clamped into `1..=4`. Never schedules a reply.
    pub fn jump_to_stage(&self, n: i64) {
        self.shared.state.lock().jump_to_stage(n);
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.state.lock().snapshot()
    }

    pub fn stage(&self) -> Stage {
        self.shared.state.lock().stage()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        self.shared.state.lock().awaiting_reply()
    }

    pub fn transcript_len(&self) -> usize {
        self.shared.state.lock().transcript().len()
    }

    /// Quick-pick labels from the suggestion source
    pub fn suggestions(&self) -> &[String] {
        self.suggestions.suggestions()
    }

    /// Suggestions are offered only while defining the goal
    pub fn suggestions_visible(&self) -> bool {
        self.stage() == Stage::DefineGoal
    }

    /// Wait until the pending reply, if any, has been delivered or cancelled
    pub async fn wait_for_reply(&self) {
        let handle = self.pending.lock().take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                warn!("Reply task failed: {}", e);
            }
        }
    }

    /// Cancel any pending reply and refuse further messages. Idempotent.
    pub fn shutdown(&self) {
        if self.shutdown.is_cancelled() {
            return;
        }
        self.shutdown.cancel();

        let mut state = self.shared.state.lock();
        if state.awaiting_reply() {
            debug!("Pending reply cancelled by shutdown");
            state.cancel_reply();
        }
        info!(messages = state.transcript().len(), "Goal session closed");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    fn schedule_reply(&self) {
        let token = self.shutdown.child_token();
        let shared = Arc::clone(&self.shared);
        let delay = self.config.reply_delay;

        let handle = tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("Reply task cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    shared.produce_scripted_reply(&token);
                }
            }
        });

        // the previous task, if any, has already finished: submissions are
        // rejected while a reply is outstanding
        *self.pending.lock() = Some(handle);
    }
}

impl Default for GoalSessionSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for GoalSessionSimulator {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

fn log_rejection(reason: Rejection) {
    debug!(%reason, "User message ignored");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::types::Sender;

    fn simulator() -> GoalSessionSimulator {
        GoalSessionSimulator::builder()
            .seed(11)
            .clock(FixedClock::new("3:15 PM"))
            .build()
    }

    async fn elapse(millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_arrives_after_delay() {
        let sim = simulator();
        sim.submit_user_message("I want to exercise more").unwrap();
        assert!(sim.is_awaiting_reply());

        elapse(1499).await;
        assert_eq!(sim.transcript_len(), 3);
        assert!(sim.is_awaiting_reply());

        elapse(2).await;
        assert_eq!(sim.transcript_len(), 4);
        assert!(!sim.is_awaiting_reply());
        assert_eq!(sim.stage(), Stage::SetFrequency);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_text_comes_from_script() {
        let script = ReplyScript::new(["Alpha", "Beta"]).unwrap();
        let sim = GoalSessionSimulator::builder()
            .script(script.clone())
            .seed(3)
            .build();

        for _ in 0..5 {
            sim.submit_user_message("Next").unwrap();
            sim.wait_for_reply().await;
            let snapshot = sim.snapshot();
            let reply = snapshot.transcript.last().unwrap();
            assert_eq!(reply.sender(), Sender::Assistant);
            assert!(script.contains(reply.text()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_while_pending_ignored() {
        let sim = simulator();
        assert!(sim.submit_user_message("First").is_some());
        assert!(sim.submit_user_message("Second").is_none());
        assert_eq!(sim.transcript_len(), 3);

        elapse(1501).await;
        assert_eq!(sim.transcript_len(), 4);
        assert_eq!(sim.stage(), Stage::SetFrequency);
    }

    #[tokio::test(start_paused = true)]
    async fn test_blank_submit_schedules_nothing() {
        let sim = simulator();
        assert!(sim.submit_user_message("   ").is_none());
        assert!(!sim.is_awaiting_reply());

        elapse(5000).await;
        assert_eq!(sim.transcript_len(), 2);
        assert_eq!(sim.stage(), Stage::DefineGoal);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending_reply() {
        let sim = simulator();
        sim.submit_user_message("Meditate").unwrap();
        sim.shutdown();

        elapse(3000).await;
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.transcript.len(), 3);
        assert!(!snapshot.awaiting_reply);
        assert_eq!(snapshot.stage, Stage::DefineGoal);
        assert!(sim.submit_user_message("Again").is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_shutdown_never_strands_pending_flag() {
        for _ in 0..50 {
            let sim = Arc::new(GoalSessionSimulator::builder().seed(2).build());
            let closer = Arc::clone(&sim);
            let handle = tokio::task::spawn_blocking(move || closer.shutdown());
            let accepted = sim.submit_user_message("Race").is_some();
            handle.await.unwrap();

            let snapshot = sim.snapshot();
            assert!(!snapshot.awaiting_reply);
            assert_eq!(snapshot.transcript.len(), if accepted { 3 } else { 2 });
            assert!(sim.submit_user_message("After").is_none());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_reply() {
        let sim = simulator();
        sim.submit_user_message("Journal").unwrap();
        let shared = Arc::clone(&sim.shared);
        drop(sim);

        elapse(3000).await;
        assert_eq!(shared.state.lock().transcript().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_jump_to_stage_does_not_schedule() {
        let sim = simulator();
        sim.jump_to_stage(3);
        elapse(3000).await;
        assert_eq!(sim.stage(), Stage::ScheduleTime);
        assert_eq!(sim.transcript_len(), 2);
        assert!(!sim.is_awaiting_reply());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_delay() {
        let sim = GoalSessionSimulator::builder()
            .config(SimulatorConfig::default().with_reply_delay_ms(200))
            .seed(5)
            .build();
        sim.submit_user_message("Study").unwrap();

        elapse(201).await;
        assert_eq!(sim.transcript_len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_uses_clock() {
        let sim = simulator();
        sim.submit_user_message("Read").unwrap();
        sim.wait_for_reply().await;

        let snapshot = sim.snapshot();
        assert!(snapshot.transcript[2..].iter().all(|m| m.timestamp() == "3:15 PM"));
    }

    #[tokio::test]
    async fn test_suggestions_visible_only_on_first_stage() {
        let sim = simulator();
        assert!(sim.suggestions_visible());
        assert_eq!(sim.suggestions()[0], "Exercise");
        sim.jump_to_stage(2);
        assert!(!sim.suggestions_visible());
        sim.jump_to_stage(1);
        assert!(sim.suggestions_visible());
    }
}
