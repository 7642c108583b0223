//! Conversation Session Controller: the stateful surface between a chat UI
//! and the workflow engine.
//!
//! Owns the message history, the single-response-in-flight guard, the
//! thinking placeholder lifecycle, spoken-reply playback, and the timed
//! system-feedback window. Playback and feedback distribution go through
//! injected ports so the core stays free of platform audio and transport
//! concerns.

use crate::shared::{
    ApiSettings, ChatFile, ChatMessage, FeedbackRating, Room, Sender,
};
use crate::workflow::{Clock, WorkflowEngine};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

// -----------------------------------------------------------------------------
// Ports
// -----------------------------------------------------------------------------

/// Sink for generated spoken replies. The content is a data-URI payload.
pub trait AudioPlayback: Send + Sync {
    fn play_audio_from_url(&self, content: &str);
}

/// Sink for user and system feedback events.
pub trait FeedbackOutlet: Send + Sync {
    /// Explicit user rating on an AI message.
    fn distribute_feedback(&self, message: &ChatMessage, rating: FeedbackRating, reason: &str);
    /// Automatic positive signal when the feedback window lapses unrated.
    fn system_feedback(&self, message: &ChatMessage);
}

/// Default playback port: logs instead of playing.
pub struct SilentPlayback;

impl AudioPlayback for SilentPlayback {
    fn play_audio_from_url(&self, content: &str) {
        debug!("[SESSION] spoken reply ready ({} bytes, not played)", content.len());
    }
}

/// Default feedback port: structured log lines only.
pub struct LoggingFeedbackOutlet;

impl FeedbackOutlet for LoggingFeedbackOutlet {
    fn distribute_feedback(&self, message: &ChatMessage, rating: FeedbackRating, reason: &str) {
        info!(
            "[SESSION] user feedback {rating:?} on {} (reason: {reason})",
            message.id
        );
    }

    fn system_feedback(&self, message: &ChatMessage) {
        info!("[SESSION] window lapsed, system feedback applied to {}", message.id);
    }
}

// -----------------------------------------------------------------------------
// Session
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// A workflow invocation is already running for this session.
    #[error("a response is already being generated; wait for it to finish")]
    ResponsePending,
    /// Feedback targeted a message id that is not an AI response in this
    /// session's history.
    #[error("no AI message with id \"{0}\" in this session")]
    UnknownMessage(String),
}

#[derive(Default)]
struct SessionState {
    messages: Vec<ChatMessage>,
    pending: bool,
}

struct FeedbackTimer {
    message_id: String,
    handle: JoinHandle<()>,
}

/// One chat session. At most one workflow invocation runs at a time; every
/// submission appends a user message and exactly one AI message (response or
/// rendered error) and leaves no thinking placeholder behind.
pub struct ConversationSession {
    engine: WorkflowEngine,
    clock: Arc<dyn Clock>,
    feedback_window: Duration,
    audio: Arc<dyn AudioPlayback>,
    outlet: Arc<dyn FeedbackOutlet>,
    state: Arc<Mutex<SessionState>>,
    timer: Mutex<Option<FeedbackTimer>>,
}

impl ConversationSession {
    pub fn new(
        engine: WorkflowEngine,
        clock: Arc<dyn Clock>,
        feedback_window: Duration,
        audio: Arc<dyn AudioPlayback>,
        outlet: Arc<dyn FeedbackOutlet>,
    ) -> Self {
        Self {
            engine,
            clock,
            feedback_window,
            audio,
            outlet,
            state: Arc::new(Mutex::new(SessionState::default())),
            timer: Mutex::new(None),
        }
    }

    /// Snapshot of the session history.
    pub async fn messages(&self) -> Vec<ChatMessage> {
        self.state.lock().await.messages.clone()
    }

    /// Whether a workflow invocation is currently in flight.
    pub async fn is_pending(&self) -> bool {
        self.state.lock().await.pending
    }

    /// Submit a user message and run it through the workflow engine.
    /// Returns the appended AI message.
    pub async fn submit(
        &self,
        text: impl Into<String>,
        files: Vec<ChatFile>,
        rooms: &[Room],
        settings: &ApiSettings,
    ) -> Result<ChatMessage, SessionError> {
        self.submit_inner(text.into(), files, rooms, settings, || {})
            .await
    }

    /// Submit a voice recording as an empty-text message. `consumed` fires
    /// once the recording is owned by the session, so the recorder can
    /// release its buffer.
    pub async fn ingest_recording(
        &self,
        recording: ChatFile,
        rooms: &[Room],
        settings: &ApiSettings,
        consumed: impl FnOnce(),
    ) -> Result<ChatMessage, SessionError> {
        self.submit_inner(String::new(), vec![recording], rooms, settings, consumed)
            .await
    }

    async fn submit_inner(
        &self,
        text: String,
        files: Vec<ChatFile>,
        rooms: &[Room],
        settings: &ApiSettings,
        accepted: impl FnOnce(),
    ) -> Result<ChatMessage, SessionError> {
        let (user_msg, thinking_id) = {
            let mut state = self.state.lock().await;
            if state.pending {
                return Err(SessionError::ResponsePending);
            }
            state.pending = true;
            let user_msg = ChatMessage::user(text, files);
            let thinking = ChatMessage::thinking();
            let thinking_id = thinking.id.clone();
            state.messages.push(user_msg.clone());
            state.messages.push(thinking);
            (user_msg, thinking_id)
        };
        accepted();

        // A newer message supersedes any outstanding feedback window, even
        // if this submission ends in an error bubble.
        self.cancel_feedback_timer().await;

        // Engine runs without holding the session lock, so readers can still
        // observe the thinking placeholder mid-flight.
        let result = self.engine.process(&user_msg, rooms, settings).await;

        let ai_msg = match result.error.clone() {
            Some(error) => ChatMessage::workflow_error(error),
            None => ChatMessage::from_workflow(result),
        };

        {
            let mut state = self.state.lock().await;
            state.messages.retain(|m| m.id != thinking_id);
            state.messages.push(ai_msg.clone());
            state.pending = false;
        }

        if let Some(audio) = &ai_msg.generated_audio {
            self.audio.play_audio_from_url(&audio.content);
        }

        // Error bubbles get no feedback window.
        if !ai_msg.id.starts_with("err-") {
            self.arm_feedback_timer(ai_msg.id.clone()).await;
        }
        Ok(ai_msg)
    }

    /// Record an explicit user rating on an AI message. Cancels the pending
    /// system-feedback timer when it targets the same message.
    pub async fn apply_feedback(
        &self,
        message_id: &str,
        rating: FeedbackRating,
        reason: impl Into<String>,
    ) -> Result<(), SessionError> {
        let reason = reason.into();
        let rated = {
            let mut state = self.state.lock().await;
            let msg = state
                .messages
                .iter_mut()
                .find(|m| m.id == message_id && m.sender == Sender::Ai && !m.is_thinking)
                .ok_or_else(|| SessionError::UnknownMessage(message_id.to_string()))?;
            msg.feedback = Some(rating);
            msg.feedback_reason = Some(reason.clone());
            // An explicit rating replaces any system feedback already applied.
            msg.system_feedback_applied = false;
            msg.clone()
        };

        let mut timer = self.timer.lock().await;
        if let Some(active) = timer.as_ref() {
            if active.message_id == message_id {
                active.handle.abort();
                *timer = None;
            }
        }
        drop(timer);

        self.outlet.distribute_feedback(&rated, rating, &reason);
        Ok(())
    }

    async fn cancel_feedback_timer(&self) {
        let mut timer = self.timer.lock().await;
        if let Some(previous) = timer.take() {
            previous.handle.abort();
        }
    }

    /// Arm (or re-arm) the lapse timer for the latest AI message. Only one
    /// timer exists per session; a new response supersedes the old window.
    async fn arm_feedback_timer(&self, message_id: String) {
        let state = Arc::clone(&self.state);
        let clock = Arc::clone(&self.clock);
        let outlet = Arc::clone(&self.outlet);
        let window = self.feedback_window;
        let target = message_id.clone();

        let handle = tokio::spawn(async move {
            clock.suspend(window).await;
            let mut guard = state.lock().await;
            let Some(msg) = guard.messages.iter_mut().find(|m| m.id == target) else {
                return;
            };
            // A rating that raced the timer wins.
            if msg.feedback.is_some() || msg.system_feedback_applied {
                return;
            }
            msg.system_feedback_applied = true;
            let snapshot = msg.clone();
            drop(guard);
            outlet.system_feedback(&snapshot);
        });

        let mut timer = self.timer.lock().await;
        if let Some(previous) = timer.take() {
            previous.handle.abort();
        }
        *timer = Some(FeedbackTimer { message_id, handle });
    }
}
