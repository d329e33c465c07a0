//! The conversation client: a session id, an append-only message log, and the
//! three backend calls that change them.
//!
//! Every log mutation is mirrored to the injected [`MessageRenderer`] while
//! the state lock is held, so the renderer sees exactly the log's order. The
//! lock is never held across a backend call; sends overlap unless
//! [`RequestOrdering::Sequential`] is configured, in which case a request gate
//! admits one send at a time.
//!
//! A restart starts a new session epoch. Replies to sends issued in an earlier
//! epoch are dropped when they arrive, so a restarted log only ever shows
//! what happened after the restart.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::backend::{ConversationBackend, MessageRequest, SessionRequest, Summary};
use crate::config::{ClientConfig, RequestOrdering, RestartPolicy};
use crate::core_types::{Message, SessionId, SessionState};
use crate::errors::ClientError;
use crate::renderer::MessageRenderer;

/// Shown as the AI's turn when the backend could not be reached or answered garbage.
pub const SERVER_ERROR_TEXT: &str = "Server error.";
pub const SESSION_RESTARTED_TEXT: &str = "Session restarted.";
pub const RESTART_FAILED_TEXT: &str = "Restart failed.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    pub session_id: SessionId,
    pub topic: Option<String>,
    pub ordering: RequestOrdering,
    pub restart_policy: RestartPolicy,
}

impl ClientOptions {
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            topic: None,
            ordering: RequestOrdering::default(),
            restart_policy: RestartPolicy::default(),
        }
    }

    /// Resolve options from configuration, generating a session id if none is set.
    pub fn from_config(config: &ClientConfig) -> Self {
        let session_id = config
            .session
            .id
            .as_deref()
            .map(SessionId::from)
            .unwrap_or_else(SessionId::generate);

        Self {
            session_id,
            topic: config.session.topic.clone(),
            ordering: config.behavior.ordering,
            restart_policy: config.behavior.restart_policy,
        }
    }

    pub fn with_ordering(mut self, ordering: RequestOrdering) -> Self {
        self.ordering = ordering;
        self
    }

    pub fn with_restart_policy(mut self, restart_policy: RestartPolicy) -> Self {
        self.restart_policy = restart_policy;
        self
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank input; nothing was appended or sent.
    Ignored,
    /// The backend answered and this AI message was appended.
    Replied(Message),
    /// A restart happened while the request was in flight; the reply was dropped.
    Discarded,
}

struct Inner {
    state: SessionState,
    epoch: u64,
    pending: usize,
}

pub struct ConversationClient {
    backend: Arc<dyn ConversationBackend>,
    renderer: Arc<dyn MessageRenderer>,
    options: ClientOptions,
    inner: Mutex<Inner>,
    send_gate: Mutex<()>,
}

impl ConversationClient {
    pub fn new(
        backend: Arc<dyn ConversationBackend>,
        renderer: Arc<dyn MessageRenderer>,
        options: ClientOptions,
    ) -> Self {
        log::info!(
            "Conversation client ready for session {} ({:?} ordering, {:?} restarts)",
            options.session_id,
            options.ordering,
            options.restart_policy
        );

        Self {
            backend,
            renderer,
            inner: Mutex::new(Inner {
                state: SessionState::new(options.session_id.clone()),
                epoch: 0,
                pending: 0,
            }),
            options,
            send_gate: Mutex::new(()),
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.options.session_id
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.inner.lock().await.state.messages.clone()
    }

    pub async fn is_waiting_for_reply(&self) -> bool {
        self.inner.lock().await.state.is_waiting_for_reply
    }

    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.state.clone()
    }

    /// Send one line of user input.
    ///
    /// The user's message is appended before the backend is called and is never
    /// rolled back. Exactly one AI message follows: the backend's reply, or
    /// [`SERVER_ERROR_TEXT`] when the call fails, in which case the error is
    /// also returned.
    pub async fn send_message(&self, text: &str) -> Result<SendOutcome, ClientError> {
        let text = text.trim();
        if text.is_empty() {
            log::debug!("Ignoring blank input");
            return Ok(SendOutcome::Ignored);
        }

        let epoch = {
            let mut inner = self.inner.lock().await;
            self.append(&mut inner, Message::user(text));
            inner.pending += 1;
            if !inner.state.is_waiting_for_reply {
                inner.state.is_waiting_for_reply = true;
                self.renderer.set_typing(true);
            }
            inner.epoch
        };

        // Held until the reply is appended, so the next send cannot overtake it.
        let _turn = match self.options.ordering {
            RequestOrdering::Sequential => Some(self.send_gate.lock().await),
            RequestOrdering::Completion => None,
        };

        // A restart while queued on the gate means this message no longer exists locally.
        if self.inner.lock().await.epoch != epoch {
            log::debug!("Dropping queued send from before the last restart");
            return Ok(SendOutcome::Discarded);
        }

        let request = MessageRequest {
            session_id: self.options.session_id.clone(),
            message: text.to_string(),
            topic: self.options.topic.clone(),
        };
        let result = self.backend.send_message(request).await;

        let mut inner = self.inner.lock().await;
        if inner.epoch != epoch {
            log::debug!("Dropping reply from before the last restart");
            return result.map(|_| SendOutcome::Discarded);
        }

        inner.pending = inner.pending.saturating_sub(1);
        if inner.pending == 0 {
            inner.state.is_waiting_for_reply = false;
            self.renderer.set_typing(false);
        }

        match result {
            Ok(reply) => {
                let message = Message::ai(reply.display_text());
                self.append(&mut inner, message.clone());
                Ok(SendOutcome::Replied(message))
            }
            Err(err) => {
                log::error!("Send failed for session {}: {}", self.options.session_id, err);
                self.append(&mut inner, Message::ai(SERVER_ERROR_TEXT));
                Err(err)
            }
        }
    }

    /// Restart the session on the backend and locally.
    ///
    /// With [`RestartPolicy::Always`] the local log is reset to the single
    /// [`SESSION_RESTARTED_TEXT`] message whatever the backend says; a failed
    /// call is still returned as an error. With [`RestartPolicy::RequireBackend`]
    /// a failed or refused restart leaves the log untouched.
    pub async fn restart(&self) -> Result<(), ClientError> {
        let request = SessionRequest {
            session_id: self.options.session_id.clone(),
            topic: self.options.topic.clone(),
        };
        let result = self.backend.restart(request).await;

        let result = match (self.options.restart_policy, result) {
            (RestartPolicy::RequireBackend, Ok(reply)) if !reply.is_ok() => Err(ClientError::Rejected(
                format!("restart status '{}'", reply.status.unwrap_or_default()),
            )),
            (_, result) => result.map(|_| ()),
        };

        if let Err(err) = &result {
            if self.options.restart_policy == RestartPolicy::RequireBackend {
                log::warn!("Restart not confirmed by backend, keeping local session: {}", err);
                self.renderer.notify(RESTART_FAILED_TEXT);
                return result;
            }
            log::warn!("Restart call failed, resetting local session anyway: {}", err);
        }

        let mut inner = self.inner.lock().await;
        let was_waiting = inner.state.is_waiting_for_reply;
        inner.epoch += 1;
        inner.pending = 0;
        inner.state.reset();
        self.renderer.clear();
        if was_waiting {
            self.renderer.set_typing(false);
        }
        self.append(&mut inner, Message::ai(SESSION_RESTARTED_TEXT));
        log::info!("Session {} restarted", self.options.session_id);

        result
    }

    /// Fetch the progress summary and surface it as a notification.
    /// The message log is never touched.
    pub async fn request_summary(&self) -> Result<Summary, ClientError> {
        let request = SessionRequest::new(self.options.session_id.clone());
        match self.backend.summary(request).await {
            Ok(summary) => {
                self.renderer.notify(&summary.progress_notice());
                Ok(summary)
            }
            Err(err) => {
                log::error!("Summary failed for session {}: {}", self.options.session_id, err);
                self.renderer.notify(SERVER_ERROR_TEXT);
                Err(err)
            }
        }
    }

    fn append(&self, inner: &mut Inner, message: Message) {
        self.renderer.append(&message);
        inner.state.messages.push(message);
    }
}
