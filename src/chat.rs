//! Chat widget core: transcript, state machine, and message exchange.
//!
//! One exchange is a two-phase commit to the transcript:
//!
//! 1. [`ChatWidget::begin_send`] appends the visitor's message immediately,
//!    clears the input, and hands back a [`PendingExchange`].
//! 2. [`ChatWidget::complete`] appends the bot's answer once the webhook
//!    call has resolved, whether it succeeded or failed.
//!
//! [`ChatWidget::send`] runs both phases around the transport call. Failures
//! never escape: they turn into a fixed apology in the transcript.
//!
//! ```text
//! Idle ──open──▶ Ready ──send──▶ Sending ──▶ AwaitingReply ──┬─▶ DisplayingReply ─┐
//!   ▲                ▲                                      └─▶ ErrorDisplayed  ──┤
//!   └────close───────┴──────────────────── input ◀─────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ChatConfig;
use crate::error::WebhookError;
use crate::session::ChatSession;
use crate::webhook::{ChatReply, ChatRequest, ChatTransport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry. Never mutated after it is appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

/// Append-only message log.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// Panel closed.
    Idle,
    /// Open, waiting for input.
    Ready,
    Sending,
    AwaitingReply,
    DisplayingReply,
    ErrorDisplayed,
}

/// How one send ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// Input was blank; nothing happened.
    Ignored,
    /// The webhook answered and a bot message was appended.
    Replied,
    /// The call failed and the apology was appended.
    Failed,
    /// The widget was disposed before the reply arrived.
    Discarded,
}

/// Fixed bot texts.
#[derive(Debug, Clone)]
pub struct ChatTexts {
    pub greeting: String,
    /// Used when the webhook answers without a `reply`.
    pub fallback_reply: String,
    /// Used when the call fails.
    pub error_reply: String,
}

impl From<&ChatConfig> for ChatTexts {
    fn from(config: &ChatConfig) -> Self {
        Self {
            greeting: config.greeting.clone(),
            fallback_reply: config.fallback_reply.clone(),
            error_reply: config.error_reply.clone(),
        }
    }
}

impl Default for ChatTexts {
    fn default() -> Self {
        Self::from(&ChatConfig::default())
    }
}

/// An exchange whose user message is already in the transcript.
#[derive(Debug, Clone)]
pub struct PendingExchange {
    request: ChatRequest,
}

impl PendingExchange {
    pub fn request(&self) -> &ChatRequest {
        &self.request
    }
}

pub struct ChatWidget<T> {
    session: ChatSession,
    transport: T,
    texts: ChatTexts,
    transcript: Transcript,
    input: String,
    open: bool,
    phase: ChatState,
    typing: bool,
    disposed: bool,
    last_id: i64,
    scroll_anchor: Option<String>,
}

impl<T: ChatTransport> ChatWidget<T> {
    /// A closed widget whose transcript holds only the greeting.
    pub fn new(session: ChatSession, transport: T, texts: ChatTexts) -> Self {
        let mut widget = Self {
            session,
            transport,
            texts,
            transcript: Transcript::default(),
            input: String::new(),
            open: false,
            phase: ChatState::Ready,
            typing: false,
            disposed: false,
            last_id: 0,
            scroll_anchor: None,
        };
        let greeting = widget.texts.greeting.clone();
        widget.push(greeting, Sender::Bot);
        widget
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_typing(&self) -> bool {
        self.typing
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Id of the newest message, i.e. where the view is scrolled to.
    pub fn scroll_anchor(&self) -> Option<&str> {
        self.scroll_anchor.as_deref()
    }

    pub fn state(&self) -> ChatState {
        if self.open {
            self.phase
        } else {
            ChatState::Idle
        }
    }

    pub fn open(&mut self) {
        self.open = true;
    }

    /// Hide the panel. An exchange in flight still completes.
    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
        if matches!(
            self.phase,
            ChatState::DisplayingReply | ChatState::ErrorDisplayed
        ) {
            self.phase = ChatState::Ready;
        }
    }

    /// Mark the widget unmounted. Later completions are dropped.
    pub fn dispose(&mut self) {
        self.disposed = true;
        self.typing = false;
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Phase one: append the visitor's message and build the request.
    ///
    /// Returns `None` without touching any state when the input is blank.
    pub fn begin_send(&mut self) -> Option<PendingExchange> {
        if self.disposed || self.input.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        let request = ChatRequest::new(text.clone(), self.session.token());
        self.push(text, Sender::User);
        self.phase = ChatState::Sending;
        self.typing = true;
        Some(PendingExchange { request })
    }

    /// Phase two: append the bot's answer for a finished call.
    pub fn complete(
        &mut self,
        pending: PendingExchange,
        result: Result<ChatReply, WebhookError>,
    ) -> ExchangeOutcome {
        if self.disposed {
            debug!(
                session = %pending.request.session_id,
                "dropping chat reply for disposed widget"
            );
            return ExchangeOutcome::Discarded;
        }
        self.typing = false;
        match result {
            Ok(reply) => {
                let text = reply
                    .reply
                    .unwrap_or_else(|| self.texts.fallback_reply.clone());
                self.push(text, Sender::Bot);
                self.phase = ChatState::DisplayingReply;
                ExchangeOutcome::Replied
            }
            Err(e) => {
                warn!(error = %e, "chat exchange failed");
                let text = self.texts.error_reply.clone();
                self.push(text, Sender::Bot);
                self.phase = ChatState::ErrorDisplayed;
                ExchangeOutcome::Failed
            }
        }
    }

    /// Run one full exchange with the current input.
    pub async fn send(&mut self) -> ExchangeOutcome {
        let Some(pending) = self.begin_send() else {
            return ExchangeOutcome::Ignored;
        };
        self.phase = ChatState::AwaitingReply;
        let result = self.transport.send(pending.request()).await;
        self.complete(pending, result)
    }

    fn push(&mut self, text: String, sender: Sender) {
        let now = Utc::now();
        // Ids follow the millisecond clock but never repeat or go backwards.
        let id = now.timestamp_millis().max(self.last_id + 1);
        self.last_id = id;
        let message = ChatMessage {
            id: id.to_string(),
            text,
            sender,
            timestamp: now,
        };
        self.scroll_anchor = Some(message.id.clone());
        self.transcript.append(message);
    }
}
